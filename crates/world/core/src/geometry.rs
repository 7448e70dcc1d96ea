//! Collaborators supplying room geometry and resource lookups.
//!
//! Geometry is owned by an external resource layer. Objects only keep
//! identity-based references to sub-sectors, recomputed whenever they move.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

use crate::types::{HealthStatus, RoomInfo, V2, V3};

/// Sector of the current room geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectorId(pub u16);

/// Leaf of the room's spatial partition together with its owning sector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubSectorRef {
    pub index: u32,
    pub sector: SectorId,
}

/// Result of locating a ground point inside the room.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub sub_sector: SubSectorRef,
    /// Floor height at the located point.
    pub height: f32,
}

/// Notification that a sector's floor or ceiling moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectorMoved {
    pub sector: SectorId,
}

/// Read-only geometry of the room the avatar is in.
pub trait RoomGeometry: Send + Sync {
    /// Finds the sub-sector and floor height under `point`, if it lies inside
    /// the room.
    fn locate(&self, point: V2) -> Option<Location>;

    /// Line-of-sight test used by target acquisition.
    fn can_see(&self, _from: V3, _to: V3) -> bool {
        true
    }

    /// Opens a subscription to sector movements. Dropping the receiver
    /// detaches it.
    fn subscribe_sector_moves(&self) -> Option<Receiver<SectorMoved>> {
        None
    }
}

/// Read-only resource lookups.
pub trait ResourceResolver: Send + Sync {
    /// Geometry for the room described by `room`, if its resources are available.
    fn room_geometry(&self, room: &RoomInfo) -> Option<Arc<dyn RoomGeometry>>;

    /// Health status implied by a pain sound, `Unknown` for any other sound.
    fn pain_status(&self, _sound: &str) -> HealthStatus {
        HealthStatus::Unknown
    }
}

/// Resolver without any resources; every room runs without geometry.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResources;

impl ResourceResolver for NoResources {
    fn room_geometry(&self, _room: &RoomInfo) -> Option<Arc<dyn RoomGeometry>> {
        None
    }
}
