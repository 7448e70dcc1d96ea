//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use world_core::{
    HealthStatus, Location, ObjectBase, ObjectFlags, ResourceResolver, RoomGeometry, RoomInfo,
    RoomObject, SectorId, SectorMoved, SubSectorRef, V2, V3,
};
use world_sync::{ServerMessage, SyncConfig, WorldEvent, WorldSync};

pub const AVATAR: u32 = 1;
pub const PAIN_SOUND: &str = "ouch_red.wav";

/// Single-sector room with a flat floor whose height tests can move.
#[derive(Default)]
pub struct FlatGeometry {
    floor: Mutex<f32>,
    moves: Mutex<Option<Sender<SectorMoved>>>,
}

impl FlatGeometry {
    pub const SECTOR: SectorId = SectorId(7);

    pub fn new(floor: f32) -> Self {
        Self {
            floor: Mutex::new(floor),
            moves: Mutex::new(None),
        }
    }

    /// Moves the floor and notifies the current subscriber, if any.
    pub fn move_floor(&self, floor: f32) {
        *self.floor.lock().unwrap() = floor;
        if let Some(sender) = self.moves.lock().unwrap().as_ref() {
            let _ = sender.send(SectorMoved {
                sector: Self::SECTOR,
            });
        }
    }
}

impl RoomGeometry for FlatGeometry {
    fn locate(&self, _point: V2) -> Option<Location> {
        Some(Location {
            sub_sector: SubSectorRef {
                index: 0,
                sector: Self::SECTOR,
            },
            height: *self.floor.lock().unwrap(),
        })
    }

    fn subscribe_sector_moves(&self) -> Option<Receiver<SectorMoved>> {
        let (sender, receiver) = mpsc::channel();
        *self.moves.lock().unwrap() = Some(sender);
        Some(receiver)
    }
}

/// Resolver serving one geometry for every room and a single pain sound.
pub struct StaticResolver {
    pub geometry: Arc<FlatGeometry>,
}

impl ResourceResolver for StaticResolver {
    fn room_geometry(&self, _room: &RoomInfo) -> Option<Arc<dyn RoomGeometry>> {
        Some(self.geometry.clone())
    }

    fn pain_status(&self, sound: &str) -> HealthStatus {
        if sound == PAIN_SOUND {
            HealthStatus::Red
        } else {
            HealthStatus::Unknown
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Engine without geometry.
pub fn engine() -> WorldSync {
    init_tracing();
    WorldSync::new(SyncConfig::default(), Arc::new(world_core::NoResources))
}

/// Engine whose rooms resolve to a flat floor at height 0.
pub fn engine_with_geometry() -> (WorldSync, Arc<FlatGeometry>) {
    init_tracing();
    let geometry = Arc::new(FlatGeometry::new(0.0));
    let resolver = StaticResolver {
        geometry: geometry.clone(),
    };
    (
        WorldSync::new(SyncConfig::default(), Arc::new(resolver)),
        geometry,
    )
}

pub fn occupant(id: u32, flags: ObjectFlags, x: f32, y: f32) -> RoomObject {
    RoomObject::new(
        ObjectBase::new(id, format!("object {id}")).with_flags(flags),
        V3::new(x, y, 0.0),
    )
}

pub fn avatar_at(x: f32, y: f32) -> RoomObject {
    occupant(AVATAR, ObjectFlags::PLAYER, x, y)
}

/// Enters a room owned by [`AVATAR`] and fills it with `objects`.
pub fn enter_room(sync: &mut WorldSync, room_file: &str, objects: Vec<RoomObject>) {
    sync.handle_message(ServerMessage::Player(RoomInfo::new(AVATAR, room_file)));
    sync.handle_message(ServerMessage::RoomContents(objects));
}

/// Every event currently buffered in `receiver`.
pub fn drain(receiver: &mut broadcast::Receiver<WorldEvent>) -> Vec<WorldEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

pub fn target_id(sync: &WorldSync) -> Option<u32> {
    sync.target().map(|target| target.id.0)
}
