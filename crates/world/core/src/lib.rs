//! Deterministic state models of the client world mirror.
//!
//! `world-core` holds the building blocks the synchronization engine mutates:
//! identity-indexed collections with buffered change notifications, entity
//! models that report changed fields as bit masks, bounded histories, and the
//! geometry and resource collaborator traits. Nothing here logs or performs I/O.
pub mod collection;
pub mod config;
pub mod error;
pub mod geometry;
pub mod types;

pub use collection::{
    BoundedHistory, CommandHistory, DuplicatePolicy, FilteredView, IdList, Identified, ListChange,
    compare_names,
};
pub use config::WorldConfig;
pub use error::CollectionError;
pub use geometry::{
    Location, NoResources, ResourceResolver, RoomGeometry, SectorId, SectorMoved, SubSectorRef,
};
pub use types::*;
