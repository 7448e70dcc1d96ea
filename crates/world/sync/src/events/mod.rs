//! Topic-based change notifications.
//!
//! The engine buffers changes while a message or tick is applied and publishes
//! them here afterwards, so subscribers never observe half-applied state.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{ControllerFields, PanelKind, WorldEvent};
