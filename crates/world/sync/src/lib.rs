//! Client-side world-state synchronization engine.
//!
//! This crate mirrors server-authoritative world state from a stream of decoded
//! protocol messages. Consumers own a [`WorldSync`], feed it messages through
//! [`WorldSync::handle_message`], advance it with [`WorldSync::tick`] and
//! observe the resulting changes on the [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`controller`] hosts the engine: dispatch, tick driver, targeting and logs
//! - [`state`] holds the mirrored state graph the engine owns
//! - [`message`] defines the typed inbound messages
//! - [`events`] provides the topic-based event bus and event payloads
//! - [`config`] and [`error`] carry runtime configuration and absorbed anomalies
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod message;
pub mod state;

pub use config::{LogConfig, SyncConfig, TargetConfig};
pub use controller::{MessageDirection, RawLogEntry, WorldSync};
pub use error::{AnomalyKind, SyncError};
pub use events::{ControllerFields, EventBus, PanelKind, Topic, WorldEvent};
pub use message::{
    AccountType, BuffKind, ClientMessageKind, LoginMessage, LoginMessageKind, ProjectileLaunch,
    ServerMessage, ServerMessageKind, UserCommand,
};
pub use state::{Target, TargetLocation, UiMode, WorldState};
