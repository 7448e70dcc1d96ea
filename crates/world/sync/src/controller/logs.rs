//! Chat log, raw message log and chat command history.

use world_core::ChatMessage;

use super::WorldSync;
use crate::events::WorldEvent;
use crate::message::{ClientMessageKind, LoginMessageKind, ServerMessageKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

/// One line of the raw protocol trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawLogEntry {
    pub direction: MessageDirection,
    pub kind: &'static str,
}

impl WorldSync {
    /// Chat lines, oldest first.
    pub fn chat_log(&self) -> impl Iterator<Item = &ChatMessage> {
        self.state.chat.iter()
    }

    /// Raw protocol trace, oldest first.
    pub fn raw_log(&self) -> impl Iterator<Item = &RawLogEntry> {
        self.state.raw_log.iter()
    }

    /// Records an outgoing message in the raw log. Pings are skipped unless
    /// keepalive logging is enabled.
    pub fn log_outgoing(&mut self, kind: ClientMessageKind) {
        let logs = &self.config.logs;
        if logs.log_outgoing && (logs.log_ping || kind != ClientMessageKind::Ping) {
            self.record_raw(MessageDirection::Outgoing, kind.into());
        }
        self.flush();
    }

    /// Remembers an executed chat command as the newest history entry.
    pub fn add_command_history(&mut self, command: impl Into<String>) {
        self.state.command_history.push(command);
    }

    /// Recalls the next older chat command.
    pub fn next_command(&mut self) -> Option<String> {
        self.state.command_history.next().map(str::to_owned)
    }

    /// Recalls the next newer chat command; past the newest the cursor resets.
    pub fn previous_command(&mut self) -> Option<String> {
        self.state.command_history.previous().map(str::to_owned)
    }

    pub(super) fn log_incoming(&mut self, kind: ServerMessageKind) {
        let logs = &self.config.logs;
        if logs.log_incoming && (logs.log_ping || kind != ServerMessageKind::EchoPing) {
            self.record_raw(MessageDirection::Incoming, kind.into());
        }
    }

    pub(super) fn log_incoming_login(&mut self, kind: LoginMessageKind) {
        if self.config.logs.log_incoming {
            self.record_raw(MessageDirection::Incoming, kind.into());
        }
    }

    /// Appends a chat line, evicting the oldest once the log is full.
    pub(super) fn append_chat(&mut self, message: ChatMessage) {
        self.state.chat.push(message.clone());
        self.pending.push(WorldEvent::ChatAppended(message));
    }

    fn record_raw(&mut self, direction: MessageDirection, kind: &'static str) {
        let entry = RawLogEntry { direction, kind };
        self.state.raw_log.push(entry);
        self.pending.push(WorldEvent::RawMessage(entry));
    }
}
