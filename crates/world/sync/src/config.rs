//! Runtime configuration of the synchronization engine.

use std::env;

use world_core::WorldConfig;

/// Engine configuration.
///
/// Capacities of the bounded logs and histories, event bus buffering, target
/// acquisition radii and the raw message log gates.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub world: WorldConfig,
    pub logs: LogConfig,
    pub targets: TargetConfig,
    /// Buffered events per bus topic before slow receivers start lagging.
    pub event_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            logs: LogConfig::default(),
            targets: TargetConfig::default(),
            event_capacity: 256,
        }
    }
}

impl SyncConfig {
    pub fn new(world: WorldConfig) -> Self {
        Self {
            world,
            ..Self::default()
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `WORLD_CHAT_CAPACITY` - Chat log maximum (default: 100)
    /// - `WORLD_COMMAND_HISTORY` - Chat command history maximum (default: 20)
    /// - `WORLD_RAW_LOG_CAPACITY` - Raw message log capacity (default: 100)
    /// - `WORLD_TARGET_HISTORY` - Visited/clicked target history capacity (default: 50)
    /// - `WORLD_EVENT_CAPACITY` - Event bus capacity per topic (default: 256)
    /// - `WORLD_LOG_INCOMING` - Record incoming messages in the raw log (default: false)
    /// - `WORLD_LOG_OUTGOING` - Record outgoing messages in the raw log (default: false)
    /// - `WORLD_LOG_PING` - Include keepalive traffic in the raw log (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Log capacities
        if let Some(capacity) = read_env::<usize>("WORLD_CHAT_CAPACITY") {
            config.logs.chat_capacity = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("WORLD_COMMAND_HISTORY") {
            config.logs.command_history = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("WORLD_RAW_LOG_CAPACITY") {
            config.logs.raw_capacity = capacity.max(1);
        }

        // Targeting
        if let Some(capacity) = read_env::<usize>("WORLD_TARGET_HISTORY") {
            config.targets.history = capacity.max(1);
        }

        // Event bus
        if let Some(capacity) = read_env::<usize>("WORLD_EVENT_CAPACITY") {
            config.event_capacity = capacity.max(1);
        }

        // Raw log gates
        if let Some(enabled) = read_env_bool("WORLD_LOG_INCOMING") {
            config.logs.log_incoming = enabled;
        }
        if let Some(enabled) = read_env_bool("WORLD_LOG_OUTGOING") {
            config.logs.log_outgoing = enabled;
        }
        if let Some(enabled) = read_env_bool("WORLD_LOG_PING") {
            config.logs.log_ping = enabled;
        }

        config
    }
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Maximum number of chat lines kept.
    pub chat_capacity: usize,
    pub command_history: usize,
    pub raw_capacity: usize,
    pub log_incoming: bool,
    pub log_outgoing: bool,
    /// Keepalive traffic (`Ping`/`EchoPing`) is skipped unless set.
    pub log_ping: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            chat_capacity: 100,
            command_history: 20,
            raw_capacity: 100,
            log_incoming: false,
            log_outgoing: false,
            log_ping: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TargetConfig {
    /// Capacity of both the visited and the clicked target histories.
    pub history: usize,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self { history: 50 }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
