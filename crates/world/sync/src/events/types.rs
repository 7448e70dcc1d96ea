//! Event payloads published after each message or tick.

use bitflags::bitflags;
use world_core::{
    BackgroundOverlay, ChatMessage, EffectFields, InventoryObject, ListChange, ObjectBase,
    OnlinePlayer, PanelFields, PlayerOverlay, Projectile, RoomFields, RoomObject, SpellObject,
    Stat, StatGroup, TradeFields,
};

use super::bus::Topic;
use crate::controller::RawLogEntry;
use crate::error::AnomalyKind;

bitflags! {
    /// Tracks which engine-level values changed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ControllerFields: u16 {
        const AVATAR          = 1 << 0;
        const TARGET          = 1 << 1;
        const SELF_TARGET     = 1 << 2;
        const RESTING         = 1 << 3;
        const SAFETY          = 1 << 4;
        const WAITING         = 1 << 5;
        const WORLD_TIME      = 1 << 6;
        const TICKS_PER_SEC   = 1 << 7;
        const ROUND_TRIP      = 1 << 8;
        const ACCOUNT_TYPE    = 1 << 9;
        const UI_MODE         = 1 << 10;
        const VIEWER_POSITION = 1 << 11;
        const ACTION_BUTTONS  = 1 << 12;
    }
}

/// Singleton windows tracked as panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PanelKind {
    LookObject,
    LookPlayer,
    ObjectContents,
    NewsGroup,
    GuildInfo,
    GuildAsk,
    GuildShield,
    Diplomacy,
    Welcome,
    CharCreation,
    LightShading,
    Music,
}

impl PanelKind {
    pub fn topic(self) -> Topic {
        match self {
            PanelKind::LookObject
            | PanelKind::LookPlayer
            | PanelKind::ObjectContents
            | PanelKind::NewsGroup
            | PanelKind::Welcome
            | PanelKind::CharCreation => Topic::Session,
            PanelKind::GuildInfo
            | PanelKind::GuildAsk
            | PanelKind::GuildShield
            | PanelKind::Diplomacy => Topic::Social,
            PanelKind::LightShading | PanelKind::Music => Topic::Room,
        }
    }
}

/// Change notification delivered to presentation.
#[derive(Clone, Debug)]
pub enum WorldEvent {
    // Room
    RoomObjects(ListChange<RoomObject>),
    Projectiles(ListChange<Projectile>),
    RoomBuffs(ListChange<ObjectBase>),
    PlayerOverlays(ListChange<PlayerOverlay>),
    BackgroundOverlays(ListChange<BackgroundOverlay>),
    RoomInfo(RoomFields),
    Effects(EffectFields),

    // Inventory
    Inventory(ListChange<InventoryObject>),
    Spells(ListChange<SpellObject>),

    // Avatar
    Stats {
        group: StatGroup,
        change: ListChange<Stat>,
    },
    AvatarBuffs(ListChange<ObjectBase>),

    // Social
    OnlinePlayers(ListChange<OnlinePlayer>),
    ChatAppended(ChatMessage),
    ChatCleared,

    // Session
    Trade(TradeFields),
    Buy(TradeFields),
    Panel {
        panel: PanelKind,
        fields: PanelFields,
    },

    // Controller
    Controller(ControllerFields),

    // Diagnostics
    RawMessage(RawLogEntry),
    Anomaly {
        kind: AnomalyKind,
        code: &'static str,
    },
}

impl WorldEvent {
    pub fn topic(&self) -> Topic {
        match self {
            WorldEvent::RoomObjects(_)
            | WorldEvent::Projectiles(_)
            | WorldEvent::RoomBuffs(_)
            | WorldEvent::PlayerOverlays(_)
            | WorldEvent::BackgroundOverlays(_)
            | WorldEvent::RoomInfo(_)
            | WorldEvent::Effects(_) => Topic::Room,
            WorldEvent::Inventory(_) | WorldEvent::Spells(_) => Topic::Inventory,
            WorldEvent::Stats { .. } | WorldEvent::AvatarBuffs(_) => Topic::Avatar,
            WorldEvent::OnlinePlayers(_) | WorldEvent::ChatAppended(_) | WorldEvent::ChatCleared => {
                Topic::Social
            }
            WorldEvent::Trade(_) | WorldEvent::Buy(_) => Topic::Session,
            WorldEvent::Panel { panel, .. } => panel.topic(),
            WorldEvent::Controller(_) => Topic::Controller,
            WorldEvent::RawMessage(_) | WorldEvent::Anomaly { .. } => Topic::Diagnostics,
        }
    }
}
