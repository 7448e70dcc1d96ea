//! Entity models mirrored from the server.
//!
//! Every mutable model applies snapshots field by field and reports the fields
//! that actually changed as a `bitflags` mask. A mask returned with
//! `notify == false` is always empty.
pub mod action;
pub mod animation;
pub mod chat;
pub mod common;
pub mod effects;
pub mod flags;
pub mod info;
pub mod inventory;
pub mod object;
pub mod overlay;
pub mod panel;
pub mod projectile;
pub mod room;
pub mod room_object;
pub mod session;
pub mod stat;

pub use action::{ActionButton, ActionButtonKind, ActionButtons};
pub use animation::Animation;
pub use chat::{ChatKind, ChatMessage, OnlinePlayer};
pub use common::{
    Millis, ObjectId, V2, V3, angle_to_radians, radians_to_angle, relative_viewer_angle,
};
pub use effects::{EffectFields, EffectKind, Effects};
pub use flags::{HealthStatus, ObjectFlags};
pub use info::{
    Article, BackgroundMusic, CharCreationInfo, CharacterSlot, DiplomacyInfo, GuildAskData,
    GuildEntry, GuildInfo, GuildMember, GuildShieldInfo, LightShading, NewsGroup, ObjectContents,
    ObjectInfo, PlayerInfo, WelcomeInfo,
};
pub use inventory::{InventoryObject, SpellObject};
pub use object::{ObjectBase, ObjectFields};
pub use overlay::{BackgroundOverlay, PlayerOverlay};
pub use panel::{Panel, PanelFields};
pub use projectile::{Projectile, ProjectileId, ProjectileStep};
pub use room::{RoomFields, RoomInfo};
pub use room_object::{Movement, RoomObject};
pub use session::{BuySession, TradeFields, TradeSession};
pub use stat::{Stat, StatFields, StatGroup, StatNum, StatValue};

/// Stores `value` into `slot`, returning true if it differed.
pub fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
