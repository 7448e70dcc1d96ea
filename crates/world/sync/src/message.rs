//! Decoded inbound protocol messages.
//!
//! Framing and payload decoding belong to the transport layer; the engine
//! receives one of these values per protocol event. Message kinds are derived
//! from the variants and only used for logging and diagnostics.

use world_core::{
    Article, BackgroundMusic, BackgroundOverlay, CharCreationInfo, ChatMessage, DiplomacyInfo,
    EffectKind, GuildAskData, GuildInfo, GuildShieldInfo, InventoryObject, LightShading,
    NewsGroup, ObjectBase, ObjectId, ObjectInfo, OnlinePlayer, PlayerInfo, PlayerOverlay,
    RoomInfo, RoomObject, SpellObject, Stat, StatGroup, V2, WelcomeInfo,
};

/// Which of the two buff collections an enchantment belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffKind {
    Avatar,
    Room,
}

/// A projectile launch as announced by the server.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileLaunch {
    pub base: ObjectBase,
    pub source: ObjectId,
    pub target: ObjectId,
    pub speed: u8,
}

/// Commands nested in the user-command envelope.
#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UserCommand {
    LookPlayer(PlayerInfo),
    GuildInfo(GuildInfo),
    GuildShieldInfo(GuildShieldInfo),
    /// Client request echoed back; carries no data.
    GuildShieldInfoRequest,
    GuildAsk(GuildAskData),
    GuildShieldList(Vec<String>),
    GuildShieldListRequest,
    GuildList(DiplomacyInfo),
    /// Any command the engine does not mirror.
    Other(u8),
}

/// Account privilege level reported at login.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AccountType {
    #[default]
    Player,
    Guest,
    Moderator,
    Admin,
}

/// Messages received while logging in.
#[derive(Clone, Debug, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(LoginMessageKind), derive(Hash, strum::IntoStaticStr))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoginMessage {
    LoginOk { account_type: AccountType },
    /// Login-mode message the engine does not mirror, by wire code.
    Other(u8),
}

impl LoginMessage {
    pub fn kind(&self) -> LoginMessageKind {
        self.into()
    }
}

/// Messages received while in the game world.
#[derive(Clone, Debug, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(ServerMessageKind), derive(Hash, strum::IntoStaticStr))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServerMessage {
    // ===== session =====
    Wait,
    Unwait,
    EchoPing,
    InvalidateData,
    Characters(WelcomeInfo),
    CharInfo(CharCreationInfo),
    CharInfoNotOk,

    // ===== chat =====
    SysMessage(ChatMessage),
    Message(ChatMessage),
    Said(ChatMessage),

    // ===== room =====
    Player(RoomInfo),
    RoomContents(Vec<RoomObject>),
    Create(RoomObject),
    Remove(ObjectId),
    Change(ObjectBase),
    Move {
        id: ObjectId,
        destination: V2,
        speed: u8,
    },
    Turn {
        id: ObjectId,
        angle: u16,
    },
    Shoot(ProjectileLaunch),
    PlayWave {
        source: ObjectId,
        sound: String,
    },
    PlayMusic(BackgroundMusic),
    Background(String),
    AddBgOverlay(BackgroundOverlay),
    ChangeBgOverlay(BackgroundOverlay),
    PlayerOverlay(PlayerOverlay),
    LightAmbient(u8),
    LightPlayer(u8),
    LightShading(LightShading),
    Effect(EffectKind),

    // ===== avatar =====
    Stat {
        group: StatGroup,
        stat: Stat,
    },
    StatGroup {
        group: StatGroup,
        stats: Vec<Stat>,
    },
    Inventory(Vec<InventoryObject>),
    InventoryAdd(InventoryObject),
    InventoryRemove(ObjectId),
    Use(ObjectId),
    Unuse(ObjectId),
    UseList(Vec<ObjectId>),
    Spells(Vec<SpellObject>),
    SpellAdd(SpellObject),
    SpellRemove(ObjectId),
    AddEnchantment {
        kind: BuffKind,
        buff: ObjectBase,
    },
    RemoveEnchantment {
        kind: BuffKind,
        id: ObjectId,
    },

    // ===== social =====
    Players(Vec<OnlinePlayer>),
    PlayerAdd(OnlinePlayer),
    PlayerRemove(ObjectId),
    UserCommand(UserCommand),

    // ===== panels =====
    Look(ObjectInfo),
    ObjectContents {
        container: ObjectId,
        items: Vec<ObjectBase>,
    },
    LookNewsGroup(NewsGroup),
    Articles(Vec<Article>),
    Article(String),

    // ===== trade =====
    Offer {
        partner: ObjectId,
        items: Vec<ObjectBase>,
    },
    OfferCanceled,
    Offered(Vec<ObjectBase>),
    CounterOffer(Vec<ObjectBase>),
    CounterOffered(Vec<ObjectBase>),
    BuyList {
        partner: ObjectId,
        items: Vec<ObjectBase>,
    },

    /// Game-mode message the engine does not mirror, by wire code.
    Other(u8),
}

impl ServerMessage {
    pub fn kind(&self) -> ServerMessageKind {
        self.into()
    }
}

/// Kinds of messages the client sends, as reported to the raw log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClientMessageKind {
    Ping,
    Say,
    ReqMove,
    ReqTurn,
    ReqAttack,
    ReqUse,
    ReqUnuse,
    ReqCast,
    ReqLook,
    ReqOffer,
    ReqBuy,
    UserCommand,
    Other,
}
