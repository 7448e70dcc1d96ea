//! The mirrored world state graph.
//!
//! [`WorldState`] is owned by [`WorldSync`](crate::WorldSync), which only hands
//! out shared references. Every mutation goes through a dispatch routine or
//! the tick driver.

use world_core::{
    ActionButtons, BackgroundMusic, BackgroundOverlay, BoundedHistory, BuySession,
    CharCreationInfo, ChatMessage, CommandHistory, DiplomacyInfo, DuplicatePolicy, Effects,
    FilteredView, GuildAskData, GuildInfo, GuildShieldInfo, IdList, InventoryObject,
    LightShading, ListChange, NewsGroup, ObjectBase, ObjectContents, ObjectFields, ObjectFlags,
    ObjectId, ObjectInfo, OnlinePlayer, Panel, PlayerInfo, PlayerOverlay, Projectile, RoomInfo,
    RoomObject, SpellObject, Stat, StatGroup, StatNum, TradeSession, V3, WelcomeInfo,
    compare_names,
};

use crate::config::SyncConfig;
use crate::controller::RawLogEntry;
use crate::events::WorldEvent;
use crate::message::AccountType;

/// Where the current target lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetLocation {
    Room,
    Inventory,
}

/// Resolved current target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub id: ObjectId,
    pub location: TargetLocation,
}

/// Window mode selected by the user interface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum UiMode {
    #[default]
    None,
    Inventory,
    Spells,
    Skills,
    Guild,
    Mail,
    Map,
}

#[derive(Debug)]
pub struct WorldState {
    // ===== room-scoped =====
    pub room: RoomInfo,
    pub room_objects: IdList<RoomObject>,
    /// Occupants flagged as players.
    pub room_players: FilteredView<RoomObject>,
    pub projectiles: IdList<Projectile>,
    pub room_buffs: IdList<ObjectBase>,
    pub background_overlays: IdList<BackgroundOverlay>,
    pub player_overlays: IdList<PlayerOverlay>,
    pub effects: Effects,
    pub light_shading: Panel<LightShading>,
    pub music: Panel<BackgroundMusic>,

    // ===== avatar =====
    pub inventory: IdList<InventoryObject>,
    pub spells: IdList<SpellObject>,
    pub condition: IdList<Stat>,
    pub attributes: IdList<Stat>,
    pub skills: IdList<Stat>,
    pub spell_stats: IdList<Stat>,
    pub avatar_buffs: IdList<ObjectBase>,
    pub action_buttons: ActionButtons,

    // ===== social =====
    pub online_players: IdList<OnlinePlayer>,
    pub ignore_list: Vec<String>,
    pub guild_info: Panel<GuildInfo>,
    pub guild_ask: Panel<GuildAskData>,
    pub guild_shield: Panel<GuildShieldInfo>,
    pub diplomacy: Panel<DiplomacyInfo>,

    // ===== sessions and panels =====
    pub trade: TradeSession,
    pub buy: BuySession,
    pub look_object: Panel<ObjectInfo>,
    pub look_player: Panel<PlayerInfo>,
    pub object_contents: Panel<ObjectContents>,
    pub news_group: Panel<NewsGroup>,
    pub welcome: Panel<WelcomeInfo>,
    pub char_creation: Panel<CharCreationInfo>,

    // ===== engine values =====
    /// Avatar identity announced by the last room transition.
    pub avatar_id: Option<ObjectId>,
    /// Set while the avatar is a present room occupant.
    pub avatar: Option<ObjectId>,
    pub target: Option<Target>,
    pub self_target: bool,
    pub resting: bool,
    pub safety: bool,
    /// Server is saving.
    pub waiting: bool,
    pub account_type: AccountType,
    pub ui_mode: UiMode,
    /// In-world clock, in world minutes.
    pub world_minutes: u64,
    pub ticks_per_second: u32,
    pub round_trip: u32,
    pub viewer_position: V3,

    // ===== histories =====
    pub visited_targets: BoundedHistory<ObjectId>,
    pub clicked_targets: BoundedHistory<ObjectId>,
    pub chat: BoundedHistory<ChatMessage>,
    pub raw_log: BoundedHistory<RawLogEntry>,
    pub command_history: CommandHistory,
}

impl WorldState {
    pub fn new(config: &SyncConfig) -> Self {
        use DuplicatePolicy::{Reject, Replace};

        Self {
            room: RoomInfo::default(),
            room_objects: IdList::new("room_objects", Replace),
            room_players: FilteredView::new(|o: &RoomObject| {
                o.base.flags.contains(ObjectFlags::PLAYER)
            }),
            projectiles: IdList::new("projectiles", Reject),
            room_buffs: IdList::new("room_buffs", Replace),
            background_overlays: IdList::new("background_overlays", Replace),
            player_overlays: IdList::new("player_overlays", Reject),
            effects: Effects::default(),
            light_shading: Panel::new(),
            music: Panel::new(),

            inventory: IdList::new("inventory", Replace),
            spells: IdList::new("spells", Replace).sorted_by(|a: &SpellObject, b: &SpellObject| {
                compare_names(&a.base.name, &b.base.name)
            }),
            condition: IdList::new("condition", Replace),
            attributes: IdList::new("attributes", Replace),
            skills: IdList::new("skills", Replace),
            spell_stats: IdList::new("spell_stats", Replace),
            avatar_buffs: IdList::new("avatar_buffs", Replace),
            action_buttons: ActionButtons::new(),

            online_players: IdList::new("online_players", Replace)
                .sorted_by(|a: &OnlinePlayer, b: &OnlinePlayer| compare_names(&a.name, &b.name)),
            ignore_list: Vec::new(),
            guild_info: Panel::new(),
            guild_ask: Panel::new(),
            guild_shield: Panel::new(),
            diplomacy: Panel::new(),

            trade: TradeSession::default(),
            buy: BuySession::default(),
            look_object: Panel::new(),
            look_player: Panel::new(),
            object_contents: Panel::new(),
            news_group: Panel::new(),
            welcome: Panel::new(),
            char_creation: Panel::new(),

            avatar_id: None,
            avatar: None,
            target: None,
            self_target: false,
            resting: false,
            safety: true,
            waiting: false,
            account_type: AccountType::default(),
            ui_mode: UiMode::default(),
            world_minutes: 0,
            ticks_per_second: 0,
            round_trip: 0,
            viewer_position: V3::ZERO,

            visited_targets: BoundedHistory::new(config.targets.history),
            clicked_targets: BoundedHistory::new(config.targets.history),
            chat: BoundedHistory::new(config.logs.chat_capacity),
            raw_log: BoundedHistory::new(config.logs.raw_capacity),
            command_history: CommandHistory::new(config.logs.command_history),
        }
    }

    pub fn stats(&self, group: StatGroup) -> &IdList<Stat> {
        match group {
            StatGroup::Condition => &self.condition,
            StatGroup::Attributes => &self.attributes,
            StatGroup::Skills => &self.skills,
            StatGroup::Spells => &self.spell_stats,
        }
    }

    pub(crate) fn stats_mut(&mut self, group: StatGroup) -> &mut IdList<Stat> {
        match group {
            StatGroup::Condition => &mut self.condition,
            StatGroup::Attributes => &mut self.attributes,
            StatGroup::Skills => &mut self.skills,
            StatGroup::Spells => &mut self.spell_stats,
        }
    }

    pub fn avatar_object(&self) -> Option<&RoomObject> {
        self.avatar.and_then(|id| self.room_objects.get(id))
    }

    pub fn target_id(&self) -> Option<ObjectId> {
        self.target.map(|t| t.id)
    }

    /// The target as a room occupant, if it is one.
    pub fn target_room_object(&self) -> Option<&RoomObject> {
        match self.target {
            Some(Target {
                id,
                location: TargetLocation::Room,
            }) => self.room_objects.get(id),
            _ => None,
        }
    }

    /// Locates `id` among room occupants first, then the inventory.
    pub fn resolve(&self, id: ObjectId) -> Option<Target> {
        if self.room_objects.contains(id) {
            Some(Target {
                id,
                location: TargetLocation::Room,
            })
        } else if self.inventory.contains(id) {
            Some(Target {
                id,
                location: TargetLocation::Inventory,
            })
        } else {
            None
        }
    }

    pub fn hit_points(&self) -> i32 {
        self.condition_value(StatNum::HIT_POINTS)
    }

    pub fn mana(&self) -> i32 {
        self.condition_value(StatNum::MANA)
    }

    pub fn vigor(&self) -> i32 {
        self.condition_value(StatNum::VIGOR)
    }

    fn condition_value(&self, num: u8) -> i32 {
        self.condition
            .get(num)
            .and_then(Stat::numeric_value)
            .unwrap_or(0)
    }

    /// Drains the buffered changes of every collection into events.
    ///
    /// Room occupants are drained first so filtered views are refreshed
    /// before anything observes them.
    pub(crate) fn drain_changes(&mut self) -> Vec<WorldEvent> {
        let mut events = Vec::new();

        let occupants = self.room_objects.take_changes();
        if occupants.iter().any(reshapes_players) {
            self.room_players.refresh(&self.room_objects);
        }
        events.extend(occupants.into_iter().map(WorldEvent::RoomObjects));
        events.extend(
            self.projectiles
                .take_changes()
                .into_iter()
                .map(WorldEvent::Projectiles),
        );
        events.extend(
            self.room_buffs
                .take_changes()
                .into_iter()
                .map(WorldEvent::RoomBuffs),
        );
        events.extend(
            self.player_overlays
                .take_changes()
                .into_iter()
                .map(WorldEvent::PlayerOverlays),
        );
        events.extend(
            self.background_overlays
                .take_changes()
                .into_iter()
                .map(WorldEvent::BackgroundOverlays),
        );
        events.extend(
            self.inventory
                .take_changes()
                .into_iter()
                .map(WorldEvent::Inventory),
        );
        events.extend(self.spells.take_changes().into_iter().map(WorldEvent::Spells));
        for group in [
            StatGroup::Condition,
            StatGroup::Attributes,
            StatGroup::Skills,
            StatGroup::Spells,
        ] {
            events.extend(
                self.stats_mut(group)
                    .take_changes()
                    .into_iter()
                    .map(|change| WorldEvent::Stats { group, change }),
            );
        }
        events.extend(
            self.avatar_buffs
                .take_changes()
                .into_iter()
                .map(WorldEvent::AvatarBuffs),
        );
        events.extend(
            self.online_players
                .take_changes()
                .into_iter()
                .map(WorldEvent::OnlinePlayers),
        );
        events
    }
}

/// Membership of the player view follows structural changes and flag updates.
fn reshapes_players(change: &ListChange<RoomObject>) -> bool {
    match change {
        ListChange::Updated { fields, .. } => fields.contains(ObjectFields::FLAGS),
        other => other.is_structural(),
    }
}
