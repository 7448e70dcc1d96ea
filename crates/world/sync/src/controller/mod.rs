//! The synchronization engine.
//!
//! [`WorldSync`] owns the world state graph. Inbound messages are applied one
//! at a time by the dispatch core, the tick driver advances time-dependent
//! state, and after every whole mutation the buffered changes are published
//! on the [`EventBus`].

mod dispatch;
mod logs;
mod target;
mod tick;

use std::sync::Arc;
use std::sync::mpsc::Receiver;

use tokio::sync::broadcast;
use world_core::{
    ActionButton, ActionButtons, NoResources, ObjectFields, PanelFields, ResourceResolver,
    RoomGeometry, SectorMoved, TradeFields, V3, assign,
};

pub use logs::{MessageDirection, RawLogEntry};

use crate::config::SyncConfig;
use crate::events::{ControllerFields, EventBus, PanelKind, Topic, WorldEvent};
use crate::state::{UiMode, WorldState};

pub struct WorldSync {
    config: SyncConfig,
    state: WorldState,
    resolver: Arc<dyn ResourceResolver>,
    geometry: Option<Arc<dyn RoomGeometry>>,
    sector_moves: Option<Receiver<SectorMoved>>,
    bus: EventBus,
    /// Controller and singleton events of the mutation in progress.
    pending: Vec<WorldEvent>,
    next_projectile: u32,
}

impl WorldSync {
    pub fn new(config: SyncConfig, resolver: Arc<dyn ResourceResolver>) -> Self {
        let bus = EventBus::with_capacity(config.event_capacity);
        Self {
            state: WorldState::new(&config),
            config,
            resolver,
            geometry: None,
            sector_moves: None,
            bus,
            pending: Vec::new(),
            next_projectile: 0,
        }
    }

    /// Engine without geometry or resources, configured from the environment.
    pub fn from_env() -> Self {
        Self::new(SyncConfig::from_env(), Arc::new(NoResources))
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<WorldEvent> {
        self.bus.subscribe(topic)
    }

    /// Geometry of the current room, if its resources resolved.
    pub fn geometry(&self) -> Option<&Arc<dyn RoomGeometry>> {
        self.geometry.as_ref()
    }

    pub fn hit_points(&self) -> i32 {
        self.state.hit_points()
    }

    pub fn mana(&self) -> i32 {
        self.state.mana()
    }

    pub fn vigor(&self) -> i32 {
        self.state.vigor()
    }

    // ===== controller flags =====

    pub fn set_self_target(&mut self, enabled: bool) {
        if assign(&mut self.state.self_target, enabled) {
            self.controller_changed(ControllerFields::SELF_TARGET);
        }
        self.flush();
    }

    pub fn set_resting(&mut self, resting: bool) {
        if assign(&mut self.state.resting, resting) {
            self.controller_changed(ControllerFields::RESTING);
        }
        self.flush();
    }

    pub fn set_safety(&mut self, safety: bool) {
        if assign(&mut self.state.safety, safety) {
            self.controller_changed(ControllerFields::SAFETY);
        }
        self.flush();
    }

    pub fn set_ui_mode(&mut self, mode: UiMode) {
        if assign(&mut self.state.ui_mode, mode) {
            self.controller_changed(ControllerFields::UI_MODE);
        }
        self.flush();
    }

    pub fn set_ticks_per_second(&mut self, tps: u32) {
        if assign(&mut self.state.ticks_per_second, tps) {
            self.controller_changed(ControllerFields::TICKS_PER_SEC);
        }
        self.flush();
    }

    pub fn set_round_trip(&mut self, rtt: u32) {
        if assign(&mut self.state.round_trip, rtt) {
            self.controller_changed(ControllerFields::ROUND_TRIP);
        }
        self.flush();
    }

    /// Moves the camera. Every occupant and projectile recomputes its viewer angle.
    pub fn set_viewer_position(&mut self, position: V3) {
        if assign(&mut self.state.viewer_position, position) {
            self.controller_changed(ControllerFields::VIEWER_POSITION);
            self.refresh_viewer_angles();
        }
        self.flush();
    }

    pub fn set_action_buttons(&mut self, buttons: ActionButtons) {
        if assign(&mut self.state.action_buttons, buttons) {
            self.controller_changed(ControllerFields::ACTION_BUTTONS);
        }
        self.flush();
    }

    pub fn set_action_button(&mut self, slot: usize, button: ActionButton) {
        if self.state.action_buttons.get(slot) != Some(&button)
            && self.state.action_buttons.set(slot, button)
        {
            self.controller_changed(ControllerFields::ACTION_BUTTONS);
        }
        self.flush();
    }

    /// Opens or closes the trade window. An opened window proposes the
    /// current target as partner; closing it abandons the trade.
    pub fn set_trade_visible(&mut self, visible: bool) {
        let fields = if visible {
            let partner = self.state.target_room_object().map(|object| object.id());
            self.state.trade.set_visible(true) | self.state.trade.set_partner(partner)
        } else {
            self.state.trade.clear(true)
        };
        self.trade_changed(fields);
        self.flush();
    }

    pub fn set_ignore_list(&mut self, names: Vec<String>) {
        self.state.ignore_list = names;
    }

    pub fn ignore(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.is_ignored(&name) {
            self.state.ignore_list.push(name);
        }
    }

    pub fn unignore(&mut self, name: &str) {
        self.state
            .ignore_list
            .retain(|ignored| !ignored.eq_ignore_ascii_case(name));
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.state
            .ignore_list
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(name))
    }

    pub fn set_log_incoming(&mut self, enabled: bool) {
        self.config.logs.log_incoming = enabled;
    }

    pub fn set_log_outgoing(&mut self, enabled: bool) {
        self.config.logs.log_outgoing = enabled;
    }

    pub fn set_log_ping(&mut self, enabled: bool) {
        self.config.logs.log_ping = enabled;
    }

    /// Resizes the chat log; shrinking drops the oldest lines.
    pub fn set_chat_capacity(&mut self, capacity: usize) {
        self.state.chat.set_capacity(capacity);
        self.config.logs.chat_capacity = self.state.chat.capacity();
    }

    // ===== bulk resets =====

    /// Clears every server-derived collection and singleton, e.g. after the
    /// server announced a save cycle.
    pub fn invalidate(&mut self) {
        self.invalidate_state();
        self.flush();
    }

    /// Returns to the freshly constructed state: invalidates server data and
    /// also clears the chat log, raw log and command history.
    pub fn reset(&mut self) {
        self.state.chat.clear();
        self.state.raw_log.clear();
        self.state.command_history.clear();
        self.pending.push(WorldEvent::ChatCleared);
        if assign(&mut self.state.viewer_position, V3::ZERO) {
            self.controller_changed(ControllerFields::VIEWER_POSITION);
        }
        self.invalidate_state();
        self.flush();
    }

    fn invalidate_state(&mut self) {
        tracing::info!("invalidating mirrored world data");

        let state = &mut self.state;
        state.room_objects.clear();
        state.projectiles.clear();
        state.online_players.clear();
        state.inventory.clear();
        state.condition.clear();
        state.attributes.clear();
        state.skills.clear();
        state.spell_stats.clear();
        state.avatar_buffs.clear();
        state.room_buffs.clear();
        state.spells.clear();
        state.background_overlays.clear();
        state.player_overlays.clear();
        state.visited_targets.clear();
        state.clicked_targets.clear();

        let effects = state.effects.clear(true);
        self.effects_changed(effects);
        self.clear_panels();
        let room = self.state.room.clear(true);
        self.room_changed(room);
        let trade = self.state.trade.clear(true);
        self.trade_changed(trade);
        let buy = self.state.buy.clear(true);
        self.buy_changed(buy);

        self.detach_geometry();
        self.geometry = None;

        let mut changed = ControllerFields::empty();
        if assign(&mut self.state.avatar, None) {
            changed |= ControllerFields::AVATAR;
        }
        if assign(&mut self.state.resting, false) {
            changed |= ControllerFields::RESTING;
        }
        if assign(&mut self.state.self_target, false) {
            changed |= ControllerFields::SELF_TARGET;
        }
        if assign(&mut self.state.target, None) {
            changed |= ControllerFields::TARGET;
        }
        self.state.avatar_id = None;
        self.controller_changed(changed);
    }

    fn clear_panels(&mut self) {
        let state = &mut self.state;
        let cleared = [
            (PanelKind::GuildInfo, state.guild_info.clear(true)),
            (PanelKind::GuildAsk, state.guild_ask.clear(true)),
            (PanelKind::Diplomacy, state.diplomacy.clear(true)),
            (PanelKind::LookObject, state.look_object.clear(true)),
            (PanelKind::LookPlayer, state.look_player.clear(true)),
            (PanelKind::LightShading, state.light_shading.clear(true)),
            (PanelKind::Music, state.music.clear(true)),
            (PanelKind::NewsGroup, state.news_group.clear(true)),
            (PanelKind::Welcome, state.welcome.clear(true)),
            (PanelKind::CharCreation, state.char_creation.clear(true)),
            (PanelKind::ObjectContents, state.object_contents.clear(true)),
            (PanelKind::GuildShield, state.guild_shield.clear(true)),
        ];
        for (panel, fields) in cleared {
            self.panel_changed(panel, fields);
        }
    }

    // ===== geometry =====

    /// Drops the sector-move subscription of the previous room.
    fn detach_geometry(&mut self) {
        self.sector_moves = None;
    }

    fn attach_geometry(&mut self) {
        self.geometry = self.resolver.room_geometry(&self.state.room);
        self.sector_moves = self
            .geometry
            .as_ref()
            .and_then(|geometry| geometry.subscribe_sector_moves());
    }

    fn refresh_viewer_angles(&mut self) {
        let viewer = self.state.viewer_position.ground();
        self.state
            .room_objects
            .update_all(|object| object.update_viewer_angle(viewer));
        self.state
            .projectiles
            .update_all(|projectile| projectile.update_viewer_angle(viewer));
    }

    // ===== notification =====

    fn controller_changed(&mut self, fields: ControllerFields) {
        if !fields.is_empty() {
            self.pending.push(WorldEvent::Controller(fields));
        }
    }

    fn panel_changed(&mut self, panel: PanelKind, fields: PanelFields) {
        if !fields.is_empty() {
            self.pending.push(WorldEvent::Panel { panel, fields });
        }
    }

    fn trade_changed(&mut self, fields: TradeFields) {
        if !fields.is_empty() {
            self.pending.push(WorldEvent::Trade(fields));
        }
    }

    fn buy_changed(&mut self, fields: TradeFields) {
        if !fields.is_empty() {
            self.pending.push(WorldEvent::Buy(fields));
        }
    }

    fn room_changed(&mut self, fields: world_core::RoomFields) {
        if !fields.is_empty() {
            self.pending.push(WorldEvent::RoomInfo(fields));
        }
    }

    fn effects_changed(&mut self, fields: world_core::EffectFields) {
        if !fields.is_empty() {
            self.pending.push(WorldEvent::Effects(fields));
        }
    }

    /// Publishes everything buffered by the mutation that just completed.
    fn flush(&mut self) {
        for event in std::mem::take(&mut self.pending) {
            self.bus.publish(event);
        }
        for event in self.state.drain_changes() {
            self.bus.publish(event);
        }
    }
}

/// Viewer angle must follow any position or facing change.
fn follows_viewer(fields: ObjectFields) -> bool {
    fields.intersects(ObjectFields::VIEWER_DEPENDENT)
}
