//! Message dispatch and state mutation.
//!
//! [`WorldSync::handle_message`] routes one decoded message to exactly one
//! handler. Handlers report anomalies as [`SyncError`]; the entry point logs
//! and publishes them as diagnostics but never propagates them, leaving the
//! state in whatever normalized form the handler reached.

use tracing::{debug, info, trace};
use world_core::{
    Article, BackgroundOverlay, ChatMessage, HealthStatus, IdList, InventoryObject, ObjectBase,
    ObjectContents, ObjectId, OnlinePlayer, PlayerOverlay, Projectile, ProjectileId, RoomInfo,
    RoomObject, SpellObject, Stat, StatGroup, V2, assign,
};

use super::{WorldSync, follows_viewer};
use crate::error::SyncError;
use crate::events::{ControllerFields, PanelKind, WorldEvent};
use crate::message::{BuffKind, LoginMessage, ProjectileLaunch, ServerMessage, UserCommand};

type Handled = Result<(), SyncError>;

impl WorldSync {
    /// Applies one game-mode message, then publishes every change it caused.
    pub fn handle_message(&mut self, message: ServerMessage) {
        let kind = message.kind();
        let kind_name: &'static str = kind.into();
        self.log_incoming(kind);
        trace!(kind = kind_name, "dispatching message");

        if let Err(err) = self.apply(message) {
            let anomaly = err.kind();
            debug!(
                kind = kind_name,
                anomaly = anomaly.as_str(),
                code = err.error_code(),
                %err,
                "absorbed message anomaly"
            );
            self.pending.push(WorldEvent::Anomaly {
                kind: anomaly,
                code: err.error_code(),
            });
        }
        self.flush();
    }

    /// Applies one login-mode message.
    pub fn handle_login_message(&mut self, message: LoginMessage) {
        self.log_incoming_login(message.kind());

        match message {
            LoginMessage::LoginOk { account_type } => {
                if assign(&mut self.state.account_type, account_type) {
                    self.controller_changed(ControllerFields::ACCOUNT_TYPE);
                }
            }
            LoginMessage::Other(_) => {}
        }
        self.flush();
    }

    fn apply(&mut self, message: ServerMessage) -> Handled {
        use ServerMessage as M;

        match message {
            // session
            M::Wait => self.set_waiting(true),
            M::Unwait => self.set_waiting(false),
            M::InvalidateData => {
                self.invalidate_state();
                Ok(())
            }
            M::Characters(welcome) => {
                let fields = self.state.welcome.replace(welcome, true);
                self.panel_changed(PanelKind::Welcome, fields);
                Ok(())
            }
            M::CharInfo(mut info) => {
                info.set_default_preview();
                let fields = self.state.char_creation.replace(info, true);
                self.panel_changed(PanelKind::CharCreation, fields);
                Ok(())
            }
            M::CharInfoNotOk => {
                let fields = self
                    .state
                    .char_creation
                    .update(|info| assign(&mut info.data_ok, false));
                self.panel_changed(PanelKind::CharCreation, fields);
                Ok(())
            }

            // chat
            M::SysMessage(message) | M::Message(message) => {
                self.append_chat(message);
                Ok(())
            }
            M::Said(message) => {
                self.handle_said(message);
                Ok(())
            }

            // room
            M::Player(room) => {
                self.handle_room_transition(room);
                Ok(())
            }
            M::RoomContents(objects) => self.handle_room_contents(objects),
            M::Create(object) => self.handle_create(object),
            M::Remove(id) => self.handle_remove(id),
            M::Change(snapshot) => self.handle_change(snapshot),
            M::Move {
                id,
                destination,
                speed,
            } => self.handle_move(id, destination, speed),
            M::Turn { id, angle } => self.handle_turn(id, angle),
            M::Shoot(launch) => self.handle_shoot(launch),
            M::PlayWave { source, sound } => self.handle_play_wave(source, &sound),
            M::PlayMusic(music) => {
                let fields = self.state.music.replace(music, true);
                self.panel_changed(PanelKind::Music, fields);
                Ok(())
            }
            M::Background(resource) => {
                let fields = self.state.room.set_background(resource);
                self.room_changed(fields);
                Ok(())
            }
            M::AddBgOverlay(overlay) => {
                self.state.background_overlays.add(overlay)?;
                Ok(())
            }
            M::ChangeBgOverlay(overlay) => self.handle_change_bg_overlay(overlay),
            M::PlayerOverlay(overlay) => self.handle_player_overlay(overlay),
            M::LightAmbient(level) => {
                let fields = self.state.room.set_ambient_light(level);
                self.room_changed(fields);
                Ok(())
            }
            M::LightPlayer(level) => {
                let fields = self.state.room.set_avatar_light(level);
                self.room_changed(fields);
                Ok(())
            }
            M::LightShading(shading) => {
                let fields = self.state.light_shading.replace(shading, true);
                self.panel_changed(PanelKind::LightShading, fields);
                Ok(())
            }
            M::Effect(effect) => {
                let fields = self.state.effects.handle(effect);
                self.effects_changed(fields);
                Ok(())
            }

            // avatar
            M::Stat { group, stat } => self.handle_stat(group, stat),
            M::StatGroup { group, stats } => self.handle_stat_group(group, stats),
            M::Inventory(items) => self.handle_inventory(items),
            M::InventoryAdd(item) => {
                self.rebind_item(&item.base);
                self.state.inventory.add(item)?;
                self.revalidate_target();
                Ok(())
            }
            M::InventoryRemove(id) => {
                let removed = self.state.inventory.remove(id);
                self.revalidate_target();
                removed
                    .map(drop)
                    .ok_or_else(|| SyncError::stale("inventory", id))
            }
            M::Use(id) => self.set_in_use(id, true),
            M::Unuse(id) => self.set_in_use(id, false),
            M::UseList(ids) => {
                for id in ids {
                    self.state
                        .inventory
                        .update(id, |item| item.set_in_use(true));
                }
                Ok(())
            }
            M::Spells(spells) => self.handle_spells(spells),
            M::SpellAdd(spell) => {
                self.rebind_spell(&spell.base);
                self.state.spells.add(spell)?;
                Ok(())
            }
            M::SpellRemove(id) => self
                .state
                .spells
                .remove(id)
                .map(drop)
                .ok_or_else(|| SyncError::stale("spells", id)),
            M::AddEnchantment { kind, buff } => {
                self.buffs_mut(kind).add(buff)?;
                Ok(())
            }
            M::RemoveEnchantment { kind, id } => {
                let buffs = self.buffs_mut(kind);
                let list = buffs.name();
                buffs
                    .remove(id)
                    .map(drop)
                    .ok_or_else(|| SyncError::stale(list, id))
            }

            // social
            M::Players(players) => self.handle_players(players),
            M::PlayerAdd(player) => {
                self.state.online_players.add(player)?;
                Ok(())
            }
            M::PlayerRemove(id) => self
                .state
                .online_players
                .remove(id)
                .map(drop)
                .ok_or_else(|| SyncError::stale("online_players", id)),
            M::UserCommand(command) => {
                self.handle_user_command(command);
                Ok(())
            }

            // panels
            M::Look(info) => {
                let fields = self.state.look_object.replace(info, true)
                    | self.state.look_object.set_visible(true);
                self.panel_changed(PanelKind::LookObject, fields);
                Ok(())
            }
            M::ObjectContents { container, items } => {
                let contents = ObjectContents { container, items };
                let fields = self.state.object_contents.replace(contents, true)
                    | self.state.object_contents.set_visible(true);
                self.panel_changed(PanelKind::ObjectContents, fields);
                Ok(())
            }
            M::LookNewsGroup(group) => {
                let fields = self.state.news_group.replace(group, true)
                    | self.state.news_group.set_visible(true);
                self.panel_changed(PanelKind::NewsGroup, fields);
                Ok(())
            }
            M::Articles(articles) => {
                self.append_articles(articles);
                Ok(())
            }
            M::Article(text) => {
                let fields = self
                    .state
                    .news_group
                    .update(|group| assign(&mut group.text, text));
                self.panel_changed(PanelKind::NewsGroup, fields);
                Ok(())
            }

            // trade
            M::Offer { partner, items } => {
                self.handle_offer(partner, items);
                Ok(())
            }
            M::OfferCanceled => {
                let fields = self.state.trade.clear(true);
                self.trade_changed(fields);
                Ok(())
            }
            M::Offered(items) | M::CounterOffered(items) => {
                let trade = &mut self.state.trade;
                let fields = trade.set_items_you(items)
                    | trade.set_visible(true)
                    | trade.set_items_you_set(true)
                    | trade.set_pending(true);
                self.trade_changed(fields);
                Ok(())
            }
            M::CounterOffer(items) => {
                let trade = &mut self.state.trade;
                let fields = trade.set_items_partner(items)
                    | trade.set_visible(true)
                    | trade.set_items_partner_set(true)
                    | trade.set_pending(true);
                self.trade_changed(fields);
                Ok(())
            }
            M::BuyList { partner, items } => {
                let partner = self.present_partner(partner);
                let buy = &mut self.state.buy;
                let fields =
                    buy.set_partner(partner) | buy.set_items(items) | buy.set_visible(true);
                self.buy_changed(fields);
                Ok(())
            }

            M::EchoPing | M::Other(_) => Ok(()),
        }
    }

    // ===== session and chat =====

    fn set_waiting(&mut self, waiting: bool) -> Handled {
        if assign(&mut self.state.waiting, waiting) {
            self.controller_changed(ControllerFields::WAITING);
        }
        Ok(())
    }

    /// Chat from an ignored sender is dropped.
    fn handle_said(&mut self, message: ChatMessage) {
        let sender = self
            .state
            .online_players
            .get(message.source)
            .map_or(message.source_name.as_str(), |player| player.name.as_str());
        if self.is_ignored(sender) {
            trace!(source = %message.source, "dropping chat from ignored sender");
            return;
        }
        self.append_chat(message);
    }

    // ===== room =====

    /// Replaces the room and drops everything scoped to the previous one.
    fn handle_room_transition(&mut self, room: RoomInfo) {
        self.detach_geometry();

        let fields = self.state.room.update_from_snapshot(&room, true);
        self.room_changed(fields);
        self.attach_geometry();

        self.state.avatar_id = (!room.avatar_id.is_none()).then_some(room.avatar_id);

        self.state.room_objects.clear();
        self.state.projectiles.clear();
        self.state.room_buffs.clear();
        self.revalidate_target();

        let trade = self.state.trade.clear(true);
        self.trade_changed(trade);
        let buy = self.state.buy.clear(true);
        self.buy_changed(buy);
        let news = self.state.news_group.clear(true);
        self.panel_changed(PanelKind::NewsGroup, news);
        let look = self.state.look_object.clear(true);
        self.panel_changed(PanelKind::LookObject, look);
        let look_player = self.state.look_player.clear(true);
        self.panel_changed(PanelKind::LookPlayer, look_player);

        if assign(&mut self.state.avatar, None) {
            self.controller_changed(ControllerFields::AVATAR);
        }

        info!(
            room = %self.state.room.room_file,
            avatar = ?self.state.avatar_id,
            geometry = self.geometry.is_some(),
            "entered room"
        );
    }

    fn handle_room_contents(&mut self, mut objects: Vec<RoomObject>) -> Handled {
        let mut avatar = None;
        for object in &mut objects {
            if self.prepare_occupant(object) {
                avatar = Some(object.id());
            }
        }
        let added = self.state.room_objects.repopulate(objects);

        if assign(&mut self.state.avatar, avatar) {
            self.controller_changed(ControllerFields::AVATAR);
        }
        self.revalidate_target();
        self.release_absent_partners();
        self.drop_orphaned_projectiles();
        added?;
        Ok(())
    }

    fn handle_create(&mut self, mut object: RoomObject) -> Handled {
        let id = object.id();
        let is_avatar = self.prepare_occupant(&mut object);
        self.state.room_objects.add(object)?;

        if is_avatar && assign(&mut self.state.avatar, Some(id)) {
            self.controller_changed(ControllerFields::AVATAR);
        }
        self.revalidate_target();
        Ok(())
    }

    /// Derives geometry and viewer state for an arriving occupant. Returns
    /// true if the occupant is the avatar.
    fn prepare_occupant(&self, object: &mut RoomObject) -> bool {
        if let Some(geometry) = &self.geometry {
            object.update_height(geometry.as_ref());
        }
        object.update_viewer_angle(self.state.viewer_position.ground());

        let is_avatar = self.state.avatar_id == Some(object.id());
        object.set_avatar(is_avatar);
        is_avatar
    }

    fn handle_remove(&mut self, id: ObjectId) -> Handled {
        if self.state.room_objects.remove(id).is_none() {
            return Err(SyncError::stale("room_objects", id));
        }

        self.revalidate_target();
        self.release_absent_partners();
        self.drop_orphaned_projectiles();
        if self.state.avatar == Some(id) {
            self.state.avatar = None;
            self.controller_changed(ControllerFields::AVATAR);
        }
        Ok(())
    }

    /// Projectiles only live while both their source and target are present.
    fn drop_orphaned_projectiles(&mut self) {
        let occupants = &self.state.room_objects;
        let projectiles = &mut self.state.projectiles;
        for index in (0..projectiles.len()).rev() {
            let orphaned = projectiles.get_at(index).is_some_and(|projectile| {
                !occupants.contains(projectile.source) || !occupants.contains(projectile.target)
            });
            if orphaned {
                projectiles.remove_at(index);
            }
        }
    }

    fn handle_change(&mut self, snapshot: ObjectBase) -> Handled {
        let id = snapshot.id;
        if self
            .state
            .room_objects
            .update(id, |object| object.base.update_from_snapshot(&snapshot, true))
            .is_some()
        {
            return Ok(());
        }
        self.state
            .inventory
            .update(id, |item| item.base.update_from_snapshot(&snapshot, true))
            .map(drop)
            .ok_or_else(|| SyncError::stale("room_objects", id))
    }

    fn handle_move(&mut self, id: ObjectId, destination: V2, speed: u8) -> Handled {
        let geometry = self.geometry.clone();
        let viewer = self.state.viewer_position.ground();
        self.state
            .room_objects
            .update(id, |object| {
                let mut changed = object.start_move_to(destination, speed, geometry.as_deref());
                if follows_viewer(changed) {
                    changed |= object.update_viewer_angle(viewer);
                }
                changed
            })
            .map(drop)
            .ok_or_else(|| SyncError::stale("room_objects", id))
    }

    fn handle_turn(&mut self, id: ObjectId, angle: u16) -> Handled {
        let viewer = self.state.viewer_position.ground();
        self.state
            .room_objects
            .update(id, |object| {
                let mut changed = object.set_angle(angle);
                if follows_viewer(changed) {
                    changed |= object.update_viewer_angle(viewer);
                }
                changed
            })
            .map(drop)
            .ok_or_else(|| SyncError::stale("room_objects", id))
    }

    /// Stores a projectile only if both ends resolve to present occupants.
    fn handle_shoot(&mut self, launch: ProjectileLaunch) -> Handled {
        let occupants = &self.state.room_objects;
        let from = occupants
            .get(launch.source)
            .ok_or(SyncError::UnresolvedReference {
                what: "projectile source",
                id: launch.source,
            })?
            .position;
        let towards = occupants
            .get(launch.target)
            .ok_or(SyncError::UnresolvedReference {
                what: "projectile target",
                id: launch.target,
            })?
            .position;

        let id = ProjectileId(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);

        let mut projectile = Projectile::new(
            id,
            launch.base,
            launch.source,
            launch.target,
            launch.speed,
        );
        projectile.launch(from, towards);
        projectile.update_viewer_angle(self.state.viewer_position.ground());
        self.state.projectiles.add(projectile)?;
        Ok(())
    }

    /// Pain sounds reveal the health of the occupant that played them.
    fn handle_play_wave(&mut self, source: ObjectId, sound: &str) -> Handled {
        if source.is_none() {
            return Ok(());
        }
        if !self.state.room_objects.contains(source) {
            return Err(SyncError::stale("room_objects", source));
        }

        let status = self.resolver.pain_status(sound);
        if status != HealthStatus::Unknown {
            self.state
                .room_objects
                .update(source, |object| object.set_health(status));
        }
        Ok(())
    }

    fn handle_change_bg_overlay(&mut self, overlay: BackgroundOverlay) -> Handled {
        let id = overlay.base.id;
        self.state
            .background_overlays
            .update(id, |existing| existing.update_from_snapshot(&overlay, true))
            .map(drop)
            .ok_or_else(|| SyncError::stale("background_overlays", id))
    }

    /// At most one overlay per identity. A hidden overlay removes it, a
    /// different hotspot replaces it.
    fn handle_player_overlay(&mut self, overlay: PlayerOverlay) -> Handled {
        let id = overlay.id();
        let overlays = &mut self.state.player_overlays;

        if overlay.is_hidden() {
            overlays.remove(id);
            return Ok(());
        }

        match overlays.get(id).map(|existing| existing.hotspot) {
            Some(existing) if existing == overlay.hotspot => {
                overlays.update(id, |current| current.update_from_snapshot(&overlay, true));
                Ok(())
            }
            Some(existing) => {
                let incoming = overlay.hotspot;
                overlays.remove(id);
                overlays.add(overlay)?;
                Err(SyncError::InconsistentDuplicate {
                    id,
                    existing,
                    incoming,
                })
            }
            None => {
                overlays.add(overlay)?;
                Ok(())
            }
        }
    }

    // ===== avatar =====

    fn handle_stat(&mut self, group: StatGroup, stat: Stat) -> Handled {
        if stat.value.is_numeric() != group.is_numeric() {
            return Err(SyncError::Malformed {
                message: "stat",
                reason: "stat kind does not match its group",
            });
        }

        let stats = self.state.stats_mut(group);
        let list = stats.name();
        let num = stat.num;
        stats
            .update(num, |current| current.update_from_snapshot(&stat, true))
            .map(drop)
            .ok_or_else(|| SyncError::stale(list, num))
    }

    /// Replaces a whole stat group. Entries of the wrong kind are skipped.
    fn handle_stat_group(&mut self, group: StatGroup, stats: Vec<Stat>) -> Handled {
        let total = stats.len();
        let matching: Vec<Stat> = stats
            .into_iter()
            .filter(|stat| stat.value.is_numeric() == group.is_numeric())
            .collect();
        let malformed = matching.len() != total;
        self.state.stats_mut(group).repopulate(matching)?;

        if malformed {
            return Err(SyncError::Malformed {
                message: "stat group",
                reason: "stat kind does not match its group",
            });
        }
        Ok(())
    }

    fn handle_inventory(&mut self, items: Vec<InventoryObject>) -> Handled {
        for item in &items {
            self.rebind_item(&item.base);
        }
        let added = self.state.inventory.repopulate(items);
        self.revalidate_target();
        added?;
        Ok(())
    }

    fn set_in_use(&mut self, id: ObjectId, in_use: bool) -> Handled {
        self.state
            .inventory
            .update(id, |item| item.set_in_use(in_use))
            .map(drop)
            .ok_or_else(|| SyncError::stale("inventory", id))
    }

    fn handle_spells(&mut self, spells: Vec<SpellObject>) -> Handled {
        for spell in &spells {
            self.rebind_spell(&spell.base);
        }
        self.state.spells.repopulate(spells)?;
        Ok(())
    }

    fn rebind_item(&mut self, item: &ObjectBase) {
        if self.state.action_buttons.rebind_item(item) > 0 {
            self.controller_changed(ControllerFields::ACTION_BUTTONS);
        }
    }

    fn rebind_spell(&mut self, spell: &ObjectBase) {
        if self.state.action_buttons.rebind_spell(spell) > 0 {
            self.controller_changed(ControllerFields::ACTION_BUTTONS);
        }
    }

    fn buffs_mut(&mut self, kind: BuffKind) -> &mut IdList<ObjectBase> {
        match kind {
            BuffKind::Avatar => &mut self.state.avatar_buffs,
            BuffKind::Room => &mut self.state.room_buffs,
        }
    }

    // ===== social =====

    fn handle_players(&mut self, players: Vec<OnlinePlayer>) -> Handled {
        self.state.online_players.repopulate(players)?;
        Ok(())
    }

    fn handle_user_command(&mut self, command: UserCommand) {
        match command {
            UserCommand::LookPlayer(info) => {
                let fields = self.state.look_player.replace(info, true)
                    | self.state.look_player.set_visible(true);
                self.panel_changed(PanelKind::LookPlayer, fields);
            }
            UserCommand::GuildInfo(info) => {
                let fields = self.state.guild_info.replace(info, true)
                    | self.state.guild_info.set_visible(true);
                self.panel_changed(PanelKind::GuildInfo, fields);
            }
            UserCommand::GuildShieldInfo(info) => {
                let fields = self.state.guild_shield.replace(info, true);
                self.panel_changed(PanelKind::GuildShield, fields);
            }
            UserCommand::GuildAsk(data) => {
                let fields = self.state.guild_ask.replace(data, true)
                    | self.state.guild_ask.set_visible(true);
                self.panel_changed(PanelKind::GuildAsk, fields);
            }
            UserCommand::GuildShieldList(shields) => {
                let fields = self
                    .state
                    .guild_shield
                    .update(|info| assign(&mut info.shields, shields));
                self.panel_changed(PanelKind::GuildShield, fields);
            }
            UserCommand::GuildList(diplomacy) => {
                let fields = self.state.diplomacy.replace(diplomacy, true);
                self.panel_changed(PanelKind::Diplomacy, fields);
            }
            UserCommand::GuildShieldInfoRequest
            | UserCommand::GuildShieldListRequest
            | UserCommand::Other(_) => {}
        }
    }

    // ===== panels and trade =====

    fn append_articles(&mut self, articles: Vec<Article>) {
        let fields = self.state.news_group.update(|group| {
            if articles.is_empty() {
                return false;
            }
            group.articles.extend(articles);
            true
        });
        self.panel_changed(PanelKind::NewsGroup, fields);
    }

    /// Starts a background trade initiated by `partner`.
    fn handle_offer(&mut self, partner: ObjectId, items: Vec<ObjectBase>) {
        let partner = self.present_partner(partner);
        let trade = &mut self.state.trade;
        let fields = trade.clear(true)
            | trade.set_background_offer(true)
            | trade.set_partner(partner)
            | trade.set_items_partner(items)
            | trade.set_visible(false)
            | trade.set_items_you_set(false)
            | trade.set_items_partner_set(true)
            | trade.set_pending(true);
        self.trade_changed(fields);
    }

    /// Partners must be present occupants.
    fn present_partner(&self, partner: ObjectId) -> Option<ObjectId> {
        self.state
            .room_objects
            .contains(partner)
            .then_some(partner)
    }

    /// Resets trade and buy sessions whose partner left the room.
    fn release_absent_partners(&mut self) {
        let occupants = &self.state.room_objects;
        if self
            .state
            .trade
            .partner
            .is_some_and(|partner| !occupants.contains(partner))
        {
            let fields = self.state.trade.clear(true);
            self.trade_changed(fields);
        }

        let occupants = &self.state.room_objects;
        if self
            .state
            .buy
            .partner
            .is_some_and(|partner| !occupants.contains(partner))
        {
            let fields = self.state.buy.clear(true);
            self.buy_changed(fields);
        }
    }
}
