//! Per-tick simulation driver.

use world_core::{Millis, ObjectFields, SectorId};

use super::{WorldSync, follows_viewer};
use crate::events::{ControllerFields, PanelKind};

/// World seconds elapsing per real second.
const WORLD_TIME_SCALE: u64 = 12;

impl WorldSync {
    /// Advances every time-dependent entity by `span` milliseconds.
    ///
    /// `now` is the driver's current timestamp and only feeds the world clock.
    /// Lists that may lose entries mid-tick are walked from the back.
    pub fn tick(&mut self, now: Millis, span: Millis) {
        self.apply_sector_moves();

        let geometry = self.geometry.clone();
        let viewer = self.state.viewer_position.ground();

        self.state
            .inventory
            .update_all(|object| object.tick(span));

        // projectiles
        for index in (0..self.state.projectiles.len()).rev() {
            let Some(projectile) = self.state.projectiles.get_at(index) else {
                continue;
            };
            let source = self.state.room_objects.get(projectile.source);
            let target = self.state.room_objects.get(projectile.target);
            let destination = match (source, target) {
                (Some(_), Some(target)) => target.position,
                _ => {
                    self.state.projectiles.remove_at(index);
                    continue;
                }
            };

            let mut arrived = false;
            self.state.projectiles.update_at(index, |projectile| {
                let mut changed = projectile.tick(span);
                if geometry.is_some() {
                    let step = projectile.update_position(span, destination);
                    arrived = step.arrived;
                    changed |= step.fields;
                }
                if follows_viewer(changed) {
                    changed |= projectile.update_viewer_angle(viewer);
                }
                changed
            });
            if arrived {
                self.state.projectiles.remove_at(index);
            }
        }

        // room occupants
        for index in (0..self.state.room_objects.len()).rev() {
            self.state.room_objects.update_at(index, |object| {
                let mut changed = object.tick(span);
                changed |= object.update_position(span, geometry.as_deref());
                if follows_viewer(changed) {
                    changed |= object.update_viewer_angle(viewer);
                }
                changed
            });
        }

        // first-person overlays; spent one-shot overlays are dropped
        for index in (0..self.state.player_overlays.len()).rev() {
            self.state
                .player_overlays
                .update_at(index, |overlay| overlay.tick(span));
            let spent = self
                .state
                .player_overlays
                .get_at(index)
                .is_some_and(|overlay| overlay.base.animation.is_spent());
            if spent {
                self.state.player_overlays.remove_at(index);
            }
        }

        let effects = self.state.effects.tick(span);
        self.effects_changed(effects);

        let look = self.state.look_object.update(|info| info.tick(span));
        self.panel_changed(PanelKind::LookObject, look);
        let look_player = self.state.look_player.update(|info| info.tick(span));
        self.panel_changed(PanelKind::LookPlayer, look_player);

        let preview = self.state.char_creation.update(|info| info.tick(span));
        self.panel_changed(PanelKind::CharCreation, preview);
        let shield = self.state.guild_shield.update(|info| info.tick(span));
        self.panel_changed(PanelKind::GuildShield, shield);

        let trade = self.state.trade.tick(span);
        self.trade_changed(trade);

        self.update_world_clock(now);
        self.flush();
    }

    /// Re-reads the floor height of occupants standing in sectors that moved
    /// since the last tick.
    fn apply_sector_moves(&mut self) {
        let Some(receiver) = &self.sector_moves else {
            return;
        };
        let moved: Vec<SectorId> = receiver.try_iter().map(|event| event.sector).collect();
        let Some(geometry) = self.geometry.clone() else {
            return;
        };

        for sector in moved {
            for index in 0..self.state.room_objects.len() {
                self.state.room_objects.update_at(index, |object| {
                    if object.sub_sector.is_some_and(|s| s.sector == sector) {
                        object.update_height(geometry.as_ref())
                    } else {
                        ObjectFields::empty()
                    }
                });
            }
        }
    }

    fn update_world_clock(&mut self, now: Millis) {
        let minutes = now.saturating_mul(WORLD_TIME_SCALE) / 60_000;
        if self.state.world_minutes != minutes {
            self.state.world_minutes = minutes;
            self.controller_changed(ControllerFields::WORLD_TIME);
        }
    }
}
