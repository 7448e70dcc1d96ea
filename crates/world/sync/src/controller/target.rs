//! Target acquisition.
//!
//! The current target always resolves to exactly one room occupant or
//! inventory object, or is `None`. Selecting an identity found in neither
//! clears the target.

use world_core::{ObjectId, RoomObject, V2};

use super::WorldSync;
use crate::events::ControllerFields;
use crate::state::{Target, TargetLocation};

/// Next-target candidate with its squared distance to the avatar.
struct Candidate {
    id: ObjectId,
    distance_squared: f32,
    enemy: bool,
    attackable: bool,
}

impl WorldSync {
    pub fn target(&self) -> Option<Target> {
        self.state.target
    }

    /// Selects `id` as the current target, or clears it with `None`.
    pub fn set_target(&mut self, id: Option<ObjectId>) {
        self.select_target(id);
        self.flush();
    }

    /// Cycles to the nearest unvisited guild enemy, falling back to the nearest
    /// unvisited attackable occupant.
    ///
    /// Needs the avatar and the room geometry; without either nothing happens.
    /// Once every candidate has been visited the visited history starts over.
    pub fn next_target(&mut self) -> Option<ObjectId> {
        let picked = self.pick_next_target();
        if let Some(id) = picked {
            self.state.visited_targets.push(id);
            self.select_target(Some(id));
        }
        self.flush();
        picked
    }

    /// Selects from overlapping click candidates, ordered nearest first.
    ///
    /// Repeated clicks on the same stack walk through it. With `use_first`, or
    /// once every candidate has been clicked, the history restarts at the first.
    pub fn click_target(&mut self, candidates: &[ObjectId], use_first: bool) {
        let Some(&first) = candidates.first() else {
            return;
        };

        let unclicked = candidates
            .iter()
            .copied()
            .find(|id| !self.state.clicked_targets.contains(id));

        let picked = match unclicked {
            Some(id) if !use_first => {
                self.state.clicked_targets.push(id);
                id
            }
            _ => {
                self.state.clicked_targets.clear();
                self.state.clicked_targets.push(first);
                first
            }
        };

        self.select_target(Some(picked));
        self.flush();
    }

    fn pick_next_target(&mut self) -> Option<ObjectId> {
        let geometry = self.geometry.clone()?;
        let avatar = self.state.avatar_object()?;

        let front = self.config.world.target_front_radius;
        let behind = self.config.world.target_behind_radius;
        let facing = V2::from_angle(avatar.angle);

        let candidates: Vec<Candidate> = self
            .state
            .room_objects
            .iter()
            .filter(|object| object.id() != avatar.id())
            .filter(|object| object.base.flags.is_target_candidate())
            .filter(|object| {
                within_reach(avatar, object, facing, front, behind)
                    && geometry.can_see(avatar.position, object.position)
            })
            .map(|object| Candidate {
                id: object.id(),
                distance_squared: avatar.distance_squared(object),
                enemy: object.base.flags.is_enemy(),
                attackable: object.base.flags.is_attackable(),
            })
            .collect();

        let visited = &self.state.visited_targets;
        let mut pool: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| !visited.contains(&c.id))
            .collect();
        if pool.is_empty() {
            self.state.visited_targets.clear();
            pool = candidates.iter().collect();
        }

        nearest(&pool, |c| c.enemy).or_else(|| nearest(&pool, |c| c.attackable))
    }

    /// Resolves and stores the target, keeping occupant target marks and the
    /// trade partner in sync. Does not flush.
    pub(super) fn select_target(&mut self, id: Option<ObjectId>) {
        let resolved = id.and_then(|id| self.state.resolve(id));
        let previous = self.state.target;
        if previous == resolved {
            return;
        }

        if let Some(Target {
            id,
            location: TargetLocation::Room,
        }) = previous
        {
            self.state
                .room_objects
                .update(id, |object| object.set_target(false));
        }
        if let Some(Target {
            id,
            location: TargetLocation::Room,
        }) = resolved
        {
            self.state
                .room_objects
                .update(id, |object| object.set_target(true));
        }

        self.state.target = resolved;
        self.controller_changed(ControllerFields::TARGET);

        // An open trade window that is not yet pending follows the target.
        if self.state.trade.visible && !self.state.trade.pending {
            let partner = self.state.target_room_object().map(RoomObject::id);
            let fields = self.state.trade.set_partner(partner);
            self.trade_changed(fields);
        }
    }

    /// Drops a target that no longer resolves where it was found.
    pub(super) fn revalidate_target(&mut self) {
        let Some(target) = self.state.target else {
            return;
        };
        if self.state.resolve(target.id) != Some(target) {
            self.select_target(Some(target.id));
        } else if target.location == TargetLocation::Room {
            self.state
                .room_objects
                .update(target.id, |object| object.set_target(true));
        }
    }
}

fn within_reach(
    avatar: &RoomObject,
    object: &RoomObject,
    facing: V2,
    front: f32,
    behind: f32,
) -> bool {
    let offset = object.position.ground() - avatar.position.ground();
    let radius = if offset.dot(facing) >= 0.0 { front } else { behind };
    offset.length_squared() <= radius * radius
}

fn nearest(pool: &[&Candidate], tier: impl Fn(&Candidate) -> bool) -> Option<ObjectId> {
    pool.iter()
        .filter(|c| tier(c))
        .min_by(|a, b| a.distance_squared.total_cmp(&b.distance_squared))
        .map(|c| c.id)
}
