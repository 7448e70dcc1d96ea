//! Projectiles in flight between two room occupants.

use std::fmt;

use super::assign;
use super::common::{Millis, ObjectId, V2, V3, radians_to_angle, relative_viewer_angle};
use super::object::{ObjectBase, ObjectFields};
use crate::collection::Identified;
use crate::config::WorldConfig;

/// Locally allocated identity; projectiles carry no server identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileId(pub u32);

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projectile#{}", self.0)
    }
}

/// Outcome of advancing a projectile towards its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileStep {
    pub fields: ObjectFields,
    pub arrived: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projectile {
    pub id: ProjectileId,
    pub base: ObjectBase,
    pub source: ObjectId,
    pub target: ObjectId,
    pub position: V3,
    /// Protocol speed units.
    pub speed: u8,
    /// Heading on the ground plane, in angle units.
    pub angle: u16,
    pub viewer_angle: u16,
}

impl Projectile {
    pub fn new(
        id: ProjectileId,
        base: ObjectBase,
        source: ObjectId,
        target: ObjectId,
        speed: u8,
    ) -> Self {
        Self {
            id,
            base,
            source,
            target,
            position: V3::ZERO,
            speed,
            angle: 0,
            viewer_angle: 0,
        }
    }

    /// Places the projectile at its source and aims it at the target.
    pub fn launch(&mut self, from: V3, towards: V3) {
        self.position = from;
        self.aim(towards);
    }

    pub fn tick(&mut self, span: Millis) -> ObjectFields {
        self.base.tick(span)
    }

    /// Moves the projectile towards `destination` (the target's current position).
    pub fn update_position(&mut self, span: Millis, destination: V3) -> ProjectileStep {
        let mut fields = ObjectFields::empty();
        if span == 0 {
            return ProjectileStep {
                fields,
                arrived: false,
            };
        }

        let distance = self.position.distance_squared(destination).sqrt();
        let step =
            f32::from(self.speed) * WorldConfig::PROJECTILE_UNITS_PER_SPEED * span as f32 / 1000.0;

        let arrived = distance <= WorldConfig::ARRIVAL_EPSILON || step >= distance;
        let next = if arrived {
            destination
        } else {
            let t = step / distance;
            V3::new(
                self.position.x + (destination.x - self.position.x) * t,
                self.position.y + (destination.y - self.position.y) * t,
                self.position.z + (destination.z - self.position.z) * t,
            )
        };

        if assign(&mut self.position, next) {
            fields |= ObjectFields::POSITION;
        }
        if self.aim(destination) {
            fields |= ObjectFields::ANGLE;
        }
        ProjectileStep { fields, arrived }
    }

    pub fn update_viewer_angle(&mut self, viewer: V2) -> ObjectFields {
        let angle = relative_viewer_angle(self.position.ground(), self.angle, viewer);
        if assign(&mut self.viewer_angle, angle) {
            ObjectFields::VIEWER_ANGLE
        } else {
            ObjectFields::empty()
        }
    }

    fn aim(&mut self, towards: V3) -> bool {
        let delta = towards.ground() - self.position.ground();
        if delta.length_squared() == 0.0 {
            return false;
        }
        let angle = radians_to_angle(delta.y.atan2(delta.x));
        assign(&mut self.angle, angle)
    }
}

impl Identified for Projectile {
    type Key = ProjectileId;
    type Fields = ObjectFields;

    fn key(&self) -> ProjectileId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projectile_flies_until_it_reaches_target() {
        let mut projectile = Projectile::new(
            ProjectileId(1),
            ObjectBase::new(0, "arrow"),
            ObjectId(1),
            ObjectId(2),
            1,
        );
        projectile.launch(V3::ZERO, V3::new(128.0, 0.0, 0.0));

        // 1 speed unit * 64 units/s for 1s
        let step = projectile.update_position(1000, V3::new(128.0, 0.0, 0.0));
        assert!(!step.arrived);
        assert_eq!(projectile.position.x, 64.0);

        let step = projectile.update_position(1000, V3::new(128.0, 0.0, 0.0));
        assert!(step.arrived);
        assert_eq!(projectile.position.x, 128.0);
    }
}
