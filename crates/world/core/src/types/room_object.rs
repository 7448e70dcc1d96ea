use super::assign;
use super::common::{Millis, ObjectId, V2, V3, relative_viewer_angle};
use super::flags::HealthStatus;
use super::object::{ObjectBase, ObjectFields, masked};
use crate::collection::Identified;
use crate::config::WorldConfig;
use crate::geometry::{RoomGeometry, SubSectorRef};

/// Linear move-to in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movement {
    pub destination: V2,
    /// Protocol speed units.
    pub speed: u8,
}

/// Occupant of the current room.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomObject {
    pub base: ObjectBase,
    pub position: V3,
    /// Facing, in angle units.
    pub angle: u16,
    pub movement: Option<Movement>,
    pub health: HealthStatus,
    /// Recomputed from the room geometry, never owned.
    pub sub_sector: Option<SubSectorRef>,
    /// Cached angle of the viewer relative to this object's facing.
    pub viewer_angle: u16,
    pub is_avatar: bool,
    pub is_target: bool,
}

impl RoomObject {
    pub fn new(base: ObjectBase, position: V3) -> Self {
        Self {
            base,
            position,
            ..Self::default()
        }
    }

    pub fn with_angle(mut self, angle: u16) -> Self {
        self.angle = angle;
        self
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.base.id
    }

    /// Ground-plane squared distance to `other`.
    pub fn distance_squared(&self, other: &RoomObject) -> f32 {
        self.position.ground().distance_squared(other.position.ground())
    }

    /// Applies a full occupant snapshot. Local flags (avatar, target) and
    /// geometry-derived caches are kept.
    pub fn update_from_snapshot(&mut self, snapshot: &RoomObject, notify: bool) -> ObjectFields {
        let mut changed = self.base.update_from_snapshot(&snapshot.base, true);
        if assign(&mut self.position, snapshot.position) {
            changed |= ObjectFields::POSITION;
        }
        if assign(&mut self.angle, snapshot.angle) {
            changed |= ObjectFields::ANGLE;
        }
        if assign(&mut self.movement, snapshot.movement) {
            changed |= ObjectFields::MOVEMENT;
        }
        if assign(&mut self.health, snapshot.health) {
            changed |= ObjectFields::HEALTH;
        }
        masked(changed, notify)
    }

    pub fn clear(&mut self, notify: bool) -> ObjectFields {
        let mut changed = self.update_from_snapshot(&RoomObject::default(), true);
        changed |= self.base.clear(true);
        if assign(&mut self.sub_sector, None) {
            changed |= ObjectFields::SUB_SECTOR;
        }
        if assign(&mut self.viewer_angle, 0) {
            changed |= ObjectFields::VIEWER_ANGLE;
        }
        if assign(&mut self.is_avatar, false) {
            changed |= ObjectFields::AVATAR;
        }
        if assign(&mut self.is_target, false) {
            changed |= ObjectFields::TARGET;
        }
        masked(changed, notify)
    }

    pub fn set_angle(&mut self, angle: u16) -> ObjectFields {
        let angle = (u32::from(angle) % WorldConfig::ANGLE_UNITS) as u16;
        if assign(&mut self.angle, angle) {
            ObjectFields::ANGLE
        } else {
            ObjectFields::empty()
        }
    }

    pub fn set_health(&mut self, health: HealthStatus) -> ObjectFields {
        if assign(&mut self.health, health) {
            ObjectFields::HEALTH
        } else {
            ObjectFields::empty()
        }
    }

    pub fn set_target(&mut self, is_target: bool) -> ObjectFields {
        if assign(&mut self.is_target, is_target) {
            ObjectFields::TARGET
        } else {
            ObjectFields::empty()
        }
    }

    pub fn set_avatar(&mut self, is_avatar: bool) -> ObjectFields {
        if assign(&mut self.is_avatar, is_avatar) {
            ObjectFields::AVATAR
        } else {
            ObjectFields::empty()
        }
    }

    /// Starts a linear move towards `destination`. A zero speed places the
    /// object immediately.
    pub fn start_move_to(
        &mut self,
        destination: V2,
        speed: u8,
        geometry: Option<&dyn RoomGeometry>,
    ) -> ObjectFields {
        if speed == 0 {
            let mut changed = ObjectFields::empty();
            if assign(&mut self.movement, None) {
                changed |= ObjectFields::MOVEMENT;
            }
            return changed | self.place(destination, geometry);
        }

        let movement = Some(Movement { destination, speed });
        if assign(&mut self.movement, movement) {
            ObjectFields::MOVEMENT
        } else {
            ObjectFields::empty()
        }
    }

    /// Advances the move-to in progress by `span`.
    ///
    /// Height and sub-sector are refreshed only when the object actually moved
    /// and geometry is available.
    pub fn update_position(
        &mut self,
        span: Millis,
        geometry: Option<&dyn RoomGeometry>,
    ) -> ObjectFields {
        let Some(movement) = self.movement else {
            return ObjectFields::empty();
        };
        if span == 0 {
            return ObjectFields::empty();
        }

        let here = self.position.ground();
        let delta = movement.destination - here;
        let distance = delta.length();
        let step = f32::from(movement.speed) * WorldConfig::MOVE_UNITS_PER_SPEED * span as f32
            / 1000.0;

        let mut changed = ObjectFields::empty();
        let next = if distance <= WorldConfig::ARRIVAL_EPSILON || step >= distance {
            self.movement = None;
            changed |= ObjectFields::MOVEMENT;
            movement.destination
        } else {
            here + delta * (step / distance)
        };

        changed | self.place(next, geometry)
    }

    /// Re-reads floor height and sub-sector under the current position.
    pub fn update_height(&mut self, geometry: &dyn RoomGeometry) -> ObjectFields {
        let mut changed = ObjectFields::empty();
        let location = geometry.locate(self.position.ground());
        if assign(&mut self.sub_sector, location.map(|l| l.sub_sector)) {
            changed |= ObjectFields::SUB_SECTOR;
        }
        if let Some(location) = location
            && assign(&mut self.position.z, location.height)
        {
            changed |= ObjectFields::POSITION;
        }
        changed
    }

    pub fn update_viewer_angle(&mut self, viewer: V2) -> ObjectFields {
        let angle = relative_viewer_angle(self.position.ground(), self.angle, viewer);
        if assign(&mut self.viewer_angle, angle) {
            ObjectFields::VIEWER_ANGLE
        } else {
            ObjectFields::empty()
        }
    }

    pub fn tick(&mut self, span: Millis) -> ObjectFields {
        self.base.tick(span)
    }

    fn place(&mut self, ground: V2, geometry: Option<&dyn RoomGeometry>) -> ObjectFields {
        if self.position.ground() == ground {
            return ObjectFields::empty();
        }
        self.position = self.position.with_ground(ground);
        let mut changed = ObjectFields::POSITION;
        if let Some(geometry) = geometry {
            changed |= self.update_height(geometry);
        }
        changed
    }
}

impl Identified for RoomObject {
    type Key = ObjectId;
    type Fields = ObjectFields;

    fn key(&self) -> ObjectId {
        self.base.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Location, SectorId};

    struct Slope;

    impl RoomGeometry for Slope {
        fn locate(&self, point: V2) -> Option<Location> {
            Some(Location {
                sub_sector: SubSectorRef {
                    index: point.x as u32 / 100,
                    sector: SectorId(1),
                },
                height: point.x / 10.0,
            })
        }
    }

    fn walker() -> RoomObject {
        RoomObject::new(ObjectBase::new(1, "walker"), V3::ZERO)
    }

    #[test]
    fn move_advances_by_speed_and_snaps_on_arrival() {
        let mut object = walker();
        object.start_move_to(V2::new(64.0, 0.0), 2, None);

        // 2 speed units * 16 units/s for 1s
        let changed = object.update_position(1000, None);
        assert!(changed.contains(ObjectFields::POSITION));
        assert_eq!(object.position.x, 32.0);
        assert!(object.movement.is_some());

        object.update_position(10_000, None);
        assert_eq!(object.position.ground(), V2::new(64.0, 0.0));
        assert!(object.movement.is_none());
    }

    #[test]
    fn height_follows_geometry_only_when_moved() {
        let mut object = walker();
        object.start_move_to(V2::new(200.0, 0.0), 0, Some(&Slope));
        assert_eq!(object.position.z, 20.0);
        assert_eq!(object.sub_sector.map(|s| s.index), Some(2));

        let before = object.clone();
        assert!(object.update_position(0, Some(&Slope)).is_empty());
        assert_eq!(object, before);
    }

    #[test]
    fn viewer_angle_tracks_facing() {
        let mut object = walker().with_angle(1024);
        let changed = object.update_viewer_angle(V2::new(0.0, 50.0));
        assert!(changed.is_empty());
        assert_eq!(object.viewer_angle, 0);

        object.set_angle(0);
        object.update_viewer_angle(V2::new(0.0, 50.0));
        assert_eq!(object.viewer_angle, 1024);
    }
}
