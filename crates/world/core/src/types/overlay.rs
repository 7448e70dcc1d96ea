use super::assign;
use super::common::{Millis, ObjectId};
use super::object::{ObjectBase, ObjectFields, masked};
use crate::collection::Identified;
use crate::config::WorldConfig;

/// First-person attachment drawn at a screen hotspot (weapon in hand, ...).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerOverlay {
    pub base: ObjectBase,
    pub hotspot: u8,
}

impl PlayerOverlay {
    pub fn new(base: ObjectBase, hotspot: u8) -> Self {
        Self { base, hotspot }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.base.id
    }

    /// A hidden overlay removes any overlay with the same identity.
    pub fn is_hidden(&self) -> bool {
        self.hotspot == WorldConfig::HOTSPOT_HIDE
    }

    pub fn update_from_snapshot(&mut self, snapshot: &PlayerOverlay, notify: bool) -> ObjectFields {
        let mut changed = self.base.update_from_snapshot(&snapshot.base, true);
        if assign(&mut self.hotspot, snapshot.hotspot) {
            changed |= ObjectFields::HOTSPOT;
        }
        masked(changed, notify)
    }

    pub fn tick(&mut self, span: Millis) -> ObjectFields {
        self.base.tick(span)
    }
}

impl Identified for PlayerOverlay {
    type Key = ObjectId;
    type Fields = ObjectFields;

    fn key(&self) -> ObjectId {
        self.base.id
    }
}

/// Sky or horizon decoration of the current room.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackgroundOverlay {
    pub base: ObjectBase,
    pub angle: u16,
    pub height: i16,
}

impl BackgroundOverlay {
    pub fn new(base: ObjectBase, angle: u16, height: i16) -> Self {
        Self {
            base,
            angle,
            height,
        }
    }

    pub fn update_from_snapshot(
        &mut self,
        snapshot: &BackgroundOverlay,
        notify: bool,
    ) -> ObjectFields {
        let mut changed = self.base.update_from_snapshot(&snapshot.base, true);
        if assign(&mut self.angle, snapshot.angle) {
            changed |= ObjectFields::ANGLE;
        }
        if assign(&mut self.height, snapshot.height) {
            changed |= ObjectFields::POSITION;
        }
        masked(changed, notify)
    }
}

impl Identified for BackgroundOverlay {
    type Key = ObjectId;
    type Fields = ObjectFields;

    fn key(&self) -> ObjectId {
        self.base.id
    }
}
