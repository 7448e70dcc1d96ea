use bitflags::bitflags;

use super::animation::Animation;
use super::assign;
use super::common::{Millis, ObjectId};
use super::flags::ObjectFlags;
use crate::collection::Identified;

bitflags! {
    /// Tracks which fields of an object model changed during an update.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ObjectFields: u16 {
        const NAME         = 1 << 0;
        const COUNT        = 1 << 1;
        const FLAGS        = 1 << 2;
        const RESOURCE     = 1 << 3;
        const ANIMATION    = 1 << 4;
        const POSITION     = 1 << 5;
        const ANGLE        = 1 << 6;
        const MOVEMENT     = 1 << 7;
        const HEALTH       = 1 << 8;
        const SUB_SECTOR   = 1 << 9;
        const VIEWER_ANGLE = 1 << 10;
        const IN_USE       = 1 << 11;
        const TARGET       = 1 << 12;
        const AVATAR       = 1 << 13;
        const HOTSPOT      = 1 << 14;
    }
}

impl ObjectFields {
    /// Fields whose change invalidates a cached viewer angle.
    pub const VIEWER_DEPENDENT: Self = Self::POSITION.union(Self::ANGLE);
}

/// Fields shared by every server object: room occupants, items, spells, buffs
/// and overlays.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectBase {
    pub id: ObjectId,
    pub name: String,
    pub count: u32,
    pub flags: ObjectFlags,
    /// Graphics resource the object is drawn with.
    pub resource: String,
    pub animation: Animation,
}

impl ObjectBase {
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count: 1,
            ..Self::default()
        }
    }

    pub fn with_flags(mut self, flags: ObjectFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = animation;
        self
    }

    /// Applies `snapshot` field by field. The identity is never changed.
    pub fn update_from_snapshot(&mut self, snapshot: &ObjectBase, notify: bool) -> ObjectFields {
        let mut changed = ObjectFields::empty();
        if assign(&mut self.name, snapshot.name.clone()) {
            changed |= ObjectFields::NAME;
        }
        if assign(&mut self.count, snapshot.count) {
            changed |= ObjectFields::COUNT;
        }
        if assign(&mut self.flags, snapshot.flags) {
            changed |= ObjectFields::FLAGS;
        }
        if assign(&mut self.resource, snapshot.resource.clone()) {
            changed |= ObjectFields::RESOURCE;
        }
        if assign(&mut self.animation, snapshot.animation.clone()) {
            changed |= ObjectFields::ANIMATION;
        }
        masked(changed, notify)
    }

    /// Resets every field, including the identity, to its default.
    pub fn clear(&mut self, notify: bool) -> ObjectFields {
        let empty = ObjectBase::default();
        let changed = self.update_from_snapshot(&empty, true);
        self.id = empty.id;
        masked(changed, notify)
    }

    pub fn tick(&mut self, span: Millis) -> ObjectFields {
        if self.animation.tick(span) {
            ObjectFields::ANIMATION
        } else {
            ObjectFields::empty()
        }
    }

    /// Case-insensitive name comparison used for quick-action bindings.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl Identified for ObjectBase {
    type Key = ObjectId;
    type Fields = ObjectFields;

    fn key(&self) -> ObjectId {
        self.id
    }
}

#[inline]
pub(crate) fn masked<F: bitflags::Flags>(changed: F, notify: bool) -> F {
    if notify { changed } else { F::empty() }
}
