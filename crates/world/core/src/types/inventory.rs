use super::assign;
use super::common::{Millis, ObjectId};
use super::object::{ObjectBase, ObjectFields, masked};
use crate::collection::Identified;

/// Item carried by the avatar.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryObject {
    pub base: ObjectBase,
    /// Equipped or otherwise in use.
    pub in_use: bool,
}

impl InventoryObject {
    pub fn new(base: ObjectBase) -> Self {
        Self {
            base,
            in_use: false,
        }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.base.id
    }

    pub fn update_from_snapshot(
        &mut self,
        snapshot: &InventoryObject,
        notify: bool,
    ) -> ObjectFields {
        let mut changed = self.base.update_from_snapshot(&snapshot.base, true);
        if assign(&mut self.in_use, snapshot.in_use) {
            changed |= ObjectFields::IN_USE;
        }
        masked(changed, notify)
    }

    pub fn set_in_use(&mut self, in_use: bool) -> ObjectFields {
        if assign(&mut self.in_use, in_use) {
            ObjectFields::IN_USE
        } else {
            ObjectFields::empty()
        }
    }

    pub fn tick(&mut self, span: Millis) -> ObjectFields {
        self.base.tick(span)
    }
}

impl Identified for InventoryObject {
    type Key = ObjectId;
    type Fields = ObjectFields;

    fn key(&self) -> ObjectId {
        self.base.id
    }
}

/// Spell the avatar can cast.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellObject {
    pub base: ObjectBase,
    /// Number of targets the spell requires.
    pub target_count: u8,
    pub school: u8,
}

impl SpellObject {
    pub fn new(base: ObjectBase) -> Self {
        Self {
            base,
            target_count: 0,
            school: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.base.id
    }
}

impl Identified for SpellObject {
    type Key = ObjectId;
    type Fields = ObjectFields;

    fn key(&self) -> ObjectId {
        self.base.id
    }
}
