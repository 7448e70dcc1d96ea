//! Quick-action buttons configured by the user.
//!
//! Item and spell buttons are configured by name and bound to whatever object
//! currently carries that name, matched case-insensitively.

use arrayvec::ArrayVec;

use super::assign;
use super::common::ObjectId;
use super::object::ObjectBase;
use crate::config::WorldConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionButtonKind {
    #[default]
    Unset,
    Item,
    Spell,
    /// Built-in action (rest, attack, ...), never rebound.
    Action,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionButton {
    pub kind: ActionButtonKind,
    /// Configured name of the item, spell or action.
    pub name: String,
    /// Object the button currently triggers.
    pub bound: Option<ObjectId>,
}

impl ActionButton {
    pub fn new(kind: ActionButtonKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            bound: None,
        }
    }

    fn rebind(&mut self, kind: ActionButtonKind, object: &ObjectBase) -> bool {
        if self.kind != kind || !object.name_matches(&self.name) {
            return false;
        }
        assign(&mut self.bound, Some(object.id))
    }
}

/// Fixed-size set of quick-action buttons.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionButtons {
    buttons: ArrayVec<ActionButton, { WorldConfig::MAX_ACTION_BUTTONS }>,
}

impl ActionButtons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a button. Returns the button back if every slot is taken.
    pub fn push(&mut self, button: ActionButton) -> Result<(), ActionButton> {
        self.buttons.try_push(button).map_err(|err| err.element())
    }

    pub fn get(&self, slot: usize) -> Option<&ActionButton> {
        self.buttons.get(slot)
    }

    pub fn set(&mut self, slot: usize, button: ActionButton) -> bool {
        match self.buttons.get_mut(slot) {
            Some(existing) => {
                *existing = button;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionButton> {
        self.buttons.iter()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Binds every item button named like `item`. Returns the number of
    /// buttons rebound.
    pub fn rebind_item(&mut self, item: &ObjectBase) -> usize {
        self.rebind(ActionButtonKind::Item, item)
    }

    /// Binds every spell button named like `spell`.
    pub fn rebind_spell(&mut self, spell: &ObjectBase) -> usize {
        self.rebind(ActionButtonKind::Spell, spell)
    }

    fn rebind(&mut self, kind: ActionButtonKind, object: &ObjectBase) -> usize {
        self.buttons
            .iter_mut()
            .filter_map(|button| button.rebind(kind, object).then_some(()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_matches_names_case_insensitively() {
        let mut buttons = ActionButtons::new();
        buttons
            .push(ActionButton::new(ActionButtonKind::Item, "Healing Potion"))
            .unwrap();
        buttons
            .push(ActionButton::new(ActionButtonKind::Spell, "healing potion"))
            .unwrap();

        let potion = ObjectBase::new(31, "HEALING POTION");
        assert_eq!(buttons.rebind_item(&potion), 1);
        assert_eq!(buttons.get(0).unwrap().bound, Some(ObjectId(31)));
        assert_eq!(buttons.get(1).unwrap().bound, None);
    }

    #[test]
    fn rebinding_to_the_same_object_reports_nothing() {
        let mut buttons = ActionButtons::new();
        buttons
            .push(ActionButton::new(ActionButtonKind::Item, "potion"))
            .unwrap();

        let potion = ObjectBase::new(31, "potion");
        assert_eq!(buttons.rebind_item(&potion), 1);
        assert_eq!(buttons.rebind_item(&potion), 0);

        let other = ObjectBase::new(32, "Potion");
        assert_eq!(buttons.rebind_item(&other), 1);
        assert_eq!(buttons.get(0).unwrap().bound, Some(ObjectId(32)));
    }

    #[test]
    fn push_rejects_when_full() {
        let mut buttons = ActionButtons::new();
        for _ in 0..WorldConfig::MAX_ACTION_BUTTONS {
            buttons.push(ActionButton::default()).unwrap();
        }
        assert!(buttons.push(ActionButton::default()).is_err());
    }
}
