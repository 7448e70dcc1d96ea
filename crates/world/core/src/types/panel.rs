use bitflags::bitflags;

use super::assign;
use super::object::masked;

bitflags! {
    /// Tracks which parts of a [`Panel`] changed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PanelFields: u8 {
        const DATA    = 1 << 0;
        const VISIBLE = 1 << 1;
    }
}

/// Singleton data model shown in its own window (look info, guild info, ...).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Panel<T> {
    data: T,
    visible: bool,
}

impl<T: Clone + Default + PartialEq> Panel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Replaces the panel contents with a fresh snapshot.
    pub fn replace(&mut self, data: T, notify: bool) -> PanelFields {
        let changed = if assign(&mut self.data, data) {
            PanelFields::DATA
        } else {
            PanelFields::empty()
        };
        masked(changed, notify)
    }

    /// Mutates the contents in place. The closure reports whether anything changed.
    pub fn update<F>(&mut self, apply: F) -> PanelFields
    where
        F: FnOnce(&mut T) -> bool,
    {
        if apply(&mut self.data) {
            PanelFields::DATA
        } else {
            PanelFields::empty()
        }
    }

    pub fn set_visible(&mut self, visible: bool) -> PanelFields {
        if assign(&mut self.visible, visible) {
            PanelFields::VISIBLE
        } else {
            PanelFields::empty()
        }
    }

    /// Resets the contents and hides the panel.
    pub fn clear(&mut self, notify: bool) -> PanelFields {
        let changed = self.replace(T::default(), true) | self.set_visible(false);
        masked(changed, notify)
    }
}
