//! Avatar statistics.
//!
//! Stats are either numeric (a value bar such as hit points) or list entries
//! (a named skill or spell with a level). Both share the stat number that keys
//! them within their group.

use bitflags::bitflags;

use super::assign;
use super::object::masked;
use crate::collection::Identified;

bitflags! {
    /// Tracks which fields of a [`Stat`] changed during an update.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatFields: u8 {
        const NAME  = 1 << 0;
        const VALUE = 1 << 1;
        /// The stat switched between numeric and list form.
        const KIND  = 1 << 2;
    }
}

/// Well-known stat numbers of the condition group.
pub struct StatNum;

impl StatNum {
    pub const HIT_POINTS: u8 = 1;
    pub const MANA: u8 = 2;
    pub const VIGOR: u8 = 3;
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatGroup {
    Condition,
    Attributes,
    Skills,
    Spells,
}

impl StatGroup {
    /// Condition and attributes hold value bars, skills and spells hold lists.
    pub const fn is_numeric(self) -> bool {
        matches!(self, StatGroup::Condition | StatGroup::Attributes)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatValue {
    Numeric {
        value: i32,
        max: i32,
        current_max: i32,
    },
    List {
        /// Level or percentage.
        value: u8,
        resource: String,
    },
}

impl StatValue {
    pub const fn is_numeric(&self) -> bool {
        matches!(self, StatValue::Numeric { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stat {
    pub num: u8,
    pub name: String,
    pub value: StatValue,
}

impl Stat {
    pub fn numeric(num: u8, name: impl Into<String>, value: i32, max: i32) -> Self {
        Self {
            num,
            name: name.into(),
            value: StatValue::Numeric {
                value,
                max,
                current_max: max,
            },
        }
    }

    pub fn list(num: u8, name: impl Into<String>, value: u8) -> Self {
        Self {
            num,
            name: name.into(),
            value: StatValue::List {
                value,
                resource: String::new(),
            },
        }
    }

    /// Current value of a numeric stat, `None` for list entries.
    pub fn numeric_value(&self) -> Option<i32> {
        match self.value {
            StatValue::Numeric { value, .. } => Some(value),
            StatValue::List { .. } => None,
        }
    }

    pub fn update_from_snapshot(&mut self, snapshot: &Stat, notify: bool) -> StatFields {
        let mut changed = StatFields::empty();
        if assign(&mut self.name, snapshot.name.clone()) {
            changed |= StatFields::NAME;
        }
        if self.value.is_numeric() != snapshot.value.is_numeric() {
            changed |= StatFields::KIND;
        }
        if assign(&mut self.value, snapshot.value.clone()) {
            changed |= StatFields::VALUE;
        }
        masked(changed, notify)
    }
}

impl Identified for Stat {
    type Key = u8;
    type Fields = StatFields;

    fn key(&self) -> u8 {
        self.num
    }
}
