//! Ambient screen effects.
//!
//! Timed effects count down every tick and expire once their remaining time
//! runs out. Blindness and paralysis are toggled by paired messages instead.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use super::assign;
use super::common::Millis;
use super::object::masked;
use crate::config::WorldConfig;

bitflags! {
    /// Tracks which effects started, ended or were refreshed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EffectFields: u8 {
        const INVERT    = 1 << 0;
        const SHAKE     = 1 << 1;
        const PAIN      = 1 << 2;
        const WHITEOUT  = 1 << 3;
        const FLASH     = 1 << 4;
        const BLIND     = 1 << 5;
        const PARALYZED = 1 << 6;
    }
}

/// Effect requested by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    Invert { duration: Millis },
    Shake { duration: Millis },
    Pain { duration: Millis },
    Whiteout { duration: Millis },
    Flash { duration: Millis },
    Blind,
    See,
    Paralyze,
    Release,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedEffect {
    pub field: EffectFields,
    pub remaining: Millis,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effects {
    timed: ArrayVec<TimedEffect, { WorldConfig::MAX_TIMED_EFFECTS }>,
    blind: bool,
    paralyzed: bool,
}

impl Effects {
    pub fn is_active(&self, field: EffectFields) -> bool {
        self.timed.iter().any(|e| e.field == field)
    }

    pub fn remaining(&self, field: EffectFields) -> Option<Millis> {
        self.timed
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.remaining)
    }

    pub fn is_blind(&self) -> bool {
        self.blind
    }

    pub fn is_paralyzed(&self) -> bool {
        self.paralyzed
    }

    /// Applies an effect. A timed effect already running is extended to the
    /// later expiry.
    pub fn handle(&mut self, effect: EffectKind) -> EffectFields {
        let (field, duration) = match effect {
            EffectKind::Invert { duration } => (EffectFields::INVERT, duration),
            EffectKind::Shake { duration } => (EffectFields::SHAKE, duration),
            EffectKind::Pain { duration } => (EffectFields::PAIN, duration),
            EffectKind::Whiteout { duration } => (EffectFields::WHITEOUT, duration),
            EffectKind::Flash { duration } => (EffectFields::FLASH, duration),
            EffectKind::Blind => return self.set_blind(true),
            EffectKind::See => return self.set_blind(false),
            EffectKind::Paralyze => return self.set_paralyzed(true),
            EffectKind::Release => return self.set_paralyzed(false),
        };

        if duration == 0 {
            return EffectFields::empty();
        }
        if let Some(existing) = self.timed.iter_mut().find(|e| e.field == field) {
            existing.remaining = existing.remaining.max(duration);
            return field;
        }
        if self.timed.try_push(TimedEffect { field, remaining: duration }).is_ok() {
            field
        } else {
            EffectFields::empty()
        }
    }

    /// Counts every timed effect down by `span`, dropping the expired ones.
    pub fn tick(&mut self, span: Millis) -> EffectFields {
        if span == 0 {
            return EffectFields::empty();
        }

        let mut expired = EffectFields::empty();
        for effect in &mut self.timed {
            effect.remaining = effect.remaining.saturating_sub(span);
            if effect.remaining == 0 {
                expired |= effect.field;
            }
        }
        self.timed.retain(|e| e.remaining > 0);
        expired
    }

    pub fn clear(&mut self, notify: bool) -> EffectFields {
        let mut changed = EffectFields::empty();
        for effect in self.timed.drain(..) {
            changed |= effect.field;
        }
        changed |= self.set_blind(false) | self.set_paralyzed(false);
        masked(changed, notify)
    }

    fn set_blind(&mut self, blind: bool) -> EffectFields {
        if assign(&mut self.blind, blind) {
            EffectFields::BLIND
        } else {
            EffectFields::empty()
        }
    }

    fn set_paralyzed(&mut self, paralyzed: bool) -> EffectFields {
        if assign(&mut self.paralyzed, paralyzed) {
            EffectFields::PARALYZED
        } else {
            EffectFields::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_effect_expires_after_duration() {
        let mut effects = Effects::default();
        assert_eq!(
            effects.handle(EffectKind::Shake { duration: 500 }),
            EffectFields::SHAKE
        );
        assert!(effects.tick(300).is_empty());
        assert_eq!(effects.remaining(EffectFields::SHAKE), Some(200));

        assert_eq!(effects.tick(200), EffectFields::SHAKE);
        assert!(!effects.is_active(EffectFields::SHAKE));
    }

    #[test]
    fn repeated_effect_extends_to_later_expiry() {
        let mut effects = Effects::default();
        effects.handle(EffectKind::Pain { duration: 300 });
        effects.handle(EffectKind::Pain { duration: 100 });
        assert_eq!(effects.remaining(EffectFields::PAIN), Some(300));
    }

    #[test]
    fn blind_and_see_toggle() {
        let mut effects = Effects::default();
        assert_eq!(effects.handle(EffectKind::Blind), EffectFields::BLIND);
        assert!(effects.handle(EffectKind::Blind).is_empty());
        assert_eq!(effects.handle(EffectKind::See), EffectFields::BLIND);
        assert!(!effects.is_blind());
    }
}
