//! Trade and buy sessions.
//!
//! A session names its partner by identity only. The owner guarantees the
//! partner is a present room occupant and resets the session when it leaves.

use bitflags::bitflags;

use super::assign;
use super::common::{Millis, ObjectId};
use super::object::{ObjectBase, masked};

bitflags! {
    /// Tracks which fields of a trade or buy session changed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TradeFields: u8 {
        const PARTNER           = 1 << 0;
        const ITEMS_YOU         = 1 << 1;
        const ITEMS_PARTNER     = 1 << 2;
        const VISIBLE           = 1 << 3;
        const PENDING           = 1 << 4;
        const ITEMS_YOU_SET     = 1 << 5;
        const ITEMS_PARTNER_SET = 1 << 6;
        const BACKGROUND_OFFER  = 1 << 7;
    }
}

/// Player-to-player trade window.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeSession {
    pub partner: Option<ObjectId>,
    pub items_you: Vec<ObjectBase>,
    pub items_partner: Vec<ObjectBase>,
    pub visible: bool,
    pub pending: bool,
    pub items_you_set: bool,
    pub items_partner_set: bool,
    pub background_offer: bool,
}

impl TradeSession {
    /// True while nothing about a trade is known.
    pub fn is_empty(&self) -> bool {
        *self == TradeSession::default()
    }

    pub fn set_partner(&mut self, partner: Option<ObjectId>) -> TradeFields {
        flag(assign(&mut self.partner, partner), TradeFields::PARTNER)
    }

    pub fn set_items_you(&mut self, items: Vec<ObjectBase>) -> TradeFields {
        flag(assign(&mut self.items_you, items), TradeFields::ITEMS_YOU)
    }

    pub fn set_items_partner(&mut self, items: Vec<ObjectBase>) -> TradeFields {
        flag(assign(&mut self.items_partner, items), TradeFields::ITEMS_PARTNER)
    }

    pub fn set_visible(&mut self, visible: bool) -> TradeFields {
        flag(assign(&mut self.visible, visible), TradeFields::VISIBLE)
    }

    pub fn set_pending(&mut self, pending: bool) -> TradeFields {
        flag(assign(&mut self.pending, pending), TradeFields::PENDING)
    }

    pub fn set_items_you_set(&mut self, set: bool) -> TradeFields {
        flag(assign(&mut self.items_you_set, set), TradeFields::ITEMS_YOU_SET)
    }

    pub fn set_items_partner_set(&mut self, set: bool) -> TradeFields {
        flag(
            assign(&mut self.items_partner_set, set),
            TradeFields::ITEMS_PARTNER_SET,
        )
    }

    pub fn set_background_offer(&mut self, background: bool) -> TradeFields {
        flag(
            assign(&mut self.background_offer, background),
            TradeFields::BACKGROUND_OFFER,
        )
    }

    /// Resets to the empty, hidden phase.
    pub fn clear(&mut self, notify: bool) -> TradeFields {
        let changed = self.set_partner(None)
            | self.set_items_you(Vec::new())
            | self.set_items_partner(Vec::new())
            | self.set_visible(false)
            | self.set_pending(false)
            | self.set_items_you_set(false)
            | self.set_items_partner_set(false)
            | self.set_background_offer(false);
        masked(changed, notify)
    }

    /// Animates the offered items.
    pub fn tick(&mut self, span: Millis) -> TradeFields {
        let mut changed = TradeFields::empty();
        for item in &mut self.items_you {
            if !item.tick(span).is_empty() {
                changed |= TradeFields::ITEMS_YOU;
            }
        }
        for item in &mut self.items_partner {
            if !item.tick(span).is_empty() {
                changed |= TradeFields::ITEMS_PARTNER;
            }
        }
        changed
    }
}

/// Window listing the wares of a vendor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuySession {
    pub partner: Option<ObjectId>,
    pub items: Vec<ObjectBase>,
    pub visible: bool,
}

impl BuySession {
    pub fn is_empty(&self) -> bool {
        *self == BuySession::default()
    }

    pub fn set_partner(&mut self, partner: Option<ObjectId>) -> TradeFields {
        flag(assign(&mut self.partner, partner), TradeFields::PARTNER)
    }

    pub fn set_items(&mut self, items: Vec<ObjectBase>) -> TradeFields {
        flag(assign(&mut self.items, items), TradeFields::ITEMS_PARTNER)
    }

    pub fn set_visible(&mut self, visible: bool) -> TradeFields {
        flag(assign(&mut self.visible, visible), TradeFields::VISIBLE)
    }

    pub fn clear(&mut self, notify: bool) -> TradeFields {
        let changed =
            self.set_partner(None) | self.set_items(Vec::new()) | self.set_visible(false);
        masked(changed, notify)
    }
}

#[inline]
fn flag(changed: bool, field: TradeFields) -> TradeFields {
    if changed { field } else { TradeFields::empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_returns_to_hidden_empty_phase() {
        let mut trade = TradeSession::default();
        trade.set_partner(Some(ObjectId(42)));
        trade.set_items_partner(vec![ObjectBase::new(9, "gem")]);
        trade.set_visible(true);
        trade.set_pending(true);

        let changed = trade.clear(true);
        assert!(changed.contains(TradeFields::PARTNER | TradeFields::VISIBLE));
        assert!(trade.is_empty());
        assert!(trade.clear(true).is_empty());
    }
}
