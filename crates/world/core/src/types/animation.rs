//! Frame-group animations.
//!
//! An animation walks through a contiguous range of frame groups. `Cycle`
//! loops forever, `Once` stops on `final_group` after reaching the last group.

use super::common::Millis;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Animation {
    /// Static frame group.
    None { group: u16 },
    Cycle {
        period: Millis,
        low: u16,
        high: u16,
        group: u16,
        elapsed: Millis,
    },
    Once {
        period: Millis,
        low: u16,
        high: u16,
        group: u16,
        final_group: u16,
        elapsed: Millis,
        finished: bool,
    },
}

impl Default for Animation {
    fn default() -> Self {
        Animation::None { group: 0 }
    }
}

impl Animation {
    pub fn cycle(period: Millis, low: u16, high: u16) -> Self {
        Animation::Cycle {
            period,
            low,
            high: high.max(low),
            group: low,
            elapsed: 0,
        }
    }

    pub fn once(period: Millis, low: u16, high: u16, final_group: u16) -> Self {
        Animation::Once {
            period,
            low,
            high: high.max(low),
            group: low,
            final_group,
            elapsed: 0,
            finished: false,
        }
    }

    /// Frame group currently displayed.
    pub fn group(&self) -> u16 {
        match self {
            Animation::None { group }
            | Animation::Cycle { group, .. }
            | Animation::Once { group, .. } => *group,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Animation::Once { finished: true, .. })
    }

    /// True once a one-shot animation finished on group zero, which marks an
    /// attachment that should no longer be shown.
    pub fn is_spent(&self) -> bool {
        matches!(
            self,
            Animation::Once {
                finished: true,
                final_group: 0,
                ..
            }
        )
    }

    /// Advances the animation by `span`. Returns true if the displayed group
    /// or the finished state changed.
    ///
    /// Ranges decoded with `high < low` collapse to `low`, and a group outside
    /// its range restarts from the nearest bound.
    pub fn tick(&mut self, span: Millis) -> bool {
        if span == 0 {
            return false;
        }

        match self {
            Animation::None { .. } => false,
            Animation::Cycle {
                period,
                low,
                high,
                group,
                elapsed,
            } => {
                if *period == 0 {
                    return false;
                }
                *elapsed = elapsed.saturating_add(span);
                let steps = *elapsed / *period;
                *elapsed %= *period;
                if steps == 0 {
                    return false;
                }

                let (low, high) = (*low, (*high).max(*low));
                let current = (*group).clamp(low, high);
                let len = u64::from(high - low) + 1;
                let offset = (u64::from(current - low) + steps) % len;
                let next = low + offset as u16;
                let changed = next != *group;
                *group = next;
                changed
            }
            Animation::Once {
                period,
                low,
                high,
                group,
                final_group,
                elapsed,
                finished,
            } => {
                if *finished {
                    return false;
                }
                if *period == 0 {
                    *group = *final_group;
                    *finished = true;
                    return true;
                }
                *elapsed = elapsed.saturating_add(span);
                let steps = *elapsed / *period;
                *elapsed %= *period;
                if steps == 0 {
                    return false;
                }

                let high = (*high).max(*low);
                let current = (*group).clamp(*low, high);
                let remaining = u64::from(high - current);
                if steps > remaining {
                    *group = *final_group;
                    *finished = true;
                } else {
                    *group = current + steps as u16;
                }
                true
            }
        }
    }
}
