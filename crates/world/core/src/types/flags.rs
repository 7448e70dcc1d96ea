use bitflags::bitflags;

bitflags! {
    /// Server-provided classification bits of an object.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ObjectFlags: u32 {
        const PLAYER     = 1 << 0;
        const ATTACKABLE = 1 << 1;
        const ENEMY      = 1 << 2;
        const GUILD_ALLY = 1 << 3;
        const CONTAINER  = 1 << 4;
        const GETTABLE   = 1 << 5;
        const OFFERABLE  = 1 << 6;
        const BUYABLE    = 1 << 7;
        const USABLE     = 1 << 8;
        const INVISIBLE  = 1 << 9;
        const NPC        = 1 << 10;
        const MINIMAP    = 1 << 11;
    }
}

impl ObjectFlags {
    #[inline]
    pub fn is_attackable(self) -> bool {
        self.contains(Self::ATTACKABLE)
    }

    /// Guild enemy.
    #[inline]
    pub fn is_enemy(self) -> bool {
        self.contains(Self::ENEMY)
    }

    /// Whether next-target acquisition may pick this object.
    #[inline]
    pub fn is_target_candidate(self) -> bool {
        self.intersects(Self::ATTACKABLE | Self::ENEMY)
    }
}

/// Coarse health indicator derived from the pain sounds an object plays.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HealthStatus {
    #[default]
    Unknown,
    Green,
    Yellow,
    Orange,
    Red,
}
