/// World constants and tunable parameters shared by the state models.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Radius in front of the avatar within which next-target candidates are picked.
    pub target_front_radius: f32,
    /// Radius behind the avatar within which next-target candidates are picked.
    pub target_behind_radius: f32,
}

impl WorldConfig {
    // ===== compile-time constants =====
    /// Angle units in a full circle (protocol angles are expressed in these).
    pub const ANGLE_UNITS: u32 = 4096;
    /// World units travelled per second for each protocol speed unit.
    pub const MOVE_UNITS_PER_SPEED: f32 = 16.0;
    /// World units travelled per second by a projectile for each speed unit.
    pub const PROJECTILE_UNITS_PER_SPEED: f32 = 64.0;
    /// Distance below which a moving entity snaps onto its destination.
    pub const ARRIVAL_EPSILON: f32 = 0.01;
    /// Number of quick-action buttons configured by the user.
    pub const MAX_ACTION_BUTTONS: usize = 48;
    /// Distinct timed screen effects that can run at once.
    pub const MAX_TIMED_EFFECTS: usize = 8;
    /// Hotspot value that hides (removes) a first-person overlay.
    pub const HOTSPOT_HIDE: u8 = 0;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TARGET_FRONT_RADIUS: f32 = 8192.0;
    pub const DEFAULT_TARGET_BEHIND_RADIUS: f32 = 2048.0;

    pub fn new() -> Self {
        Self {
            target_front_radius: Self::DEFAULT_TARGET_FRONT_RADIUS,
            target_behind_radius: Self::DEFAULT_TARGET_BEHIND_RADIUS,
        }
    }

    pub fn with_target_radii(front: f32, behind: f32) -> Self {
        Self {
            target_front_radius: front,
            target_behind_radius: behind,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}
