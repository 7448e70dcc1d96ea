use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::config::WorldConfig;

/// Server-assigned identity of a game object.
///
/// Identities are stable for the lifetime of the object on the server side and
/// are unique across room occupants, inventory and other object lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Returns true if this identity is the null identity the server uses for
    /// "no object" (e.g. a sound without a source).
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ObjectId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Milliseconds since an arbitrary epoch, supplied by the external tick driver.
pub type Millis = u64;

/// Point or direction on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct V2 {
    pub x: f32,
    pub y: f32,
}

impl V2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn distance_squared(self, other: Self) -> f32 {
        (other - self).length_squared()
    }

    /// Unit vector pointing along `angle` (in angle units).
    pub fn from_angle(angle: u16) -> Self {
        let radians = angle_to_radians(angle);
        Self::new(radians.cos(), radians.sin())
    }
}

impl Add for V2 {
    type Output = V2;
    fn add(self, rhs: V2) -> V2 {
        V2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for V2 {
    type Output = V2;
    fn sub(self, rhs: V2) -> V2 {
        V2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for V2 {
    type Output = V2;
    fn mul(self, rhs: f32) -> V2 {
        V2::new(self.x * rhs, self.y * rhs)
    }
}

/// World-space position. `x`/`y` span the ground plane, `z` is the height.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct V3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl V3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the ground plane.
    pub fn ground(self) -> V2 {
        V2::new(self.x, self.y)
    }

    pub fn with_ground(self, ground: V2) -> Self {
        Self::new(ground.x, ground.y, self.z)
    }

    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        dx * dx + dy * dy + dz * dz
    }
}

/// Converts angle units (a full circle is [`WorldConfig::ANGLE_UNITS`]) to radians.
pub fn angle_to_radians(angle: u16) -> f32 {
    f32::from(angle) * core::f32::consts::TAU / WorldConfig::ANGLE_UNITS as f32
}

/// Converts radians to angle units, normalized to `[0, ANGLE_UNITS)`.
pub fn radians_to_angle(radians: f32) -> u16 {
    let units = WorldConfig::ANGLE_UNITS as f32;
    let raw = (radians / core::f32::consts::TAU * units).round() as i64;
    raw.rem_euclid(WorldConfig::ANGLE_UNITS as i64) as u16
}

/// Angle of the viewer as seen from an object, relative to the object's facing.
///
/// Presentation uses this to pick the sprite group facing the camera.
pub fn relative_viewer_angle(object: V2, facing: u16, viewer: V2) -> u16 {
    let delta = viewer - object;
    let towards_viewer = radians_to_angle(delta.y.atan2(delta.x));
    let units = WorldConfig::ANGLE_UNITS as i64;
    (i64::from(towards_viewer) - i64::from(facing)).rem_euclid(units) as u16
}
