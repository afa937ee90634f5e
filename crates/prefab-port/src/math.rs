// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transform math types as the host reports them.

use serde::{Deserialize, Serialize};

/// Three-component vector (`{x, y, z}` on the wire).
///
/// Missing components decode as `0.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// All-zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// All-one vector (identity scale).
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Construct a vector from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Rotation quaternion (`{x, y, z, w}` on the wire).
///
/// A missing `w` decodes as `1.0` so that `{}` is the identity rotation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quat {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// W (scalar) component.
    pub w: f64,
}

impl Quat {
    /// Identity rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Construct a quaternion from components.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Euler angles in degrees (x = bank, y = heading, z = attitude).
    ///
    /// Near the poles the bank is pinned to zero.
    pub fn to_euler_degrees(self) -> Vec3 {
        let Self { x, y, z, w } = self;
        let test = x * y + z * w;
        if test > 0.499_999 {
            return Vec3::new(0.0, (2.0 * x.atan2(w)).to_degrees(), 90.0);
        }
        if test < -0.499_999 {
            return Vec3::new(0.0, -(2.0 * x.atan2(w)).to_degrees(), -90.0);
        }
        let (sqx, sqy, sqz) = (x * x, y * y, z * z);
        let bank = (2.0 * x * w - 2.0 * y * z).atan2(1.0 - 2.0 * sqx - 2.0 * sqz);
        let heading = (2.0 * y * w - 2.0 * x * z).atan2(1.0 - 2.0 * sqy - 2.0 * sqz);
        let attitude = (2.0 * test).asin();
        Vec3::new(bank.to_degrees(), heading.to_degrees(), attitude.to_degrees())
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn empty_quat_is_identity() {
        let q: Quat = serde_json::from_str("{}").unwrap();
        assert_eq!(q, Quat::IDENTITY);
    }

    #[test]
    fn identity_has_zero_euler() {
        assert_eq!(Quat::IDENTITY.to_euler_degrees(), Vec3::ZERO);
    }

    #[test]
    fn quarter_turn_about_z() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let e = Quat::new(0.0, 0.0, h, h).to_euler_degrees();
        assert!((e.z - 90.0).abs() < 1e-6);
        assert!(e.x.abs() < 1e-6);
    }

    #[test]
    fn partial_vec_fills_zero() {
        let v: Vec3 = serde_json::from_str(r#"{"y": 2.5}"#).unwrap();
        assert_eq!(v, Vec3::new(0.0, 2.5, 0.0));
    }
}
