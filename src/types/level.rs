// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level type for dimmable devices.
//!
//! This module provides a type-safe representation of the `switchLevel`
//! capability, ensuring values are always within the valid range of 0-100%.

use std::fmt;

use crate::error::ValueError;

/// Brightness level as a percentage (0-100).
///
/// Arithmetic on levels saturates at both bounds: stepping never wraps and
/// never goes negative.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::types::Level;
///
/// let level = Level::new(95).unwrap();
/// assert_eq!(level.step(10).value(), 100);
///
/// let level = Level::new(5).unwrap();
/// assert_eq!(level.step(-10).value(), 0);
///
/// assert!(Level::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    /// Minimum level (0%).
    pub const MIN: Self = Self(0);

    /// Maximum level (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a level from any signed value, saturating at 0 and 100.
    ///
    /// ```
    /// use smartdeck_lib::types::Level;
    ///
    /// assert_eq!(Level::clamped(-5).value(), 0);
    /// assert_eq!(Level::clamped(105).value(), 100);
    /// ```
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        // Safe: the value is clamped into 0..=100 first
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = value.clamp(0, 100) as u8;
        Self(value)
    }

    /// Creates a level from a JSON number as reported by the API.
    ///
    /// Fractional values are rounded; non-finite values map to 0.
    #[must_use]
    pub fn from_reported(value: f64) -> Self {
        if !value.is_finite() {
            return Self::MIN;
        }
        // Safe: the value is rounded and clamped into 0..=100 first
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = value.round().clamp(0.0, 100.0) as u8;
        Self(value)
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns this level moved by `delta`, saturating at the bounds.
    #[must_use]
    pub fn step(self, delta: i16) -> Self {
        Self::clamped(i64::from(self.0) + i64::from(delta))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Level {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_valid_values() {
        for v in 0..=100 {
            assert_eq!(Level::new(v).unwrap().value(), v);
        }
    }

    #[test]
    fn level_invalid_value() {
        assert!(Level::new(101).is_err());
    }

    #[test]
    fn step_saturates_at_bounds() {
        assert_eq!(Level::new(95).unwrap().step(10), Level::MAX);
        assert_eq!(Level::new(5).unwrap().step(-10), Level::MIN);
        assert_eq!(Level::MIN.step(i16::MIN), Level::MIN);
        assert_eq!(Level::MAX.step(i16::MAX), Level::MAX);
        assert_eq!(Level::new(40).unwrap().step(10).value(), 50);
    }

    #[test]
    fn from_reported_rounds_and_clamps() {
        assert_eq!(Level::from_reported(49.6).value(), 50);
        assert_eq!(Level::from_reported(-3.0).value(), 0);
        assert_eq!(Level::from_reported(250.0).value(), 100);
        assert_eq!(Level::from_reported(f64::NAN).value(), 0);
    }

    #[test]
    fn level_display() {
        assert_eq!(Level::new(75).unwrap().to_string(), "75%");
    }
}
