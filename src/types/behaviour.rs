// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key-press behaviour for dimmable devices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// What a key press does to a device.
///
/// Only dimmable lights honour `More` and `Less`; every other device kind
/// treats all behaviours as `Toggle`.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::types::Behaviour;
///
/// let behaviour: Behaviour = "more".parse().unwrap();
/// assert_eq!(behaviour, Behaviour::More);
/// assert_eq!(behaviour.level_delta(), Some(10));
/// assert_eq!(Behaviour::default(), Behaviour::Toggle);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behaviour {
    /// Invert the on/off or open/closed state.
    #[default]
    Toggle,
    /// Raise the level by one step.
    More,
    /// Lower the level by one step.
    Less,
}

impl Behaviour {
    /// Level change applied per key press.
    pub const LEVEL_STEP: i16 = 10;

    /// Returns the string used in button settings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::More => "more",
            Self::Less => "less",
        }
    }

    /// Returns the signed level change, or `None` for `Toggle`.
    #[must_use]
    pub const fn level_delta(&self) -> Option<i16> {
        match self {
            Self::Toggle => None,
            Self::More => Some(Self::LEVEL_STEP),
            Self::Less => Some(-Self::LEVEL_STEP),
        }
    }
}

impl fmt::Display for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Behaviour {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toggle" => Ok(Self::Toggle),
            "more" => Ok(Self::More),
            "less" => Ok(Self::Less),
            _ => Err(ValueError::InvalidBehaviour(s.to_string())),
        }
    }
}
