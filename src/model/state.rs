// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized device state and its button display.

use crate::types::Level;

use super::RemoteDeviceStatus;

/// Kind of device, derived from the capabilities it exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// `switch` and `switchLevel`.
    Light,
    /// `switch` only.
    Switch,
    /// `doorControl`, whatever else is exposed.
    GarageDoor,
    /// Neither `switch` nor `doorControl`.
    Unsupported,
}

/// Device state reduced to what a button can show.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::model::{DeviceKind, RemoteDeviceStatus, normalize};
///
/// let json = r#"{"components":{"main":{"doorControl":{"door":{"value":"open"}}}}}"#;
/// let state = normalize(&RemoteDeviceStatus::from_json(json).unwrap());
///
/// assert_eq!(state.kind, DeviceKind::GarageDoor);
/// assert!(state.is_active);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDeviceState {
    /// The device kind.
    pub kind: DeviceKind,
    /// On for switches and lights, open for garage doors.
    pub is_active: bool,
    /// Level for dimmable lights.
    pub level: Option<Level>,
}

impl NormalizedDeviceState {
    /// State of a device exposing no supported capability.
    #[must_use]
    pub const fn unsupported() -> Self {
        Self {
            kind: DeviceKind::Unsupported,
            is_active: false,
            level: None,
        }
    }

    /// Returns `true` if the device can be driven by a button.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.kind != DeviceKind::Unsupported
    }

    /// Maps this state to what the button should show.
    ///
    /// Returns `None` for unsupported devices.
    #[must_use]
    pub fn display(&self) -> Option<DisplayToken> {
        let title = match (self.kind, self.level) {
            (DeviceKind::Unsupported, _) => return None,
            (DeviceKind::Light, Some(level)) if self.is_active => level.to_string(),
            _ => String::new(),
        };

        Some(DisplayToken {
            state: StateIndex::from_active(self.is_active),
            title,
        })
    }
}

/// Derives the normalized state from a raw status snapshot.
///
/// Door control takes precedence over switch capabilities; a missing
/// `components.main` yields an unsupported state.
#[must_use]
pub fn normalize(status: &RemoteDeviceStatus) -> NormalizedDeviceState {
    if status.has_door_control() {
        return NormalizedDeviceState {
            kind: DeviceKind::GarageDoor,
            is_active: status.door_value() == Some("open"),
            level: None,
        };
    }

    if !status.has_switch() {
        return NormalizedDeviceState::unsupported();
    }

    let is_active = status.switch_value() == Some("on");
    if status.has_switch_level() {
        NormalizedDeviceState {
            kind: DeviceKind::Light,
            is_active,
            level: status.level(),
        }
    } else {
        NormalizedDeviceState {
            kind: DeviceKind::Switch,
            is_active,
            level: None,
        }
    }
}

/// Numeric state index understood by the Stream Deck host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateIndex {
    /// Off or closed.
    Inactive,
    /// On or open.
    Active,
}

impl StateIndex {
    /// Maps an active flag to its index.
    #[must_use]
    pub const fn from_active(is_active: bool) -> Self {
        if is_active { Self::Active } else { Self::Inactive }
    }

    /// Returns the wire value (`0` or `1`).
    #[must_use]
    pub const fn value(&self) -> u8 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
        }
    }
}

/// Icon state and title for one button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayToken {
    /// Icon state.
    pub state: StateIndex,
    /// Title drawn over the icon. Empty clears it.
    pub title: String,
}
