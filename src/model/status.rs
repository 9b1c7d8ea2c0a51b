// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for `GET /devices/{id}/status` responses.

use serde::Deserialize;

use crate::error::ParseError;
use crate::types::Level;

/// Raw status snapshot of a device.
///
/// Only the capabilities this library understands are kept; every level of
/// the document is optional so that partial or unexpected payloads never fail
/// to parse as long as they are JSON objects.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::model::RemoteDeviceStatus;
///
/// let json = r#"{"components":{"main":{"switch":{"switch":{"value":"on"}}}}}"#;
/// let status = RemoteDeviceStatus::from_json(json).unwrap();
///
/// assert!(status.has_switch());
/// assert_eq!(status.switch_value(), Some("on"));
/// assert!(!status.has_door_control());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteDeviceStatus {
    #[serde(default)]
    components: Option<Components>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct Components {
    #[serde(default)]
    main: Option<MainComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct MainComponent {
    #[serde(default)]
    switch: Option<SwitchCapability>,

    #[serde(rename = "switchLevel", default)]
    switch_level: Option<SwitchLevelCapability>,

    #[serde(rename = "doorControl", default)]
    door_control: Option<DoorControlCapability>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct SwitchCapability {
    #[serde(default)]
    switch: Option<Attribute<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct SwitchLevelCapability {
    #[serde(default)]
    level: Option<Attribute<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct DoorControlCapability {
    #[serde(default)]
    door: Option<Attribute<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct Attribute<T> {
    #[serde(default)]
    value: Option<T>,
}

impl RemoteDeviceStatus {
    /// Parses a status document.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the body is not a JSON object.
    pub fn from_json(body: &str) -> Result<Self, ParseError> {
        serde_json::from_str(body).map_err(Into::into)
    }

    fn main(&self) -> Option<&MainComponent> {
        self.components.as_ref()?.main.as_ref()
    }

    /// Returns `true` if the main component exposes the `switch` capability.
    #[must_use]
    pub fn has_switch(&self) -> bool {
        self.main().is_some_and(|m| m.switch.is_some())
    }

    /// Returns `true` if the main component exposes the `switchLevel` capability.
    #[must_use]
    pub fn has_switch_level(&self) -> bool {
        self.main().is_some_and(|m| m.switch_level.is_some())
    }

    /// Returns `true` if the main component exposes the `doorControl` capability.
    #[must_use]
    pub fn has_door_control(&self) -> bool {
        self.main().is_some_and(|m| m.door_control.is_some())
    }

    /// Returns the `switch` attribute value (`"on"` / `"off"`).
    #[must_use]
    pub fn switch_value(&self) -> Option<&str> {
        self.main()?
            .switch
            .as_ref()?
            .switch
            .as_ref()?
            .value
            .as_deref()
    }

    /// Returns the reported level, rounded and clamped to 0-100.
    #[must_use]
    pub fn level(&self) -> Option<Level> {
        self.main()?
            .switch_level
            .as_ref()?
            .level
            .as_ref()?
            .value
            .map(Level::from_reported)
    }

    /// Returns the `door` attribute value (`"open"`, `"closed"`, `"opening"`, ...).
    #[must_use]
    pub fn door_value(&self) -> Option<&str> {
        self.main()?
            .door_control
            .as_ref()?
            .door
            .as_ref()?
            .value
            .as_deref()
    }
}
