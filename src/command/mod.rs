// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device command definitions.
//!
//! A command targets one capability of a device and is posted to
//! `POST /devices/{id}/commands` as a JSON array of command objects.
//!
//! # Available Commands
//!
//! | Capability | Command | Arguments |
//! |------------|---------|-----------|
//! | `switch` | `on`, `off` | none |
//! | `switchLevel` | `setLevel` | level (0-100) |
//! | `doorControl` | `open`, `close` | none |
//!
//! # Examples
//!
//! ```
//! use smartdeck_lib::command::{Capability, DeviceCommand};
//! use smartdeck_lib::types::Level;
//!
//! let cmd = DeviceCommand::switch(true);
//! assert_eq!(cmd.capability, Capability::Switch);
//! assert_eq!(cmd.command, "on");
//!
//! let dim = DeviceCommand::set_level(Level::new(40).unwrap());
//! assert_eq!(
//!     serde_json::to_value(&dim).unwrap(),
//!     serde_json::json!({"capability": "switchLevel", "command": "setLevel", "arguments": [40]})
//! );
//! ```

use std::fmt;

use serde::Serialize;

use crate::types::Level;

/// A capability that can receive commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Binary on/off.
    Switch,
    /// Dimming level.
    SwitchLevel,
    /// Garage door opener.
    DoorControl,
}

impl Capability {
    /// Returns the capability id used by the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::SwitchLevel => "switchLevel",
            Self::DoorControl => "doorControl",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single command sent to a device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceCommand {
    /// Targeted capability.
    pub capability: Capability,
    /// Command name within the capability.
    pub command: String,
    /// Positional arguments, omitted from the body when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<serde_json::Value>,
}

impl DeviceCommand {
    /// Creates a command without arguments.
    #[must_use]
    pub fn new(capability: Capability, command: impl Into<String>) -> Self {
        Self {
            capability,
            command: command.into(),
            arguments: Vec::new(),
        }
    }

    /// Adds an argument.
    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<serde_json::Value>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Turns a switch on or off.
    #[must_use]
    pub fn switch(on: bool) -> Self {
        Self::new(Capability::Switch, if on { "on" } else { "off" })
    }

    /// Sets the level of a dimmable device.
    #[must_use]
    pub fn set_level(level: Level) -> Self {
        Self::new(Capability::SwitchLevel, "setLevel").with_argument(level.value())
    }

    /// Opens or closes a garage door.
    #[must_use]
    pub fn door(open: bool) -> Self {
        Self::new(Capability::DoorControl, if open { "open" } else { "close" })
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.capability, self.command)
    }
}
