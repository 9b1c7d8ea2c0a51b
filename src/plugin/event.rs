// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound host events.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ParseError;
use crate::settings::GlobalSettings;
use crate::types::ButtonContext;

/// Action UUID of device buttons.
pub const DEVICE_ACTION: &str = "com.thibautsabot.streamdeck.device";
/// Action UUID of scene buttons.
pub const SCENE_ACTION: &str = "com.thibautsabot.streamdeck.scene";

/// Kind of button an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// A device button.
    Device,
    /// A scene button.
    Scene,
}

impl ActionKind {
    /// Maps an action UUID to its kind.
    #[must_use]
    pub fn from_uuid(uuid: &str) -> Option<Self> {
        match uuid {
            DEVICE_ACTION => Some(Self::Device),
            SCENE_ACTION => Some(Self::Scene),
            _ => None,
        }
    }

    /// Returns the action UUID.
    #[must_use]
    pub const fn uuid(self) -> &'static str {
        match self {
            Self::Device => DEVICE_ACTION,
            Self::Scene => SCENE_ACTION,
        }
    }
}

/// Lifecycle stage of a button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEventKind {
    /// `willAppear`
    WillAppear,
    /// `willDisappear`
    WillDisappear,
    /// `didReceiveSettings`
    DidReceiveSettings,
    /// `keyUp`
    KeyUp,
}

impl ButtonEventKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "willAppear" => Some(Self::WillAppear),
            "willDisappear" => Some(Self::WillDisappear),
            "didReceiveSettings" => Some(Self::DidReceiveSettings),
            "keyUp" => Some(Self::KeyUp),
            _ => None,
        }
    }
}

/// An event concerning one button.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonEvent {
    /// What happened.
    pub kind: ButtonEventKind,
    /// The button's action.
    pub action: ActionKind,
    /// The button instance.
    pub context: ButtonContext,
    /// Raw per-button settings (`null` when absent).
    pub settings: serde_json::Value,
}

impl ButtonEvent {
    /// Decodes the settings into the action's settings type.
    ///
    /// Missing or malformed settings yield the default value.
    #[must_use]
    pub fn settings_as<T: DeserializeOwned + Default>(&self) -> T {
        if self.settings.is_null() {
            return T::default();
        }
        match T::deserialize(&self.settings) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(context = %self.context, error = %e, "Malformed button settings");
                T::default()
            }
        }
    }
}

/// A decoded message from the Stream Deck host.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::plugin::{ActionKind, ButtonEventKind, HostEvent};
///
/// let raw = r#"{
///     "event": "keyUp",
///     "action": "com.thibautsabot.streamdeck.scene",
///     "context": "ctx",
///     "payload": {"settings": {"sceneId": "s1"}}
/// }"#;
///
/// match HostEvent::from_json(raw).unwrap() {
///     HostEvent::Button(event) => {
///         assert_eq!(event.kind, ButtonEventKind::KeyUp);
///         assert_eq!(event.action, ActionKind::Scene);
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A button lifecycle event for a known action.
    Button(ButtonEvent),
    /// `didReceiveGlobalSettings`
    GlobalSettings(GlobalSettings),
    /// Any other event, or a button event for a foreign action.
    Unhandled {
        /// Event name.
        event: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    event: String,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    context: Option<ButtonContext>,
    #[serde(default)]
    payload: Option<RawPayload>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPayload {
    #[serde(default)]
    settings: serde_json::Value,
}

impl HostEvent {
    /// Parses a host message.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` for invalid JSON, or
    /// `ParseError::MissingField` when a button event lacks its context.
    pub fn from_json(raw: &str) -> Result<Self, ParseError> {
        let message: RawMessage = serde_json::from_str(raw)?;
        let settings = message.payload.unwrap_or_default().settings;

        if message.event == "didReceiveGlobalSettings" {
            let global = if settings.is_null() {
                GlobalSettings::default()
            } else {
                serde_json::from_value(settings)?
            };
            return Ok(Self::GlobalSettings(global));
        }

        let Some(kind) = ButtonEventKind::from_name(&message.event) else {
            return Ok(Self::Unhandled {
                event: message.event,
            });
        };

        let Some(action) = message.action.as_deref().and_then(ActionKind::from_uuid) else {
            return Ok(Self::Unhandled {
                event: message.event,
            });
        };

        let context = message
            .context
            .ok_or_else(|| ParseError::MissingField("context".to_string()))?;

        Ok(Self::Button(ButtonEvent {
            kind,
            action,
            context,
            settings,
        }))
    }
}
