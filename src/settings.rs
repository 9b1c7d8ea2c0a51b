// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plugin settings and the selectors derived from them.
//!
//! The Stream Deck host owns persistence. Global settings hold the API
//! access token; per-button settings name the device or scene a button
//! drives. Both arrive as JSON in host events.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::types::Behaviour;

/// Placeholder id the property inspector stores before a choice is made.
const UNSET_ID: &str = "none";

/// Plugin-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Personal access token for the remote API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl GlobalSettings {
    /// Creates settings holding the given token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
        }
    }

    /// Returns the token, treating an empty string as absent.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Source of the global settings.
pub trait SettingsStore: Send + Sync + 'static {
    /// Returns the current global settings.
    fn global_settings(&self) -> GlobalSettings;

    /// Returns the configured access token, if any.
    fn access_token(&self) -> Option<String> {
        self.global_settings().access_token().map(str::to_string)
    }
}

/// In-memory copy of the global settings, refreshed from host events.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::settings::{GlobalSettings, SettingsCache, SettingsStore};
///
/// let cache = SettingsCache::new();
/// assert_eq!(cache.access_token(), None);
///
/// cache.update(GlobalSettings::with_token("secret"));
/// assert_eq!(cache.access_token().as_deref(), Some("secret"));
/// ```
#[derive(Debug, Default)]
pub struct SettingsCache {
    global: RwLock<GlobalSettings>,
}

impl SettingsCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached settings.
    pub fn update(&self, settings: GlobalSettings) {
        *self.global.write() = settings;
    }
}

impl SettingsStore for SettingsCache {
    fn global_settings(&self) -> GlobalSettings {
        self.global.read().clone()
    }
}

/// Settings stored for a device button.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSettings {
    /// Selected device.
    #[serde(default)]
    pub device_id: Option<String>,
    /// Raw behaviour string from the property inspector.
    #[serde(default)]
    pub behaviour: Option<String>,
}

impl DeviceSettings {
    /// Returns the selector, or `None` while no device is chosen.
    ///
    /// An unknown behaviour falls back to toggle.
    #[must_use]
    pub fn selector(&self) -> Option<DeviceSelector> {
        let device_id = configured_id(self.device_id.as_deref())?;
        let behaviour = match self.behaviour.as_deref().map(str::parse::<Behaviour>) {
            Some(Ok(behaviour)) => Some(behaviour),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Ignoring unknown behaviour");
                None
            }
            None => None,
        };

        Some(DeviceSelector {
            device_id: device_id.to_string(),
            behaviour,
        })
    }
}

/// Settings stored for a scene button.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSettings {
    /// Selected scene.
    #[serde(default)]
    pub scene_id: Option<String>,
}

impl SceneSettings {
    /// Returns the selector, or `None` while no scene is chosen.
    #[must_use]
    pub fn selector(&self) -> Option<SceneSelector> {
        configured_id(self.scene_id.as_deref()).map(|scene_id| SceneSelector {
            scene_id: scene_id.to_string(),
        })
    }
}

/// The device a button drives and how a key press acts on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSelector {
    /// Remote device id.
    pub device_id: String,
    /// Configured behaviour, if any.
    pub behaviour: Option<Behaviour>,
}

impl DeviceSelector {
    /// Creates a selector with the default behaviour.
    #[must_use]
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            behaviour: None,
        }
    }

    /// Sets the behaviour.
    #[must_use]
    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = Some(behaviour);
        self
    }

    /// Returns the effective behaviour (toggle when unset).
    #[must_use]
    pub fn behaviour(&self) -> Behaviour {
        self.behaviour.unwrap_or_default()
    }
}

/// The scene a button executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSelector {
    /// Remote scene id.
    pub scene_id: String,
}

fn configured_id(id: Option<&str>) -> Option<&str> {
    id.map(str::trim)
        .filter(|id| !id.is_empty() && *id != UNSET_ID)
}
