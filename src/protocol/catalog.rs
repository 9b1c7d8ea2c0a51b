// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device and scene listings for the property inspector.

use serde::{Deserialize, Serialize};

/// Longest name shown in the property inspector's select box.
const MAX_OPTION_NAME_CHARS: usize = 30;

/// A page of results from a listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagedResult<T> {
    /// Entries of this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Entry of `GET /devices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    /// Device id.
    #[serde(default)]
    pub device_id: Option<String>,
    /// User-assigned label.
    #[serde(default)]
    pub label: Option<String>,
    /// Manufacturer name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Entry of `GET /scenes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSummary {
    /// Scene id.
    #[serde(default)]
    pub scene_id: Option<String>,
    /// Scene name.
    #[serde(default)]
    pub scene_name: Option<String>,
}

/// One option of the property inspector's select box.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::protocol::{SceneSummary, SelectOption};
///
/// let scene = SceneSummary {
///     scene_id: Some("s1".to_string()),
///     scene_name: Some("Good night".to_string()),
/// };
/// let option = SelectOption::from_scene(&scene).unwrap();
/// assert_eq!(option.name, "Good night");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value stored in the button settings.
    pub id: String,
    /// Displayed text, at most 30 characters.
    pub name: String,
}

impl SelectOption {
    /// Creates an option, truncating the name. Returns `None` if either part
    /// is empty.
    #[must_use]
    pub fn new(id: &str, name: &str) -> Option<Self> {
        if id.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            name: name.chars().take(MAX_OPTION_NAME_CHARS).collect(),
        })
    }

    /// Creates an option from a device, preferring its label over its name.
    #[must_use]
    pub fn from_device(device: &DeviceSummary) -> Option<Self> {
        let name = device.label.as_deref().or(device.name.as_deref())?;
        Self::new(device.device_id.as_deref()?, name)
    }

    /// Creates an option from a scene.
    #[must_use]
    pub fn from_scene(scene: &SceneSummary) -> Option<Self> {
        Self::new(scene.scene_id.as_deref()?, scene.scene_name.as_deref()?)
    }
}
