// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene button controller.

use std::sync::Arc;

use crate::protocol::DeviceApi;
use crate::settings::{SceneSelector, SettingsStore};
use crate::surface::ButtonSurface;
use crate::types::ButtonContext;

/// Executes scenes on key press.
///
/// Scene buttons have no state to mirror, so there is no polling. A failed
/// execution flashes the alert indicator.
pub struct SceneController<A, S, B> {
    api: Arc<A>,
    settings: Arc<S>,
    surface: Arc<B>,
}

impl<A, S, B> Clone for SceneController<A, S, B> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            settings: Arc::clone(&self.settings),
            surface: Arc::clone(&self.surface),
        }
    }
}

impl<A, S, B> std::fmt::Debug for SceneController<A, S, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneController").finish_non_exhaustive()
    }
}

impl<A, S, B> SceneController<A, S, B>
where
    A: DeviceApi,
    S: SettingsStore,
    B: ButtonSurface,
{
    /// Creates a scene controller.
    #[must_use]
    pub fn new(api: Arc<A>, settings: Arc<S>, surface: Arc<B>) -> Self {
        Self {
            api,
            settings,
            surface,
        }
    }

    /// Executes the button's scene. Does nothing without an access token.
    pub async fn on_activate(&self, context: &ButtonContext, selector: &SceneSelector) {
        let Some(token) = self.settings.access_token() else {
            tracing::debug!(context = %context, "No access token, scene not executed");
            return;
        };

        tracing::debug!(scene_id = %selector.scene_id, "Executing scene");

        if let Err(e) = self.api.execute_scene(&selector.scene_id, &token).await {
            tracing::warn!(scene_id = %selector.scene_id, error = %e, "Scene execution failed");
            self.surface.show_alert(context);
        }
    }
}
