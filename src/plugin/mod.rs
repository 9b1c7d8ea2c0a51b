// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host event dispatch.
//!
//! [`Plugin`] is the entry point for the websocket reader: it decodes each
//! host message and routes it to the device or scene controller. Outbound
//! messages flow through the [`ButtonSurface`] handed to it.
//!
//! Dispatch never waits on the network. Fetches and key presses run on
//! spawned tasks, so one slow device cannot hold up the events behind it.

mod event;

pub use event::{
    ActionKind, ButtonEvent, ButtonEventKind, DEVICE_ACTION, HostEvent, SCENE_ACTION,
};

use std::sync::Arc;

use crate::controller::{DeviceController, SceneController};
use crate::error::{Error, ParseError};
use crate::protocol::{DeviceApi, SelectOption};
use crate::scheduler::PollingConfig;
use crate::settings::{DeviceSettings, SceneSettings, SettingsCache, SettingsStore};
use crate::surface::ButtonSurface;

/// The plugin: settings cache plus one controller per action.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use smartdeck_lib::plugin::Plugin;
/// use smartdeck_lib::protocol::HttpClient;
/// use smartdeck_lib::surface::ChannelSurface;
///
/// # async fn example(messages: Vec<String>) -> smartdeck_lib::Result<()> {
/// let (surface, mut outbound) = ChannelSurface::channel();
/// let plugin = Plugin::new(Arc::new(HttpClient::new()?), Arc::new(surface));
///
/// tokio::spawn(async move {
///     while let Some(message) = outbound.recv().await {
///         // write message.to_json() to the websocket
///         let _ = message;
///     }
/// });
///
/// for raw in &messages {
///     plugin.handle_message(raw)?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct Plugin<A, B> {
    api: Arc<A>,
    settings: Arc<SettingsCache>,
    devices: DeviceController<A, SettingsCache, B>,
    scenes: SceneController<A, SettingsCache, B>,
}

impl<A, B> std::fmt::Debug for Plugin<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("devices", &self.devices)
            .finish_non_exhaustive()
    }
}

impl<A, B> Plugin<A, B>
where
    A: DeviceApi,
    B: ButtonSurface,
{
    /// Creates a plugin with the default polling periods.
    #[must_use]
    pub fn new(api: Arc<A>, surface: Arc<B>) -> Self {
        Self::with_config(api, surface, PollingConfig::default())
    }

    /// Creates a plugin with custom polling periods.
    #[must_use]
    pub fn with_config(api: Arc<A>, surface: Arc<B>, config: PollingConfig) -> Self {
        let settings = Arc::new(SettingsCache::new());
        Self {
            devices: DeviceController::with_config(
                Arc::clone(&api),
                Arc::clone(&settings),
                Arc::clone(&surface),
                config,
            ),
            scenes: SceneController::new(Arc::clone(&api), Arc::clone(&settings), surface),
            settings,
            api,
        }
    }

    /// Returns the global settings cache.
    #[must_use]
    pub fn settings(&self) -> &Arc<SettingsCache> {
        &self.settings
    }

    /// Returns the device controller.
    #[must_use]
    pub fn devices(&self) -> &DeviceController<A, SettingsCache, B> {
        &self.devices
    }

    /// Decodes and handles one raw host message.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the message cannot be decoded.
    pub fn handle_message(&self, raw: &str) -> Result<(), ParseError> {
        let event = HostEvent::from_json(raw)?;
        self.handle(event);
        Ok(())
    }

    /// Handles a decoded host event.
    ///
    /// Returns without waiting for any remote call. Must be called from
    /// within a Tokio runtime.
    pub fn handle(&self, event: HostEvent) {
        match event {
            HostEvent::GlobalSettings(settings) => {
                tracing::debug!(
                    has_token = settings.access_token().is_some(),
                    "Global settings received"
                );
                self.settings.update(settings);
            }
            HostEvent::Button(event) => match event.action {
                ActionKind::Device => self.handle_device(&event),
                ActionKind::Scene => self.handle_scene(&event),
            },
            HostEvent::Unhandled { event } => {
                tracing::debug!(event = %event, "Ignoring host event");
            }
        }
    }

    fn handle_device(&self, event: &ButtonEvent) {
        let context = &event.context;

        if event.kind == ButtonEventKind::WillDisappear {
            self.devices.on_disappear(context);
            return;
        }

        let selector = event.settings_as::<DeviceSettings>().selector();
        match (event.kind, selector) {
            (ButtonEventKind::WillAppear, Some(selector)) => {
                self.devices.on_appear(context, selector);
            }
            (ButtonEventKind::DidReceiveSettings, Some(selector)) => {
                if self.devices.is_tracking(context) {
                    self.devices.on_settings_changed(context, selector);
                } else {
                    self.devices.on_appear(context, selector);
                }
            }
            (ButtonEventKind::DidReceiveSettings, None) => {
                // Device cleared in the property inspector.
                self.devices.on_disappear(context);
            }
            (ButtonEventKind::KeyUp, Some(selector)) => {
                let devices = self.devices.clone();
                let context = context.clone();
                tokio::spawn(async move {
                    devices.on_activate(&context, &selector).await;
                });
            }
            (kind, _) => {
                tracing::debug!(context = %context, ?kind, "Device button not configured");
            }
        }
    }

    fn handle_scene(&self, event: &ButtonEvent) {
        if event.kind != ButtonEventKind::KeyUp {
            return;
        }

        match event.settings_as::<SceneSettings>().selector() {
            Some(selector) => {
                let scenes = self.scenes.clone();
                let context = event.context.clone();
                tokio::spawn(async move {
                    scenes.on_activate(&context, &selector).await;
                });
            }
            None => {
                tracing::debug!(context = %event.context, "Scene button not configured");
            }
        }
    }

    // =========================================================================
    // Property inspector
    // =========================================================================

    /// Lists the devices for the property inspector's select box.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoToken` without an access token, or `Error::Api` if
    /// the listing fails.
    pub async fn device_options(&self) -> Result<Vec<SelectOption>, Error> {
        let token = self.settings.access_token().ok_or(Error::NoToken)?;
        let devices = self.api.list_devices(&token).await?;
        Ok(devices.iter().filter_map(SelectOption::from_device).collect())
    }

    /// Lists the scenes for the property inspector's select box.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoToken` without an access token, or `Error::Api` if
    /// the listing fails.
    pub async fn scene_options(&self) -> Result<Vec<SelectOption>, Error> {
        let token = self.settings.access_token().ok_or(Error::NoToken)?;
        let scenes = self.api.list_scenes(&token).await?;
        Ok(scenes.iter().filter_map(SelectOption::from_scene).collect())
    }
}
