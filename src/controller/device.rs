// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device button controller.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::{ApiError, Error, ErrorClass};
use crate::model::{
    Activation, DisplayToken, NormalizedDeviceState, RemoteDeviceStatus, normalize,
    plan_activation,
};
use crate::protocol::DeviceApi;
use crate::scheduler::{PollFn, PollingConfig, PollingScheduler, poll_fn};
use crate::settings::{DeviceSelector, SettingsStore};
use crate::surface::{ButtonSurface, OFFLINE_TITLE};
use crate::types::ButtonContext;

/// Bookkeeping for a visible button.
#[derive(Debug)]
struct ButtonEntry {
    selector: DeviceSelector,
    /// Sequence number of the last state shown on the button.
    ///
    /// Starts at the controller's current sequence number, so results of
    /// fetches issued before the button (re)appeared are never applied.
    applied_seq: u64,
    /// The offline indicator is currently shown.
    offline: bool,
}

impl ButtonEntry {
    fn new(selector: DeviceSelector, floor: u64) -> Self {
        Self {
            selector,
            applied_seq: floor,
            offline: false,
        }
    }
}

/// What a settled fetch asks the surface to do.
enum Render {
    Display(DisplayToken),
    Offline,
}

/// Why a fetch happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchOrigin {
    /// First fetch after the button appeared.
    Appear,
    /// Timer tick or settings change.
    Refresh,
}

struct Inner<A, S, B> {
    api: Arc<A>,
    settings: Arc<S>,
    surface: Arc<B>,
    scheduler: PollingScheduler,
    buttons: Mutex<HashMap<ButtonContext, ButtonEntry>>,
    /// Last sequence number handed out. Shared by every button and never reset.
    seq: AtomicU64,
}

/// Keeps device buttons in sync with their remote devices.
///
/// Every visible button is polled in the background. A key press sends the
/// command planned by [`plan_activation`], shows the expected state right
/// away, and polls quickly for a while so the button converges on what the
/// device actually did.
///
/// Fetch results are applied in order of issue: a response that arrives after
/// a newer one (or after an optimistic update) is discarded.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use smartdeck_lib::controller::DeviceController;
/// use smartdeck_lib::protocol::HttpClient;
/// use smartdeck_lib::settings::{DeviceSelector, GlobalSettings, SettingsCache};
/// use smartdeck_lib::surface::ChannelSurface;
/// use smartdeck_lib::types::ButtonContext;
///
/// # async fn example() -> Result<(), smartdeck_lib::error::ApiError> {
/// let settings = Arc::new(SettingsCache::new());
/// settings.update(GlobalSettings::with_token("token"));
/// let (surface, _outbound) = ChannelSurface::channel();
///
/// let controller = DeviceController::new(
///     Arc::new(HttpClient::new()?),
///     settings,
///     Arc::new(surface),
/// );
///
/// let context = ButtonContext::from("button-1");
/// let selector = DeviceSelector::new("device-id");
/// controller.on_appear(&context, selector.clone());
/// controller.on_activate(&context, &selector).await;
/// # Ok(())
/// # }
/// ```
pub struct DeviceController<A, S, B> {
    inner: Arc<Inner<A, S, B>>,
}

impl<A, S, B> Clone for DeviceController<A, S, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S, B> std::fmt::Debug for DeviceController<A, S, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceController")
            .field("buttons", &self.inner.buttons.lock().len())
            .field("scheduler", &self.inner.scheduler)
            .finish_non_exhaustive()
    }
}

impl<A, S, B> DeviceController<A, S, B>
where
    A: DeviceApi,
    S: SettingsStore,
    B: ButtonSurface,
{
    /// Creates a controller with the default polling periods.
    #[must_use]
    pub fn new(api: Arc<A>, settings: Arc<S>, surface: Arc<B>) -> Self {
        Self::with_config(api, settings, surface, PollingConfig::default())
    }

    /// Creates a controller with custom polling periods.
    #[must_use]
    pub fn with_config(
        api: Arc<A>,
        settings: Arc<S>,
        surface: Arc<B>,
        config: PollingConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                settings,
                surface,
                scheduler: PollingScheduler::with_config(config),
                buttons: Mutex::new(HashMap::new()),
                seq: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the scheduler driving this controller's timers.
    #[must_use]
    pub fn scheduler(&self) -> &PollingScheduler {
        &self.inner.scheduler
    }

    /// Returns `true` if the button is visible and tracked.
    #[must_use]
    pub fn is_tracking(&self, context: &ButtonContext) -> bool {
        self.inner.buttons.lock().contains_key(context)
    }

    /// Returns the selector of a tracked button.
    #[must_use]
    pub fn selector(&self, context: &ButtonContext) -> Option<DeviceSelector> {
        self.inner
            .buttons
            .lock()
            .get(context)
            .map(|entry| entry.selector.clone())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Starts tracking a button that became visible.
    ///
    /// Registers the button and its normal polling, then returns. The first
    /// fetch runs in the background and renders when it lands; any failure
    /// of that fetch shows the offline indicator. Without an access token
    /// nothing is fetched.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_appear(&self, context: &ButtonContext, selector: DeviceSelector) {
        tracing::debug!(
            context = %context,
            device_id = %selector.device_id,
            "Button appeared"
        );

        {
            let mut buttons = self.inner.buttons.lock();
            let floor = self.inner.seq.load(Ordering::Relaxed);
            buttons.insert(context.clone(), ButtonEntry::new(selector, floor));
            self.inner
                .scheduler
                .start_normal(context, self.poller(context));
        }

        self.spawn_refresh(context, FetchOrigin::Appear);
    }

    /// Stops tracking a button. Safe to call for unknown buttons.
    pub fn on_disappear(&self, context: &ButtonContext) {
        let removed = self.inner.buttons.lock().remove(context).is_some();
        self.inner.scheduler.stop(context);

        if removed {
            tracing::debug!(context = %context, "Button disappeared");
        }
    }

    /// Applies new settings to a tracked button and refreshes it in the
    /// background.
    ///
    /// The polling cadence is left untouched.
    pub fn on_settings_changed(&self, context: &ButtonContext, selector: DeviceSelector) {
        {
            let mut buttons = self.inner.buttons.lock();
            let Some(entry) = buttons.get_mut(context) else {
                tracing::debug!(context = %context, "Settings for untracked button ignored");
                return;
            };
            entry.selector = selector;
        }

        self.spawn_refresh(context, FetchOrigin::Refresh);
    }

    /// Handles a key press.
    ///
    /// Untracked buttons (multi-actions) still send the command and show the
    /// expected state, but get no fast polling.
    pub async fn on_activate(&self, context: &ButtonContext, selector: &DeviceSelector) {
        let activation = match self.inner.activate(selector).await {
            Ok(activation) => activation,
            Err(Error::NoToken) => {
                tracing::debug!(context = %context, "No access token, key press ignored");
                return;
            }
            Err(Error::UnsupportedDevice) => {
                tracing::warn!(
                    device_id = %selector.device_id,
                    "Device exposes neither switch nor door control"
                );
                return;
            }
            Err(Error::Api(e)) if e.is_device_offline() => {
                tracing::warn!(device_id = %selector.device_id, error = %e, "Device offline");
                self.inner.show_offline(context);
                return;
            }
            Err(e) => {
                tracing::warn!(device_id = %selector.device_id, error = %e, "Key press failed");
                return;
            }
        };

        self.inner.apply_expected(context, &activation.expected);

        // Checked under the lock so a concurrent disappear cannot leak a timer.
        let buttons = self.inner.buttons.lock();
        if buttons.contains_key(context) {
            self.inner
                .scheduler
                .start_aggressive(context, self.poller(context));
        }
        drop(buttons);
    }

    fn spawn_refresh(&self, context: &ButtonContext, origin: FetchOrigin) {
        let inner: Weak<Inner<A, S, B>> = Arc::downgrade(&self.inner);
        let context = context.clone();

        tokio::spawn(async move {
            if let Some(inner) = inner.upgrade() {
                inner.refresh(&context, origin).await;
            }
        });
    }

    fn poller(&self, context: &ButtonContext) -> PollFn {
        let inner: Weak<Inner<A, S, B>> = Arc::downgrade(&self.inner);
        let context = context.clone();

        poll_fn(move || {
            let inner = inner.clone();
            let context = context.clone();
            async move {
                if let Some(inner) = inner.upgrade() {
                    inner.refresh(&context, FetchOrigin::Refresh).await;
                }
            }
        })
    }
}

impl<A, S, B> Inner<A, S, B>
where
    A: DeviceApi,
    S: SettingsStore,
    B: ButtonSurface,
{
    fn take_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Fetches and renders the state of a tracked button.
    async fn refresh(&self, context: &ButtonContext, origin: FetchOrigin) {
        let Some(token) = self.settings.access_token() else {
            tracing::trace!(context = %context, "No access token, skipping fetch");
            return;
        };

        let (device_id, seq) = {
            let mut buttons = self.buttons.lock();
            let Some(entry) = buttons.get_mut(context) else {
                return;
            };
            (entry.selector.device_id.clone(), self.take_seq())
        };

        let result = self.api.device_status(&device_id, &token).await;
        self.settle(context, seq, origin, result);
    }

    /// Applies a fetch result if it is still the newest one for the button.
    fn settle(
        &self,
        context: &ButtonContext,
        seq: u64,
        origin: FetchOrigin,
        result: Result<RemoteDeviceStatus, ApiError>,
    ) {
        let render = {
            let mut buttons = self.buttons.lock();
            let Some(entry) = buttons.get_mut(context) else {
                tracing::trace!(context = %context, "Button gone, dropping fetch result");
                return;
            };
            if seq <= entry.applied_seq {
                tracing::debug!(
                    context = %context,
                    seq,
                    applied = entry.applied_seq,
                    "Discarding stale fetch result"
                );
                return;
            }

            match result {
                Ok(status) => {
                    let state = normalize(&status);
                    let Some(token) = state.display() else {
                        tracing::warn!(
                            device_id = %entry.selector.device_id,
                            "Device exposes neither switch nor door control"
                        );
                        return;
                    };
                    entry.applied_seq = seq;
                    entry.offline = false;
                    Render::Display(token)
                }
                Err(e) => {
                    let show = e.is_device_offline() || origin == FetchOrigin::Appear;
                    log_fetch_error(&entry.selector.device_id, &e);
                    if !show || entry.offline {
                        return;
                    }
                    entry.applied_seq = seq;
                    entry.offline = true;
                    Render::Offline
                }
            }
        };

        match render {
            Render::Display(token) => self.render(context, &token),
            Render::Offline => self.render_offline(context),
        }
    }

    /// Fetches the status, plans the key press, and sends the command.
    async fn activate(&self, selector: &DeviceSelector) -> Result<Activation, Error> {
        let token = self.settings.access_token().ok_or(Error::NoToken)?;

        let status = self.api.device_status(&selector.device_id, &token).await?;
        let state = normalize(&status);
        let activation =
            plan_activation(&state, selector.behaviour()).ok_or(Error::UnsupportedDevice)?;

        tracing::debug!(
            device_id = %selector.device_id,
            command = %activation.command,
            "Sending key press command"
        );

        self.api
            .send_command(&selector.device_id, &token, &activation.command)
            .await?;

        Ok(activation)
    }

    /// Shows the state a command is expected to produce.
    fn apply_expected(&self, context: &ButtonContext, expected: &NormalizedDeviceState) {
        let Some(token) = expected.display() else {
            return;
        };

        if let Some(entry) = self.buttons.lock().get_mut(context) {
            entry.applied_seq = self.take_seq();
            entry.offline = false;
        }

        self.render(context, &token);
    }

    /// Shows the offline indicator outside of the polling episode tracking.
    fn show_offline(&self, context: &ButtonContext) {
        if let Some(entry) = self.buttons.lock().get_mut(context) {
            entry.offline = true;
        }
        self.render_offline(context);
    }

    fn render(&self, context: &ButtonContext, token: &DisplayToken) {
        self.surface.set_state(token.state, context);
        self.surface.set_title(&token.title, context);
    }

    fn render_offline(&self, context: &ButtonContext) {
        self.surface.show_alert(context);
        self.surface.set_title(OFFLINE_TITLE, context);
    }
}

fn log_fetch_error(device_id: &str, error: &ApiError) {
    match error.class() {
        ErrorClass::DeviceOffline => {
            tracing::info!(device_id = %device_id, error = %error, "Device offline");
        }
        ErrorClass::Unauthorized => {
            tracing::warn!(device_id = %device_id, error = %error, "Access token rejected");
        }
        ErrorClass::Malformed => {
            tracing::warn!(device_id = %device_id, error = %error, "Unexpected status payload");
        }
        ErrorClass::Transient => {
            tracing::debug!(device_id = %device_id, error = %error, "Status fetch failed");
        }
    }
}
