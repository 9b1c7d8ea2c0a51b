// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-button polling timers.
//!
//! Every visible button owns at most one repeating timer. It normally fires
//! every five seconds. After a key press the button switches to a fast
//! cadence for a short window so the icon catches up with slow devices (a
//! garage door takes several seconds to move), then falls back to the normal
//! cadence on its own.
//!
//! # Liveness
//!
//! Each installed timer carries a generation number. A timer task checks that
//! its generation is still the one registered for its button before every
//! poll, so a timer that was replaced or stopped never polls again even if it
//! was already past its tick when the replacement happened. Timer tasks only
//! hold a weak reference to the registry: dropping the last
//! [`PollingScheduler`] handle aborts everything.
//!
//! # Examples
//!
//! ```
//! use smartdeck_lib::scheduler::{Cadence, PollingScheduler, poll_fn};
//! use smartdeck_lib::types::ButtonContext;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let scheduler = PollingScheduler::new();
//! let context = ButtonContext::from("button-1");
//! let poll = poll_fn(|| async { /* fetch and render */ });
//!
//! scheduler.start_aggressive(&context, poll);
//! assert_eq!(scheduler.cadence(&context), Some(Cadence::Aggressive));
//!
//! scheduler.stop(&context);
//! assert!(!scheduler.is_scheduled(&context));
//! # }
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::types::ButtonContext;

/// Future of a single poll.
pub type PollFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// One poll of a button: fetch the device state and render it.
pub type PollFn = Arc<dyn Fn() -> PollFuture + Send + Sync>;

/// Wraps an async closure into a [`PollFn`].
#[must_use]
pub fn poll_fn<F, Fut>(f: F) -> PollFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || -> PollFuture { Box::pin(f()) })
}

/// Polling speed of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    /// Background refresh.
    Normal,
    /// Fast refresh right after a key press.
    Aggressive,
}

// ============================================================================
// PollingConfig
// ============================================================================

/// Timer periods of the scheduler.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::scheduler::PollingConfig;
/// use std::time::Duration;
///
/// let config = PollingConfig::default().with_aggressive_window(Duration::from_secs(20));
/// assert_eq!(config.normal_interval(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    normal_interval: Duration,
    aggressive_interval: Duration,
    aggressive_window: Duration,
}

impl PollingConfig {
    /// Default period of the background refresh.
    pub const DEFAULT_NORMAL_INTERVAL: Duration = Duration::from_secs(5);
    /// Default period of the fast refresh.
    pub const DEFAULT_AGGRESSIVE_INTERVAL: Duration = Duration::from_millis(500);
    /// Default length of the fast refresh window.
    pub const DEFAULT_AGGRESSIVE_WINDOW: Duration = Duration::from_secs(10);

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            normal_interval: Self::DEFAULT_NORMAL_INTERVAL,
            aggressive_interval: Self::DEFAULT_AGGRESSIVE_INTERVAL,
            aggressive_window: Self::DEFAULT_AGGRESSIVE_WINDOW,
        }
    }

    /// Sets the background refresh period.
    #[must_use]
    pub fn with_normal_interval(mut self, interval: Duration) -> Self {
        self.normal_interval = interval;
        self
    }

    /// Sets the fast refresh period.
    #[must_use]
    pub fn with_aggressive_interval(mut self, interval: Duration) -> Self {
        self.aggressive_interval = interval;
        self
    }

    /// Sets how long the fast refresh lasts.
    #[must_use]
    pub fn with_aggressive_window(mut self, window: Duration) -> Self {
        self.aggressive_window = window;
        self
    }

    /// Returns the background refresh period.
    #[must_use]
    pub fn normal_interval(&self) -> Duration {
        self.normal_interval
    }

    /// Returns the fast refresh period.
    #[must_use]
    pub fn aggressive_interval(&self) -> Duration {
        self.aggressive_interval
    }

    /// Returns how long the fast refresh lasts.
    #[must_use]
    pub fn aggressive_window(&self) -> Duration {
        self.aggressive_window
    }

    fn interval(&self, cadence: Cadence) -> Duration {
        match cadence {
            Cadence::Normal => self.normal_interval,
            Cadence::Aggressive => self.aggressive_interval,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PollingScheduler
// ============================================================================

struct PollingEntry {
    cadence: Cadence,
    generation: u64,
    poll: PollFn,
    timer: JoinHandle<()>,
    downgrade: Option<JoinHandle<()>>,
}

impl Drop for PollingEntry {
    fn drop(&mut self) {
        self.timer.abort();
        if let Some(downgrade) = self.downgrade.take() {
            downgrade.abort();
        }
    }
}

#[derive(Default)]
struct Registry {
    entries: HashMap<ButtonContext, PollingEntry>,
    next_generation: u64,
}

impl Registry {
    fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    fn is_current(&self, context: &ButtonContext, generation: u64) -> bool {
        self.entries
            .get(context)
            .is_some_and(|entry| entry.generation == generation)
    }
}

/// Registry of polling timers keyed by button.
///
/// Cloning yields another handle to the same registry. All methods must be
/// called from within a Tokio runtime.
#[derive(Clone)]
pub struct PollingScheduler {
    config: PollingConfig,
    registry: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for PollingScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingScheduler")
            .field("config", &self.config)
            .field("scheduled", &self.len())
            .finish_non_exhaustive()
    }
}

impl Default for PollingScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PollingScheduler {
    /// Creates a scheduler with the default periods.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PollingConfig::default())
    }

    /// Creates a scheduler with custom periods.
    #[must_use]
    pub fn with_config(config: PollingConfig) -> Self {
        Self {
            config,
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// Returns the timer periods.
    #[must_use]
    pub fn config(&self) -> PollingConfig {
        self.config
    }

    /// Installs a normal-cadence timer for the button, replacing any timer
    /// and pending downgrade it had.
    ///
    /// The first poll happens one period from now.
    pub fn start_normal(&self, context: &ButtonContext, poll: PollFn) {
        let mut registry = self.registry.lock();
        let generation = registry.bump_generation();
        let timer = self.spawn_timer(context, generation, Cadence::Normal, Arc::clone(&poll));

        // Inserting drops (and so aborts) the previous entry.
        registry.entries.insert(
            context.clone(),
            PollingEntry {
                cadence: Cadence::Normal,
                generation,
                poll,
                timer,
                downgrade: None,
            },
        );

        tracing::debug!(context = %context, "Normal polling started");
    }

    /// Installs a fast timer for the button and schedules the return to the
    /// normal cadence.
    ///
    /// Calling this again while a window is open restarts the window; timers
    /// never stack.
    pub fn start_aggressive(&self, context: &ButtonContext, poll: PollFn) {
        let mut registry = self.registry.lock();
        let generation = registry.bump_generation();
        let timer = self.spawn_timer(
            context,
            generation,
            Cadence::Aggressive,
            Arc::clone(&poll),
        );
        let downgrade = self.spawn_downgrade(context, generation);

        registry.entries.insert(
            context.clone(),
            PollingEntry {
                cadence: Cadence::Aggressive,
                generation,
                poll,
                timer,
                downgrade: Some(downgrade),
            },
        );

        tracing::debug!(
            context = %context,
            window_ms = self.config.aggressive_window.as_millis(),
            "Aggressive polling started"
        );
    }

    /// Cancels the button's timer and pending downgrade.
    ///
    /// Returns `false` if nothing was scheduled.
    pub fn stop(&self, context: &ButtonContext) -> bool {
        let removed = self.registry.lock().entries.remove(context);
        let stopped = removed.is_some();
        drop(removed);

        if stopped {
            tracing::debug!(context = %context, "Polling stopped");
        }
        stopped
    }

    /// Cancels every timer.
    pub fn stop_all(&self) {
        let entries = std::mem::take(&mut self.registry.lock().entries);
        tracing::debug!(count = entries.len(), "Stopping all polling");
        drop(entries);
    }

    /// Returns the button's current cadence.
    #[must_use]
    pub fn cadence(&self, context: &ButtonContext) -> Option<Cadence> {
        self.registry
            .lock()
            .entries
            .get(context)
            .map(|entry| entry.cadence)
    }

    /// Returns `true` if the button has a timer.
    #[must_use]
    pub fn is_scheduled(&self, context: &ButtonContext) -> bool {
        self.registry.lock().entries.contains_key(context)
    }

    /// Returns `true` if the button is waiting to fall back to normal polling.
    #[must_use]
    pub fn has_pending_downgrade(&self, context: &ButtonContext) -> bool {
        self.registry
            .lock()
            .entries
            .get(context)
            .is_some_and(|entry| entry.downgrade.is_some())
    }

    /// Returns the number of buttons with a timer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.lock().entries.len()
    }

    /// Returns `true` if no button has a timer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.lock().entries.is_empty()
    }

    fn spawn_timer(
        &self,
        context: &ButtonContext,
        generation: u64,
        cadence: Cadence,
        poll: PollFn,
    ) -> JoinHandle<()> {
        let registry = Arc::downgrade(&self.registry);
        let context = context.clone();
        let period = self.config.interval(cadence);
        let first_tick = Instant::now() + period;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if !still_current(&registry, &context, generation) {
                    tracing::trace!(context = %context, "Superseded timer exiting");
                    break;
                }

                poll().await;
            }
        })
    }

    fn spawn_downgrade(&self, context: &ButtonContext, generation: u64) -> JoinHandle<()> {
        let registry = Arc::downgrade(&self.registry);
        let context = context.clone();
        let scheduler_config = self.config;

        tokio::spawn(async move {
            time::sleep(scheduler_config.aggressive_window).await;

            let Some(registry) = registry.upgrade() else {
                return;
            };
            let handle = PollingScheduler {
                config: scheduler_config,
                registry,
            };
            handle.downgrade(&context, generation);
        })
    }

    /// Swaps the aggressive timer identified by `generation` for a normal one.
    fn downgrade(&self, context: &ButtonContext, generation: u64) {
        let mut guard = self.registry.lock();
        if !guard.is_current(context, generation) {
            return;
        }

        let next_generation = guard.bump_generation();
        let Some(entry) = guard.entries.get_mut(context) else {
            return;
        };

        // This task is the downgrade; detach rather than abort it.
        drop(entry.downgrade.take());

        let timer = self.spawn_timer(
            context,
            next_generation,
            Cadence::Normal,
            Arc::clone(&entry.poll),
        );
        std::mem::replace(&mut entry.timer, timer).abort();
        entry.cadence = Cadence::Normal;
        entry.generation = next_generation;

        tracing::debug!(context = %context, "Aggressive window elapsed, back to normal polling");
    }
}

fn still_current(
    registry: &Weak<Mutex<Registry>>,
    context: &ButtonContext,
    generation: u64,
) -> bool {
    registry
        .upgrade()
        .is_some_and(|registry| registry.lock().is_current(context, generation))
}
