// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `SmartDeck` Lib - keeps Stream Deck buttons in sync with `SmartThings`
//! devices and scenes.
//!
//! Each visible button mirrors the state of one remote device. The library
//! polls the device in the background, sends a command when the key is
//! pressed, shows the expected result immediately, and polls faster for a
//! short while so the button converges on what the device actually did.
//!
//! # Supported Devices
//!
//! - **Switches**: on/off (`switch` capability)
//! - **Lights**: on/off plus level steps (`switch` and `switchLevel`)
//! - **Garage doors**: open/close (`doorControl`)
//! - **Scenes**: execute on key press
//!
//! # Architecture
//!
//! - [`model`]: pure mapping from the raw status to a normalized state, a
//!   button display, and a key-press plan
//! - [`scheduler`]: per-button polling timers with an aggressive window
//! - [`controller`]: lifecycle handling for device and scene buttons
//! - [`protocol`]: the remote API seam and its HTTP implementation
//! - [`plugin`]: host event decoding and dispatch
//! - [`surface`]: button outputs and the host wire format
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use smartdeck_lib::plugin::Plugin;
//! use smartdeck_lib::protocol::HttpClient;
//! use smartdeck_lib::surface::ChannelSurface;
//!
//! #[tokio::main]
//! async fn main() -> smartdeck_lib::Result<()> {
//!     let (surface, mut outbound) = ChannelSurface::channel();
//!     let plugin = Plugin::new(Arc::new(HttpClient::new()?), Arc::new(surface));
//!
//!     plugin.handle_message(
//!         r#"{"event":"didReceiveGlobalSettings","payload":{"settings":{"accessToken":"token"}}}"#,
//!     )?;
//!     plugin.handle_message(
//!         r#"{
//!             "event": "willAppear",
//!             "action": "com.thibautsabot.streamdeck.device",
//!             "context": "button-1",
//!             "payload": {"settings": {"deviceId": "device-id"}}
//!         }"#,
//!     )?;
//!
//!     while let Some(message) = outbound.recv().await {
//!         println!("{}", message.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! - `http` (default): [`protocol::HttpClient`] backed by `reqwest`

pub mod command;
pub mod controller;
pub mod error;
pub mod model;
pub mod plugin;
pub mod protocol;
pub mod scheduler;
pub mod settings;
pub mod surface;
pub mod types;

pub use command::{Capability, DeviceCommand};
pub use controller::{DeviceController, SceneController};
pub use error::{ApiError, Error, ErrorClass, ParseError, Result, ValueError};
pub use model::{DeviceKind, NormalizedDeviceState, RemoteDeviceStatus};
pub use plugin::Plugin;
#[cfg(feature = "http")]
pub use protocol::{ApiConfig, HttpClient};
pub use protocol::{DeviceApi, SelectOption};
pub use scheduler::{Cadence, PollFn, PollingConfig, PollingScheduler};
pub use settings::{DeviceSelector, GlobalSettings, SceneSelector, SettingsCache, SettingsStore};
pub use surface::{ButtonSurface, ChannelSurface, OutboundMessage};
pub use types::{Behaviour, ButtonContext, Level};
