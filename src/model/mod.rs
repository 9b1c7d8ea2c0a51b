// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state model.
//!
//! Pure mappings with no I/O:
//!
//! - [`RemoteDeviceStatus`] parses the raw status document
//! - [`normalize`] reduces it to a [`NormalizedDeviceState`]
//! - [`NormalizedDeviceState::display`] yields the button's [`DisplayToken`]
//! - [`plan_activation`] decides what a key press sends

mod activation;
mod state;
mod status;

pub use activation::{Activation, plan_activation};
pub use state::{DeviceKind, DisplayToken, NormalizedDeviceState, StateIndex, normalize};
pub use status::RemoteDeviceStatus;
