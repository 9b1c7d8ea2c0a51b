// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button controllers.
//!
//! A controller reacts to host lifecycle events for one kind of action and
//! drives its buttons through a [`ButtonSurface`](crate::surface::ButtonSurface).
//!
//! - [`DeviceController`] mirrors a device's state on its buttons, polling the
//!   remote API and sending commands on key press.
//! - [`SceneController`] executes a scene on key press.
//!
//! Neither controller ever returns an error to its caller: failures end up as
//! a log line or a visible indicator on the button.

mod device;
mod scene;

pub use device::DeviceController;
pub use scene::SceneController;
