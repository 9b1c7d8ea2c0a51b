// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the library.
//!
//! - [`ButtonContext`] - Opaque id of one visible button
//! - [`Behaviour`] - Toggle / more / less key-press semantics
//! - [`Level`] - Dimming level (0-100%) with saturating steps

mod behaviour;
mod context;
mod level;

pub use behaviour::Behaviour;
pub use context::ButtonContext;
pub use level::Level;
