// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote API access.
//!
//! [`DeviceApi`] is the seam between the controllers and the cloud API. The
//! default implementation is [`HttpClient`] (feature `http`); tests and
//! alternative transports provide their own.
//!
//! # Error Classification
//!
//! Implementations never retry. Every failure is an [`ApiError`] whose
//! [`class`](ApiError::class) tells the caller whether the token was
//! rejected, the device is offline, the call may succeed later, or the
//! payload had an unexpected shape.

mod catalog;
#[cfg(feature = "http")]
mod http;

pub use catalog::{DeviceSummary, PagedResult, SceneSummary, SelectOption};
#[cfg(feature = "http")]
pub use http::{ApiConfig, HttpClient};

use std::future::Future;

use crate::command::DeviceCommand;
use crate::error::ApiError;
use crate::model::RemoteDeviceStatus;

/// Authenticated access to devices and scenes.
///
/// Methods return `Send` futures so that callers can drive them from
/// spawned polling tasks.
pub trait DeviceApi: Send + Sync + 'static {
    /// Fetches the status of a device (`GET /devices/{id}/status`).
    ///
    /// # Errors
    ///
    /// Returns a classified `ApiError` on transport or decoding failure.
    fn device_status(
        &self,
        device_id: &str,
        token: &str,
    ) -> impl Future<Output = Result<RemoteDeviceStatus, ApiError>> + Send;

    /// Sends one command to a device (`POST /devices/{id}/commands`).
    ///
    /// # Errors
    ///
    /// Returns a classified `ApiError` on transport failure.
    fn send_command(
        &self,
        device_id: &str,
        token: &str,
        command: &DeviceCommand,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Executes a scene (`POST /scenes/{id}/execute`).
    ///
    /// # Errors
    ///
    /// Returns a classified `ApiError` on transport failure.
    fn execute_scene(
        &self,
        scene_id: &str,
        token: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Lists the devices visible to the token (`GET /devices`).
    ///
    /// # Errors
    ///
    /// Returns a classified `ApiError` on transport or decoding failure.
    fn list_devices(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Vec<DeviceSummary>, ApiError>> + Send;

    /// Lists the scenes visible to the token (`GET /scenes`).
    ///
    /// # Errors
    ///
    /// Returns a classified `ApiError` on transport or decoding failure.
    fn list_scenes(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Vec<SceneSummary>, ApiError>> + Send;
}
