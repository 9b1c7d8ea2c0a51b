// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recording fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};
use smartdeck_lib::command::DeviceCommand;
use smartdeck_lib::error::ApiError;
use smartdeck_lib::model::{RemoteDeviceStatus, StateIndex};
use smartdeck_lib::protocol::{DeviceApi, DeviceSummary, SceneSummary};
use smartdeck_lib::surface::ButtonSurface;
use smartdeck_lib::types::ButtonContext;

// ============================================================================
// Status payloads
// ============================================================================

pub fn switch_status(on: bool) -> Value {
    json!({"components": {"main": {
        "switch": {"switch": {"value": if on { "on" } else { "off" }}}
    }}})
}

pub fn light_status(on: bool, level: u8) -> Value {
    json!({"components": {"main": {
        "switch": {"switch": {"value": if on { "on" } else { "off" }}},
        "switchLevel": {"level": {"value": level, "unit": "%"}}
    }}})
}

pub fn door_status(door: &str) -> Value {
    json!({"components": {"main": {
        "doorControl": {"door": {"value": door}}
    }}})
}

pub fn unsupported_status() -> Value {
    json!({"components": {"main": {
        "battery": {"battery": {"value": 80}}
    }}})
}

// ============================================================================
// FakeApi
// ============================================================================

/// Canned answer of the fake API.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(Value),
    Ok,
    Offline,
    Unauthorized,
    Server,
}

impl Reply {
    fn error(&self) -> Option<ApiError> {
        match self {
            Self::Status(_) | Self::Ok => None,
            Self::Offline => Some(ApiError::DeviceOffline { status: 424 }),
            Self::Unauthorized => Some(ApiError::Unauthorized { status: 401 }),
            Self::Server => Some(ApiError::Server { status: 500 }),
        }
    }

    fn status(&self) -> Result<RemoteDeviceStatus, ApiError> {
        if let Some(e) = self.error() {
            return Err(e);
        }
        match self {
            Self::Status(value) => serde_json::from_value(value.clone())
                .map_err(|e| ApiError::Malformed(e.to_string())),
            _ => Err(ApiError::Malformed("no status body".to_string())),
        }
    }

    fn unit(&self) -> Result<(), ApiError> {
        self.error().map_or(Ok(()), Err)
    }
}

/// A call received by the fake API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Status(String),
    Command(String, DeviceCommand),
    Scene(String),
    ListDevices,
    ListScenes,
}

/// Scripted [`DeviceApi`] recording every call.
#[derive(Debug)]
pub struct FakeApi {
    status: Mutex<Reply>,
    queued: Mutex<VecDeque<(Duration, Reply)>>,
    command_reply: Mutex<Reply>,
    scene_reply: Mutex<Reply>,
    devices: Mutex<Vec<DeviceSummary>>,
    scenes: Mutex<Vec<SceneSummary>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    pub fn new(status: Value) -> Self {
        Self {
            status: Mutex::new(Reply::Status(status)),
            queued: Mutex::new(VecDeque::new()),
            command_reply: Mutex::new(Reply::Ok),
            scene_reply: Mutex::new(Reply::Ok),
            devices: Mutex::new(Vec::new()),
            scenes: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sets the answer of every status fetch not covered by the queue.
    pub fn set_status(&self, reply: Reply) {
        *self.status.lock() = reply;
    }

    /// Queues a one-off status answer delivered after `delay`.
    pub fn push_status(&self, delay: Duration, reply: Reply) {
        self.queued.lock().push_back((delay, reply));
    }

    pub fn set_command_reply(&self, reply: Reply) {
        *self.command_reply.lock() = reply;
    }

    pub fn set_scene_reply(&self, reply: Reply) {
        *self.scene_reply.lock() = reply;
    }

    pub fn set_devices(&self, devices: Vec<DeviceSummary>) {
        *self.devices.lock() = devices;
    }

    pub fn set_scenes(&self, scenes: Vec<SceneSummary>) {
        *self.scenes.lock() = scenes;
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    pub fn status_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, ApiCall::Status(_)))
            .count()
    }

    pub fn commands(&self) -> Vec<(String, DeviceCommand)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ApiCall::Command(id, command) => Some((id.clone(), command.clone())),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().push(call);
    }
}

impl DeviceApi for FakeApi {
    async fn device_status(
        &self,
        device_id: &str,
        _token: &str,
    ) -> Result<RemoteDeviceStatus, ApiError> {
        self.record(ApiCall::Status(device_id.to_string()));

        let queued = self.queued.lock().pop_front();
        let (delay, reply) = queued.unwrap_or_else(|| (Duration::ZERO, self.status.lock().clone()));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.status()
    }

    async fn send_command(
        &self,
        device_id: &str,
        _token: &str,
        command: &DeviceCommand,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::Command(device_id.to_string(), command.clone()));
        let reply = self.command_reply.lock().clone();
        reply.unit()
    }

    async fn execute_scene(&self, scene_id: &str, _token: &str) -> Result<(), ApiError> {
        self.record(ApiCall::Scene(scene_id.to_string()));
        let reply = self.scene_reply.lock().clone();
        reply.unit()
    }

    async fn list_devices(&self, _token: &str) -> Result<Vec<DeviceSummary>, ApiError> {
        self.record(ApiCall::ListDevices);
        Ok(self.devices.lock().clone())
    }

    async fn list_scenes(&self, _token: &str) -> Result<Vec<SceneSummary>, ApiError> {
        self.record(ApiCall::ListScenes);
        Ok(self.scenes.lock().clone())
    }
}

// ============================================================================
// RecordingSurface
// ============================================================================

/// A call received by the recording surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    State(ButtonContext, StateIndex),
    Title(ButtonContext, String),
    Alert(ButtonContext),
}

/// [`ButtonSurface`] that records every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn alerts(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, SurfaceCall::Alert(_)))
            .count()
    }

    pub fn states(&self) -> Vec<StateIndex> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::State(_, state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Title(_, title) => Some(title.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ButtonSurface for RecordingSurface {
    fn set_state(&self, state: StateIndex, context: &ButtonContext) {
        self.calls
            .lock()
            .push(SurfaceCall::State(context.clone(), state));
    }

    fn set_title(&self, title: &str, context: &ButtonContext) {
        self.calls
            .lock()
            .push(SurfaceCall::Title(context.clone(), title.to_string()));
    }

    fn show_alert(&self, context: &ButtonContext) {
        self.calls.lock().push(SurfaceCall::Alert(context.clone()));
    }
}
