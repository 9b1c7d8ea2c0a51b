// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host event dispatch through the plugin.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ApiCall, FakeApi, RecordingSurface, Reply, SurfaceCall, switch_status};
use serde_json::json;
use smartdeck_lib::Error;
use smartdeck_lib::error::ParseError;
use smartdeck_lib::model::StateIndex;
use smartdeck_lib::plugin::{DEVICE_ACTION, Plugin, SCENE_ACTION};
use smartdeck_lib::protocol::{DeviceSummary, SceneSummary, SelectOption};
use smartdeck_lib::settings::SettingsStore;
use smartdeck_lib::types::ButtonContext;
use tokio::time::{Instant, sleep};

type TestPlugin = Plugin<FakeApi, RecordingSurface>;

fn plugin() -> (TestPlugin, Arc<FakeApi>, Arc<RecordingSurface>) {
    let api = Arc::new(FakeApi::new(switch_status(true)));
    let surface = Arc::new(RecordingSurface::new());
    let plugin = Plugin::new(Arc::clone(&api), Arc::clone(&surface));
    (plugin, api, surface)
}

fn message(event: &str, action: &str, context: &str, settings: serde_json::Value) -> String {
    json!({
        "event": event,
        "action": action,
        "context": context,
        "device": "DECK",
        "payload": {"settings": settings}
    })
    .to_string()
}

fn with_token(plugin: &TestPlugin) {
    plugin
        .handle_message(
            r#"{"event":"didReceiveGlobalSettings","payload":{"settings":{"accessToken":"tok"}}}"#,
        )
        .unwrap();
}

/// Lets spawned fetches and key presses with no reply delay finish.
async fn settle() {
    sleep(Duration::from_millis(1)).await;
}

// ============================================================================
// Settings
// ============================================================================

mod settings {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn global_settings_update_cache() {
        let (plugin, _, _) = plugin();
        assert_eq!(plugin.settings().access_token(), None);

        with_token(&plugin);
        assert_eq!(plugin.settings().access_token().as_deref(), Some("tok"));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_json_is_an_error() {
        let (plugin, api, _) = plugin();

        let result = plugin.handle_message("not json");

        assert!(matches!(result, Err(ParseError::Json(_))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_events_are_ignored() {
        let (plugin, api, surface) = plugin();
        with_token(&plugin);

        plugin
            .handle_message(r#"{"event":"deviceDidConnect","device":"DECK"}"#)
            .unwrap();
        plugin
            .handle_message(&message("keyUp", "com.other.action", "c1", json!({})))
            .unwrap();

        assert!(api.calls().is_empty());
        assert!(surface.calls().is_empty());
    }
}

// ============================================================================
// Device buttons
// ============================================================================

mod devices {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn will_appear_starts_tracking() {
        let (plugin, api, surface) = plugin();
        with_token(&plugin);

        plugin
            .handle_message(&message(
                "willAppear",
                DEVICE_ACTION,
                "c1",
                json!({"deviceId": "d1"}),
            ))
            .unwrap();
        settle().await;

        let context = ButtonContext::from("c1");
        assert!(plugin.devices().is_tracking(&context));
        assert_eq!(api.calls(), vec![ApiCall::Status("d1".to_string())]);
        assert_eq!(surface.states().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_device_does_not_hold_up_later_events() {
        let (plugin, api, surface) = plugin();
        with_token(&plugin);
        api.push_status(Duration::from_secs(10), Reply::Offline);
        let slow = ButtonContext::from("c1");
        let other = ButtonContext::from("c2");

        let started = Instant::now();
        plugin
            .handle_message(&message("willAppear", DEVICE_ACTION, "c1", json!({"deviceId": "d1"})))
            .unwrap();
        plugin
            .handle_message(&message("willAppear", DEVICE_ACTION, "c2", json!({"deviceId": "d2"})))
            .unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);

        settle().await;
        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::State(other.clone(), StateIndex::Active),
                SurfaceCall::Title(other.clone(), String::new()),
            ]
        );

        // The first fetch is still in flight.
        plugin
            .handle_message(&message("willDisappear", DEVICE_ACTION, "c1", json!({"deviceId": "d1"})))
            .unwrap();
        assert!(!plugin.devices().is_tracking(&slow));
        assert!(plugin.devices().is_tracking(&other));

        sleep(Duration::from_secs(10)).await;
        assert_eq!(surface.alerts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unconfigured_button_is_not_tracked() {
        let (plugin, api, _) = plugin();
        with_token(&plugin);

        plugin
            .handle_message(&message(
                "willAppear",
                DEVICE_ACTION,
                "c1",
                json!({"deviceId": "none"}),
            ))
            .unwrap();

        assert!(!plugin.devices().is_tracking(&ButtonContext::from("c1")));
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn will_disappear_stops_tracking() {
        let (plugin, _, _) = plugin();
        with_token(&plugin);
        let appear = message("willAppear", DEVICE_ACTION, "c1", json!({"deviceId": "d1"}));
        let disappear = message("willDisappear", DEVICE_ACTION, "c1", json!({"deviceId": "d1"}));

        plugin.handle_message(&appear).unwrap();
        plugin.handle_message(&disappear).unwrap();

        assert!(!plugin.devices().is_tracking(&ButtonContext::from("c1")));
        assert!(plugin.devices().scheduler().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn configuring_device_starts_tracking() {
        let (plugin, api, _) = plugin();
        with_token(&plugin);
        let context = ButtonContext::from("c1");

        plugin
            .handle_message(&message("willAppear", DEVICE_ACTION, "c1", json!({})))
            .unwrap();
        assert!(!plugin.devices().is_tracking(&context));

        plugin
            .handle_message(&message(
                "didReceiveSettings",
                DEVICE_ACTION,
                "c1",
                json!({"deviceId": "d1", "behaviour": "toggle"}),
            ))
            .unwrap();
        settle().await;
        assert!(plugin.devices().is_tracking(&context));
        assert_eq!(api.status_calls(), 1);

        plugin
            .handle_message(&message(
                "didReceiveSettings",
                DEVICE_ACTION,
                "c1",
                json!({"deviceId": "none"}),
            ))
            .unwrap();
        assert!(!plugin.devices().is_tracking(&context));
    }

    #[tokio::test(start_paused = true)]
    async fn key_up_sends_command() {
        let (plugin, api, _) = plugin();
        with_token(&plugin);

        plugin
            .handle_message(&message(
                "keyUp",
                DEVICE_ACTION,
                "c1",
                json!({"deviceId": "d1", "behaviour": "toggle"}),
            ))
            .unwrap();
        settle().await;

        assert_eq!(api.commands().len(), 1);
        assert_eq!(api.commands()[0].1.command, "off");
    }

    #[tokio::test(start_paused = true)]
    async fn key_up_without_token_does_nothing() {
        let (plugin, api, surface) = plugin();

        plugin
            .handle_message(&message(
                "keyUp",
                DEVICE_ACTION,
                "c1",
                json!({"deviceId": "d1"}),
            ))
            .unwrap();
        settle().await;

        assert!(api.calls().is_empty());
        assert!(surface.calls().is_empty());
    }
}

// ============================================================================
// Scene buttons
// ============================================================================

mod scenes {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn key_up_executes_scene() {
        let (plugin, api, _) = plugin();
        with_token(&plugin);

        plugin
            .handle_message(&message("keyUp", SCENE_ACTION, "c2", json!({"sceneId": "s1"})))
            .unwrap();
        settle().await;

        assert_eq!(api.calls(), vec![ApiCall::Scene("s1".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_scene_flashes_alert() {
        let (plugin, api, surface) = plugin();
        with_token(&plugin);
        api.set_scene_reply(Reply::Offline);

        plugin
            .handle_message(&message("keyUp", SCENE_ACTION, "c2", json!({"sceneId": "s1"})))
            .unwrap();
        settle().await;

        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::Alert(ButtonContext::from("c2"))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn scene_appear_is_ignored() {
        let (plugin, api, _) = plugin();
        with_token(&plugin);

        plugin
            .handle_message(&message("willAppear", SCENE_ACTION, "c2", json!({"sceneId": "s1"})))
            .unwrap();

        assert!(api.calls().is_empty());
        assert!(plugin.devices().scheduler().is_empty());
    }
}

// ============================================================================
// Property inspector
// ============================================================================

mod catalog {
    use super::*;

    #[tokio::test]
    async fn device_options_are_truncated_and_filtered() {
        let (plugin, api, _) = plugin();
        with_token(&plugin);
        api.set_devices(vec![
            DeviceSummary {
                device_id: Some("d1".to_string()),
                label: Some("A very long garage door label indeed".to_string()),
                name: None,
            },
            DeviceSummary {
                device_id: None,
                label: Some("orphan".to_string()),
                name: None,
            },
        ]);

        let options = plugin.device_options().await.unwrap();

        assert_eq!(
            options,
            vec![SelectOption {
                id: "d1".to_string(),
                name: "A very long garage door label ".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn scene_options_list_scenes() {
        let (plugin, api, _) = plugin();
        with_token(&plugin);
        api.set_scenes(vec![SceneSummary {
            scene_id: Some("s1".to_string()),
            scene_name: Some("Movie night".to_string()),
        }]);

        let options = plugin.scene_options().await.unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "Movie night");
        assert_eq!(api.calls(), vec![ApiCall::ListScenes]);
    }

    #[tokio::test]
    async fn options_require_token() {
        let (plugin, api, _) = plugin();

        assert!(matches!(plugin.device_options().await, Err(Error::NoToken)));
        assert!(matches!(plugin.scene_options().await, Err(Error::NoToken)));
        assert!(api.calls().is_empty());
    }
}
