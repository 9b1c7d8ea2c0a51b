// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key-press planning: which command to send and what to expect afterwards.

use crate::command::DeviceCommand;
use crate::types::{Behaviour, Level};

use super::{DeviceKind, NormalizedDeviceState};

/// Outcome of planning a key press.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    /// Command to send.
    pub command: DeviceCommand,
    /// State the device should be in once the command is applied.
    pub expected: NormalizedDeviceState,
}

/// Plans the command for a key press on a device in `state`.
///
/// Returns `None` for unsupported devices. `More` and `Less` only apply to
/// lights; a plain switch toggles instead.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::command::DeviceCommand;
/// use smartdeck_lib::model::{DeviceKind, NormalizedDeviceState, plan_activation};
/// use smartdeck_lib::types::Behaviour;
///
/// let off = NormalizedDeviceState { kind: DeviceKind::Switch, is_active: false, level: None };
/// let plan = plan_activation(&off, Behaviour::Toggle).unwrap();
///
/// assert_eq!(plan.command, DeviceCommand::switch(true));
/// assert!(plan.expected.is_active);
/// ```
#[must_use]
pub fn plan_activation(state: &NormalizedDeviceState, behaviour: Behaviour) -> Option<Activation> {
    match (state.kind, behaviour.level_delta()) {
        (DeviceKind::Unsupported, _) => None,
        (DeviceKind::GarageDoor, _) => Some(Activation {
            command: DeviceCommand::door(!state.is_active),
            expected: NormalizedDeviceState {
                is_active: !state.is_active,
                ..*state
            },
        }),
        (DeviceKind::Light, Some(delta)) => {
            let level = state.level.unwrap_or(Level::MIN).step(delta);
            Some(Activation {
                command: DeviceCommand::set_level(level),
                expected: NormalizedDeviceState {
                    kind: DeviceKind::Light,
                    is_active: level > Level::MIN,
                    level: Some(level),
                },
            })
        }
        (DeviceKind::Light | DeviceKind::Switch, _) => Some(Activation {
            command: DeviceCommand::switch(!state.is_active),
            expected: NormalizedDeviceState {
                is_active: !state.is_active,
                ..*state
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Capability;

    fn light(is_active: bool, level: u8) -> NormalizedDeviceState {
        NormalizedDeviceState {
            kind: DeviceKind::Light,
            is_active,
            level: Some(Level::new(level).unwrap()),
        }
    }

    fn switch(is_active: bool) -> NormalizedDeviceState {
        NormalizedDeviceState {
            kind: DeviceKind::Switch,
            is_active,
            level: None,
        }
    }

    #[test]
    fn toggle_switch_on_sends_off() {
        let plan = plan_activation(&switch(true), Behaviour::Toggle).unwrap();
        assert_eq!(plan.command, DeviceCommand::switch(false));
        assert!(!plan.expected.is_active);
    }

    #[test]
    fn toggle_switch_off_sends_on() {
        let plan = plan_activation(&switch(false), Behaviour::Toggle).unwrap();
        assert_eq!(plan.command, DeviceCommand::switch(true));
        assert!(plan.expected.is_active);
    }

    #[test]
    fn more_clamps_to_hundred() {
        let plan = plan_activation(&light(true, 95), Behaviour::More).unwrap();
        assert_eq!(plan.command.capability, Capability::SwitchLevel);
        assert_eq!(plan.command.command, "setLevel");
        assert_eq!(plan.command.arguments, vec![serde_json::json!(100)]);
        assert_eq!(plan.expected.level, Some(Level::MAX));
    }

    #[test]
    fn less_clamps_to_zero() {
        let plan = plan_activation(&light(true, 5), Behaviour::Less).unwrap();
        assert_eq!(plan.command.arguments, vec![serde_json::json!(0)]);
        assert_eq!(plan.expected.level, Some(Level::MIN));
        assert!(!plan.expected.is_active);
    }

    #[test]
    fn more_on_dark_light_lights_it() {
        let plan = plan_activation(&light(false, 0), Behaviour::More).unwrap();
        assert_eq!(plan.command.arguments, vec![serde_json::json!(10)]);
        assert!(plan.expected.is_active);
    }

    #[test]
    fn toggle_light_keeps_level() {
        let plan = plan_activation(&light(true, 60), Behaviour::Toggle).unwrap();
        assert_eq!(plan.command, DeviceCommand::switch(false));
        assert_eq!(plan.expected.level, Some(Level::new(60).unwrap()));
    }

    #[test]
    fn more_on_plain_switch_toggles() {
        let plan = plan_activation(&switch(false), Behaviour::More).unwrap();
        assert_eq!(plan.command, DeviceCommand::switch(true));
    }

    #[test]
    fn garage_door_inverts() {
        let open = NormalizedDeviceState {
            kind: DeviceKind::GarageDoor,
            is_active: true,
            level: None,
        };
        let plan = plan_activation(&open, Behaviour::Less).unwrap();
        assert_eq!(plan.command, DeviceCommand::door(false));
        assert!(!plan.expected.is_active);
    }

    #[test]
    fn unsupported_plans_nothing() {
        assert!(plan_activation(&NormalizedDeviceState::unsupported(), Behaviour::Toggle).is_none());
    }
}
