// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! What the user sees on a button.
//!
//! [`ButtonSurface`] is the only way the controllers affect a button.
//! [`ChannelSurface`] turns each call into a host wire message and queues it
//! for whatever task owns the websocket to the Stream Deck application.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::ParseError;
use crate::model::StateIndex;
use crate::types::ButtonContext;

/// Title shown on a button whose device cannot be reached.
pub const OFFLINE_TITLE: &str = "Offline";

/// Default capacity of the outbound message queue.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Visual outputs of a button.
///
/// Implementations must not block: the controllers call these from timer
/// tasks.
pub trait ButtonSurface: Send + Sync + 'static {
    /// Selects the icon state (`0` inactive, `1` active).
    fn set_state(&self, state: StateIndex, context: &ButtonContext);

    /// Draws a title over the icon. An empty title clears it.
    fn set_title(&self, title: &str, context: &ButtonContext);

    /// Flashes the alert indicator.
    fn show_alert(&self, context: &ButtonContext);
}

/// A message for the Stream Deck host.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::surface::OutboundMessage;
/// use smartdeck_lib::types::ButtonContext;
///
/// let msg = OutboundMessage::show_alert(ButtonContext::from("ctx"));
/// assert_eq!(msg.to_json().unwrap(), r#"{"event":"showAlert","context":"ctx"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// `setState` event.
    SetState {
        /// Target button.
        context: ButtonContext,
        /// State payload.
        payload: StatePayload,
    },
    /// `setTitle` event.
    SetTitle {
        /// Target button.
        context: ButtonContext,
        /// Title payload.
        payload: TitlePayload,
    },
    /// `showAlert` event.
    ShowAlert {
        /// Target button.
        context: ButtonContext,
    },
}

/// Payload of a `setState` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatePayload {
    /// State index.
    pub state: u8,
}

/// Payload of a `setTitle` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitlePayload {
    /// Title text.
    pub title: String,
    /// `0` targets both the hardware and the software display.
    pub target: u8,
}

impl OutboundMessage {
    /// Creates a `setState` message.
    #[must_use]
    pub fn set_state(context: ButtonContext, state: StateIndex) -> Self {
        Self::SetState {
            context,
            payload: StatePayload {
                state: state.value(),
            },
        }
    }

    /// Creates a `setTitle` message.
    #[must_use]
    pub fn set_title(context: ButtonContext, title: impl Into<String>) -> Self {
        Self::SetTitle {
            context,
            payload: TitlePayload {
                title: title.into(),
                target: 0,
            },
        }
    }

    /// Creates a `showAlert` message.
    #[must_use]
    pub fn show_alert(context: ButtonContext) -> Self {
        Self::ShowAlert { context }
    }

    /// Returns the targeted button.
    #[must_use]
    pub fn context(&self) -> &ButtonContext {
        match self {
            Self::SetState { context, .. }
            | Self::SetTitle { context, .. }
            | Self::ShowAlert { context } => context,
        }
    }

    /// Serializes the message for the websocket.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, ParseError> {
        serde_json::to_string(self).map_err(Into::into)
    }
}

/// A [`ButtonSurface`] that queues host messages on a bounded channel.
///
/// When the queue is full or its receiver is gone the message is dropped and
/// a warning is logged; the next poll re-renders the button anyway.
#[derive(Debug, Clone)]
pub struct ChannelSurface {
    sender: mpsc::Sender<OutboundMessage>,
}

impl ChannelSurface {
    /// Creates a surface and its receiving end with the default capacity.
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<OutboundMessage>) {
        Self::bounded(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a surface and its receiving end with the given capacity.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    fn push(&self, message: OutboundMessage) {
        if let Err(e) = self.sender.try_send(message) {
            tracing::warn!(error = %e, "Dropping outbound button message");
        }
    }
}

impl ButtonSurface for ChannelSurface {
    fn set_state(&self, state: StateIndex, context: &ButtonContext) {
        self.push(OutboundMessage::set_state(context.clone(), state));
    }

    fn set_title(&self, title: &str, context: &ButtonContext) {
        self.push(OutboundMessage::set_title(context.clone(), title));
    }

    fn show_alert(&self, context: &ButtonContext) {
        self.push(OutboundMessage::show_alert(context.clone()));
    }
}
