// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button context identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for one visible button instance.
///
/// The Stream Deck host assigns a context string when a button appears and
/// reuses it for every event concerning that button until it disappears.
///
/// # Examples
///
/// ```
/// use smartdeck_lib::types::ButtonContext;
///
/// let context = ButtonContext::from("A1B2C3");
/// assert_eq!(context.as_str(), "A1B2C3");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonContext(String);

impl ButtonContext {
    /// Creates a context from the host-provided string.
    #[must_use]
    pub fn new(context: impl Into<String>) -> Self {
        Self(context.into())
    }

    /// Returns the raw context string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ButtonContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ButtonContext({})", self.0)
    }
}

impl fmt::Display for ButtonContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ButtonContext {
    fn from(context: String) -> Self {
        Self(context)
    }
}

impl From<&str> for ButtonContext {
    fn from(context: &str) -> Self {
        Self(context.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality() {
        assert_eq!(ButtonContext::from("abc"), ButtonContext::new("abc"));
        assert_ne!(ButtonContext::from("abc"), ButtonContext::from("abd"));
    }

    #[test]
    fn display_format() {
        assert_eq!(ButtonContext::from("ctx-1").to_string(), "ctx-1");
        assert_eq!(
            format!("{:?}", ButtonContext::from("ctx-1")),
            "ButtonContext(ctx-1)"
        );
    }

    #[test]
    fn deserializes_from_plain_string() {
        let context: ButtonContext = serde_json::from_str("\"ctx-9\"").unwrap();
        assert_eq!(context.as_str(), "ctx-9");
    }

    #[test]
    fn hashable() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(ButtonContext::from("a"));
        assert!(set.contains(&ButtonContext::from("a")));
    }
}
