// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `SmartDeck` library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation, remote API communication, payload parsing, and the two
//! configuration-level conditions the controllers short-circuit on.
//!
//! Remote API failures carry a classification ([`ErrorClass`]) that the
//! controllers use to pick a policy: show an offline indicator, log and retry
//! on the next poll, or stay silent.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the remote API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Error occurred while parsing a payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// No access token is configured in the global settings.
    #[error("no access token configured")]
    NoToken,

    /// The device exposes none of the supported capabilities.
    #[error("device does not expose a supported capability")]
    UnsupportedDevice,
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// An unknown key-press behaviour was provided.
    #[error("invalid behaviour: {0}")]
    InvalidBehaviour(String),
}

/// Policy class of a remote API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The token is missing or rejected.
    Unauthorized,
    /// The device cannot be reached by the cloud.
    DeviceOffline,
    /// Anything that may succeed on a later attempt.
    Transient,
    /// The response did not have the expected shape.
    Malformed,
}

/// Errors raised by the remote API client.
///
/// The client never retries; callers inspect [`ApiError::class`] to decide.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The access token was rejected (HTTP 401/403).
    #[error("unauthorized (HTTP {status})")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
    },

    /// The device is unreachable (HTTP 424/503/504).
    #[error("device offline (HTTP {status})")]
    DeviceOffline {
        /// HTTP status code.
        status: u16,
    },

    /// The API rate limit was hit (HTTP 429).
    #[error("rate limited (retry after {retry_after_secs:?}s)")]
    RateLimited {
        /// Value of the `Retry-After` header, if any.
        retry_after_secs: Option<u64>,
    },

    /// Any other server-side failure (HTTP 5xx).
    #[error("server error (HTTP {status})")]
    Server {
        /// HTTP status code.
        status: u16,
    },

    /// The request was refused for another reason (other HTTP 4xx).
    #[error("request rejected (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// HTTP transport failed (connection refused, DNS failure, etc.).
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Invalid base URL.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ApiError {
    /// Maps a non-success HTTP status code to an error.
    #[must_use]
    pub fn from_status(status: u16, retry_after_secs: Option<u64>, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status },
            424 | 503 | 504 => Self::DeviceOffline { status },
            429 => Self::RateLimited { retry_after_secs },
            500..=599 => Self::Server { status },
            _ => Self::Rejected {
                status,
                message: body,
            },
        }
    }

    /// Returns the policy class of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Unauthorized { .. } => ErrorClass::Unauthorized,
            Self::DeviceOffline { .. } => ErrorClass::DeviceOffline,
            Self::Malformed(_) => ErrorClass::Malformed,
            Self::RateLimited { .. }
            | Self::Server { .. }
            | Self::Rejected { .. }
            | Self::Timeout(_)
            | Self::InvalidAddress(_) => ErrorClass::Transient,
            #[cfg(feature = "http")]
            Self::Http(_) => ErrorClass::Transient,
        }
    }

    /// Returns `true` if the device itself is unreachable.
    #[must_use]
    pub fn is_device_offline(&self) -> bool {
        self.class() == ErrorClass::DeviceOffline
    }
}

/// Errors related to parsing API and host payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
