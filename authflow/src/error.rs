//! Failure taxonomy for auth-client calls and locally refused commands.
//!
//! ERROR HANDLING
//! ==============
//! A call either reaches the service and is refused (`OperationFailed`) or
//! never produces a usable answer (`Unexpected`). Views collapse both into a
//! single display string; nothing is retried automatically.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::{Deserialize, Serialize};

/// Fallback shown when an unexpected failure carries no message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Error body returned by the service on non-2xx responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Outcome of an auth-client call that did not succeed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// The service answered and refused the operation.
    #[error("{message}")]
    OperationFailed {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    /// The call itself failed (network, decoding, unavailable runtime).
    #[error("{0}")]
    Unexpected(String),
}

impl AuthFailure {
    /// Build an `OperationFailed` from a decoded error body.
    #[must_use]
    pub fn rejected(status: u16, body: ErrorBody) -> Self {
        Self::OperationFailed { message: body.message, code: body.code, status: Some(status) }
    }

    /// The message to display. Blank `OperationFailed` messages fall back to
    /// the per-command `fallback`; blank unexpected ones to
    /// [`UNKNOWN_ERROR_MESSAGE`].
    #[must_use]
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::OperationFailed { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::OperationFailed { .. } => fallback.to_owned(),
            Self::Unexpected(message) if !message.trim().is_empty() => message.clone(),
            Self::Unexpected(_) => UNKNOWN_ERROR_MESSAGE.to_owned(),
        }
    }

    /// Error body echoed into the "last response" panel.
    #[must_use]
    pub fn to_body(&self, fallback: &str) -> ErrorBody {
        let code = match self {
            Self::OperationFailed { code, .. } => code.clone(),
            Self::Unexpected(_) => None,
        };
        ErrorBody { code, message: self.display_message(fallback) }
    }
}

/// Why a command was refused before reaching the auth client.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// Another command is still in flight.
    #[error("another operation is in progress")]
    Busy,

    /// The command has no transition from the current session state.
    #[error("{command} is not available while {phase}")]
    NotPermitted { command: &'static str, phase: &'static str },

    /// The form input failed client-side validation.
    #[error(transparent)]
    Invalid(#[from] FormError),
}

/// Client-side form validation failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Email is required")]
    EmailMissing,
    #[error("Enter a valid email address")]
    EmailInvalid,
    #[error("Password is required")]
    PasswordMissing,
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("Name is required")]
    NameMissing,
    #[error("Reset token is missing")]
    TokenMissing,
}
