//! Session and request DTOs exchanged with the hosted auth service.
//!
//! DESIGN
//! ======
//! Field names mirror the service's camelCase JSON so the browser client and
//! the CLI can decode responses directly. Timestamps stay as strings; nothing
//! in this workspace does date arithmetic on them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// An authenticated principal as reported by the auth service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque user identifier.
    pub id: String,
    /// Display name. Anonymous users may carry an empty or generated name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address, absent for some anonymous users.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    /// Avatar image URL, if available.
    #[serde(default)]
    pub image: Option<String>,
    /// Set by the anonymous plugin. Missing or `null` means a permanent user.
    #[serde(default)]
    pub is_anonymous: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    /// Whether this user came from an anonymous sign-in.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous.unwrap_or(false)
    }

    /// Name, else email, else `fallback`. Blank strings count as missing.
    #[must_use]
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_blank(self.name.as_deref())
            .or_else(|| non_blank(self.email.as_deref()))
            .unwrap_or(fallback)
    }

    /// Up to two uppercase initials for avatar placeholders.
    #[must_use]
    pub fn initials(&self) -> String {
        let source = self.display_name("?");
        let words = if source.contains('@') { 1 } else { 2 };
        let mut initials: String = source
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(words)
            .collect();
        initials.make_ascii_uppercase();
        initials
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Server-side session record (`session` in `/get-session`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// The current authenticated principal plus its session record, if known.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Missing when the session was built from a sign-in response.
    #[serde(rename = "session", default, skip_serializing_if = "Option::is_none")]
    pub record: Option<SessionRecord>,
    pub user: User,
}

impl Session {
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.user.is_anonymous()
    }

    /// Two snapshots describe the same principal when user id and anonymous
    /// flag agree. Profile edits do not count as a session change.
    #[must_use]
    pub fn same_principal(&self, other: &Self) -> bool {
        self.user.id == other.user.id && self.is_anonymous() == other.is_anonymous()
    }
}

/// Body of a successful `/sign-in/*` or `/sign-up/*` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user: User,
}

impl From<SignInResponse> for Session {
    fn from(resp: SignInResponse) -> Self {
        Self { record: None, user: resp.user }
    }
}

/// Email + password pair for credentialed sign-in and account linking.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /sign-up/email`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    #[serde(flatten)]
    pub credentials: Credentials,
}

/// Body of `POST /reset-password`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: String,
    pub token: String,
}

/// OAuth providers the demo can offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Github,
    Google,
}

impl SocialProvider {
    /// Wire identifier sent as `provider`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Google => "google",
        }
    }

    /// Human label for buttons.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Google => "Google",
        }
    }
}

/// Response of `POST /sign-in/social`: where to send the browser next.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialRedirect {
    pub url: String,
    #[serde(default)]
    pub redirect: bool,
}
