//! App Shell configuration handed to the auth views.
//!
//! DESIGN
//! ======
//! Built once at start-up and passed down by reference or context. Nothing
//! mutates it afterwards.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::SocialProvider;

/// Same-origin path the browser uses to reach the auth service.
pub const DEFAULT_AUTH_BASE_PATH: &str = "/api/auth";

/// Display-text keys the auth views look up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextKey {
    SignIn,
    SignInDescription,
    SignInAction,
    SignUp,
    SignUpDescription,
    SignUpAction,
    ForgotPassword,
    ForgotPasswordDescription,
    ForgotPasswordAction,
    ForgotPasswordLink,
    ForgotPasswordEmailSent,
    ResetPassword,
    ResetPasswordDescription,
    ResetPasswordAction,
    OrContinueWith,
    Name,
    Email,
    EmailPlaceholder,
    Password,
    PasswordPlaceholder,
    NewPassword,
    SignOut,
    AlreadyHaveAnAccount,
    DontHaveAnAccount,
}

impl TextKey {
    /// Built-in text used when no override is configured.
    #[must_use]
    pub fn default_text(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignInDescription => "Enter your email below to login to your account",
            Self::SignInAction => "Login",
            Self::SignUp => "Sign Up",
            Self::SignUpDescription => "Enter your information to create an account",
            Self::SignUpAction => "Create an account",
            Self::ForgotPassword => "Forgot Password",
            Self::ForgotPasswordDescription => "Enter your email to reset your password",
            Self::ForgotPasswordAction => "Send reset link",
            Self::ForgotPasswordLink => "Forgot your password?",
            Self::ForgotPasswordEmailSent => "Check your email for the password reset link",
            Self::ResetPassword => "Reset Password",
            Self::ResetPasswordDescription => "Enter your new password below",
            Self::ResetPasswordAction => "Save new password",
            Self::OrContinueWith => "Or continue with",
            Self::Name => "Name",
            Self::Email => "Email",
            Self::EmailPlaceholder => "m@example.com",
            Self::Password => "Password",
            Self::PasswordPlaceholder => "Password",
            Self::NewPassword => "New Password",
            Self::SignOut => "Sign Out",
            Self::AlreadyHaveAnAccount => "Already have an account?",
            Self::DontHaveAnAccount => "Don't have an account?",
        }
    }
}

/// Display text with per-key overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localization {
    overrides: BTreeMap<TextKey, String>,
}

impl Localization {
    #[must_use]
    pub fn with(mut self, key: TextKey, text: impl Into<String>) -> Self {
        self.overrides.insert(key, text.into());
        self
    }

    /// Override if present, else the built-in text.
    #[must_use]
    pub fn get(&self, key: TextKey) -> &str {
        self.overrides.get(&key).map_or_else(|| key.default_text(), String::as_str)
    }

    #[must_use]
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

/// Optional credential flows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialOptions {
    pub forgot_password: bool,
    pub sign_up: bool,
}

impl Default for CredentialOptions {
    fn default() -> Self {
        Self { forgot_password: false, sign_up: true }
    }
}

/// Everything the auth views need from the App Shell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUiConfig {
    /// Base path of the auth API as seen by the browser.
    pub base_path: String,
    /// Offered in this order.
    pub social_providers: Vec<SocialProvider>,
    pub credentials: CredentialOptions,
    pub localization: Localization,
    /// Where to land after sign-in, sign-up and social callbacks.
    pub redirect_to: String,
}

impl Default for AuthUiConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_AUTH_BASE_PATH.to_owned(),
            social_providers: Vec::new(),
            credentials: CredentialOptions::default(),
            localization: Localization::default(),
            redirect_to: "/".to_owned(),
        }
    }
}

impl AuthUiConfig {
    /// The demo's settings: GitHub + Google, forgot-password on, and the
    /// demo's own wording for the auth card headings.
    #[must_use]
    pub fn demo() -> Self {
        let localization = Localization::default()
            .with(TextKey::SignIn, "Welcome Back")
            .with(TextKey::SignInDescription, "Sign in to your account to continue")
            .with(TextKey::SignUp, "Create Account")
            .with(TextKey::SignUpDescription, "Join us today and get started")
            .with(TextKey::ForgotPassword, "Forgot Password?")
            .with(TextKey::ForgotPasswordDescription, "Enter your email to reset your password")
            .with(TextKey::ResetPassword, "Reset Password")
            .with(TextKey::ResetPasswordDescription, "Enter your new password below")
            .with(TextKey::OrContinueWith, "or continue with");

        Self {
            social_providers: vec![SocialProvider::Github, SocialProvider::Google],
            credentials: CredentialOptions { forgot_password: true, sign_up: true },
            localization,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn text(&self, key: TextKey) -> &str {
        self.localization.get(key)
    }

    /// Absolute URL the reset-password email should link back to.
    #[must_use]
    pub fn reset_password_url(&self, origin: &str) -> String {
        format!("{}/auth/reset-password", origin.trim_end_matches('/'))
    }
}
