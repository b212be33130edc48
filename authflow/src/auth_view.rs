//! Credential views: sign-in, sign-up, forgot/reset password, sign-out.
//!
//! Same shape as the anonymous panel: `begin` validates and returns a
//! request, the request awaits one client call, `complete` records the
//! outcome and says where to go next.

#[cfg(test)]
#[path = "auth_view_test.rs"]
mod auth_view_test;

use crate::client::AuthClient;
use crate::config::{AuthUiConfig, TextKey};
use crate::error::{AuthFailure, FormError, Rejection};
use crate::forms::{check_email, check_password};
use crate::observer::SessionChange;
use crate::types::{Credentials, ResetPasswordRequest, Session, SignUpRequest, SocialProvider};

/// Routes under `/auth/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthView {
    SignIn,
    SignUp,
    ForgotPassword,
    ResetPassword,
    SignOut,
}

impl AuthView {
    /// Parse the `{view}` segment of `/auth/{view}`.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "sign-in" => Some(Self::SignIn),
            "sign-up" => Some(Self::SignUp),
            "forgot-password" => Some(Self::ForgotPassword),
            "reset-password" => Some(Self::ResetPassword),
            "sign-out" => Some(Self::SignOut),
            _ => None,
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::SignIn => "/auth/sign-in",
            Self::SignUp => "/auth/sign-up",
            Self::ForgotPassword => "/auth/forgot-password",
            Self::ResetPassword => "/auth/reset-password",
            Self::SignOut => "/auth/sign-out",
        }
    }

    #[must_use]
    pub fn title_key(self) -> TextKey {
        match self {
            Self::SignIn => TextKey::SignIn,
            Self::SignUp => TextKey::SignUp,
            Self::ForgotPassword => TextKey::ForgotPassword,
            Self::ResetPassword => TextKey::ResetPassword,
            Self::SignOut => TextKey::SignOut,
        }
    }

    #[must_use]
    pub fn description_key(self) -> Option<TextKey> {
        match self {
            Self::SignIn => Some(TextKey::SignInDescription),
            Self::SignUp => Some(TextKey::SignUpDescription),
            Self::ForgotPassword => Some(TextKey::ForgotPasswordDescription),
            Self::ResetPassword => Some(TextKey::ResetPasswordDescription),
            Self::SignOut => None,
        }
    }

    #[must_use]
    pub fn action_key(self) -> TextKey {
        match self {
            Self::SignIn => TextKey::SignInAction,
            Self::SignUp => TextKey::SignUpAction,
            Self::ForgotPassword => TextKey::ForgotPasswordAction,
            Self::ResetPassword => TextKey::ResetPasswordAction,
            Self::SignOut => TextKey::SignOut,
        }
    }

    /// Whether `config` enables this view.
    #[must_use]
    pub fn enabled(self, config: &AuthUiConfig) -> bool {
        match self {
            Self::SignUp => config.credentials.sign_up,
            Self::ForgotPassword | Self::ResetPassword => config.credentials.forgot_password,
            Self::SignIn | Self::SignOut => true,
        }
    }

    /// Social buttons appear on the sign-in and sign-up cards.
    #[must_use]
    pub fn shows_social(self) -> bool {
        matches!(self, Self::SignIn | Self::SignUp)
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in failed",
            Self::SignUp => "Sign up failed",
            Self::ForgotPassword => "Password reset request failed",
            Self::ResetPassword => "Password reset failed",
            Self::SignOut => "Sign out failed",
        }
    }
}

/// Raw field values of a credential form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Reset token taken from the `?token=` query parameter.
    pub token: String,
}

/// A validated request ready for the auth client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthRequest {
    SignIn(Credentials),
    SignUp(SignUpRequest),
    ForgotPassword { email: String, redirect_to: String },
    ResetPassword(ResetPasswordRequest),
    Social { provider: SocialProvider, callback_url: String },
    SignOut,
}

/// Successful outcome of an [`AuthRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn(Session),
    /// Send the browser to the provider.
    Redirect(String),
    EmailSent,
    PasswordReset,
    SignedOut,
}

impl AuthRequest {
    /// Await exactly one auth-client call.
    ///
    /// # Errors
    ///
    /// The client's [`AuthFailure`].
    pub async fn execute<C: AuthClient + ?Sized>(self, client: &C) -> Result<AuthOutcome, AuthFailure> {
        match self {
            Self::SignIn(credentials) => client.sign_in_email(&credentials).await.map(AuthOutcome::SignedIn),
            Self::SignUp(request) => client.sign_up_email(&request).await.map(AuthOutcome::SignedIn),
            Self::ForgotPassword { email, redirect_to } => {
                client.forget_password(&email, &redirect_to).await.map(|()| AuthOutcome::EmailSent)
            }
            Self::ResetPassword(request) => client.reset_password(&request).await.map(|()| AuthOutcome::PasswordReset),
            Self::Social { provider, callback_url } => client
                .sign_in_social(provider, &callback_url)
                .await
                .map(|redirect| AuthOutcome::Redirect(redirect.url)),
            Self::SignOut => client.sign_out().await.map(|()| AuthOutcome::SignedOut),
        }
    }
}

/// Where the page goes after a request settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Client-side route push.
    Push(String),
    /// Client-side route replacement.
    Replace(String),
    /// Full browser navigation to another origin.
    External(String),
}

/// Follow-up work for the App Shell after a request settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthFollowUp {
    pub change: SessionChange,
    pub refresh: bool,
    pub navigate: Option<Navigation>,
}

impl AuthFollowUp {
    fn stay() -> Self {
        Self { change: SessionChange::Keep, refresh: false, navigate: None }
    }
}

/// View-side state of an auth card.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthFormState {
    busy: bool,
    pending_view: Option<AuthView>,
    pub form: AuthForm,
    pub error: Option<String>,
    /// Non-error confirmation (e.g. reset email sent).
    pub notice: Option<String>,
}

impl AuthFormState {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Validate `view`'s fields and start its request.
    ///
    /// `origin` is the page origin, used to build the reset-password link.
    ///
    /// # Errors
    ///
    /// `Busy` while a request runs, `Invalid` on a failing field (also shown
    /// in the error box).
    pub fn begin(&mut self, view: AuthView, config: &AuthUiConfig, origin: &str) -> Result<AuthRequest, Rejection> {
        if self.busy {
            return Err(Rejection::Busy);
        }
        let request = match self.validate(view, config, origin) {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };
        self.start(view);
        Ok(request)
    }

    /// Start a social sign-in for `provider`.
    ///
    /// # Errors
    ///
    /// `Busy` while a request runs.
    pub fn begin_social(&mut self, provider: SocialProvider, config: &AuthUiConfig) -> Result<AuthRequest, Rejection> {
        if self.busy {
            return Err(Rejection::Busy);
        }
        self.start(AuthView::SignIn);
        Ok(AuthRequest::Social { provider, callback_url: config.redirect_to.clone() })
    }

    fn start(&mut self, view: AuthView) {
        self.busy = true;
        self.pending_view = Some(view);
        self.error = None;
        self.notice = None;
    }

    fn validate(&self, view: AuthView, config: &AuthUiConfig, origin: &str) -> Result<AuthRequest, FormError> {
        let form = &self.form;
        let request = match view {
            AuthView::SignIn => {
                check_email(&form.email)?;
                if form.password.is_empty() {
                    return Err(FormError::PasswordMissing);
                }
                AuthRequest::SignIn(self.credentials())
            }
            AuthView::SignUp => {
                if form.name.trim().is_empty() {
                    return Err(FormError::NameMissing);
                }
                check_email(&form.email)?;
                check_password(&form.password)?;
                AuthRequest::SignUp(SignUpRequest { name: form.name.trim().to_owned(), credentials: self.credentials() })
            }
            AuthView::ForgotPassword => {
                check_email(&form.email)?;
                AuthRequest::ForgotPassword {
                    email: form.email.trim().to_owned(),
                    redirect_to: config.reset_password_url(origin),
                }
            }
            AuthView::ResetPassword => {
                if form.token.trim().is_empty() {
                    return Err(FormError::TokenMissing);
                }
                check_password(&form.password)?;
                AuthRequest::ResetPassword(ResetPasswordRequest {
                    new_password: form.password.clone(),
                    token: form.token.trim().to_owned(),
                })
            }
            AuthView::SignOut => AuthRequest::SignOut,
        };
        Ok(request)
    }

    fn credentials(&self) -> Credentials {
        Credentials { email: self.form.email.trim().to_owned(), password: self.form.password.clone() }
    }

    /// Record a settled request.
    pub fn complete(&mut self, result: Result<AuthOutcome, AuthFailure>, config: &AuthUiConfig) -> AuthFollowUp {
        let view = self.pending_view.take().unwrap_or(AuthView::SignIn);
        self.busy = false;

        match result {
            Ok(AuthOutcome::SignedIn(session)) => {
                tracing::info!(?view, user_id = %session.user.id, "signed in");
                self.form = AuthForm::default();
                AuthFollowUp {
                    change: SessionChange::Replace(session),
                    refresh: true,
                    navigate: Some(Navigation::Replace(config.redirect_to.clone())),
                }
            }
            Ok(AuthOutcome::Redirect(url)) => {
                // Busy stays set until the browser leaves the page.
                self.busy = true;
                AuthFollowUp { navigate: Some(Navigation::External(url)), ..AuthFollowUp::stay() }
            }
            Ok(AuthOutcome::EmailSent) => {
                self.notice = Some(config.text(TextKey::ForgotPasswordEmailSent).to_owned());
                AuthFollowUp::stay()
            }
            Ok(AuthOutcome::PasswordReset) => {
                self.form = AuthForm::default();
                AuthFollowUp { navigate: Some(Navigation::Replace(AuthView::SignIn.path().to_owned())), ..AuthFollowUp::stay() }
            }
            Ok(AuthOutcome::SignedOut) => AuthFollowUp {
                change: SessionChange::Clear,
                refresh: true,
                navigate: Some(Navigation::Replace("/".to_owned())),
            },
            Err(failure) => {
                tracing::warn!(?view, error = %failure, "auth request failed");
                self.error = Some(failure.display_message(view.fallback_message()));
                AuthFollowUp::stay()
            }
        }
    }
}
