//! Client-side form checks.
//!
//! These only gate submission; the auth service stays the authority and may
//! still refuse input that passes here.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FormError;
use crate::types::Credentials;

/// Minimum password length accepted by the forms.
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Basic `local@domain.tld` shape check.
#[must_use]
pub fn plausible_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// # Errors
///
/// `EmailMissing` for blank input, `EmailInvalid` for implausible addresses.
pub fn check_email(email: &str) -> Result<(), FormError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FormError::EmailMissing);
    }
    if !plausible_email(email) {
        return Err(FormError::EmailInvalid);
    }
    Ok(())
}

/// # Errors
///
/// `PasswordMissing` for empty input, `PasswordTooShort` below
/// [`MIN_PASSWORD_LEN`] characters.
pub fn check_password(password: &str) -> Result<(), FormError> {
    if password.is_empty() {
        return Err(FormError::PasswordMissing);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    Ok(())
}

/// Email + password typed into the link-account form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkRequest {
    pub email: String,
    pub password: String,
}

impl LinkRequest {
    /// Both fields have something in them. Mirrors the submit button's
    /// enabled state; full validation happens in [`LinkRequest::validate`].
    #[must_use]
    pub fn is_filled(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }

    /// # Errors
    ///
    /// The first failing field check.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        check_email(&self.email)?;
        check_password(&self.password)?;
        Ok(Credentials { email: self.email.trim().to_owned(), password: self.password.clone() })
    }

    pub fn clear(&mut self) {
        self.email.clear();
        self.password.clear();
    }
}
