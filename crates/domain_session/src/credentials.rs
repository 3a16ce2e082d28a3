//! Login and password-reset input

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Username and password as typed on the login form
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Forgot-password form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

impl PasswordResetRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

/// Token issued by the upstream `/auth/login`
///
/// Held server-side only; never serialized back to the browser.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}
