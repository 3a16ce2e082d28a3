//! Auth DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain_session::{Credentials, CurrentUser, PasswordResetRequest};

/// Login form; missing fields are treated as blank so they fail validation
/// rather than deserialization
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl From<LoginRequest> for Credentials {
    fn from(request: LoginRequest) -> Self {
        Credentials::new(request.username, request.password)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl From<ForgotPasswordRequest> for PasswordResetRequest {
    fn from(request: ForgotPasswordRequest) -> Self {
        PasswordResetRequest::new(request.email)
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub signed_in_at: DateTime<Utc>,
}

impl From<CurrentUser> for UserResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            username: user.username,
            signed_in_at: user.signed_in_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
