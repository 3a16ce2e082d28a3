//! Login, logout and password reset

use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use core_kernel::{PortError, SessionId};

use crate::credentials::{Credentials, PasswordResetRequest};
use crate::error::SessionError;
use crate::ports::AuthPort;
use crate::session::{CurrentUser, SessionHandle, SessionStore, UserSession};

/// Authentication use cases
#[derive(Clone)]
pub struct AuthService {
    port: Arc<dyn AuthPort>,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(port: Arc<dyn AuthPort>, sessions: Arc<SessionStore>) -> Self {
        Self { port, sessions }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Logs in upstream and opens a session
    ///
    /// Any rejection of the credentials surfaces as
    /// [`SessionError::InvalidCredentials`] and registers nothing.
    pub async fn login(&self, credentials: Credentials) -> Result<SessionHandle, SessionError> {
        credentials.validate()?;

        let token = match self.port.login(&credentials).await {
            Ok(token) => token,
            Err(e) if rejects_credentials(&e) => {
                warn!(username = %credentials.username, "Login rejected");
                return Err(SessionError::InvalidCredentials);
            }
            Err(e) => {
                warn!(username = %credentials.username, error = %e, "Login failed");
                return Err(e.into());
            }
        };

        let handle = self
            .sessions
            .insert(UserSession::new(credentials.username.clone(), token))
            .await;
        info!(username = %credentials.username, session_id = %handle.id(), "User signed in");
        Ok(handle)
    }

    /// Accepts a reset request for any well-formed address
    ///
    /// The answer is the same whether or not the account exists.
    pub async fn forgot_password(&self, request: PasswordResetRequest) -> Result<(), SessionError> {
        request.validate()?;
        info!("Password reset requested");
        Ok(())
    }

    /// Ends the session; logging out twice is not an error
    pub async fn logout(&self, id: &SessionId) {
        if self.sessions.remove(id).await {
            info!(session_id = %id, "User signed out");
        }
    }

    pub async fn current_user(&self, id: &SessionId) -> Result<CurrentUser, SessionError> {
        let handle = self
            .sessions
            .get(id)
            .await
            .ok_or(SessionError::NotFound(*id))?;
        let user = handle.lock().await.user.clone();
        Ok(user)
    }
}

fn rejects_credentials(error: &PortError) -> bool {
    matches!(
        error,
        PortError::Unauthorized { .. }
            | PortError::Upstream { status: 400 | 401 | 403, .. }
            | PortError::NotFound { .. }
    )
}
