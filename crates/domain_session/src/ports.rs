//! Session Domain Ports

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError};

use crate::credentials::{AuthToken, Credentials};

/// Port to the upstream authentication endpoint
#[async_trait]
pub trait AuthPort: DomainPort {
    /// Exchanges credentials for an upstream token
    ///
    /// Rejected credentials must come back as `PortError::Unauthorized`.
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, PortError>;
}

/// In-memory auth backend for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock backend with a fixed user table
    #[derive(Debug, Default, Clone)]
    pub struct MockAuthPort {
        users: Arc<RwLock<HashMap<String, String>>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockAuthPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// A backend knowing a single user
        pub async fn with_user(username: &str, password: &str) -> Self {
            let port = Self::new();
            port.add_user(username, password).await;
            port
        }

        pub async fn add_user(&self, username: &str, password: &str) {
            self.users
                .write()
                .await
                .insert(username.to_string(), password.to_string());
        }

        /// Makes every login fail as if the backend were down
        pub async fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.write().await = unavailable;
        }
    }

    impl DomainPort for MockAuthPort {}

    #[async_trait]
    impl AuthPort for MockAuthPort {
        async fn login(&self, credentials: &Credentials) -> Result<AuthToken, PortError> {
            if *self.unavailable.read().await {
                return Err(PortError::Unavailable {
                    service: "auth".to_string(),
                });
            }
            match self.users.read().await.get(&credentials.username) {
                Some(password) if *password == credentials.password => {
                    Ok(AuthToken::new(format!("mock-token-{}", credentials.username)))
                }
                _ => Err(PortError::unauthorized("Invalid credentials")),
            }
        }
    }
}
