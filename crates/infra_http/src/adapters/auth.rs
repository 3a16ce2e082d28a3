//! REST Auth Adapter

use async_trait::async_trait;
use reqwest::Method;
use tracing::instrument;

use core_kernel::{DomainPort, PortError};
use domain_session::{AuthPort, AuthToken, Credentials};

use crate::client::ApiClient;
use crate::wire::{LoginRequest, LoginResponse};

/// `AuthPort` backed by `POST /auth/login`
#[derive(Debug, Clone)]
pub struct HttpAuthAdapter {
    client: ApiClient,
}

impl HttpAuthAdapter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl DomainPort for HttpAuthAdapter {}

#[async_trait]
impl AuthPort for HttpAuthAdapter {
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, PortError> {
        let path = "/auth/login";
        let request = self.client.request(Method::POST, path, None).json(&LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
        });
        let response: LoginResponse = self.client.execute_json(path, request).await?;
        Ok(AuthToken::new(response.auth_token))
    }
}
