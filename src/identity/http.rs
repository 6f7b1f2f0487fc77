//! HTTP implementation of the identity-provider client.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use super::{IdentityProvider, User};

pub struct HttpIdentityProvider {
    base_url: String,
    /// Service-to-service token used for user lookups (not for sessions).
    service_token: SecretString,
    client: Client,
}

impl HttpIdentityProvider {
    /// Build a client for the provider at `base_url`.
    ///
    /// # Errors
    /// Returns an error when the URL does not parse, is not http(s), or the
    /// HTTP client cannot be constructed.
    pub fn new(base_url: &str, service_token: SecretString) -> Result<Self> {
        let parsed = Url::parse(base_url).context("Invalid identity provider URL")?;
        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            return Err(anyhow!(
                "Identity provider URL must be http(s): {base_url}"
            ));
        }

        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("Failed to build identity HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_token,
            client,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve_session(&self, session_token: &str) -> Result<Option<User>> {
        let response = self
            .client
            .get(format!("{}/v1/account", self.base_url))
            .bearer_auth(session_token)
            .send()
            .await
            .context("identity provider unreachable")?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let user = response
                    .json::<User>()
                    .await
                    .context("invalid account payload from identity provider")?;
                Ok(Some(user))
            }
            status => Err(anyhow!("session resolution failed: {status}")),
        }
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<User>> {
        let response = self
            .client
            .get(format!("{}/v1/users/{user_id}", self.base_url))
            .bearer_auth(self.service_token.expose_secret())
            .send()
            .await
            .context("identity provider unreachable")?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let user = response
                    .json::<User>()
                    .await
                    .context("invalid user payload from identity provider")?;
                Ok(Some(user))
            }
            status => Err(anyhow!("user lookup failed: {status}")),
        }
    }

    async fn healthy(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(response) => {
                debug!("identity provider health: {}", response.status());
                response.status().is_success()
            }
            Err(err) => {
                warn!(error = %err, "identity provider health check failed");
                false
            }
        }
    }
}
