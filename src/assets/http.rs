//! HTTP implementation of the asset CDN client.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use super::AssetStore;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

pub struct HttpAssetStore {
    base_url: String,
    service_token: SecretString,
    client: Client,
}

impl HttpAssetStore {
    /// Build a client for the CDN at `base_url`.
    ///
    /// # Errors
    /// Returns an error when the URL does not parse, is not http(s), or the
    /// HTTP client cannot be constructed.
    pub fn new(base_url: &str, service_token: SecretString) -> Result<Self> {
        let parsed = Url::parse(base_url).context("Invalid asset store URL")?;
        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            return Err(anyhow!("Asset store URL must be http(s): {base_url}"));
        }

        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("Failed to build asset HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_token,
            client,
        })
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload(&self, folder: &str, filename: &str, bytes: Vec<u8>) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/assets/{folder}", self.base_url))
            .query(&[("filename", filename)])
            .bearer_auth(self.service_token.expose_secret())
            .body(bytes)
            .send()
            .await
            .context("asset store unreachable")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("asset upload failed: {status}"));
        }

        let uploaded = response
            .json::<UploadResponse>()
            .await
            .context("invalid upload payload from asset store")?;
        Ok(uploaded.url)
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/v1/assets/{public_id}", self.base_url))
            .bearer_auth(self.service_token.expose_secret())
            .send()
            .await
            .context("asset store unreachable")?;

        let status = response.status();
        // Deleting an already-gone asset is not an error worth surfacing.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(anyhow!("asset deletion failed: {status}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_and_non_http_urls() {
        let token = SecretString::from("service-token".to_string());
        assert!(HttpAssetStore::new("not a url", token.clone()).is_err());
        assert!(HttpAssetStore::new("ftp://cdn.test", token).is_err());
    }
}
