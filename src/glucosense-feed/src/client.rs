use anyhow::{Context, bail};
use serde_json::Value;

use crate::{FeedRecord, parse_snapshot};

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Realtime Database root, e.g. `https://<project>.firebaseio.com`.
    pub database_url: String,
    /// Node holding the readings.
    pub path: String,
    /// Database secret or ID token, sent as the `auth` query parameter.
    pub auth_token: Option<String>,
}

impl FeedConfig {
    pub const DEFAULT_PATH: &'static str = "health_data";

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            path: Self::DEFAULT_PATH.to_owned(),
            auth_token: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }
}

/// Reads the readings node through the Realtime Database REST API.
#[derive(Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    config: FeedConfig,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}.json",
            self.config.database_url.trim_end_matches('/'),
            self.config.path.trim_matches('/')
        )
    }

    /// The whole node.
    pub async fn snapshot(&self) -> anyhow::Result<Vec<FeedRecord>> {
        self.fetch(&[]).await
    }

    /// The newest `count` children by key.
    pub async fn latest(&self, count: usize) -> anyhow::Result<Vec<FeedRecord>> {
        self.fetch(&[
            ("orderBy", "\"$key\"".to_owned()),
            ("limitToLast", count.to_string()),
        ])
        .await
    }

    async fn fetch(&self, query: &[(&str, String)]) -> anyhow::Result<Vec<FeedRecord>> {
        let mut request = self.client.get(self.endpoint()).query(query);
        if let Some(token) = &self.config.auth_token {
            request = request.query(&[("auth", token)]);
        }

        let resp = request
            .send()
            .await
            .context("failed to reach realtime database")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("feed request failed ({status}): {body}");
        }

        let value: Value = resp.json().await.context("invalid feed response")?;
        let records = parse_snapshot(value)?;
        debug!("fetched {} records from `{}`", records.len(), self.config.path);

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_url_and_path() {
        let client = FeedClient::new(FeedConfig::new("https://demo.firebaseio.com/"));
        assert_eq!(client.endpoint(), "https://demo.firebaseio.com/health_data.json");

        let client = FeedClient::new(
            FeedConfig::new("https://demo.firebaseio.com").with_path("/users/u1/readings/"),
        );
        assert_eq!(
            client.endpoint(),
            "https://demo.firebaseio.com/users/u1/readings.json"
        );
    }

    #[test]
    fn config_defaults() {
        let config = FeedConfig::new("https://demo.firebaseio.com")
            .with_auth_token(Some("secret".into()));
        assert_eq!(config.path, FeedConfig::DEFAULT_PATH);
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
    }
}
