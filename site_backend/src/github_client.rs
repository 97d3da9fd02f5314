use reqwest::{header, Client, StatusCode};
use secrecy::{ExposeSecret, Secret};

use crate::error_chain_fmt;

/// Client for the upstream repository-listing API.
pub struct GithubClient {
    base_url: String,
    http_client: Client,
    token: Secret<String>,
}

impl GithubClient {
    pub fn new(base_url: String, token: Secret<String>, timeout: std::time::Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build the GitHub http client");
        Self {
            base_url,
            http_client,
            token,
        }
    }

    /// Repositories of the authenticated user, as returned by the API.
    #[tracing::instrument(name = "Fetch repositories from GitHub", skip(self))]
    pub async fn list_repos(&self) -> Result<serde_json::Value, GithubError> {
        let url = format!("{}/user/repos", self.base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(GithubError::UnexpectedStatus { status, body });
        }

        Ok(response.json().await?)
    }
}

#[derive(thiserror::Error)]
pub enum GithubError {
    #[error("GitHub API responded with {status}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("Failed to reach the GitHub API")]
    Transport(#[from] reqwest::Error),
}

impl std::fmt::Debug for GithubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
