use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use crate::{
    error::ResponseError,
    github_client::{GithubClient, GithubError},
};

/// Relays the repository list of the configured GitHub account.
#[tracing::instrument(name = "Listing GitHub repositories", skip(github))]
pub async fn list_repos(
    State(github): State<Arc<GithubClient>>,
) -> Result<impl IntoResponse, ReposError> {
    let repos = github.list_repos().await?;
    Ok(Json(repos))
}

#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct ReposError(#[from] GithubError);

impl IntoResponse for ReposError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{:?}", self.0);
        match self.0 {
            // Upstream status is passed through, with its body as details.
            GithubError::UnexpectedStatus { status, body } => {
                ResponseError::new(status, "GitHub API error").with_details(body)
            }
            GithubError::Transport(e) => {
                ResponseError::internal("Failed to fetch GitHub repos").with_details(e.to_string())
            }
        }
        .into_response()
    }
}
