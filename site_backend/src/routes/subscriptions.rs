use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use axum_macros::debug_handler;
use serde::Deserialize;

use crate::{
    configuration::SiteSettings,
    domain::SubscriberEmail,
    email_client::EmailClient,
    email_templates,
    error::ResponseError,
    error_chain_fmt,
    routes::SuccessResponse,
    subscriber_store::{AddOutcome, StoreError, SubscriberStore},
};

#[derive(Debug, Deserialize)]
pub struct SubscribeBody {
    email: Option<String>,
}

impl TryFrom<SubscribeBody> for SubscriberEmail {
    type Error = String;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        match body.email {
            Some(email) if !email.trim().is_empty() => SubscriberEmail::parse(email),
            _ => Err("Email required".to_string()),
        }
    }
}

/// Records the address and sends a confirmation to it.
///
/// When the confirmation cannot be sent the address stays subscribed and
/// the caller gets a 500.
#[cfg_attr(any(test, debug_assertions), debug_handler(state = crate::startup::AppState))]
#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(store, email_client, site, body),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    State(store): State<Arc<SubscriberStore>>,
    State(email_client): State<Arc<EmailClient>>,
    State(site): State<SiteSettings>,
    WithRejection(Json(body), _): WithRejection<Json<SubscribeBody>, SubscribeError>,
) -> Result<impl IntoResponse, SubscribeError> {
    let email: SubscriberEmail = body.try_into().map_err(SubscribeError::ValidationError)?;
    tracing::Span::current().record("subscriber_email", &tracing::field::display(&email));

    match store
        .add_if_absent(&email)
        .await
        .map_err(SubscribeError::StoreError)?
    {
        AddOutcome::Added => tracing::info!("New subscriber details have been saved."),
        AddOutcome::AlreadyPresent => tracing::info!("Subscriber was already on the list."),
    }

    send_confirmation_email(&email_client, &site, &email)
        .await
        .map_err(SubscribeError::SendEmailError)?;

    Ok(Json(SuccessResponse::new("Subscribed successfully")))
}

#[tracing::instrument(
    name = "Send a confirmation email to a new subscriber",
    skip(email_client, site, email)
)]
pub async fn send_confirmation_email(
    email_client: &EmailClient,
    site: &SiteSettings,
    email: &SubscriberEmail,
) -> Result<(), reqwest::Error> {
    let template = email_templates::subscription_confirmation(site, email);
    email_client.send_email(email, &template).await
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to store the new subscriber")]
    StoreError(#[source] StoreError),
    #[error("Failed to send a confirmation email")]
    SendEmailError(#[source] reqwest::Error),
}

impl From<JsonRejection> for SubscribeError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for SubscribeError {
    fn into_response(self) -> axum::response::Response {
        match self {
            SubscribeError::ValidationError(ref message) => {
                tracing::warn!("Rejected a subscription: {}", message);
                ResponseError::bad_request(message.clone())
            }
            SubscribeError::StoreError(_) | SubscribeError::SendEmailError(_) => {
                tracing::error!("{:?}", self);
                ResponseError::internal("Failed to subscribe")
            }
        }
        .into_response()
    }
}
