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
    domain::{ContactMessage, ContactName, ContactSubmission, SubscriberEmail},
    email_client::EmailClient,
    email_templates,
    error::ResponseError,
    error_chain_fmt,
    routes::SuccessResponse,
    startup::OperatorEmail,
};

#[derive(Debug, Deserialize)]
pub struct ContactBody {
    name: Option<String>,
    email: Option<String>,
    subject: Option<String>,
    message: Option<String>,
}

impl TryFrom<ContactBody> for ContactSubmission {
    type Error = String;

    fn try_from(body: ContactBody) -> Result<Self, Self::Error> {
        let present = |field: Option<String>| field.filter(|v| !v.trim().is_empty());
        let (Some(name), Some(email), Some(message)) =
            (present(body.name), present(body.email), present(body.message))
        else {
            return Err("All fields are required".to_string());
        };

        Ok(Self {
            name: ContactName::parse(name)?,
            email: SubscriberEmail::parse(email)?,
            subject: present(body.subject),
            message: ContactMessage::parse(message)?,
        })
    }
}

/// Forwards a contact-form submission to the operator inbox and sends the
/// visitor an acknowledgement.
#[cfg_attr(any(test, debug_assertions), debug_handler(state = crate::startup::AppState))]
#[tracing::instrument(
    name = "Handling a contact form submission",
    skip(email_client, operator, site, body),
    fields(visitor_email = tracing::field::Empty)
)]
pub async fn contact(
    State(email_client): State<Arc<EmailClient>>,
    State(OperatorEmail(operator)): State<OperatorEmail>,
    State(site): State<SiteSettings>,
    WithRejection(Json(body), _): WithRejection<Json<ContactBody>, ContactError>,
) -> Result<impl IntoResponse, ContactError> {
    let submission: ContactSubmission =
        body.try_into().map_err(ContactError::ValidationError)?;
    tracing::Span::current().record("visitor_email", &tracing::field::display(&submission.email));

    let notification = email_templates::contact_notification(&submission);
    email_client
        .send_email_with_reply_to(&operator, &notification, &submission.email)
        .await
        .map_err(ContactError::NotifyOperatorError)?;

    let acknowledgement = email_templates::contact_acknowledgement(&site, &submission);
    email_client
        .send_email(&submission.email, &acknowledgement)
        .await
        .map_err(ContactError::AcknowledgeError)?;

    tracing::info!("Contact message delivered.");
    Ok(Json(SuccessResponse::new("Message sent successfully")))
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to forward the message to the operator inbox")]
    NotifyOperatorError(#[source] reqwest::Error),
    #[error("Failed to send the acknowledgement to the visitor")]
    AcknowledgeError(#[source] reqwest::Error),
}

impl From<JsonRejection> for ContactError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ContactError::ValidationError(ref message) => {
                tracing::warn!("Rejected a contact form submission: {}", message);
                ResponseError::bad_request(message.clone())
            }
            // Which of the two sends failed stays in the logs only.
            ContactError::NotifyOperatorError(_) | ContactError::AcknowledgeError(_) => {
                tracing::error!("{:?}", self);
                ResponseError::internal("Failed to send message")
            }
        }
        .into_response()
    }
}
