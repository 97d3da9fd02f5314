use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::{domain::SubscriberEmail, email_templates::EmailTemplate};

/// Client for the HTTP mail API.
///
/// A single instance is shared by the request handlers and the broadcast
/// worker, so the underlying connection pool is reused.
pub struct EmailClient {
    base_url: String,
    http_client: Client,
    sender: SubscriberEmail,
    username: String,
    password: Secret<String>,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: SubscriberEmail,
        username: String,
        password: Secret<String>,
        timeout: std::time::Duration,
    ) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build the email http client");
        Self {
            base_url,
            http_client,
            sender,
            username,
            password,
        }
    }

    /// Sends exactly one message; a non-2xx response from the API is an error.
    pub async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        template: &EmailTemplate,
    ) -> Result<(), reqwest::Error> {
        self.send(recipient, template, None).await
    }

    /// Like [`EmailClient::send_email`], with replies addressed to `reply_to`
    /// instead of the sender.
    pub async fn send_email_with_reply_to(
        &self,
        recipient: &SubscriberEmail,
        template: &EmailTemplate,
        reply_to: &SubscriberEmail,
    ) -> Result<(), reqwest::Error> {
        self.send(recipient, template, Some(reply_to)).await
    }

    async fn send(
        &self,
        recipient: &SubscriberEmail,
        template: &EmailTemplate,
        reply_to: Option<&SubscriberEmail>,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/email", self.base_url.trim_end_matches('/'));

        let request_body = SendEmailRequest {
            from: self.sender.as_ref(),
            to: recipient.as_ref(),
            reply_to: reply_to.map(|r| r.as_ref()),
            subject: &template.subject,
            html_body: &template.html_body,
            text_body: &template.text_body,
        };

        self.http_client
            .post(&url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}
