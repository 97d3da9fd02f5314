use serde_json::json;
use wiremock::{
    matchers::{any, body_string_contains, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::spawn_app;

fn valid_submission() -> serde_json::Value {
    json!({
        "name": "Ursula Le Guin",
        "email": "ursula_le_guin@gmail.com",
        "subject": "A project",
        "message": "Hello there!\nCould we talk?"
    })
}

#[tokio::test]
async fn contact_returns_200_and_sends_two_emails_for_a_valid_submission() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_contact(&valid_submission()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "message": "Message sent successfully"}));
}

#[tokio::test]
async fn the_operator_is_notified_with_a_reply_to_the_visitor() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;

    // Act
    app.post_contact(&valid_submission()).await;

    // Assert
    let sent = app.sent_emails().await;
    assert_eq!(sent.len(), 2);

    let notification = &sent[0];
    assert_eq!(notification["To"], app.operator_email.as_str());
    assert_eq!(notification["ReplyTo"], "ursula_le_guin@gmail.com");
    assert_eq!(notification["Subject"], "A project");
    assert!(notification["HtmlBody"]
        .as_str()
        .unwrap()
        .contains("Hello there!<br/>Could we talk?"));

    let acknowledgement = &sent[1];
    assert_eq!(acknowledgement["To"], "ursula_le_guin@gmail.com");
    assert!(acknowledgement.get("ReplyTo").is_none());
}

#[tokio::test]
async fn the_notification_subject_defaults_when_none_is_given() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;
    let mut submission = valid_submission();
    submission.as_object_mut().unwrap().remove("subject");

    // Act
    let response = app.post_contact(&submission).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let sent = app.sent_emails().await;
    assert_eq!(sent[0]["Subject"], "New Contact Form Message");
}

#[tokio::test]
async fn contact_returns_400_when_fields_are_missing() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = vec![
        (
            json!({"email": "ursula_le_guin@gmail.com", "message": "Hi"}),
            "missing the name",
        ),
        (json!({"name": "Ursula", "message": "Hi"}), "missing the email"),
        (
            json!({"name": "Ursula", "email": "ursula_le_guin@gmail.com"}),
            "missing the message",
        ),
        (
            json!({"name": "", "email": "ursula_le_guin@gmail.com", "message": "Hi"}),
            "an empty name",
        ),
        (json!({}), "an empty object"),
    ];

    for (invalid_body, description) in test_cases {
        // Act
        let response = app.post_contact(&invalid_body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 when the payload was {description}"
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "All fields are required");
    }
}

#[tokio::test]
async fn contact_returns_400_for_an_invalid_email() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app
        .post_contact(&json!({"name": "Ursula", "email": "not-an-email", "message": "Hi"}))
        .await;

    // Assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn contact_returns_500_when_the_operator_notification_fails() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_contact(&valid_submission()).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to send message");
}

#[tokio::test]
async fn contact_returns_500_when_the_acknowledgement_fails() {
    // Arrange
    let app = spawn_app().await;
    // The acknowledgement is the only message addressed to the visitor.
    Mock::given(body_string_contains(r#""To":"ursula_le_guin@gmail.com""#))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_contact(&valid_submission()).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to send message");
}
