//! Messages sent by the application.
//!
//! Every builder returns both an HTML and a plain-text body. Values coming
//! from visitors are escaped before they are placed in HTML.

use crate::{
    configuration::SiteSettings,
    domain::{ContactSubmission, SubscriberEmail},
    markup::escape,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

const DEFAULT_CONTACT_SUBJECT: &str = "New Contact Form Message";

/// Forwarded to the operator inbox when a visitor submits the contact form.
pub fn contact_notification(submission: &ContactSubmission) -> EmailTemplate {
    let subject = submission
        .subject
        .as_deref()
        .filter(|s| !s.trim().is_empty());
    let name = escape(submission.name.as_ref());
    let email = escape(submission.email.as_ref());
    let message = escape(submission.message.as_ref()).replace('\n', "<br/>");

    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px;">
  <h2 style="color: #00BCD4;">New Contact Message</h2>
  <p><strong>Name:</strong> {name}</p>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Subject:</strong> {subject}</p>
  <p><strong>Message:</strong><br/>{message}</p>
</div>"#,
        subject = escape(subject.unwrap_or("N/A")),
    );
    let text_body = format!(
        "New Contact Message\n\nName: {}\nEmail: {}\nSubject: {}\n\n{}",
        submission.name,
        submission.email,
        subject.unwrap_or("N/A"),
        submission.message.as_ref(),
    );

    EmailTemplate {
        subject: subject.unwrap_or(DEFAULT_CONTACT_SUBJECT).to_owned(),
        html_body,
        text_body,
    }
}

/// Auto-reply to the visitor who submitted the contact form.
pub fn contact_acknowledgement(site: &SiteSettings, submission: &ContactSubmission) -> EmailTemplate {
    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 25px;">
  <h2 style="color: #00BCD4;">Hi {name},</h2>
  <p>Thank you for reaching out to <strong>{site_name}</strong>.</p>
  <p>We'll respond to your message within 24 hours.</p>
  {button}
  <p>The {site_name} Team</p>
</div>"#,
        name = escape(submission.name.as_ref()),
        site_name = escape(&site.name),
        button = visit_button(&site.base_url, "Visit Website"),
    );
    let text_body = format!(
        "Hi {},\n\nThank you for reaching out to {}.\nWe'll respond to your message within 24 hours.\n\n{}\n\nThe {} Team",
        submission.name, site.name, site.base_url, site.name,
    );

    EmailTemplate {
        subject: format!("✅ Thanks for contacting {}", site.name),
        html_body,
        text_body,
    }
}

/// Sent to a visitor right after they subscribe.
pub fn subscription_confirmation(site: &SiteSettings, email: &SubscriberEmail) -> EmailTemplate {
    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 25px;">
  <h2 style="color:#00BCD4;">Hi there!</h2>
  <p>Thanks for subscribing to <strong>{site_name}</strong> daily updates.</p>
  <p>You'll receive our latest news and tutorials daily at {email}.</p>
  {button}
</div>"#,
        site_name = escape(&site.name),
        email = escape(email.as_ref()),
        button = visit_button(&site.base_url, &format!("Visit {}", site.name)),
    );
    let text_body = format!(
        "Hi there!\n\nThanks for subscribing to {} daily updates.\nYou'll receive our latest news and tutorials daily at {}.\n\n{}",
        site.name, email, site.base_url,
    );

    EmailTemplate {
        subject: "✅ Subscription Confirmed".to_owned(),
        html_body,
        text_body,
    }
}

/// The daily message delivered to every subscriber.
pub fn daily_broadcast(site: &SiteSettings) -> EmailTemplate {
    const HIGHLIGHTS: [&str; 3] = [
        "Latest MERN stack tutorials",
        "Rapid prototyping tips",
        "Web development insights",
    ];

    let items: String = HIGHLIGHTS
        .iter()
        .map(|h| format!("\n    <li>{h}</li>"))
        .collect();
    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; padding:25px;">
  <h2 style="color:#00BCD4;">Hello Subscriber!</h2>
  <p>Here are your daily updates from <strong>{site_name}</strong>.</p>
  <ul>{items}
  </ul>
  {button}
</div>"#,
        site_name = escape(&site.name),
        button = visit_button(&site.base_url, &format!("Visit {}", site.name)),
    );
    let text_items: String = HIGHLIGHTS.iter().map(|h| format!("\n- {h}")).collect();
    let text_body = format!(
        "Hello Subscriber!\n\nHere are your daily updates from {}.\n{}\n\n{}",
        site.name, text_items, site.base_url,
    );

    EmailTemplate {
        subject: format!("🌟 Daily Updates from {}", site.name),
        html_body,
        text_body,
    }
}

fn visit_button(url: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" style="background:#FF9800; color:white; padding:10px 20px; text-decoration:none; border-radius:6px;">{}</a>"#,
        escape(url),
        escape(label),
    )
}
