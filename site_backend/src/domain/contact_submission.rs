use super::{ContactMessage, ContactName, SubscriberEmail};

/// A validated contact-form submission.
#[derive(Clone, Debug)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: SubscriberEmail,
    pub subject: Option<String>,
    pub message: ContactMessage,
}
