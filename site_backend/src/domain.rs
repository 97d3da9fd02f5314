mod contact_message;
mod contact_name;
mod contact_submission;
mod subscriber_email;

pub use contact_message::ContactMessage;
pub use contact_name::ContactName;
pub use contact_submission::ContactSubmission;
pub use subscriber_email::SubscriberEmail;
