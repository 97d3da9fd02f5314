use unicode_segmentation::UnicodeSegmentation;

/// Body of a contact-form submission.
#[derive(Clone, Debug)]
pub struct ContactMessage(String);

impl ContactMessage {
    const MAX_GRAPHEMES: usize = 10_000;

    pub fn parse(value: String) -> Result<ContactMessage, String> {
        if value.trim().is_empty() {
            return Err("Message is required".to_string());
        }
        if value.graphemes(true).count() > Self::MAX_GRAPHEMES {
            return Err(format!(
                "Message must be at most {} characters long",
                Self::MAX_GRAPHEMES
            ));
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for ContactMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
