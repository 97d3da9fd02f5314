use unicode_segmentation::UnicodeSegmentation;

/// The name a visitor signs a contact-form message with.
#[derive(Clone, Debug)]
pub struct ContactName(String);

impl ContactName {
    /// Construct a valid [`ContactName`] from a String.
    pub fn parse(value: String) -> Result<ContactName, String> {
        let is_empty_or_whitespace = value.trim().is_empty();

        // Graphemes, not bytes: "ё" is one user-perceived character.
        let is_too_long = value.graphemes(true).count() > 256;

        if is_empty_or_whitespace {
            Err("Name is required".to_string())
        } else if is_too_long {
            Err(format!("{} is not a valid contact name", value))
        } else {
            Ok(Self(value.trim().to_string()))
        }
    }
}

impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
