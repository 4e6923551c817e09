//! Validated text primitives shared across the mnemo workspace.

/// Errors that can occur when constructing validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
}

/// A string that is guaranteed to hold at least one non-whitespace character.
///
/// Construction trims surrounding whitespace and rejects inputs that are empty
/// afterwards, so an invariant like "every result carries a topic" can be
/// carried in the type rather than re-checked at each use site. Serializes as
/// a plain string; deserialization runs the same validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Builds a `NonEmptyText` from anything string-like.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] when the trimmed input has no content.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrows the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the validated `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NonEmptyText::new(value)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NonEmptyText::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_whitespace() {
        let text = NonEmptyText::new("  Sepsis  ").unwrap();
        assert_eq!(text.as_str(), "Sepsis");
    }

    #[test]
    fn test_new_rejects_empty_and_blank() {
        assert!(NonEmptyText::new("").is_err());
        assert!(NonEmptyText::new("   \n\t ").is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let text = NonEmptyText::new("Cushing's Syndrome").unwrap();
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, "\"Cushing's Syndrome\"");
    }

    #[test]
    fn test_deserialize_revalidates() {
        let ok: Result<NonEmptyText, _> = serde_json::from_str("\"Nephron\"");
        assert_eq!(ok.unwrap().as_str(), "Nephron");

        let blank: Result<NonEmptyText, _> = serde_json::from_str("\"  \"");
        assert!(blank.is_err());
    }
}
