//! Topic-suggestion request validation.

/// Errors that can occur when validating a topic-suggestion request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TopicValidationError {
    #[error("please describe your store's focus in at least 10 characters")]
    FocusTooShort,
}

/// A validated topic-suggestion request.
///
/// Wraps the free-text description of what the store sells, e.g. "selling
/// handmade artisanal pottery and ceramics".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRequest {
    store_focus: String,
}

impl TopicRequest {
    /// Minimum length of the store-focus description.
    pub const MIN_FOCUS_LENGTH: usize = 10;

    /// Validate a store-focus description.
    ///
    /// # Errors
    ///
    /// Returns [`TopicValidationError::FocusTooShort`] when the trimmed
    /// input is under 10 characters.
    pub fn parse(store_focus: &str) -> Result<Self, TopicValidationError> {
        let store_focus = store_focus.trim();
        if store_focus.chars().count() < Self::MIN_FOCUS_LENGTH {
            return Err(TopicValidationError::FocusTooShort);
        }
        Ok(Self {
            store_focus: store_focus.to_owned(),
        })
    }

    /// The validated store-focus text.
    #[must_use]
    pub fn store_focus(&self) -> &str {
        &self.store_focus
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_long_focus() {
        let request = TopicRequest::parse("selling handmade artisanal pottery and ceramics");
        assert!(request.is_ok());
    }

    #[test]
    fn test_parse_rejects_short_focus() {
        assert_eq!(
            TopicRequest::parse("stickers").unwrap_err(),
            TopicValidationError::FocusTooShort
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let request = TopicRequest::parse("  vinyl stickers  ").unwrap();
        assert_eq!(request.store_focus(), "vinyl stickers");
    }
}
