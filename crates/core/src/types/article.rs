//! Blog article types and submission validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::id::ArticleId;

/// Moderation state of a submitted article.
///
/// Every article starts in `Review`. Transitions are admin-triggered only;
/// any state may move to any other state (the dashboard merely hides the
/// no-op transition to the current state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    #[default]
    Review,
    Accepted,
    Archived,
    Deleted,
}

impl ArticleStatus {
    /// All statuses, in dashboard display order.
    pub const ALL: [Self; 4] = [Self::Review, Self::Accepted, Self::Archived, Self::Deleted];
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Self::Review => "review",
            Self::Accepted => "accepted",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        };
        write!(f, "{token}")
    }
}

impl std::str::FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "review" => Ok(Self::Review),
            "accepted" => Ok(Self::Accepted),
            "archived" => Ok(Self::Archived),
            "deleted" => Ok(Self::Deleted),
            _ => Err(format!("invalid article status: {s}")),
        }
    }
}

/// A submitted blog-post reference awaiting or past moderation (domain type).
///
/// Articles are references to externally hosted posts; the store never
/// hosts article bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub author: String,
    pub short_description: String,
    /// URL of the article itself.
    pub link: String,
    /// Publication date claimed by the submitter.
    pub published_on: NaiveDate,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Errors that can occur when validating an article submission form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    #[error("title must be at least 5 characters long")]
    TitleTooShort,
    #[error("author must be at least 2 characters long")]
    AuthorTooShort,
    #[error("short description must be at least 20 characters long")]
    DescriptionTooShort,
    #[error("article link must be a valid URL")]
    InvalidLink,
}

/// A validated article submission.
///
/// Carries no status field on purpose: submissions always enter moderation
/// as [`ArticleStatus::Review`], whatever the caller might have wanted.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub author: String,
    pub short_description: String,
    pub link: String,
    pub published_on: NaiveDate,
}

impl NewArticle {
    /// Minimum title length.
    pub const MIN_TITLE_LENGTH: usize = 5;
    /// Minimum author length.
    pub const MIN_AUTHOR_LENGTH: usize = 2;
    /// Minimum short description length.
    pub const MIN_DESCRIPTION_LENGTH: usize = 20;

    /// Validate raw form input into a `NewArticle`.
    ///
    /// # Errors
    ///
    /// Returns the first constraint violation found.
    pub fn parse(
        title: &str,
        author: &str,
        short_description: &str,
        link: &str,
        published_on: NaiveDate,
    ) -> Result<Self, ArticleValidationError> {
        let title = title.trim();
        if title.chars().count() < Self::MIN_TITLE_LENGTH {
            return Err(ArticleValidationError::TitleTooShort);
        }

        let author = author.trim();
        if author.chars().count() < Self::MIN_AUTHOR_LENGTH {
            return Err(ArticleValidationError::AuthorTooShort);
        }

        let short_description = short_description.trim();
        if short_description.chars().count() < Self::MIN_DESCRIPTION_LENGTH {
            return Err(ArticleValidationError::DescriptionTooShort);
        }

        let link = link.trim();
        url::Url::parse(link).map_err(|_| ArticleValidationError::InvalidLink)?;

        Ok(Self {
            title: title.to_owned(),
            author: author.to_owned(),
            short_description: short_description.to_owned(),
            link: link.to_owned(),
            published_on,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_parse_valid_article() {
        let article = NewArticle::parse(
            "Five ways to use stickers",
            "Terry",
            "A practical tour of sticker placement ideas for laptops and water bottles.",
            "https://blog.example.com/five-ways",
            date(),
        )
        .unwrap();
        assert_eq!(article.author, "Terry");
    }

    #[test]
    fn test_parse_rejects_short_title() {
        let err = NewArticle::parse(
            "Four",
            "Terry",
            "A practical tour of sticker placement ideas for laptops.",
            "https://blog.example.com/x",
            date(),
        )
        .unwrap_err();
        assert_eq!(err, ArticleValidationError::TitleTooShort);
    }

    #[test]
    fn test_parse_rejects_short_author() {
        let err = NewArticle::parse(
            "Five ways to use stickers",
            "T",
            "A practical tour of sticker placement ideas for laptops.",
            "https://blog.example.com/x",
            date(),
        )
        .unwrap_err();
        assert_eq!(err, ArticleValidationError::AuthorTooShort);
    }

    #[test]
    fn test_parse_rejects_short_description() {
        let err = NewArticle::parse(
            "Five ways to use stickers",
            "Terry",
            "Too short.",
            "https://blog.example.com/x",
            date(),
        )
        .unwrap_err();
        assert_eq!(err, ArticleValidationError::DescriptionTooShort);
    }

    #[test]
    fn test_parse_rejects_bad_link() {
        let err = NewArticle::parse(
            "Five ways to use stickers",
            "Terry",
            "A practical tour of sticker placement ideas for laptops.",
            "not-a-url",
            date(),
        )
        .unwrap_err();
        assert_eq!(err, ArticleValidationError::InvalidLink);
    }

    #[test]
    fn test_status_from_str_roundtrip() {
        for status in ArticleStatus::ALL {
            let parsed: ArticleStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_default_status_is_review() {
        assert_eq!(ArticleStatus::default(), ArticleStatus::Review);
    }
}
