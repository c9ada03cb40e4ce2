//! Product catalog types and form validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Product category tag drawn from a fixed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductLabel {
    Sticker,
    BumperSticker,
    Button,
    Magnet,
    TShirt,
    EconomyStickers,
    StickersSheets,
    CustomHats,
}

impl ProductLabel {
    /// All labels, in the order they appear in the upload form.
    pub const ALL: [Self; 8] = [
        Self::Sticker,
        Self::BumperSticker,
        Self::Button,
        Self::Magnet,
        Self::TShirt,
        Self::EconomyStickers,
        Self::StickersSheets,
        Self::CustomHats,
    ];

    /// Human-readable name for display.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Sticker => "Sticker",
            Self::BumperSticker => "Bumper Sticker",
            Self::Button => "Button",
            Self::Magnet => "Magnet",
            Self::TShirt => "T-Shirt",
            Self::EconomyStickers => "Economy Stickers",
            Self::StickersSheets => "Sticker Sheets",
            Self::CustomHats => "Custom Hats",
        }
    }
}

impl std::fmt::Display for ProductLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Self::Sticker => "sticker",
            Self::BumperSticker => "bumper_sticker",
            Self::Button => "button",
            Self::Magnet => "magnet",
            Self::TShirt => "t_shirt",
            Self::EconomyStickers => "economy_stickers",
            Self::StickersSheets => "stickers_sheets",
            Self::CustomHats => "custom_hats",
        };
        write!(f, "{token}")
    }
}

impl std::str::FromStr for ProductLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sticker" => Ok(Self::Sticker),
            "bumper_sticker" => Ok(Self::BumperSticker),
            "button" => Ok(Self::Button),
            "magnet" => Ok(Self::Magnet),
            "t_shirt" => Ok(Self::TShirt),
            "economy_stickers" => Ok(Self::EconomyStickers),
            "stickers_sheets" => Ok(Self::StickersSheets),
            "custom_hats" => Ok(Self::CustomHats),
            _ => Err(format!("invalid product label: {s}")),
        }
    }
}

/// A catalog item with an external purchase link (domain type).
///
/// The store does not sell directly; every product links out to the page
/// where it can be bought.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Counter-assigned numeric ID, unique and assigned exactly once.
    pub id: ProductId,
    pub title: String,
    /// URL of the product page in the external store.
    pub link: String,
    pub image_url: String,
    pub label: ProductLabel,
    /// Up to [`NewProduct::MAX_BULLETS`] selling-point strings.
    pub bullets: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether this record carries everything the catalog needs to render it.
    ///
    /// Malformed records are treated as absent, not fatal.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.link.trim().is_empty()
            && !self.image_url.trim().is_empty()
    }
}

/// Errors that can occur when validating a product upload form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    #[error("title must be at least 3 characters long")]
    TitleTooShort,
    #[error("store link must be a valid URL")]
    InvalidLink,
    #[error("image URL must be a valid URL")]
    InvalidImageUrl,
    #[error("unknown label: {0}")]
    UnknownLabel(String),
    #[error("a product can have at most 5 bullet points")]
    TooManyBullets,
    #[error("bullet points cannot be empty")]
    EmptyBullet,
}

/// A validated product upload, ready for ID allocation and persistence.
///
/// Construct via [`NewProduct::parse`]; the constructor is the validation
/// layer for the upload form, so a value of this type always satisfies the
/// catalog constraints.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub link: String,
    pub image_url: String,
    pub label: ProductLabel,
    pub bullets: Vec<String>,
}

impl NewProduct {
    /// Minimum title length.
    pub const MIN_TITLE_LENGTH: usize = 3;
    /// Maximum number of bullet points per product.
    pub const MAX_BULLETS: usize = 5;

    /// Validate raw form input into a `NewProduct`.
    ///
    /// # Errors
    ///
    /// Returns the first constraint violation found: short title, malformed
    /// link or image URL, unknown label, more than 5 bullets, or an empty
    /// bullet entry.
    pub fn parse(
        title: &str,
        link: &str,
        image_url: &str,
        label: &str,
        bullets: &[String],
    ) -> Result<Self, ProductValidationError> {
        let title = title.trim();
        if title.chars().count() < Self::MIN_TITLE_LENGTH {
            return Err(ProductValidationError::TitleTooShort);
        }

        let link = link.trim();
        url::Url::parse(link).map_err(|_| ProductValidationError::InvalidLink)?;

        let image_url = image_url.trim();
        url::Url::parse(image_url).map_err(|_| ProductValidationError::InvalidImageUrl)?;

        let label: ProductLabel = label
            .parse()
            .map_err(|_| ProductValidationError::UnknownLabel(label.to_owned()))?;

        if bullets.len() > Self::MAX_BULLETS {
            return Err(ProductValidationError::TooManyBullets);
        }
        let mut trimmed = Vec::with_capacity(bullets.len());
        for bullet in bullets {
            let bullet = bullet.trim();
            if bullet.is_empty() {
                return Err(ProductValidationError::EmptyBullet);
            }
            trimmed.push(bullet.to_owned());
        }

        Ok(Self {
            title: title.to_owned(),
            link: link.to_owned(),
            image_url: image_url.to_owned(),
            label,
            bullets: trimmed,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bullets(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("point {i}")).collect()
    }

    #[test]
    fn test_parse_valid_product() {
        let product = NewProduct::parse(
            "Cool Astronaut Sticker",
            "https://store.example.com/p/astronaut",
            "https://cdn.example.com/astronaut.png",
            "sticker",
            &bullets(3),
        )
        .unwrap();
        assert_eq!(product.label, ProductLabel::Sticker);
        assert_eq!(product.bullets.len(), 3);
    }

    #[test]
    fn test_parse_rejects_short_title() {
        let err = NewProduct::parse(
            "ab",
            "https://store.example.com/p/x",
            "https://cdn.example.com/x.png",
            "sticker",
            &[],
        )
        .unwrap_err();
        assert_eq!(err, ProductValidationError::TitleTooShort);
    }

    #[test]
    fn test_parse_rejects_bad_urls() {
        assert_eq!(
            NewProduct::parse("Magnet", "not a url", "https://cdn.example.com/x.png", "magnet", &[])
                .unwrap_err(),
            ProductValidationError::InvalidLink
        );
        assert_eq!(
            NewProduct::parse("Magnet", "https://store.example.com/p/x", "nope", "magnet", &[])
                .unwrap_err(),
            ProductValidationError::InvalidImageUrl
        );
    }

    #[test]
    fn test_parse_rejects_unknown_label() {
        let err = NewProduct::parse(
            "Magnet",
            "https://store.example.com/p/x",
            "https://cdn.example.com/x.png",
            "poster",
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ProductValidationError::UnknownLabel(_)));
    }

    #[test]
    fn test_parse_accepts_zero_to_five_bullets() {
        for n in 0..=NewProduct::MAX_BULLETS {
            assert!(
                NewProduct::parse(
                    "Magnet",
                    "https://store.example.com/p/x",
                    "https://cdn.example.com/x.png",
                    "magnet",
                    &bullets(n),
                )
                .is_ok(),
                "{n} bullets should be accepted"
            );
        }
    }

    #[test]
    fn test_parse_rejects_sixth_bullet() {
        let err = NewProduct::parse(
            "Magnet",
            "https://store.example.com/p/x",
            "https://cdn.example.com/x.png",
            "magnet",
            &bullets(6),
        )
        .unwrap_err();
        assert_eq!(err, ProductValidationError::TooManyBullets);
    }

    #[test]
    fn test_parse_rejects_blank_bullet() {
        let err = NewProduct::parse(
            "Magnet",
            "https://store.example.com/p/x",
            "https://cdn.example.com/x.png",
            "magnet",
            &["  ".to_owned()],
        )
        .unwrap_err();
        assert_eq!(err, ProductValidationError::EmptyBullet);
    }

    #[test]
    fn test_label_from_str_roundtrip() {
        for label in ProductLabel::ALL {
            let parsed: ProductLabel = label.to_string().parse().unwrap();
            assert_eq!(parsed, label);
        }
    }

    #[test]
    fn test_is_displayable_rejects_blank_fields() {
        let mut product = Product {
            id: ProductId::new(1),
            title: "Sticker".to_owned(),
            link: "https://store.example.com/p/1".to_owned(),
            image_url: "https://cdn.example.com/1.png".to_owned(),
            label: ProductLabel::Sticker,
            bullets: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(product.is_displayable());

        product.image_url = String::new();
        assert!(!product.is_displayable());
    }
}
