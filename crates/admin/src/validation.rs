//! Product form validation.
//!
//! Runs entirely client-side of the remote store: invalid input is rejected
//! here and never turns into a remote call.

use rust_decimal::Decimal;
use thiserror::Error;

use gadget_grove_core::{Price, PriceError};
use serde::Deserialize;

/// Raw product form as submitted by the editor.
///
/// The price arrives as a string, exactly as typed into the form field.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
}

/// A validated product form.
#[derive(Debug, Clone)]
pub struct ValidProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
}

/// Client-side form check failures; these never reach the remote store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,
    #[error("Description is required")]
    EmptyDescription,
    #[error("Price must be a number")]
    UnparsablePrice(String),
    #[error("Price must be a positive number")]
    NonPositivePrice,
    #[error("Must be a valid URL")]
    InvalidImageUrl(String),
}

impl From<PriceError> for ValidationError {
    fn from(_: PriceError) -> Self {
        Self::NonPositivePrice
    }
}

impl ProductForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns the first failing check: empty name or description, a price
    /// that is not a strictly positive decimal, or an image reference that
    /// is not a syntactically valid http(s) URL.
    pub fn validate(&self) -> Result<ValidProduct, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let amount: Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| ValidationError::UnparsablePrice(self.price.clone()))?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice);
        }
        let price = Price::new(amount)?;

        let image_url = validate_image_url(&self.image_url)?;

        Ok(ValidProduct {
            name: name.to_string(),
            description: description.to_string(),
            price,
            image_url,
        })
    }
}

fn validate_image_url(raw: &str) -> Result<String, ValidationError> {
    let parsed =
        url::Url::parse(raw).map_err(|_| ValidationError::InvalidImageUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidImageUrl(raw.to_string()));
    }
    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn form(name: &str, description: &str, price: &str, image_url: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            description: description.to_string(),
            price: price.to_string(),
            image_url: image_url.to_string(),
        }
    }

    const IMAGE: &str = "https://images.example.com/laptop.jpg";

    #[test]
    fn a_complete_form_validates() {
        let valid = form("MacBook Pro 16\"", "Powerful laptop.", "2499.99", IMAGE)
            .validate()
            .expect("valid form");
        assert_eq!(valid.name, "MacBook Pro 16\"");
        assert_eq!(valid.price.to_string(), "$2499.99");
    }

    #[rstest]
    #[case("", "desc", "10", ValidationError::EmptyName)]
    #[case("   ", "desc", "10", ValidationError::EmptyName)]
    #[case("name", "", "10", ValidationError::EmptyDescription)]
    #[case("name", "desc", "-5", ValidationError::NonPositivePrice)]
    #[case("name", "desc", "0", ValidationError::NonPositivePrice)]
    #[case(
        "name",
        "desc",
        "not-a-number",
        ValidationError::UnparsablePrice("not-a-number".to_string())
    )]
    fn invalid_fields_are_rejected(
        #[case] name: &str,
        #[case] description: &str,
        #[case] price: &str,
        #[case] expected: ValidationError,
    ) {
        let result = form(name, description, price, IMAGE).validate();
        assert_eq!(result.expect_err("invalid form"), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://files.example.com/laptop.jpg")]
    #[case("javascript:alert(1)")]
    fn non_http_image_references_are_rejected(#[case] raw: &str) {
        let result = form("name", "desc", "10", raw).validate();
        assert!(matches!(result, Err(ValidationError::InvalidImageUrl(_))));
    }

    #[test]
    fn whitespace_is_trimmed_from_text_fields() {
        let valid = form("  Dell XPS 15  ", "  Premium ultrabook.  ", "1999.99", IMAGE)
            .validate()
            .expect("valid form");
        assert_eq!(valid.name, "Dell XPS 15");
        assert_eq!(valid.description, "Premium ultrabook.");
    }
}
