//! Catalog item types and field validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::status::StockStatus;

/// A field-level rule violated by an [`ItemDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,
    #[error("price must be greater than 0")]
    PriceNotPositive,
    #[error("description must be at least {min} characters")]
    DescriptionTooShort { min: usize },
    #[error("category is required")]
    CategoryRequired,
    #[error("image URL is required")]
    ImageRequired,
    #[error("rating must be between 0 and {max}")]
    RatingOutOfRange { max: u8 },
}

/// A sellable catalog entry as held by the stores.
///
/// Identifiers come from the remote catalog service; nothing in this
/// workspace originates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub brand: Option<String>,
    pub image_url: String,
    pub stock: u32,
    pub rating: f64,
    pub available: bool,
    pub features: Option<String>,
}

impl Item {
    /// Writable fields of this item, for a full replacement.
    #[must_use]
    pub fn to_draft(&self) -> ItemDraft {
        ItemDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            category: self.category.clone(),
            brand: self.brand.clone(),
            image_url: self.image_url.clone(),
            stock: self.stock,
            rating: self.rating,
            available: self.available,
            features: self.features.clone(),
        }
    }

    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }
}

/// The writable part of an [`Item`]: what create and update submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub brand: Option<String>,
    pub image_url: String,
    pub stock: u32,
    pub rating: f64,
    pub available: bool,
    pub features: Option<String>,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: Decimal::ZERO,
            category: String::new(),
            brand: None,
            image_url: String::new(),
            stock: 0,
            rating: 0.0,
            available: true,
            features: None,
        }
    }
}

impl ItemDraft {
    /// Minimum trimmed description length.
    pub const MIN_DESCRIPTION_LENGTH: usize = 10;

    /// Maximum rating.
    pub const MAX_RATING: u8 = 5;

    /// Check the rules every create/update must satisfy.
    ///
    /// # Errors
    ///
    /// Returns every violated rule, in field order, when at least one fails.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        into_result(self.core_violations())
    }

    /// Check the core rules plus the admin form rules: category and image
    /// URL required, rating within `0..=5`.
    ///
    /// # Errors
    ///
    /// Returns every violated rule when at least one fails.
    pub fn validate_full(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = self.core_violations();
        if self.category.trim().is_empty() {
            errors.push(ValidationError::CategoryRequired);
        }
        if self.image_url.trim().is_empty() {
            errors.push(ValidationError::ImageRequired);
        }
        if !(0.0..=f64::from(Self::MAX_RATING)).contains(&self.rating) {
            errors.push(ValidationError::RatingOutOfRange {
                max: Self::MAX_RATING,
            });
        }
        into_result(errors)
    }

    /// Attach a service-assigned identifier.
    #[must_use]
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            brand: self.brand,
            image_url: self.image_url,
            stock: self.stock,
            rating: self.rating,
            available: self.available,
            features: self.features,
        }
    }

    fn core_violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError::NameRequired);
        }
        if self.price <= Decimal::ZERO {
            errors.push(ValidationError::PriceNotPositive);
        }
        if self.description.trim().chars().count() < Self::MIN_DESCRIPTION_LENGTH {
            errors.push(ValidationError::DescriptionTooShort {
                min: Self::MIN_DESCRIPTION_LENGTH,
            });
        }
        errors
    }
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
