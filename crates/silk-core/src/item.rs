//! # Catalog Item Types
//!
//! Items are stored in the `items` table. Every item carries the
//! provider's price reference it was provisioned with.

use crate::error::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};

/// Maximum length of the string columns in the `items` table
pub const MAX_FIELD_LEN: usize = 250;

/// A purchasable item in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Auto-assigned row id
    pub id: i64,

    /// Display name (unique across the catalog)
    pub name: String,

    /// Image URL
    pub image: String,

    /// Price in major currency units
    pub price: f64,

    /// Provider price reference used for checkout (e.g., "price_1Q...")
    pub price_id: String,
}

/// Data for a new catalog row, after the provider price exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub image: String,
    pub price: f64,
    pub price_id: String,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        price: f64,
        price_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            price,
            price_id: price_id.into(),
        }
    }

    /// Check required fields and column limits
    pub fn validate(&self) -> ShopResult<()> {
        validate_text("name", &self.name)?;
        validate_text("image", &self.image)?;
        validate_text("price_id", &self.price_id)?;
        validate_price(self.price)
    }
}

/// Partial update of an item. The price reference is never changed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl ItemUpdate {
    /// Builder: set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Builder: set price
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.image.is_none() && self.price.is_none()
    }

    pub fn validate(&self) -> ShopResult<()> {
        if let Some(ref name) = self.name {
            validate_text("name", name)?;
        }
        if let Some(ref image) = self.image {
            validate_text("image", image)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_text(field: &str, value: &str) -> ShopResult<()> {
    if value.trim().is_empty() {
        return Err(ShopError::InvalidRequest(format!("{field} is required")));
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(ShopError::InvalidRequest(format!(
            "{field} exceeds {MAX_FIELD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_price(price: f64) -> ShopResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(ShopError::InvalidRequest(format!("invalid price: {price}")));
    }
    Ok(())
}
