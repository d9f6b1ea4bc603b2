//! Product domain entity

use chrono::{DateTime, Utc};

use crate::shared::errors::DomainError;
use crate::shared::PaginationParams;

/// Largest accepted image upload (products and profile pictures).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp", "image/gif"];

#[derive(Debug, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in cents
    pub price_cents: i64,
    pub featured: bool,
    /// Retired products stay for order history but cannot be bought.
    pub available: bool,
    pub image_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductImage {
    pub id: String,
    pub product_id: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl NewImage {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str()) {
            return Err(DomainError::Validation(format!(
                "Unsupported image type: {}",
                self.content_type
            )));
        }
        if self.data.is_empty() {
            return Err(DomainError::Validation("Image is empty".to_string()));
        }
        if self.data.len() > MAX_IMAGE_BYTES {
            return Err(DomainError::Validation(format!(
                "Image exceeds {} bytes",
                MAX_IMAGE_BYTES
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub featured: bool,
    pub image: Option<NewImage>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)?;
        validate_price(self.price_cents)?;
        if let Some(image) = &self.image {
            image.validate()?;
        }
        Ok(())
    }
}

/// Partial product update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub featured: Option<bool>,
    pub image: Option<NewImage>,
}

impl ProductChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price_cents {
            validate_price(price)?;
        }
        if let Some(image) = &self.image {
            image.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub pagination: PaginationParams,
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    let len = name.trim().chars().count();
    if len == 0 || len > 100 {
        return Err(DomainError::Validation(
            "Product name must be 1 to 100 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price_cents: i64) -> Result<(), DomainError> {
    if price_cents <= 0 {
        return Err(DomainError::Validation("Price must be positive".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            price_cents: price,
            featured: false,
            image: None,
        }
    }

    #[test]
    fn rejects_blank_name_and_free_products() {
        assert!(product("Milk Tea", 300).validate().is_ok());
        assert!(product("   ", 300).validate().is_err());
        assert!(product("Milk Tea", 0).validate().is_err());
        assert!(product(&"x".repeat(101), 300).validate().is_err());
    }

    #[test]
    fn image_type_and_size_are_checked() {
        let ok = NewImage {
            content_type: "image/png".to_string(),
            data: vec![1, 2, 3],
        };
        assert!(ok.validate().is_ok());

        let svg = NewImage {
            content_type: "image/svg+xml".to_string(),
            data: vec![1],
        };
        assert!(svg.validate().is_err());

        let huge = NewImage {
            content_type: "image/jpeg".to_string(),
            data: vec![0; MAX_IMAGE_BYTES + 1],
        };
        assert!(huge.validate().is_err());
    }
}
