//! Product DTOs

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::product::{NewImage, NewProduct, ProductChanges};
use crate::domain::Product;
use crate::interfaces::http::common::ApiError;
use crate::shared::format_price;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_cents: i64,
    /// Display price, e.g. `1,234$`
    pub price: String,
    pub featured: bool,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn image_url(product_id: &str) -> String {
    format!("/api/v1/products/{}/image", product_id)
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        let image_url = p.image_id.as_ref().map(|_| image_url(&p.id));
        Self {
            price: format_price(p.price_cents),
            id: p.id,
            name: p.name,
            description: p.description,
            price_cents: p.price_cents,
            featured: p.featured,
            available: p.available,
            image_url,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Menu query: `?s=latte&featured=true&page=1&limit=20`
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListProductsParams {
    /// Case-insensitive name search
    #[serde(alias = "s")]
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Image upload, base64 encoded
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ImagePayload {
    /// One of image/png, image/jpeg, image/webp, image/gif
    #[validate(length(min = 1, message = "content_type is required"))]
    pub content_type: String,
    /// Base64 (standard alphabet) file contents
    #[validate(length(min = 1, message = "data is required"))]
    pub data: String,
}

impl ImagePayload {
    pub fn decode(self) -> Result<NewImage, ApiError> {
        let data = STANDARD
            .decode(self.data.trim())
            .map_err(|e| ApiError::bad_request(format!("Image is not valid base64: {}", e)))?;
        Ok(NewImage {
            content_type: self.content_type.trim().to_ascii_lowercase(),
            data,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price_cents: i64,
    #[serde(default)]
    pub featured: bool,
    #[validate(nested)]
    pub image: Option<ImagePayload>,
}

impl CreateProductRequest {
    pub fn into_new_product(self) -> Result<NewProduct, ApiError> {
        Ok(NewProduct {
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            featured: self.featured,
            image: self.image.map(ImagePayload::decode).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price_cents: Option<i64>,
    pub featured: Option<bool>,
    #[validate(nested)]
    pub image: Option<ImagePayload>,
}

impl UpdateProductRequest {
    pub fn into_changes(self) -> Result<ProductChanges, ApiError> {
        Ok(ProductChanges {
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            featured: self.featured,
            image: self.image.map(ImagePayload::decode).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_payload_decodes_base64() {
        let payload = ImagePayload {
            content_type: "IMAGE/PNG".into(),
            data: STANDARD.encode([0x89, b'P', b'N', b'G']),
        };
        let image = payload.decode().unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.data, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn garbage_image_is_a_bad_request() {
        let payload = ImagePayload {
            content_type: "image/png".into(),
            data: "not base64 at all!".into(),
        };
        let err = payload.decode().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
