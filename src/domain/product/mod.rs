//! Product aggregate

pub mod model;
pub mod repository;

pub use model::{
    NewImage, NewProduct, Product, ProductChanges, ProductImage, ProductQuery,
    ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES,
};
pub use repository::ProductRepository;
