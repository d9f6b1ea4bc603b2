//! Domain layer: entities, pure business rules and repository interfaces.

pub mod cart;
pub mod order;
pub mod product;
pub mod repositories;
pub mod user;
pub mod verification;

pub use cart::{CartLine, CartLineStatus, CartRepository, CupSize, DrinkOptions, Ice, Topping};
pub use order::{Order, OrderDetails, OrderItem, OrderRepository, OrderStats, OrderStatus};
pub use product::{Product, ProductImage, ProductRepository};
pub use repositories::{DomainResult, RepositoryProvider};
pub use user::{CreateUserDto, GetUserDto, User, UserImage, UserRepository, UserRole};
pub use verification::{Verification, VerificationKind, VerificationRepository};

pub use crate::shared::errors::DomainError;
