//! Database entities module

pub mod cart_line;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_image;
pub mod user;
pub mod user_image;
pub mod verification;

pub use cart_line::Entity as CartLine;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;
pub use product::Entity as Product;
pub use product_image::Entity as ProductImage;
pub use user::Entity as User;
pub use user_image::Entity as UserImage;
pub use verification::Entity as Verification;
