//! Cart aggregate
//!
//! Cart lines, drink options, duplicate merging and the repository interface.

pub mod merge;
pub mod model;
pub mod repository;

pub use merge::{merge_duplicates, MergeOutcome};
pub use model::{
    normalize_quantity, CartLine, CartLineStatus, CupSize, DrinkOptions, Ice, OptionFingerprint,
    Topping, MAX_LINE_QUANTITY,
};
pub use repository::CartRepository;
