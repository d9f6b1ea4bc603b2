pub mod model;
pub mod repository;

pub use model::{Verification, VerificationKind};
pub use repository::VerificationRepository;
