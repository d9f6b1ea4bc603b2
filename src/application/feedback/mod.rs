pub mod service;

pub use service::{FeedbackService, MAX_FEEDBACK_LEN};
