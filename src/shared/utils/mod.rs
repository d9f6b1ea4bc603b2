pub mod money;
pub mod retry;

pub use money::format_price;
pub use retry::{retry_with_backoff, RetryConfig};
