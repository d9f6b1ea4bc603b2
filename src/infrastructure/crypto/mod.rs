pub mod jwt;
pub mod otp;
pub mod password;

pub use jwt::{create_ticket, create_token, verify_ticket, verify_token, JwtConfig, TicketClaims, TokenClaims};
pub use password::{hash_password_with_cost, verify_password};
