//! Service layer for token handling

pub mod jwt;

pub use jwt::{Claims, JwtConfig, JwtService};
