//! Signed token creation, verification, and fingerprinting.

pub mod claims;
pub mod issuer;

pub use claims::{Claims, TokenType};
pub use issuer::{TokenIssuer, TokenPair};
