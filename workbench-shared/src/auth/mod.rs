//! Authentication primitives
//!
//! - [`password`]: Argon2id password hashing and verification
//! - [`jwt`]: HS256 token issuing and validation
//!
//! Request-level enforcement (the bearer-token middleware) lives in the API
//! crate.

pub mod jwt;
pub mod password;
