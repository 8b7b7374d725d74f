//! Salted password hashing.
pub mod hashed;
pub mod traits;
