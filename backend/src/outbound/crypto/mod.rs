//! Credential adapters: argon2 password hashing and HS256 bearer tokens.

mod argon2_hasher;
mod jwt_issuer;

pub use argon2_hasher::Argon2Hasher;
pub use jwt_issuer::JwtIssuer;
