//! Authentication adapters.
//!
//! - `jwt` - HS256 access tokens (`TokenIssuer` + `SessionValidator`)
//! - `argon2_hasher` - Argon2id `PasswordHasher`
//! - `mock` - Test implementations that skip cryptography

mod argon2_hasher;
mod jwt;
mod mock;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt::JwtTokenService;
pub use mock::{MockPasswordHasher, MockSessionValidator};
