//! Authentication building blocks: identity tokens, password hashing and
//! the bearer-token middleware that guards protected routes.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod claims;
pub mod config;
pub mod errors;
pub mod jwt;
pub mod password;
pub mod secret;
pub mod traits;

#[cfg(feature = "axum-ext")]
pub mod axum_ext;

pub use claims::Claims;
pub use config::AuthConfig;
pub use errors::AuthError;
pub use jwt::JwtTokenService;
pub use password::{BcryptPasswordHasher, PasswordHasher};
pub use secret::SecretString;
pub use traits::{IssuedToken, TokenIssuer, TokenValidator};
