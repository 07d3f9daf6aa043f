//! Bearer-token authentication.

pub mod jwt;

pub use jwt::{authenticate, extract_bearer, make_jwt, validate_jwt, AuthError, Claims, ISSUER};
