//! Bearer token adapters.

mod jwt;

pub use jwt::JwtTokenAuthority;
