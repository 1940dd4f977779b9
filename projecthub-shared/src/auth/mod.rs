//! Authentication utilities
//!
//! Token issuance belongs to the identity provider; this service only needs
//! to verify what the provider hands out.
//!
//! - [`jwt`]: HS256 token creation and validation
//! - [`middleware`]: bearer-header parsing and the authenticated identity type

pub mod jwt;
pub mod middleware;

pub use middleware::{authenticate, AuthError, AuthenticatedIdentity};
