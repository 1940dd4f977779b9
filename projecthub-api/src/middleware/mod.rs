/// HTTP middleware
///
/// - `security`: response hardening headers

pub mod security;
