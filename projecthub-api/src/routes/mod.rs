/// API route handlers
///
/// - `health`: Health check and liveness endpoints
/// - `projects`: Project creation and listing

pub mod health;
pub mod projects;
