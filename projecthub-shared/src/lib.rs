//! # ProjectHub Shared Library
//!
//! Domain types and business logic used by the ProjectHub API server.
//!
//! ## Module Organization
//!
//! - `models`: Project entity, external view, request payloads
//! - `store`: Persistence abstraction with Postgres and in-memory backends
//! - `services`: Project create/list/get logic and its error taxonomy
//! - `auth`: JWT verification and the authenticated identity type
//! - `db`: Connection pooling and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the ProjectHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
