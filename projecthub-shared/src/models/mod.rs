//! Domain models
//!
//! - `project`: the Project entity, its external view, and request payloads

pub mod project;
