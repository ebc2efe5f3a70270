//! Shared types for the menu service
//!
//! Data models, the unified error system and small utilities used by
//! menu-server and any Rust client of its API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
