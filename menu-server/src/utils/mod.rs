//! Utilities: error re-exports, logging, input validation

pub mod logger;
pub mod validation;

// Unified error types live in shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
