//! Unified error codes for the menu service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Store errors
//! - 2xxx: Menu errors
//! - 3xxx: Catalog errors
//! - 4xxx: Order errors
//! - 5xxx: Inventory errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Store ====================
    /// Store not found
    StoreNotFound = 1001,
    /// Store is inactive
    StoreInactive = 1002,
    /// Store slug already taken
    StoreSlugExists = 1003,

    // ==================== 2xxx: Menu ====================
    /// Menu not found
    MenuNotFound = 2001,
    /// Menu rule not found
    MenuRuleNotFound = 2002,
    /// Menu rule configuration is invalid
    MenuRuleInvalid = 2003,
    /// Fallback menu cannot be removed or deactivated
    FallbackMenuProtected = 2004,
    /// Menu belongs to another store
    MenuStoreMismatch = 2005,

    // ==================== 3xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 3001,
    /// Product is not visible on the resolved menu
    ProductNotVisible = 3002,
    /// Product has invalid price
    ProductInvalidPrice = 3003,
    /// Category not found
    CategoryNotFound = 3101,
    /// Product is already linked to the menu
    ProductAlreadyLinked = 3201,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is empty
    OrderEmpty = 4002,
    /// Order line quantity is invalid
    OrderInvalidQuantity = 4003,
    /// Order status transition is not allowed
    OrderInvalidTransition = 4004,
    /// No menu resolves for the order context
    OrderNoMenu = 4005,

    // ==================== 5xxx: Inventory ====================
    /// Inventory item not found
    InventoryItemNotFound = 5001,
    /// Stock movement quantity is invalid
    StockInvalidQuantity = 5002,
    /// Stock movement reason not allowed for manual adjustment
    StockInvalidReason = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Store
            ErrorCode::StoreNotFound => "Store not found",
            ErrorCode::StoreInactive => "Store is inactive",
            ErrorCode::StoreSlugExists => "Store slug already exists",

            // Menu
            ErrorCode::MenuNotFound => "Menu not found",
            ErrorCode::MenuRuleNotFound => "Menu rule not found",
            ErrorCode::MenuRuleInvalid => "Menu rule configuration is invalid",
            ErrorCode::FallbackMenuProtected => "The fallback menu cannot be removed",
            ErrorCode::MenuStoreMismatch => "Menu belongs to another store",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductNotVisible => "Product is not available on this menu",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::ProductAlreadyLinked => "Product is already linked to this menu",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::OrderInvalidQuantity => "Order line quantity is invalid",
            ErrorCode::OrderInvalidTransition => "Order status transition is not allowed",
            ErrorCode::OrderNoMenu => "No menu is available for this order",

            // Inventory
            ErrorCode::InventoryItemNotFound => "Inventory item not found",
            ErrorCode::StockInvalidQuantity => "Stock movement quantity is invalid",
            ErrorCode::StockInvalidReason => "Stock movement reason is not allowed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Store
            1001 => Ok(ErrorCode::StoreNotFound),
            1002 => Ok(ErrorCode::StoreInactive),
            1003 => Ok(ErrorCode::StoreSlugExists),

            // Menu
            2001 => Ok(ErrorCode::MenuNotFound),
            2002 => Ok(ErrorCode::MenuRuleNotFound),
            2003 => Ok(ErrorCode::MenuRuleInvalid),
            2004 => Ok(ErrorCode::FallbackMenuProtected),
            2005 => Ok(ErrorCode::MenuStoreMismatch),

            // Catalog
            3001 => Ok(ErrorCode::ProductNotFound),
            3002 => Ok(ErrorCode::ProductNotVisible),
            3003 => Ok(ErrorCode::ProductInvalidPrice),
            3101 => Ok(ErrorCode::CategoryNotFound),
            3201 => Ok(ErrorCode::ProductAlreadyLinked),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderInvalidQuantity),
            4004 => Ok(ErrorCode::OrderInvalidTransition),
            4005 => Ok(ErrorCode::OrderNoMenu),

            // Inventory
            5001 => Ok(ErrorCode::InventoryItemNotFound),
            5002 => Ok(ErrorCode::StockInvalidQuantity),
            5003 => Ok(ErrorCode::StockInvalidReason),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
