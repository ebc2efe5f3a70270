//! Session context
//!
//! How a customer reached the menu: a table QR, a bar counter, a takeaway
//! link, etc. Drives menu resolution.

use serde::{Deserialize, Serialize};

/// Session channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum SessionType {
    #[default]
    Generic,
    Table,
    Bar,
    Qr,
    Takeaway,
    Delivery,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Table => "table",
            Self::Bar => "bar",
            Self::Qr => "qr",
            Self::Takeaway => "takeaway",
            Self::Delivery => "delivery",
        }
    }
}

/// Optional context supplied by the caller when resolving a menu
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionContext {
    #[serde(default)]
    pub session_type: Option<SessionType>,
    #[serde(default)]
    pub table_id: Option<i64>,
    #[serde(default)]
    pub bar_id: Option<i64>,
}

impl SessionContext {
    pub fn generic() -> Self {
        Self::default()
    }

    pub fn table(table_id: i64) -> Self {
        Self {
            session_type: Some(SessionType::Table),
            table_id: Some(table_id),
            bar_id: None,
        }
    }

    pub fn bar(bar_id: i64) -> Self {
        Self {
            session_type: Some(SessionType::Bar),
            table_id: None,
            bar_id: Some(bar_id),
        }
    }

    /// Session type, inferring it from the node ids when not given
    pub fn effective_session_type(&self) -> SessionType {
        match (self.session_type, self.table_id, self.bar_id) {
            (Some(t), _, _) => t,
            (None, Some(_), _) => SessionType::Table,
            (None, None, Some(_)) => SessionType::Bar,
            (None, None, None) => SessionType::Generic,
        }
    }
}
