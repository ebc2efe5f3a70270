//! RPC parameter payloads
//!
//! Field names keep the `p_` prefix expected by existing storefront clients.

use serde::{Deserialize, Serialize};

use super::session::{SessionContext, SessionType};

/// `resolve_menu` parameters. Either `p_store_id` or `p_slug` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveMenuParams {
    #[serde(default)]
    pub p_store_id: Option<i64>,
    #[serde(default)]
    pub p_slug: Option<String>,
    #[serde(default)]
    pub p_session_type: Option<SessionType>,
    #[serde(default)]
    pub p_table_id: Option<i64>,
    #[serde(default)]
    pub p_bar_id: Option<i64>,
}

impl ResolveMenuParams {
    pub fn context(&self) -> SessionContext {
        SessionContext {
            session_type: self.p_session_type,
            table_id: self.p_table_id,
            bar_id: self.p_bar_id,
        }
    }
}

/// `get_menu_products` parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuProductsParams {
    pub p_menu_id: i64,
}
