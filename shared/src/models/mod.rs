//! Data models
//!
//! Shared between menu-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes.

pub mod catalog;
pub mod category;
pub mod diagnostics;
pub mod inventory_item;
pub mod menu;
pub mod menu_product;
pub mod order;
pub mod product;
pub mod rpc;
pub mod session;
pub mod stock_movement;
pub mod store;

// Re-exports
pub use catalog::*;
pub use category::*;
pub use diagnostics::*;
pub use inventory_item::*;
pub use menu::*;
pub use menu_product::*;
pub use order::*;
pub use product::*;
pub use rpc::*;
pub use session::*;
pub use stock_movement::*;
pub use store::*;
