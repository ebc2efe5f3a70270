//! Order/stock ledger
//!
//! - [`money`] - decimal pricing helpers
//! - [`orders`] - placement and lifecycle
//! - [`stock`] - stock deduction, returns and manual movements

pub mod money;
pub mod orders;
pub mod stock;

pub use orders::{get_order, place_order, recent_orders, update_status};
pub use stock::{adjust_stock, deduct_stock, list_movements};
