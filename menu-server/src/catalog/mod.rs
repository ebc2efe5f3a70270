//! Catalog: menu resolution and visibility
//!
//! - [`rules`] - rule condition matcher
//! - [`resolver`] - menu selection
//! - [`bridge`] - inventory ↔ product reconciliation
//! - [`visibility`] - menu expansion into catalog entries
//! - [`image`] - effective image policy
//! - [`service`] - database-backed entry points used by the API

pub mod bridge;
pub mod image;
pub mod resolver;
pub mod rules;
pub mod service;
pub mod visibility;

pub use bridge::{Bridge, CanonicalProduct};
pub use image::ImagePolicy;
pub use rules::RuleContext;
pub use service::StoreSnapshot;
