//! Menu server: menu resolution and product visibility for restaurant storefronts
//!
//! # Overview
//!
//! - **Store registry** (`db::repository::store`): stores addressed by slug, with theme and settings
//! - **Menu resolver** (`catalog::resolver`): picks the menu a visitor sees from session, table, bar, time and weekday rules
//! - **Visibility filter** (`catalog::visibility`): expands a menu into purchasable entries
//! - **Inventory bridge** (`catalog::bridge`): reconciles inventory items with products
//! - **Ledger** (`ledger`): orders priced from the catalog, stock movements
//! - **Diagnostics** (`diagnostics`): configuration health report per store
//!
//! # Module layout
//!
//! ```text
//! menu-server/src/
//! ├── core/          # config, state, server, errors
//! ├── api/           # HTTP routes and handlers
//! ├── catalog/       # resolver, rules, bridge, visibility, images
//! ├── ledger/        # orders, stock, money
//! ├── diagnostics/   # store health report
//! ├── services/      # router assembly, image probe
//! ├── db/            # SQLite pool, migrations, repositories
//! └── utils/         # logging, validation
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod diagnostics;
pub mod ledger;
pub mod services;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use services::https::build_router;
pub use utils::{AppError, AppResult};

pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Initialise logging from the loaded configuration
pub fn setup_environment(config: &Config) {
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json || config.is_production(),
        config.log_dir.as_deref(),
    );
}
