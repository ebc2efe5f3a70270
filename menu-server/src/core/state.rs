use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::catalog::ImagePolicy;
use crate::core::Config;
use crate::db::DbService;
use crate::services::ImageProbe;
use crate::utils::AppResult;

/// Server state shared by every handler
///
/// Cloning is cheap: the pool and the probe client are reference counted.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | pool | SQLite pool |
/// | images | effective-image policy (storage base, placeholder) |
/// | probe | HTTP HEAD prober for image URLs |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub images: Arc<ImagePolicy>,
    pub probe: ImageProbe,
}

impl ServerState {
    pub fn new(config: Config, db: DbService) -> AppResult<Self> {
        let images = ImagePolicy::new(
            config.storage_public_url.clone(),
            config.placeholder_image_url.clone(),
        );
        let probe = ImageProbe::new(
            Duration::from_millis(config.image_probe_timeout_ms),
            config.image_probe_concurrency,
        )?;
        Ok(Self {
            config: Arc::new(config),
            pool: db.pool,
            images: Arc::new(images),
            probe,
        })
    }

    /// Open the database at `config.database_path` and build the state
    pub async fn initialize(config: Config) -> AppResult<Self> {
        if let Some(parent) = std::path::Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                crate::utils::AppError::internal(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let db = DbService::new(&config.database_path).await?;
        Self::new(config, db)
    }
}
