//! # State Module
//!
//! Everything a command needs, built once at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │                          AppState                                       │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │   Database   │  │ CatalogCache │  │    AppConfig     │              │
//! │  │              │  │              │  │                  │              │
//! │  │  SqlitePool  │  │  RwLock<     │  │  validity days   │              │
//! │  │  + repos     │  │    Catalog   │  │  payment terms   │              │
//! │  │              │  │  >           │  │  database path   │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  • Database: pool is thread-safe, repositories are cheap handles       │
//! │  • CatalogCache: snapshot invalidated on failed writes                 │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;

pub use catalog::CatalogCache;

use clima_core::CatalogResolver;
use clima_db::Database;

use crate::config::AppConfig;
use crate::error::AppResult;

/// Application state shared by all commands.
#[derive(Debug)]
pub struct AppState {
    db: Database,
    catalog: CatalogCache,
    config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let catalog = CatalogCache::new(db.catalog());
        AppState {
            db,
            catalog,
            config,
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Pricing rules for new lines, from the current company settings.
    pub async fn resolver(&self) -> AppResult<CatalogResolver> {
        let settings = self.db.company().get().await?;
        Ok(CatalogResolver::from_settings(&settings))
    }
}
