//! # clima-db: Database Layer for ClimaQuote
//!
//! Local SQLite storage for the catalog, the company settings and quotes,
//! using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ClimaQuote Data Flow                             │
//! │                                                                         │
//! │  CLI Command (quote add-material)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     clima-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ CatalogRepo   │    │ 001_init.sql │   │   │
//! │  │   │ SqlitePool    │◄───│ CompanyRepo   │    │ 002_slugs.sql│   │   │
//! │  │   │               │    │ QuoteRepo     │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/climaquote/climaquote.db                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (catalog, company, quote)
//! - [`defaults`] - Starter catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clima_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/climaquote.db")).await?;
//!
//! let catalog = db.catalog().load_catalog().await?;
//! let quote = db.quotes().get_by_number(7).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod defaults;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use defaults::{seed_defaults, SeedReport};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::{new_material, new_service, CatalogRepository};
pub use repository::company::CompanyRepository;
pub use repository::quote::QuoteRepository;
