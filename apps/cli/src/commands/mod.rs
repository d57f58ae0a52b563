//! # Commands Module
//!
//! One function per CLI operation. Commands take [`AppState`] plus plain
//! arguments and return domain values; printing is left to `render`.
//!
//! ## Command Categories
//!
//! - [`catalog`] - Materials and services
//! - [`quote`] - Quote editing, status and sharing
//! - [`settings`] - Company settings and copper price
//!
//! ## References
//! Users type references, not UUIDs:
//!
//! | Reference       | Accepted forms                                   |
//! |-----------------|--------------------------------------------------|
//! | quote           | sequence number (`7`) or id                      |
//! | catalog item    | id or exact name (case-insensitive)              |
//! | quote line      | 1-based position as shown by `quote show`, or id |
//!
//! [`AppState`]: crate::state::AppState

pub mod catalog;
pub mod quote;
pub mod settings;

use clima_core::{Catalog, CatalogLookup, Material, Service};

use crate::error::{AppError, AppResult};

/// Finds a material by id, then by name.
pub fn find_material(catalog: &Catalog, reference: &str) -> AppResult<Material> {
    catalog
        .material(reference)
        .or_else(|| {
            catalog
                .materials()
                .iter()
                .find(|m| names_match(&m.name, reference))
        })
        .cloned()
        .ok_or_else(|| AppError::not_found("Material", reference))
}

/// Finds a service by id, then by name.
pub fn find_service(catalog: &Catalog, reference: &str) -> AppResult<Service> {
    catalog
        .service(reference)
        .or_else(|| {
            catalog
                .services()
                .iter()
                .find(|s| names_match(&s.name, reference))
        })
        .cloned()
        .ok_or_else(|| AppError::not_found("Service", reference))
}

/// Id of a material or service, by id or name.
pub fn find_item_id(catalog: &Catalog, reference: &str) -> AppResult<String> {
    find_material(catalog, reference)
        .map(|m| m.id)
        .or_else(|_| find_service(catalog, reference).map(|s| s.id))
        .map_err(|_| AppError::not_found("Catalog item", reference))
}

fn names_match(name: &str, reference: &str) -> bool {
    name.trim().to_lowercase() == reference.trim().to_lowercase()
}

#[cfg(test)]
pub(crate) mod tests_support {
    use std::path::Path;

    use crate::config::AppConfig;
    use crate::state::AppState;
    use clima_db::{Database, DbConfig};

    /// Fresh state over an in-memory database.
    pub async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = AppConfig::from_toml("", Path::new("/tmp")).unwrap();
        AppState::new(db, config)
    }
}
