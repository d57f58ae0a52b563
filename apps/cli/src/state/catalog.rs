//! # Catalog Cache
//!
//! Local snapshot of the materials and services catalog.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Cache Operations                             │
//! │                                                                         │
//! │  add_*/update_* ──► apply to snapshot ──► persist ──► Ok                │
//! │                                              │                          │
//! │                                            Err                          │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                              drop snapshot, reload from store           │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                    return the original error            │
//! │                                                                         │
//! │  NOTE: the snapshot is behind an RwLock; readers never see a            │
//! │        half-applied edit.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, ErrorCode};
use clima_core::validation::{validate_item_name, validate_price, validate_unit};
use clima_core::{Catalog, CatalogLookup, Material, Service};
use clima_db::{CatalogRepository, DbResult};

/// Cached catalog backed by the catalog repository.
#[derive(Debug)]
pub struct CatalogCache {
    repo: CatalogRepository,
    snapshot: RwLock<Option<Catalog>>,
}

impl CatalogCache {
    /// Creates an empty (not yet loaded) cache.
    pub fn new(repo: CatalogRepository) -> Self {
        CatalogCache {
            repo,
            snapshot: RwLock::new(None),
        }
    }

    /// Runs `f` against the snapshot, loading it first if needed.
    pub async fn with_catalog<R>(&self, f: impl FnOnce(&Catalog) -> R) -> AppResult<R> {
        self.ensure_loaded().await?;
        let guard = self.snapshot.read().await;
        match guard.as_ref() {
            Some(catalog) => Ok(f(catalog)),
            None => Err(AppError::new(ErrorCode::Internal, "Catalog is not loaded")),
        }
    }

    /// Whether a snapshot is currently held.
    pub async fn is_loaded(&self) -> bool {
        self.snapshot.read().await.is_some()
    }

    /// Replaces the snapshot with a fresh copy from the store.
    pub async fn reload(&self) -> AppResult<()> {
        let catalog = self.repo.load_catalog().await?;
        debug!(
            materials = catalog.materials().len(),
            services = catalog.services().len(),
            "Catalog loaded"
        );
        *self.snapshot.write().await = Some(catalog);
        Ok(())
    }

    async fn ensure_loaded(&self) -> AppResult<()> {
        if self.is_loaded().await {
            return Ok(());
        }
        self.reload().await
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Adds a material to the catalog.
    pub async fn add_material(&self, material: Material) -> AppResult<Material> {
        validate_item_name(&material.name)?;
        validate_unit(&material.unit)?;
        validate_price(material.price)?;
        validate_price(material.cost)?;

        let stored = material.clone();
        self.write(
            move |catalog| catalog.upsert_material(material),
            self.repo.insert_material(&stored),
        )
        .await?;

        Ok(stored)
    }

    /// Adds a service to the catalog.
    pub async fn add_service(&self, service: Service) -> AppResult<Service> {
        validate_item_name(&service.name)?;
        validate_price(service.price)?;
        validate_price(service.cost)?;

        let stored = service.clone();
        self.write(
            move |catalog| catalog.upsert_service(service),
            self.repo.insert_service(&stored),
        )
        .await?;

        Ok(stored)
    }

    /// Replaces a stored material (name, unit, cost, price, category).
    pub async fn update_material(&self, material: Material) -> AppResult<Material> {
        validate_item_name(&material.name)?;
        validate_unit(&material.unit)?;
        validate_price(material.price)?;
        validate_price(material.cost)?;

        let stored = material.clone();
        self.write(
            move |catalog| catalog.upsert_material(material),
            self.repo.update_material(&stored),
        )
        .await?;

        Ok(stored)
    }

    /// Replaces a stored service (name, cost, price, category).
    pub async fn update_service(&self, service: Service) -> AppResult<Service> {
        validate_item_name(&service.name)?;
        validate_price(service.price)?;
        validate_price(service.cost)?;

        let stored = service.clone();
        self.write(
            move |catalog| catalog.upsert_service(service),
            self.repo.update_service(&stored),
        )
        .await?;

        Ok(stored)
    }

    /// Changes the selling price of a material or service.
    ///
    /// Lines already on a quote keep the price they were added with.
    pub async fn update_price(&self, id: &str, price: f64) -> AppResult<()> {
        validate_price(price)?;

        let (material, service) = self
            .with_catalog(|catalog| (catalog.material(id).cloned(), catalog.service(id).cloned()))
            .await?;

        match (material, service) {
            (Some(mut material), _) => {
                material.price = price;
                self.write(
                    move |catalog| catalog.upsert_material(material),
                    self.repo.update_price(id, price),
                )
                .await
            }
            (None, Some(mut service)) => {
                service.price = price;
                self.write(
                    move |catalog| catalog.upsert_service(service),
                    self.repo.update_price(id, price),
                )
                .await
            }
            (None, None) => Err(AppError::not_found("Catalog item", id)),
        }
    }

    /// Deletes a material or service.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.write(
            |catalog| {
                catalog.remove(id);
            },
            self.repo.delete(id),
        )
        .await
    }

    /// Applies `local` to the snapshot, then awaits `persist`.
    ///
    /// On a failed write the snapshot is reloaded from the store so it never
    /// keeps an edit the store rejected.
    async fn write<F, P>(&self, local: F, persist: P) -> AppResult<()>
    where
        F: FnOnce(&mut Catalog),
        P: Future<Output = DbResult<()>>,
    {
        self.ensure_loaded().await?;

        if let Some(catalog) = self.snapshot.write().await.as_mut() {
            local(catalog);
        }

        if let Err(err) = persist.await {
            warn!(error = %err, "Catalog write failed, reloading from store");
            *self.snapshot.write().await = None;
            if let Err(reload_err) = self.reload().await {
                warn!(error = %reload_err, "Catalog reload failed");
            }
            return Err(err.into());
        }

        Ok(())
    }
}
