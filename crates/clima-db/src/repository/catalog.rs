//! # Catalog Repository
//!
//! Database operations for materials and services.
//!
//! Both live in `catalog_items`, told apart by the `kind` column. Category
//! columns hold slugs (legacy labels are mapped by `002_category_slugs.sql`).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use clima_core::{Catalog, Material, MaterialCategory, Service, ServiceCategory};

const MATERIAL_COLUMNS: &str = "id, name, unit, cost, price, category, created_at, updated_at";
const SERVICE_COLUMNS: &str = "id, name, cost, price, category, created_at, updated_at";

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CatalogRepository::new(pool);
///
/// let materials = repo.list_materials().await?;
/// let tube = repo.get_material("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists all materials in insertion order.
    pub async fn list_materials(&self) -> DbResult<Vec<Material>> {
        let query = format!(
            "SELECT {MATERIAL_COLUMNS} FROM catalog_items WHERE kind = 'material' ORDER BY rowid"
        );
        let materials = sqlx::query_as::<_, Material>(&query)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = materials.len(), "Listed materials");
        Ok(materials)
    }

    /// Lists all services in insertion order.
    pub async fn list_services(&self) -> DbResult<Vec<Service>> {
        let query = format!(
            "SELECT {SERVICE_COLUMNS} FROM catalog_items WHERE kind = 'service' ORDER BY rowid"
        );
        let services = sqlx::query_as::<_, Service>(&query)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = services.len(), "Listed services");
        Ok(services)
    }

    /// Loads the full catalog snapshot.
    pub async fn load_catalog(&self) -> DbResult<Catalog> {
        let materials = self.list_materials().await?;
        let services = self.list_services().await?;
        Ok(Catalog::new(materials, services))
    }

    /// Gets a material by its ID.
    pub async fn get_material(&self, id: &str) -> DbResult<Option<Material>> {
        let query = format!(
            "SELECT {MATERIAL_COLUMNS} FROM catalog_items WHERE id = ?1 AND kind = 'material'"
        );
        let material = sqlx::query_as::<_, Material>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(material)
    }

    /// Gets a service by its ID.
    pub async fn get_service(&self, id: &str) -> DbResult<Option<Service>> {
        let query = format!(
            "SELECT {SERVICE_COLUMNS} FROM catalog_items WHERE id = ?1 AND kind = 'service'"
        );
        let service = sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(service)
    }

    /// Counts catalog entries of one kind (`"material"` or `"service"`).
    pub async fn count(&self, kind: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items WHERE kind = ?1")
            .bind(kind)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a new material.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    pub async fn insert_material(&self, material: &Material) -> DbResult<()> {
        debug!(id = %material.id, name = %material.name, "Inserting material");

        sqlx::query(
            r#"
            INSERT INTO catalog_items (
                id, kind, name, unit, cost, price, category, created_at, updated_at
            ) VALUES (?1, 'material', ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&material.id)
        .bind(&material.name)
        .bind(&material.unit)
        .bind(material.cost)
        .bind(material.price)
        .bind(material.category)
        .bind(material.created_at)
        .bind(material.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a new service. Services are always billed per unit ("un").
    pub async fn insert_service(&self, service: &Service) -> DbResult<()> {
        debug!(id = %service.id, name = %service.name, "Inserting service");

        sqlx::query(
            r#"
            INSERT INTO catalog_items (
                id, kind, name, unit, cost, price, category, created_at, updated_at
            ) VALUES (?1, 'service', ?2, 'un', ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.cost)
        .bind(service.price)
        .bind(service.category)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing material.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - material doesn't exist
    pub async fn update_material(&self, material: &Material) -> DbResult<()> {
        debug!(id = %material.id, "Updating material");

        let result = sqlx::query(
            r#"
            UPDATE catalog_items SET
                name = ?2,
                unit = ?3,
                cost = ?4,
                price = ?5,
                category = ?6,
                updated_at = ?7
            WHERE id = ?1 AND kind = 'material'
            "#,
        )
        .bind(&material.id)
        .bind(&material.name)
        .bind(&material.unit)
        .bind(material.cost)
        .bind(material.price)
        .bind(material.category)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Material", &material.id));
        }

        Ok(())
    }

    /// Updates an existing service.
    pub async fn update_service(&self, service: &Service) -> DbResult<()> {
        debug!(id = %service.id, "Updating service");

        let result = sqlx::query(
            r#"
            UPDATE catalog_items SET
                name = ?2,
                cost = ?3,
                price = ?4,
                category = ?5,
                updated_at = ?6
            WHERE id = ?1 AND kind = 'service'
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.cost)
        .bind(service.price)
        .bind(service.category)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", &service.id));
        }

        Ok(())
    }

    /// Sets the sale price of any catalog entry.
    ///
    /// Existing quote lines keep the price they were created with.
    pub async fn update_price(&self, id: &str, price: f64) -> DbResult<()> {
        debug!(id = %id, price = %price, "Updating catalog price");

        let result =
            sqlx::query("UPDATE catalog_items SET price = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(price)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Catalog item", id));
        }

        Ok(())
    }

    /// Deletes a material or service.
    ///
    /// Hard delete: quote lines hold snapshots, so nothing references the row.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting catalog item");

        let result = sqlx::query("DELETE FROM catalog_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Catalog item", id));
        }

        Ok(())
    }
}

/// Builds a new material with a fresh id and timestamps.
pub fn new_material(
    name: impl Into<String>,
    unit: impl Into<String>,
    cost: f64,
    price: f64,
    category: MaterialCategory,
) -> Material {
    let now = Utc::now();
    Material {
        id: Uuid::new_v4().to_string(),
        name: name.into(),
        unit: unit.into(),
        cost,
        price,
        category,
        created_at: now,
        updated_at: now,
    }
}

/// Builds a new service with a fresh id and timestamps.
pub fn new_service(
    name: impl Into<String>,
    cost: f64,
    price: f64,
    category: ServiceCategory,
) -> Service {
    let now = Utc::now();
    Service {
        id: Uuid::new_v4().to_string(),
        name: name.into(),
        cost,
        price,
        category,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
