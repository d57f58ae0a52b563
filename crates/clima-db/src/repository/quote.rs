//! # Quote Repository
//!
//! Database operations for quotes and their lines.
//!
//! ## Quote Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Quote Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE                                                              │
//! │     └── create() → number = MAX(number) + 1, version = 1                │
//! │                                                                         │
//! │  2. EDIT (any number of times)                                          │
//! │     └── update() → only changed lines are written, version + 1          │
//! │                                                                         │
//! │  3. SHARE / APPROVE / CANCEL                                            │
//! │     └── update_status() → any status to any status, version + 1         │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                   │
//! │     └── delete() → lines cascade                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Update Transaction
//! ```text
//! BEGIN
//!   SELECT version            ← NotFound if the quote is gone
//!   SELECT current lines      ← diff against the incoming quote
//!   DELETE removed lines
//!   UPSERT added/changed lines
//!   UPDATE header, version + 1
//! COMMIT                      ← any failure rolls back: the old lines stay
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use clima_core::{
    CopperDetails, Discount, DiscountMode, LineChanges, Quote, QuoteLineItem, QuoteServiceLine,
    QuoteStatus,
};

const QUOTE_COLUMNS: &str = "id, number, version, status, client_name, client_phone, \
     client_address, discount, discount_mode, subtotal_materials, subtotal_services, \
     discount_value, total, internal_notes, client_notes, validity_days, payment_terms, \
     created_at, updated_at";

const ITEM_COLUMNS: &str = "id, quote_id, material_id, name, unit, quantity, unit_price, \
     total, copper_size, copper_weight_per_meter, copper_total_weight, copper_price_per_kg";

const SERVICE_COLUMNS: &str = "id, quote_id, service_id, name, unit_price, quantity, price";

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: String,
    number: i64,
    version: i64,
    status: QuoteStatus,
    client_name: String,
    client_phone: String,
    client_address: String,
    discount: f64,
    discount_mode: DiscountMode,
    subtotal_materials: f64,
    subtotal_services: f64,
    discount_value: f64,
    total: f64,
    internal_notes: String,
    client_notes: String,
    validity_days: i64,
    payment_terms: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuoteRow {
    fn into_quote(
        self,
        items: Vec<QuoteLineItem>,
        services: Vec<QuoteServiceLine>,
    ) -> DbResult<Quote> {
        let validity_days = u32::try_from(self.validity_days)
            .map_err(|_| DbError::decode("quote", format!("validity_days {}", self.validity_days)))?;

        Ok(Quote {
            id: self.id,
            number: self.number,
            version: self.version,
            status: self.status,
            client_name: self.client_name,
            client_phone: self.client_phone,
            client_address: self.client_address,
            items,
            services,
            discount: Discount {
                value: self.discount,
                mode: self.discount_mode,
            },
            subtotal_materials: self.subtotal_materials,
            subtotal_services: self.subtotal_services,
            discount_value: self.discount_value,
            total: self.total,
            internal_notes: self.internal_notes,
            client_notes: self.client_notes,
            validity_days,
            payment_terms: self.payment_terms,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuoteItemRow {
    id: String,
    quote_id: String,
    material_id: String,
    name: String,
    unit: String,
    quantity: f64,
    unit_price: f64,
    total: f64,
    copper_size: Option<String>,
    copper_weight_per_meter: Option<f64>,
    copper_total_weight: Option<f64>,
    copper_price_per_kg: Option<f64>,
}

impl QuoteItemRow {
    fn into_line(self) -> DbResult<QuoteLineItem> {
        let copper = match (
            self.copper_size,
            self.copper_weight_per_meter,
            self.copper_total_weight,
            self.copper_price_per_kg,
        ) {
            (Some(size), Some(weight_per_meter), Some(total_weight), Some(price_per_kg)) => {
                Some(CopperDetails {
                    size,
                    weight_per_meter,
                    total_weight,
                    price_per_kg,
                })
            }
            (None, None, None, None) => None,
            _ => {
                return Err(DbError::decode(
                    "quote line",
                    format!("line {} has partial copper data", self.id),
                ))
            }
        };

        Ok(QuoteLineItem {
            id: self.id,
            material_id: self.material_id,
            name: self.name,
            unit: self.unit,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total: self.total,
            copper,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuoteServiceRow {
    id: String,
    quote_id: String,
    service_id: String,
    name: String,
    unit_price: f64,
    quantity: f64,
    price: f64,
}

impl From<QuoteServiceRow> for QuoteServiceLine {
    fn from(row: QuoteServiceRow) -> Self {
        QuoteServiceLine {
            id: row.id,
            service_id: row.service_id,
            name: row.name,
            unit_price: row.unit_price,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for quote database operations.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    /// Creates a new QuoteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuoteRepository { pool }
    }

    /// Lists all quotes with their lines, newest number first.
    pub async fn list(&self) -> DbResult<Vec<Quote>> {
        let query = format!("SELECT {QUOTE_COLUMNS} FROM quotes ORDER BY number DESC");
        let rows = sqlx::query_as::<_, QuoteRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        let query = format!("SELECT {ITEM_COLUMNS} FROM quote_items ORDER BY quote_id, position");
        let mut items: HashMap<String, Vec<QuoteLineItem>> = HashMap::new();
        for row in sqlx::query_as::<_, QuoteItemRow>(&query)
            .fetch_all(&self.pool)
            .await?
        {
            let quote_id = row.quote_id.clone();
            items.entry(quote_id).or_default().push(row.into_line()?);
        }

        let query =
            format!("SELECT {SERVICE_COLUMNS} FROM quote_services ORDER BY quote_id, position");
        let mut services: HashMap<String, Vec<QuoteServiceLine>> = HashMap::new();
        for row in sqlx::query_as::<_, QuoteServiceRow>(&query)
            .fetch_all(&self.pool)
            .await?
        {
            services
                .entry(row.quote_id.clone())
                .or_default()
                .push(row.into());
        }

        let quotes = rows
            .into_iter()
            .map(|row| {
                let lines = items.remove(&row.id).unwrap_or_default();
                let service_lines = services.remove(&row.id).unwrap_or_default();
                row.into_quote(lines, service_lines)
            })
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = quotes.len(), "Listed quotes");
        Ok(quotes)
    }

    /// Gets a quote by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Quote>> {
        let query = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?1");
        let row = sqlx::query_as::<_, QuoteRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        self.with_lines(row).await
    }

    /// Gets a quote by its sequence number.
    pub async fn get_by_number(&self, number: i64) -> DbResult<Option<Quote>> {
        let query = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE number = ?1");
        let row = sqlx::query_as::<_, QuoteRow>(&query)
            .bind(number)
            .fetch_optional(&self.pool)
            .await?;

        self.with_lines(row).await
    }

    async fn with_lines(&self, row: Option<QuoteRow>) -> DbResult<Option<Quote>> {
        let Some(row) = row else {
            return Ok(None);
        };

        let mut conn = self.pool.acquire().await?;
        let items = fetch_items(&mut conn, &row.id).await?;
        let services = fetch_services(&mut conn, &row.id).await?;
        row.into_quote(items, services).map(Some)
    }

    /// Stores a new quote.
    ///
    /// The sequence number is assigned here, inside the same transaction as
    /// the insert. Derived totals are recomputed from the lines before saving.
    ///
    /// ## Returns
    /// The stored quote (number assigned, version 1).
    pub async fn create(&self, quote: &Quote) -> DbResult<Quote> {
        let mut stored = quote.clone();
        stored.recalculate();

        let mut tx = self.pool.begin().await?;

        let number: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(number), 0) + 1 FROM quotes")
            .fetch_one(&mut *tx)
            .await?;

        let now = Utc::now();
        stored.number = number;
        stored.version = 1;
        stored.created_at = now;
        stored.updated_at = now;

        debug!(id = %stored.id, number = number, "Creating quote");

        sqlx::query(
            r#"
            INSERT INTO quotes (
                id, number, version, status,
                client_name, client_phone, client_address,
                discount, discount_mode,
                subtotal_materials, subtotal_services, discount_value, total,
                internal_notes, client_notes, validity_days, payment_terms,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9,
                ?10, ?11, ?12, ?13,
                ?14, ?15, ?16, ?17,
                ?18, ?19
            )
            "#,
        )
        .bind(&stored.id)
        .bind(stored.number)
        .bind(stored.version)
        .bind(stored.status)
        .bind(&stored.client_name)
        .bind(&stored.client_phone)
        .bind(&stored.client_address)
        .bind(stored.discount.value)
        .bind(stored.discount.mode)
        .bind(stored.subtotal_materials)
        .bind(stored.subtotal_services)
        .bind(stored.discount_value)
        .bind(stored.total)
        .bind(&stored.internal_notes)
        .bind(&stored.client_notes)
        .bind(stored.validity_days)
        .bind(&stored.payment_terms)
        .bind(stored.created_at)
        .bind(stored.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in stored.items.iter().enumerate() {
            upsert_item(&mut tx, &stored.id, position, item).await?;
        }
        for (position, service) in stored.services.iter().enumerate() {
            upsert_service(&mut tx, &stored.id, position, service).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %stored.id, number = stored.number, total = stored.total, "Quote created");
        Ok(stored)
    }

    /// Saves an edited quote.
    ///
    /// Only lines that were added, changed or removed since the stored
    /// version are written. Everything happens in one transaction.
    ///
    /// ## Returns
    /// * `Ok(Quote)` - the stored quote with its new version
    /// * `Err(DbError::NotFound)` - the quote doesn't exist
    pub async fn update(&self, quote: &Quote) -> DbResult<Quote> {
        let mut stored = quote.clone();
        stored.recalculate();

        let mut tx = self.pool.begin().await?;

        let version: Option<i64> = sqlx::query_scalar("SELECT version FROM quotes WHERE id = ?1")
            .bind(&stored.id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(version) = version else {
            return Err(DbError::not_found("Quote", &stored.id));
        };

        let previous_items = fetch_items(&mut tx, &stored.id).await?;
        let previous_services = fetch_services(&mut tx, &stored.id).await?;
        let item_changes = LineChanges::between(&previous_items, &stored.items);
        let service_changes = LineChanges::between(&previous_services, &stored.services);

        debug!(
            id = %stored.id,
            items_added = item_changes.added.len(),
            items_changed = item_changes.changed.len(),
            items_removed = item_changes.removed.len(),
            services_added = service_changes.added.len(),
            services_changed = service_changes.changed.len(),
            services_removed = service_changes.removed.len(),
            "Updating quote"
        );

        for line_id in &item_changes.removed {
            sqlx::query("DELETE FROM quote_items WHERE id = ?1 AND quote_id = ?2")
                .bind(line_id)
                .bind(&stored.id)
                .execute(&mut *tx)
                .await?;
        }
        for line_id in &service_changes.removed {
            sqlx::query("DELETE FROM quote_services WHERE id = ?1 AND quote_id = ?2")
                .bind(line_id)
                .bind(&stored.id)
                .execute(&mut *tx)
                .await?;
        }
        for (position, item) in item_changes.upserts() {
            upsert_item(&mut tx, &stored.id, position, item).await?;
        }
        for (position, service) in service_changes.upserts() {
            upsert_service(&mut tx, &stored.id, position, service).await?;
        }

        stored.version = version + 1;
        stored.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE quotes SET
                version = ?2,
                status = ?3,
                client_name = ?4,
                client_phone = ?5,
                client_address = ?6,
                discount = ?7,
                discount_mode = ?8,
                subtotal_materials = ?9,
                subtotal_services = ?10,
                discount_value = ?11,
                total = ?12,
                internal_notes = ?13,
                client_notes = ?14,
                validity_days = ?15,
                payment_terms = ?16,
                updated_at = ?17
            WHERE id = ?1
            "#,
        )
        .bind(&stored.id)
        .bind(stored.version)
        .bind(stored.status)
        .bind(&stored.client_name)
        .bind(&stored.client_phone)
        .bind(&stored.client_address)
        .bind(stored.discount.value)
        .bind(stored.discount.mode)
        .bind(stored.subtotal_materials)
        .bind(stored.subtotal_services)
        .bind(stored.discount_value)
        .bind(stored.total)
        .bind(&stored.internal_notes)
        .bind(&stored.client_notes)
        .bind(stored.validity_days)
        .bind(&stored.payment_terms)
        .bind(stored.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(stored)
    }

    /// Changes a quote's status.
    pub async fn update_status(&self, id: &str, status: QuoteStatus) -> DbResult<()> {
        debug!(id = %id, status = %status, "Updating quote status");

        let result = sqlx::query(
            r#"
            UPDATE quotes SET
                status = ?2,
                version = version + 1,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quote", id));
        }

        Ok(())
    }

    /// Deletes a quote and, by cascade, its lines.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting quote");

        let result = sqlx::query("DELETE FROM quotes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quote", id));
        }

        Ok(())
    }

    /// Counts all quotes.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Line Helpers
// =============================================================================

async fn fetch_items(conn: &mut SqliteConnection, quote_id: &str) -> DbResult<Vec<QuoteLineItem>> {
    let query = format!("SELECT {ITEM_COLUMNS} FROM quote_items WHERE quote_id = ?1 ORDER BY position");
    sqlx::query_as::<Sqlite, QuoteItemRow>(&query)
        .bind(quote_id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(QuoteItemRow::into_line)
        .collect()
}

async fn fetch_services(
    conn: &mut SqliteConnection,
    quote_id: &str,
) -> DbResult<Vec<QuoteServiceLine>> {
    let query =
        format!("SELECT {SERVICE_COLUMNS} FROM quote_services WHERE quote_id = ?1 ORDER BY position");
    let rows = sqlx::query_as::<Sqlite, QuoteServiceRow>(&query)
        .bind(quote_id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.into_iter().map(QuoteServiceLine::from).collect())
}

async fn upsert_item(
    conn: &mut SqliteConnection,
    quote_id: &str,
    position: usize,
    item: &QuoteLineItem,
) -> DbResult<()> {
    let copper = item.copper.as_ref();

    sqlx::query(
        r#"
        INSERT INTO quote_items (
            id, quote_id, position, material_id, name, unit,
            quantity, unit_price, total,
            copper_size, copper_weight_per_meter, copper_total_weight, copper_price_per_kg
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        ON CONFLICT(id) DO UPDATE SET
            position = excluded.position,
            name = excluded.name,
            unit = excluded.unit,
            quantity = excluded.quantity,
            unit_price = excluded.unit_price,
            total = excluded.total,
            copper_size = excluded.copper_size,
            copper_weight_per_meter = excluded.copper_weight_per_meter,
            copper_total_weight = excluded.copper_total_weight,
            copper_price_per_kg = excluded.copper_price_per_kg
        WHERE quote_items.quote_id = excluded.quote_id
        "#,
    )
    .bind(&item.id)
    .bind(quote_id)
    .bind(position as i64)
    .bind(&item.material_id)
    .bind(&item.name)
    .bind(&item.unit)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(item.total)
    .bind(copper.map(|c| c.size.clone()))
    .bind(copper.map(|c| c.weight_per_meter))
    .bind(copper.map(|c| c.total_weight))
    .bind(copper.map(|c| c.price_per_kg))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn upsert_service(
    conn: &mut SqliteConnection,
    quote_id: &str,
    position: usize,
    service: &QuoteServiceLine,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO quote_services (
            id, quote_id, position, service_id, name, unit_price, quantity, price
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(id) DO UPDATE SET
            position = excluded.position,
            name = excluded.name,
            unit_price = excluded.unit_price,
            quantity = excluded.quantity,
            price = excluded.price
        WHERE quote_services.quote_id = excluded.quote_id
        "#,
    )
    .bind(&service.id)
    .bind(quote_id)
    .bind(position as i64)
    .bind(&service.service_id)
    .bind(&service.name)
    .bind(service.unit_price)
    .bind(service.quantity)
    .bind(service.price)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::catalog::{new_material, new_service};
    use crate::{Database, DbConfig};
    use clima_core::{CatalogResolver, MaterialCategory, ServiceCategory};

    async fn repo() -> QuoteRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().quotes()
    }

    fn sample_quote() -> Quote {
        let resolver = CatalogResolver::new(75.0);
        let tube = new_material("Tubo de Cobre 1/2\"", "m", 0.0, 80.0, MaterialCategory::Tubing);
        let cable = new_material("Cabo PP 3x1.5mm", "m", 0.0, 12.0, MaterialCategory::ElectricalCables);
        let install = new_service("Instalação Split 9.000 BTUs", 0.0, 350.0, ServiceCategory::Installation);

        let mut quote = Quote::new("Ana Souza");
        quote.client_phone = "(11) 91234-5678".to_string();
        for _ in 0..3 {
            quote.add_material(&resolver, &tube);
        }
        quote.add_material(&resolver, &cable);
        quote.add_service(&install);
        quote.set_discount(10.0, DiscountMode::Percentage).unwrap();
        quote
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_numbers() {
        let repo = repo().await;
        let first = repo.create(&sample_quote()).await.unwrap();
        let second = repo.create(&sample_quote()).await.unwrap();

        assert_eq!(first.number, 1);
        assert_eq!(second.number, 2);
        assert_eq!(first.version, 1);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_lines_and_discount() {
        let repo = repo().await;
        let created = repo.create(&sample_quote()).await.unwrap();

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.items, created.items);
        assert_eq!(loaded.services, created.services);
        assert_eq!(loaded.discount, Discount::percentage(10.0));
        assert_eq!(loaded.total, created.total);
        assert_eq!(loaded.validity_days, 15);

        let copper = loaded.items[0].copper.as_ref().unwrap();
        assert_eq!(copper.total_weight, 1.362);
        assert_eq!(loaded.items[0].total, 102.15);

        let by_number = repo.get_by_number(created.number).await.unwrap().unwrap();
        assert_eq!(by_number.id, created.id);
    }

    #[tokio::test]
    async fn test_update_writes_line_delta_and_bumps_version() {
        let repo = repo().await;
        let mut quote = repo.create(&sample_quote()).await.unwrap();

        let cable_line = quote.items[1].id.clone();
        let tube_line = quote.items[0].id.clone();
        quote.remove_item(&cable_line);
        quote.update_item_quantity(&tube_line, 1.0).unwrap();
        quote.add_custom_material("Suporte 400mm", "un", 90.0).unwrap();

        let saved = repo.update(&quote).await.unwrap();
        assert_eq!(saved.version, 2);

        let loaded = repo.get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(loaded.version, 2);
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(loaded.items[0].id, tube_line);
        assert_eq!(loaded.items[0].quantity, 4.0);
        assert_eq!(loaded.items[1].name, "Suporte 400mm");
        assert!(loaded.items.iter().all(|l| l.id != cable_line));
        assert_eq!(loaded.total, saved.total);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_lines() {
        let repo = repo().await;
        let created = repo.create(&sample_quote()).await.unwrap();

        // Drop one line and corrupt another; NaN is stored as NULL, which the
        // NOT NULL column rejects after the delete already ran.
        let mut broken = created.clone();
        let removed = broken.items[1].id.clone();
        broken.items.retain(|l| l.id != removed);
        broken.services[0].unit_price = f64::NAN;
        broken.services[0].price = f64::NAN;

        assert!(repo.update(&broken).await.is_err());

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(loaded.services, created.services);
    }

    #[tokio::test]
    async fn test_update_missing_quote_is_not_found() {
        let repo = repo().await;
        let ghost = sample_quote();
        assert!(matches!(
            repo.update(&ghost).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_status_any_transition() {
        let repo = repo().await;
        let created = repo.create(&sample_quote()).await.unwrap();

        repo.update_status(&created.id, QuoteStatus::Cancelled).await.unwrap();
        repo.update_status(&created.id, QuoteStatus::Draft).await.unwrap();
        repo.update_status(&created.id, QuoteStatus::Sent).await.unwrap();

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, QuoteStatus::Sent);
        assert_eq!(loaded.version, 4);
    }

    #[tokio::test]
    async fn test_delete_cascades_lines() {
        let repo = repo().await;
        let created = repo.create(&sample_quote()).await.unwrap();
        repo.delete(&created.id).await.unwrap();

        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quote_items")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(orphans, 0);
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_groups_lines_by_quote() {
        let repo = repo().await;
        let first = repo.create(&sample_quote()).await.unwrap();
        let mut other = Quote::new("Bruno");
        other.add_custom_service("Visita técnica", 80.0).unwrap();
        let second = repo.create(&other).await.unwrap();

        let quotes = repo.list().await.unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].id, second.id);
        assert_eq!(quotes[0].services.len(), 1);
        assert!(quotes[0].items.is_empty());
        assert_eq!(quotes[1].id, first.id);
        assert_eq!(quotes[1].items.len(), 2);
    }
}
