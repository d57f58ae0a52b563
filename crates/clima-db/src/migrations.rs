//! # Database Migrations
//!
//! Embedded SQL migrations for ClimaQuote.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs _sqlx_migrations                       │
//! │       │                                                                 │
//! │       ├── 001_initial_schema.sql  ✓ (already applied)                  │
//! │       └── 002_category_slugs.sql  ⬜ (NEW - needs to run)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Run pending migrations in order, record each one                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent. Each migration runs in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_slug_migration_maps_legacy_labels_only() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        let pool = db.pool();

        // Schema only, then a catalog loaded from the label-based export.
        sqlx::raw_sql(MIGRATOR.migrations[0].sql.as_ref())
            .execute(pool)
            .await
            .unwrap();

        let rows = [
            ("m1", "material", "Tubulação e tubo isolante"),
            ("m2", "material", "Suportes e fitas"),
            ("m3", "material", "electrical_cables"),
            ("m4", "material", "Sucata"),
            ("s1", "service", "Limpeza"),
            ("s2", "service", "repairs"),
        ];
        for (id, kind, category) in rows {
            sqlx::query(
                "INSERT INTO catalog_items (id, kind, name, category, created_at, updated_at) \
                 VALUES (?1, ?2, ?1, ?3, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
            )
            .bind(id)
            .bind(kind)
            .bind(category)
            .execute(pool)
            .await
            .unwrap();
        }

        sqlx::raw_sql(MIGRATOR.migrations[1].sql.as_ref())
            .execute(pool)
            .await
            .unwrap();

        let mapped: Vec<(String, String)> =
            sqlx::query_as("SELECT id, category FROM catalog_items ORDER BY id")
                .fetch_all(pool)
                .await
                .unwrap();
        let mapped: Vec<(&str, &str)> = mapped
            .iter()
            .map(|(id, category)| (id.as_str(), category.as_str()))
            .collect();

        assert_eq!(
            mapped,
            [
                ("m1", "tubing"),
                ("m2", "insulation_and_tape"),
                ("m3", "electrical_cables"),
                ("m4", "other"),
                ("s1", "cleaning"),
                ("s2", "repairs"),
            ]
        );
    }

    #[tokio::test]
    async fn test_new_rows_default_to_other_slug() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query(
            "INSERT INTO catalog_items (id, kind, name, created_at, updated_at) \
             VALUES ('x', 'service', 'Visita', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let category: String =
            sqlx::query_scalar("SELECT category FROM catalog_items WHERE id = 'x'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(category, "other");
    }
}
