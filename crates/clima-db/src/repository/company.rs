//! # Company Repository
//!
//! The company settings singleton (row `id = 1`).
//!
//! Until the user saves something, reads return
//! [`CompanySettings::default()`], which carries the default footer and a
//! copper price of R$ 75/kg.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use clima_core::CompanySettings;

/// Repository for company settings.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Loads the settings, or the defaults if none were saved yet.
    pub async fn get(&self) -> DbResult<CompanySettings> {
        let settings = sqlx::query_as::<_, CompanySettings>(
            r#"
            SELECT name, tax_id, phone, address, logo, footer_text,
                   copper_price_per_kg, updated_at
            FROM company_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings.unwrap_or_default())
    }

    /// Saves the settings, creating the row on first save.
    pub async fn save(&self, settings: &CompanySettings) -> DbResult<CompanySettings> {
        debug!(name = %settings.name, "Saving company settings");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO company_settings (
                id, name, tax_id, phone, address, logo, footer_text,
                copper_price_per_kg, updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                tax_id = excluded.tax_id,
                phone = excluded.phone,
                address = excluded.address,
                logo = excluded.logo,
                footer_text = excluded.footer_text,
                copper_price_per_kg = excluded.copper_price_per_kg,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&settings.name)
        .bind(&settings.tax_id)
        .bind(&settings.phone)
        .bind(&settings.address)
        .bind(&settings.logo)
        .bind(&settings.footer_text)
        .bind(settings.copper_price_per_kg)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(CompanySettings {
            updated_at: now,
            ..settings.clone()
        })
    }

    /// Sets only the copper price per kg.
    ///
    /// Existing copper lines keep the rate they were priced with.
    pub async fn set_copper_price(&self, price_per_kg: f64) -> DbResult<CompanySettings> {
        debug!(price_per_kg = %price_per_kg, "Setting copper price");

        let mut settings = self.get().await?;
        settings.copper_price_per_kg = price_per_kg;
        self.save(&settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use clima_core::{DEFAULT_COPPER_PRICE_PER_KG, DEFAULT_FOOTER_TEXT};

    async fn repo() -> CompanyRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().company()
    }

    #[tokio::test]
    async fn test_defaults_before_first_save() {
        let settings = repo().await.get().await.unwrap();
        assert_eq!(settings.copper_price_per_kg, DEFAULT_COPPER_PRICE_PER_KG);
        assert_eq!(settings.footer_text, DEFAULT_FOOTER_TEXT);
        assert!(settings.name.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let repo = repo().await;
        let mut settings = repo.get().await.unwrap();
        settings.name = "Frio Total Climatização".to_string();
        settings.phone = "(11) 4002-8922".to_string();
        repo.save(&settings).await.unwrap();

        let loaded = repo.get().await.unwrap();
        assert_eq!(loaded.name, "Frio Total Climatização");
        assert_eq!(loaded.phone, "(11) 4002-8922");
    }

    #[tokio::test]
    async fn test_set_copper_price_keeps_other_fields() {
        let repo = repo().await;
        let mut settings = repo.get().await.unwrap();
        settings.name = "Polar Ar".to_string();
        repo.save(&settings).await.unwrap();

        let updated = repo.set_copper_price(82.0).await.unwrap();
        assert_eq!(updated.copper_price_per_kg, 82.0);

        let loaded = repo.get().await.unwrap();
        assert_eq!(loaded.name, "Polar Ar");
        assert_eq!(loaded.effective_copper_price_per_kg(), 82.0);
    }
}
