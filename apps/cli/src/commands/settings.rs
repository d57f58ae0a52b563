//! # Settings Commands
//!
//! `climaquote settings ...`: company details printed on quotes and the
//! copper price used for new copper lines.

use tracing::info;

use crate::error::AppResult;
use crate::state::AppState;
use clima_core::validation::{validate_copper_price, validate_item_name};
use clima_core::CompanySettings;

/// Partial company update: only `Some` fields change.
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo: Option<String>,
    pub footer_text: Option<String>,
}

impl CompanyUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.tax_id.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.logo.is_none()
            && self.footer_text.is_none()
    }

    fn apply(self, settings: &mut CompanySettings) {
        if let Some(name) = self.name {
            settings.name = name.trim().to_string();
        }
        if let Some(tax_id) = self.tax_id {
            settings.tax_id = tax_id;
        }
        if let Some(phone) = self.phone {
            settings.phone = phone;
        }
        if let Some(address) = self.address {
            settings.address = address;
        }
        if let Some(logo) = self.logo {
            settings.logo = logo;
        }
        if let Some(footer_text) = self.footer_text {
            settings.footer_text = footer_text;
        }
    }
}

pub async fn show(state: &AppState) -> AppResult<CompanySettings> {
    Ok(state.db().company().get().await?)
}

/// Sets the copper price. Lines already on quotes keep their old rate.
pub async fn set_copper_price(state: &AppState, price_per_kg: f64) -> AppResult<CompanySettings> {
    validate_copper_price(price_per_kg)?;
    let settings = state.db().company().set_copper_price(price_per_kg).await?;
    info!(price_per_kg = price_per_kg, "Copper price updated");
    Ok(settings)
}

pub async fn update_company(state: &AppState, update: CompanyUpdate) -> AppResult<CompanySettings> {
    if let Some(name) = &update.name {
        validate_item_name(name)?;
    }

    let company = state.db().company();
    let mut settings = company.get().await?;
    update.apply(&mut settings);

    let saved = company.save(&settings).await?;
    info!(name = %saved.name, "Company settings updated");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::quote::{self, NewQuote, QuoteRef};
    use crate::commands::tests_support::test_state;
    use crate::commands::catalog;

    #[tokio::test]
    async fn test_rejects_non_positive_copper_price() {
        let state = test_state().await;
        assert!(set_copper_price(&state, 0.0).await.is_err());
        assert!(set_copper_price(&state, -3.0).await.is_err());
        assert_eq!(show(&state).await.unwrap().copper_price_per_kg, 75.0);
    }

    #[tokio::test]
    async fn test_new_copper_price_applies_to_new_lines_only() {
        let state = test_state().await;
        catalog::seed(&state).await.unwrap();

        let input = NewQuote {
            client_name: "Carlos".to_string(),
            materials: vec!["Tubo de Cobre 1/2\"".to_string()],
            ..NewQuote::default()
        };
        let before = quote::create(&state, input.clone()).await.unwrap();
        assert_eq!(before.items[0].total, 34.05);

        set_copper_price(&state, 100.0).await.unwrap();

        let old = quote::get(&state, &QuoteRef::Number(before.number)).await.unwrap();
        assert_eq!(old.items[0].total, 34.05);

        let after = quote::create(&state, input).await.unwrap();
        assert_eq!(after.items[0].total, 45.4);
        assert_eq!(after.items[0].copper.as_ref().unwrap().price_per_kg, 100.0);
    }

    #[tokio::test]
    async fn test_partial_company_update() {
        let state = test_state().await;
        update_company(
            &state,
            CompanyUpdate {
                name: Some("Frio Total".to_string()),
                phone: Some("(11) 4002-8922".to_string()),
                ..CompanyUpdate::default()
            },
        )
        .await
        .unwrap();

        let settings = update_company(
            &state,
            CompanyUpdate {
                tax_id: Some("12.345.678/0001-90".to_string()),
                ..CompanyUpdate::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(settings.name, "Frio Total");
        assert_eq!(settings.phone, "(11) 4002-8922");
        assert_eq!(settings.tax_id, "12.345.678/0001-90");
    }
}
