//! # Catalog Commands
//!
//! `climaquote catalog ...`: list, add, edit, reprice, delete and seed
//! catalog items. Every edit goes through the [`CatalogCache`] write path.
//!
//! [`CatalogCache`]: crate::state::CatalogCache

use tracing::info;

use crate::commands::{find_item_id, find_material, find_service};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use clima_core::{Catalog, CatalogItem, Material, MaterialCategory, Service, ServiceCategory};
use clima_db::{new_material, new_service, seed_defaults, SeedReport};

/// Input for `catalog add-material`.
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub name: String,
    pub unit: String,
    pub cost: f64,
    pub price: f64,
    pub category: MaterialCategory,
}

/// Input for `catalog add-service`.
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub cost: f64,
    pub price: f64,
    pub category: ServiceCategory,
}

/// Input for `catalog edit`: only `Some` fields change.
///
/// `category` is a slug or label, parsed against the item's own kind.
#[derive(Debug, Clone, Default)]
pub struct CatalogEdit {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub cost: Option<f64>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl CatalogEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.unit.is_none()
            && self.cost.is_none()
            && self.price.is_none()
            && self.category.is_none()
    }
}

/// The whole catalog, in insertion order.
pub async fn list(state: &AppState) -> AppResult<Catalog> {
    state.catalog().with_catalog(Catalog::clone).await
}

pub async fn add_material(state: &AppState, input: NewMaterial) -> AppResult<Material> {
    let material = new_material(
        input.name.trim(),
        input.unit.trim(),
        input.cost,
        input.price,
        input.category,
    );
    let material = state.catalog().add_material(material).await?;
    info!(id = %material.id, name = %material.name, "Material added");
    Ok(material)
}

pub async fn add_service(state: &AppState, input: NewService) -> AppResult<Service> {
    let service = new_service(input.name.trim(), input.cost, input.price, input.category);
    let service = state.catalog().add_service(service).await?;
    info!(id = %service.id, name = %service.name, "Service added");
    Ok(service)
}

/// Edits a material or service in place. Quote lines keep their values.
pub async fn edit(state: &AppState, reference: &str, edit: CatalogEdit) -> AppResult<CatalogItem> {
    if edit.is_empty() {
        return Err(AppError::validation("Nothing to update"));
    }

    let item = state
        .catalog()
        .with_catalog(|catalog| {
            find_material(catalog, reference)
                .map(CatalogItem::Material)
                .or_else(|_| find_service(catalog, reference).map(CatalogItem::Service))
                .map_err(|_| AppError::not_found("Catalog item", reference))
        })
        .await??;

    let saved = match item {
        CatalogItem::Material(mut material) => {
            if let Some(category) = &edit.category {
                material.category = parse_material_category(category).map_err(AppError::validation)?;
            }
            if let Some(name) = edit.name {
                material.name = name.trim().to_string();
            }
            if let Some(unit) = edit.unit {
                material.unit = unit.trim().to_string();
            }
            if let Some(cost) = edit.cost {
                material.cost = cost;
            }
            if let Some(price) = edit.price {
                material.price = price;
            }
            CatalogItem::Material(state.catalog().update_material(material).await?)
        }
        CatalogItem::Service(mut service) => {
            if edit.unit.is_some() {
                return Err(AppError::validation("Services have no unit of measure"));
            }
            if let Some(category) = &edit.category {
                service.category = parse_service_category(category).map_err(AppError::validation)?;
            }
            if let Some(name) = edit.name {
                service.name = name.trim().to_string();
            }
            if let Some(cost) = edit.cost {
                service.cost = cost;
            }
            if let Some(price) = edit.price {
                service.price = price;
            }
            CatalogItem::Service(state.catalog().update_service(service).await?)
        }
    };

    info!(id = %saved.id(), name = %saved.name(), "Catalog item edited");
    Ok(saved)
}

/// Reprices a catalog item. Returns the item's id.
pub async fn update_price(state: &AppState, reference: &str, price: f64) -> AppResult<String> {
    let id = state
        .catalog()
        .with_catalog(|catalog| find_item_id(catalog, reference))
        .await??;
    state.catalog().update_price(&id, price).await?;
    info!(id = %id, price = price, "Catalog price updated");
    Ok(id)
}

/// Deletes a catalog item. Quote lines that used it are unaffected.
pub async fn delete(state: &AppState, reference: &str) -> AppResult<String> {
    let id = state
        .catalog()
        .with_catalog(|catalog| find_item_id(catalog, reference))
        .await??;
    state.catalog().delete(&id).await?;
    info!(id = %id, "Catalog item deleted");
    Ok(id)
}

/// Loads the starter catalog into whichever kinds are empty.
pub async fn seed(state: &AppState) -> AppResult<SeedReport> {
    let report = seed_defaults(&state.db().catalog()).await?;
    state.catalog().reload().await?;
    Ok(report)
}

// =============================================================================
// Category Parsing
// =============================================================================

/// Material category from its slug or label, ignoring case.
pub fn parse_material_category(input: &str) -> Result<MaterialCategory, String> {
    MaterialCategory::ALL
        .into_iter()
        .find(|c| matches_category(input, c.slug(), c.label()))
        .ok_or_else(|| {
            let known: Vec<&str> = MaterialCategory::ALL.iter().map(|c| c.slug()).collect();
            format!("unknown material category '{}' (expected one of: {})", input, known.join(", "))
        })
}

/// Service category from its slug or label, ignoring case.
pub fn parse_service_category(input: &str) -> Result<ServiceCategory, String> {
    ServiceCategory::ALL
        .into_iter()
        .find(|c| matches_category(input, c.slug(), c.label()))
        .ok_or_else(|| {
            let known: Vec<&str> = ServiceCategory::ALL.iter().map(|c| c.slug()).collect();
            format!("unknown service category '{}' (expected one of: {})", input, known.join(", "))
        })
}

fn matches_category(input: &str, slug: &str, label: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == slug || input == label.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests_support::test_state;
    use clima_db::defaults::{DEFAULT_MATERIALS, DEFAULT_SERVICES};

    #[tokio::test]
    async fn test_seed_then_list() {
        let state = test_state().await;
        let report = seed(&state).await.unwrap();
        assert_eq!(report.materials, DEFAULT_MATERIALS.len());

        let catalog = list(&state).await.unwrap();
        assert_eq!(catalog.materials().len(), DEFAULT_MATERIALS.len());
        assert_eq!(catalog.services().len(), DEFAULT_SERVICES.len());
    }

    #[tokio::test]
    async fn test_add_trims_and_lists() {
        let state = test_state().await;
        add_material(
            &state,
            NewMaterial {
                name: "  Fita PVC  ".to_string(),
                unit: "un".to_string(),
                cost: 3.0,
                price: 9.5,
                category: MaterialCategory::InsulationAndTape,
            },
        )
        .await
        .unwrap();

        let catalog = list(&state).await.unwrap();
        assert_eq!(catalog.materials()[0].name, "Fita PVC");
    }

    #[tokio::test]
    async fn test_update_price_by_name() {
        let state = test_state().await;
        seed(&state).await.unwrap();

        let id = update_price(&state, "Carga de Gás", 140.0).await.unwrap();
        let stored = state.db().catalog().get_service(&id).await.unwrap().unwrap();
        assert_eq!(stored.price, 140.0);
    }

    #[tokio::test]
    async fn test_delete_unknown_reference() {
        let state = test_state().await;
        assert!(delete(&state, "Compressor 12k").await.is_err());
    }

    #[test]
    fn test_category_parsers() {
        assert_eq!(parse_material_category("tubing"), Ok(MaterialCategory::Tubing));
        assert_eq!(
            parse_material_category("Cabos elétricos"),
            Ok(MaterialCategory::ElectricalCables)
        );
        assert_eq!(parse_service_category("LIMPEZA"), Ok(ServiceCategory::Cleaning));
        assert!(parse_service_category("pintura").is_err());
    }

    #[tokio::test]
    async fn test_edit_material_fields() {
        let state = test_state().await;
        seed(&state).await.unwrap();

        let edited = edit(
            &state,
            "Dreno Corrugado",
            CatalogEdit {
                name: Some(" Dreno Corrugado 16mm ".to_string()),
                unit: Some("rolo".to_string()),
                price: Some(11.0),
                category: Some("insulation_and_tape".to_string()),
                ..CatalogEdit::default()
            },
        )
        .await
        .unwrap();

        let CatalogItem::Material(material) = edited else {
            panic!("expected a material");
        };
        assert_eq!(material.name, "Dreno Corrugado 16mm");

        let stored = state.db().catalog().get_material(&material.id).await.unwrap().unwrap();
        assert_eq!(stored.unit, "rolo");
        assert_eq!(stored.price, 11.0);
        assert_eq!(stored.category, MaterialCategory::InsulationAndTape);

        let cached = list(&state).await.unwrap();
        assert!(cached.materials().iter().any(|m| m.name == "Dreno Corrugado 16mm"));
    }

    #[tokio::test]
    async fn test_edit_service_rejects_unit_and_bad_category() {
        let state = test_state().await;
        seed(&state).await.unwrap();

        let unit = CatalogEdit {
            unit: Some("h".to_string()),
            ..CatalogEdit::default()
        };
        assert!(edit(&state, "Carga de Gás", unit).await.is_err());

        let category = CatalogEdit {
            category: Some("tubing".to_string()),
            ..CatalogEdit::default()
        };
        assert!(edit(&state, "Carga de Gás", category).await.is_err());

        let ok = CatalogEdit {
            cost: Some(40.0),
            category: Some("limpeza".to_string()),
            ..CatalogEdit::default()
        };
        let CatalogItem::Service(service) = edit(&state, "Carga de Gás", ok).await.unwrap() else {
            panic!("expected a service");
        };
        assert_eq!(service.cost, 40.0);
        assert_eq!(service.category, ServiceCategory::Cleaning);
    }

    #[tokio::test]
    async fn test_empty_edit_is_rejected() {
        let state = test_state().await;
        seed(&state).await.unwrap();
        assert!(edit(&state, "Dreno Corrugado", CatalogEdit::default()).await.is_err());
    }
}
