//! # Default Catalog
//!
//! The starter materials and services a fresh install ships with.
//!
//! Each kind is seeded independently and only while it is empty, so a user
//! who deleted every service but kept their materials gets the default
//! services back without duplicating any material.

use tracing::info;

use crate::error::DbResult;
use crate::repository::catalog::{new_material, new_service, CatalogRepository};
use clima_core::{MaterialCategory, ServiceCategory};

/// `(name, unit, price, category)`
pub const DEFAULT_MATERIALS: &[(&str, &str, f64, MaterialCategory)] = &[
    ("Gás R-410A (kg)", "kg", 150.0, MaterialCategory::Other),
    ("Gás R-22 (kg)", "kg", 120.0, MaterialCategory::Other),
    ("Tubo de Cobre 1/4\"", "m", 45.0, MaterialCategory::Tubing),
    ("Tubo de Cobre 3/8\"", "m", 60.0, MaterialCategory::Tubing),
    ("Tubo de Cobre 1/2\"", "m", 80.0, MaterialCategory::Tubing),
    ("Tubo de Cobre 5/8\"", "m", 100.0, MaterialCategory::Tubing),
    ("Tubo de Cobre 3/4\"", "m", 130.0, MaterialCategory::Tubing),
    ("Isolamento Térmico", "m", 7.0, MaterialCategory::Tubing),
    ("Cabo PP 3x1.5mm", "m", 12.0, MaterialCategory::ElectricalCables),
    ("Suporte para Condensadora", "un", 90.0, MaterialCategory::InsulationAndTape),
    ("Dreno Corrugado", "m", 8.0, MaterialCategory::InsulationAndTape),
];

/// `(name, price, category)`
pub const DEFAULT_SERVICES: &[(&str, f64, ServiceCategory)] = &[
    ("Instalação Split 9.000 BTUs", 350.0, ServiceCategory::Installation),
    ("Instalação Split 12.000 BTUs", 400.0, ServiceCategory::Installation),
    ("Instalação Split 18.000 BTUs", 500.0, ServiceCategory::Installation),
    ("Instalação Split 24.000 BTUs", 600.0, ServiceCategory::Installation),
    ("Limpeza Completa (Evap + Cond)", 180.0, ServiceCategory::Cleaning),
    ("Manutenção Preventiva", 150.0, ServiceCategory::Repairs),
    ("Carga de Gás", 120.0, ServiceCategory::Repairs),
    ("Diagnóstico/Visita Técnica", 80.0, ServiceCategory::Repairs),
    ("Desinstalação", 150.0, ServiceCategory::Repairs),
];

/// How many items [`seed_defaults`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub materials: usize,
    pub services: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.materials == 0 && self.services == 0
    }
}

/// Inserts the default materials and/or services, per empty kind.
pub async fn seed_defaults(catalog: &CatalogRepository) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    if catalog.count("material").await? == 0 {
        for (name, unit, price, category) in DEFAULT_MATERIALS {
            catalog
                .insert_material(&new_material(*name, *unit, 0.0, *price, *category))
                .await?;
            report.materials += 1;
        }
    }

    if catalog.count("service").await? == 0 {
        for (name, price, category) in DEFAULT_SERVICES {
            catalog
                .insert_service(&new_service(*name, 0.0, *price, *category))
                .await?;
            report.services += 1;
        }
    }

    if !report.is_empty() {
        info!(
            materials = report.materials,
            services = report.services,
            "Seeded default catalog"
        );
    }

    Ok(report)
}
