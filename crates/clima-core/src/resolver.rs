//! # Catalog Resolver
//!
//! Turns a catalog material into the priced parameters of a new quote line.
//!
//! The copper price per kg is injected when the resolver is built, usually
//! from [`CompanySettings`]. Nothing here reads global state, so a resolver
//! can be rebuilt whenever settings change.
//!
//! ## Resolution
//! ```text
//! Material ──► detect_copper_tube(name)
//!                 │
//!      copper ◄───┴───► not copper
//!        │                  │
//!        ▼                  ▼
//!  price_copper_tube(1 m)   unit_price = catalog sale price
//!  unit_price = 1 m price   total      = unit_price
//! ```

use std::collections::HashMap;

use crate::copper::{detect_copper_tube, price_copper_tube};
use crate::types::{CompanySettings, CopperDetails, Material, Service};

// =============================================================================
// Catalog Lookup
// =============================================================================

/// Read access to a catalog snapshot.
///
/// The engine only needs lookups by id; who loaded the snapshot and how
/// is the caller's business.
pub trait CatalogLookup {
    fn material(&self, id: &str) -> Option<&Material>;
    fn service(&self, id: &str) -> Option<&Service>;
}

/// In-memory catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    materials: Vec<Material>,
    services: Vec<Service>,
    material_index: HashMap<String, usize>,
    service_index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(materials: Vec<Material>, services: Vec<Service>) -> Self {
        let material_index = materials
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        let service_index = services
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();

        Catalog {
            materials,
            services,
            material_index,
            service_index,
        }
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty() && self.services.is_empty()
    }

    /// Inserts or replaces a material, keeping its position if it exists.
    pub fn upsert_material(&mut self, material: Material) {
        match self.material_index.get(&material.id) {
            Some(&i) => self.materials[i] = material,
            None => {
                self.material_index
                    .insert(material.id.clone(), self.materials.len());
                self.materials.push(material);
            }
        }
    }

    /// Inserts or replaces a service, keeping its position if it exists.
    pub fn upsert_service(&mut self, service: Service) {
        match self.service_index.get(&service.id) {
            Some(&i) => self.services[i] = service,
            None => {
                self.service_index
                    .insert(service.id.clone(), self.services.len());
                self.services.push(service);
            }
        }
    }

    /// Removes a material or service by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.materials.len() + self.services.len();
        self.materials.retain(|m| m.id != id);
        self.services.retain(|s| s.id != id);
        let removed = self.materials.len() + self.services.len() != before;
        if removed {
            *self = Catalog::new(
                std::mem::take(&mut self.materials),
                std::mem::take(&mut self.services),
            );
        }
        removed
    }
}

impl CatalogLookup for Catalog {
    fn material(&self, id: &str) -> Option<&Material> {
        self.material_index.get(id).map(|&i| &self.materials[i])
    }

    fn service(&self, id: &str) -> Option<&Service> {
        self.service_index.get(id).map(|&i| &self.services[i])
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Priced parameters for a material at quantity 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMaterial {
    pub unit_price: f64,
    pub total: f64,
    pub copper: Option<CopperDetails>,
}

/// Prices catalog materials with the current copper rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogResolver {
    copper_price_per_kg: f64,
}

impl CatalogResolver {
    pub fn new(copper_price_per_kg: f64) -> Self {
        CatalogResolver {
            copper_price_per_kg,
        }
    }

    /// Builds a resolver from company settings, falling back to the default
    /// copper rate when the stored one is unusable.
    pub fn from_settings(settings: &CompanySettings) -> Self {
        Self::new(settings.effective_copper_price_per_kg())
    }

    pub fn copper_price_per_kg(&self) -> f64 {
        self.copper_price_per_kg
    }

    /// Resolves a material for a new line at quantity 1.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use clima_core::{CatalogResolver, Material, MaterialCategory};
    ///
    /// let tube = Material {
    ///     id: "m-1".into(),
    ///     name: "Tubo de Cobre 1/2\"".into(),
    ///     unit: "m".into(),
    ///     cost: 20.0,
    ///     price: 40.0,
    ///     category: MaterialCategory::Tubing,
    ///     created_at: Utc::now(),
    ///     updated_at: Utc::now(),
    /// };
    ///
    /// let resolved = CatalogResolver::new(75.0).resolve_material(&tube);
    /// assert_eq!(resolved.unit_price, 34.05);
    /// assert!(resolved.copper.is_some());
    /// ```
    pub fn resolve_material(&self, material: &Material) -> ResolvedMaterial {
        let detection = detect_copper_tube(&material.name);

        match (detection.size, detection.weight_per_meter) {
            (Some(size), Some(weight_per_meter)) if detection.is_copper_tube => {
                let priced = price_copper_tube(1.0, weight_per_meter, self.copper_price_per_kg);
                ResolvedMaterial {
                    unit_price: priced.total_price,
                    total: priced.total_price,
                    copper: Some(CopperDetails {
                        size,
                        weight_per_meter,
                        total_weight: priced.total_weight,
                        price_per_kg: self.copper_price_per_kg,
                    }),
                }
            }
            _ => ResolvedMaterial {
                unit_price: material.price,
                total: material.price,
                copper: None,
            },
        }
    }
}

impl Default for CatalogResolver {
    fn default() -> Self {
        Self::new(crate::DEFAULT_COPPER_PRICE_PER_KG)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
