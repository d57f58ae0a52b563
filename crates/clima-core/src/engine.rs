//! # Quote Line Engine
//!
//! Mutations of a [`Quote`]'s material and service lines.
//!
//! ## Mutation Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add / update / set / remove                                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  line.reprice()          copper: price_copper_tube(quantity, snapshot)  │
//! │        │                 plain:  quantity × unit_price                  │
//! │        ▼                                                                │
//! │  quote.recalculate()     prune lines at quantity ≤ 0                    │
//! │                          refresh subtotals, discount_value, total       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quantity Rules
//! - `add_*` on an item already in the quote merges into it (+1)
//! - Delta updates floor at zero, and a result of exactly zero is REJECTED:
//!   the line keeps its old quantity. Removal is an explicit action.
//! - Direct edits (`set_*_quantity`) accept zero, which prunes the line.
//!
//! Custom lines carry a `custom-` reference, so catalog adds never merge
//! into them.

use uuid::Uuid;

use crate::copper::price_copper_tube;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::resolver::{CatalogLookup, CatalogResolver};
use crate::totals::QuoteTotals;
use crate::types::{
    Discount, DiscountMode, Material, Quote, QuoteLineItem, QuoteServiceLine, Service,
};
use crate::CUSTOM_ITEM_PREFIX;

/// Outcome of a delta quantity change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityUpdate {
    /// The line now has `quantity`.
    Applied { quantity: f64 },
    /// The delta would have left the line at zero; nothing changed.
    RejectedAtZero,
}

fn custom_reference() -> String {
    format!("{}{}", CUSTOM_ITEM_PREFIX, Uuid::new_v4())
}

fn check_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite {
            field: field.to_string(),
        })
    }
}

fn check_not_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// `max(0, current + delta)`, or `None` when that lands on zero.
fn apply_delta(current: f64, delta: f64) -> Option<f64> {
    let next = (current + delta).max(0.0);
    (next != 0.0).then_some(next)
}

// =============================================================================
// Line Repricing
// =============================================================================

impl QuoteLineItem {
    /// Recomputes `total` (and copper weight) from the current quantity.
    pub fn reprice(&mut self) {
        match self.copper.as_mut() {
            Some(copper) => {
                let priced =
                    price_copper_tube(self.quantity, copper.weight_per_meter, copper.price_per_kg);
                copper.total_weight = priced.total_weight;
                self.total = priced.total_price;
            }
            None => self.total = self.quantity * self.unit_price,
        }
    }
}

impl QuoteServiceLine {
    /// Recomputes `price` from the current quantity.
    pub fn reprice(&mut self) {
        self.price = self.quantity * self.unit_price;
    }
}

// =============================================================================
// Material Lines
// =============================================================================

impl Quote {
    /// Adds one unit of a catalog material.
    ///
    /// Returns the id of the line that was created or incremented.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use clima_core::{CatalogResolver, Material, MaterialCategory, Quote};
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
    /// let resolver = CatalogResolver::new(75.0);
    /// let mut quote = Quote::new("Ana");
    /// for _ in 0..3 {
    ///     quote.add_material(&resolver, &tube);
    /// }
    ///
    /// assert_eq!(quote.items.len(), 1);
    /// assert_eq!(quote.items[0].total, 102.15);
    /// assert_eq!(quote.total, 102.15);
    /// ```
    pub fn add_material(&mut self, resolver: &CatalogResolver, material: &Material) -> String {
        let line_id = match self
            .items
            .iter_mut()
            .find(|line| line.material_id == material.id)
        {
            Some(line) => {
                line.quantity += 1.0;
                line.reprice();
                line.id.clone()
            }
            None => {
                let resolved = resolver.resolve_material(material);
                let line = QuoteLineItem {
                    id: Uuid::new_v4().to_string(),
                    material_id: material.id.clone(),
                    name: material.name.clone(),
                    unit: material.unit.clone(),
                    quantity: 1.0,
                    unit_price: resolved.unit_price,
                    total: resolved.total,
                    copper: resolved.copper,
                };
                let id = line.id.clone();
                self.items.push(line);
                id
            }
        };

        self.recalculate();
        line_id
    }

    /// Adds one unit of the catalog material with the given id.
    pub fn add_material_by_id(
        &mut self,
        catalog: &impl CatalogLookup,
        resolver: &CatalogResolver,
        material_id: &str,
    ) -> CoreResult<String> {
        let material = catalog
            .material(material_id)
            .ok_or_else(|| CoreError::MaterialNotFound(material_id.to_string()))?;
        Ok(self.add_material(resolver, material))
    }

    /// Adds a hand-entered material line at quantity 1.
    ///
    /// Never merges and never receives copper pricing, whatever the name.
    pub fn add_custom_material(
        &mut self,
        name: impl Into<String>,
        unit: impl Into<String>,
        unit_price: f64,
    ) -> CoreResult<String> {
        check_not_negative("unit price", unit_price)?;

        let line = QuoteLineItem {
            id: Uuid::new_v4().to_string(),
            material_id: custom_reference(),
            name: name.into(),
            unit: unit.into(),
            quantity: 1.0,
            unit_price,
            total: unit_price,
            copper: None,
        };
        let id = line.id.clone();
        self.items.push(line);

        self.recalculate();
        Ok(id)
    }

    /// Changes a material line's quantity by `delta`.
    pub fn update_item_quantity(&mut self, line_id: &str, delta: f64) -> CoreResult<QuantityUpdate> {
        check_finite("quantity change", delta)?;

        let line = self
            .items
            .iter_mut()
            .find(|line| line.id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;

        let Some(quantity) = apply_delta(line.quantity, delta) else {
            return Ok(QuantityUpdate::RejectedAtZero);
        };
        line.quantity = quantity;
        line.reprice();

        self.recalculate();
        Ok(QuantityUpdate::Applied { quantity })
    }

    /// Sets a material line's quantity directly. Zero removes the line.
    pub fn set_item_quantity(&mut self, line_id: &str, quantity: f64) -> CoreResult<()> {
        check_not_negative("quantity", quantity)?;

        let line = self
            .items
            .iter_mut()
            .find(|line| line.id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;
        line.quantity = quantity;
        line.reprice();

        self.recalculate();
        Ok(())
    }

    /// Removes a material line. Returns `false` if no such line exists.
    pub fn remove_item(&mut self, line_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.id != line_id);
        let removed = self.items.len() != before;
        self.recalculate();
        removed
    }
}

// =============================================================================
// Service Lines
// =============================================================================

impl Quote {
    /// Adds one execution of a catalog service, merging by service id.
    pub fn add_service(&mut self, service: &Service) -> String {
        let line_id = match self
            .services
            .iter_mut()
            .find(|line| line.service_id == service.id)
        {
            Some(line) => {
                line.quantity += 1.0;
                line.reprice();
                line.id.clone()
            }
            None => {
                let line = QuoteServiceLine {
                    id: Uuid::new_v4().to_string(),
                    service_id: service.id.clone(),
                    name: service.name.clone(),
                    unit_price: service.price,
                    quantity: 1.0,
                    price: service.price,
                };
                let id = line.id.clone();
                self.services.push(line);
                id
            }
        };

        self.recalculate();
        line_id
    }

    /// Adds one execution of the catalog service with the given id.
    pub fn add_service_by_id(
        &mut self,
        catalog: &impl CatalogLookup,
        service_id: &str,
    ) -> CoreResult<String> {
        let service = catalog
            .service(service_id)
            .ok_or_else(|| CoreError::ServiceNotFound(service_id.to_string()))?;
        Ok(self.add_service(service))
    }

    /// Adds a hand-entered service line at quantity 1.
    pub fn add_custom_service(&mut self, name: impl Into<String>, price: f64) -> CoreResult<String> {
        check_not_negative("price", price)?;

        let line = QuoteServiceLine {
            id: Uuid::new_v4().to_string(),
            service_id: custom_reference(),
            name: name.into(),
            unit_price: price,
            quantity: 1.0,
            price,
        };
        let id = line.id.clone();
        self.services.push(line);

        self.recalculate();
        Ok(id)
    }

    /// Changes a service line's quantity by `delta`. Same zero rule as materials.
    pub fn update_service_quantity(
        &mut self,
        line_id: &str,
        delta: f64,
    ) -> CoreResult<QuantityUpdate> {
        check_finite("quantity change", delta)?;

        let line = self
            .services
            .iter_mut()
            .find(|line| line.id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;

        let Some(quantity) = apply_delta(line.quantity, delta) else {
            return Ok(QuantityUpdate::RejectedAtZero);
        };
        line.quantity = quantity;
        line.reprice();

        self.recalculate();
        Ok(QuantityUpdate::Applied { quantity })
    }

    pub fn set_service_quantity(&mut self, line_id: &str, quantity: f64) -> CoreResult<()> {
        check_not_negative("quantity", quantity)?;

        let line = self
            .services
            .iter_mut()
            .find(|line| line.id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;
        line.quantity = quantity;
        line.reprice();

        self.recalculate();
        Ok(())
    }

    pub fn remove_service(&mut self, line_id: &str) -> bool {
        let before = self.services.len();
        self.services.retain(|line| line.id != line_id);
        let removed = self.services.len() != before;
        self.recalculate();
        removed
    }
}

// =============================================================================
// Discount & Totals
// =============================================================================

impl Quote {
    /// Stores the discount as entered and refreshes the total.
    pub fn set_discount(&mut self, value: f64, mode: DiscountMode) -> CoreResult<()> {
        check_finite("discount", value)?;
        self.discount = Discount { value, mode };
        self.recalculate();
        Ok(())
    }

    /// Current totals computed from the lines.
    pub fn totals(&self) -> QuoteTotals {
        QuoteTotals::compute(&self.items, &self.services, self.discount)
    }

    /// Drops empty lines and refreshes every derived amount.
    pub fn recalculate(&mut self) {
        self.items.retain(|line| line.quantity > 0.0);
        self.services.retain(|line| line.quantity > 0.0);

        let totals = self.totals();
        self.subtotal_materials = totals.subtotal_materials.amount();
        self.subtotal_services = totals.subtotal_services.amount();
        self.discount_value = totals.discount_value.amount();
        self.total = totals.total.amount();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Catalog;
    use crate::types::{MaterialCategory, ServiceCategory};
    use chrono::Utc;

    fn material(id: &str, name: &str, price: f64) -> Material {
        Material {
            id: id.to_string(),
            name: name.to_string(),
            unit: "m".to_string(),
            cost: 0.0,
            price,
            category: MaterialCategory::Other,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(id: &str, price: f64) -> Service {
        Service {
            id: id.to_string(),
            name: "Instalação".to_string(),
            cost: 0.0,
            price,
            category: ServiceCategory::Installation,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn assert_totals_consistent(quote: &Quote) {
        let materials: f64 = quote.items.iter().map(|l| l.total).sum();
        let services: f64 = quote.services.iter().map(|l| l.price).sum();
        let subtotal = materials + services;
        let discount = match quote.discount.mode {
            DiscountMode::Percentage => subtotal * quote.discount.value / 100.0,
            DiscountMode::Fixed => quote.discount.value,
        };

        assert!((quote.subtotal_materials - materials).abs() < 1e-9);
        assert!((quote.subtotal_services - services).abs() < 1e-9);
        assert!((quote.discount_value - discount).abs() < 1e-9);
        assert!((quote.total - (subtotal - discount)).abs() < 1e-9);
    }

    #[test]
    fn test_add_material_merges_by_id() {
        let resolver = CatalogResolver::new(75.0);
        let tape = material("m-1", "Fita PVC", 8.5);
        let mut quote = Quote::new("Ana");

        let first = quote.add_material(&resolver, &tape);
        let second = quote.add_material(&resolver, &tape);

        assert_eq!(first, second);
        assert_eq!(quote.items.len(), 1);
        assert_eq!(quote.items[0].quantity, 2.0);
        assert_eq!(quote.items[0].total, 17.0);
        assert_totals_consistent(&quote);
    }

    #[test]
    fn test_add_twice_then_decrement_equals_add_once() {
        let resolver = CatalogResolver::new(75.0);
        let tape = material("m-1", "Fita PVC", 8.5);

        let mut once = Quote::new("Ana");
        once.add_material(&resolver, &tape);

        let mut twice = Quote::new("Ana");
        let line_id = twice.add_material(&resolver, &tape);
        twice.add_material(&resolver, &tape);
        let outcome = twice.update_item_quantity(&line_id, -1.0).unwrap();

        assert_eq!(outcome, QuantityUpdate::Applied { quantity: 1.0 });
        assert_eq!(twice.items[0].quantity, once.items[0].quantity);
        assert_eq!(twice.items[0].total, once.items[0].total);
        assert_eq!(twice.total, once.total);
    }

    #[test]
    fn test_copper_line_reprices_on_quantity_change() {
        let resolver = CatalogResolver::new(75.0);
        let tube = material("m-2", "Tubo de Cobre 1/2\"", 999.0);
        let mut quote = Quote::new("Ana");

        let line_id = quote.add_material(&resolver, &tube);
        assert_eq!(quote.items[0].unit_price, 34.05);
        assert_eq!(quote.items[0].total, 34.05);

        quote.update_item_quantity(&line_id, 2.0).unwrap();
        let line = &quote.items[0];
        let copper = line.copper.as_ref().unwrap();
        assert_eq!(line.quantity, 3.0);
        assert_eq!(copper.total_weight, 1.362);
        assert_eq!(line.total, 102.15);
        assert_totals_consistent(&quote);
    }

    #[test]
    fn test_copper_line_keeps_price_snapshot() {
        let tube = material("m-2", "Tubo de Cobre 1/4", 0.0);
        let mut quote = Quote::new("Ana");
        let line_id = quote.add_material(&CatalogResolver::new(75.0), &tube);

        // A later add with a different rate merges and keeps the snapshot.
        quote.add_material(&CatalogResolver::new(100.0), &tube);
        let line = quote.items.iter().find(|l| l.id == line_id).unwrap();
        assert_eq!(line.copper.as_ref().unwrap().price_per_kg, 75.0);
        assert_eq!(line.total, 29.7);
    }

    #[test]
    fn test_decrement_at_one_is_rejected() {
        let resolver = CatalogResolver::new(75.0);
        let mut quote = Quote::new("Ana");
        let line_id = quote.add_material(&resolver, &material("m-1", "Fita PVC", 8.5));

        let outcome = quote.update_item_quantity(&line_id, -1.0).unwrap();
        assert_eq!(outcome, QuantityUpdate::RejectedAtZero);
        assert_eq!(quote.items[0].quantity, 1.0);

        let outcome = quote.update_item_quantity(&line_id, -5.0).unwrap();
        assert_eq!(outcome, QuantityUpdate::RejectedAtZero);
        assert_eq!(quote.items.len(), 1);
    }

    #[test]
    fn test_remove_deletes_regardless_of_quantity() {
        let resolver = CatalogResolver::new(75.0);
        let mut quote = Quote::new("Ana");
        let line_id = quote.add_material(&resolver, &material("m-1", "Fita PVC", 8.5));

        assert!(quote.remove_item(&line_id));
        assert!(quote.items.is_empty());
        assert!(!quote.remove_item(&line_id));
        assert_eq!(quote.total, 0.0);
    }

    #[test]
    fn test_unknown_line_is_an_error() {
        let mut quote = Quote::new("Ana");
        let err = quote.update_item_quantity("nope", 1.0).unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound(id) if id == "nope"));
        assert!(quote.set_service_quantity("nope", 2.0).is_err());
    }

    #[test]
    fn test_set_quantity_zero_prunes_line() {
        let resolver = CatalogResolver::new(75.0);
        let mut quote = Quote::new("Ana");
        let line_id = quote.add_material(&resolver, &material("m-1", "Fita PVC", 8.5));

        quote.set_item_quantity(&line_id, 2.5).unwrap();
        assert_eq!(quote.items[0].total, 21.25);

        quote.set_item_quantity(&line_id, 0.0).unwrap();
        assert!(quote.items.is_empty());
        assert_totals_consistent(&quote);
    }

    #[test]
    fn test_set_quantity_rejects_bad_input() {
        let resolver = CatalogResolver::new(75.0);
        let mut quote = Quote::new("Ana");
        let line_id = quote.add_material(&resolver, &material("m-1", "Fita PVC", 8.5));

        assert!(matches!(
            quote.set_item_quantity(&line_id, -1.0),
            Err(CoreError::Validation(ValidationError::MustNotBeNegative { .. }))
        ));
        assert!(matches!(
            quote.set_item_quantity(&line_id, f64::NAN),
            Err(CoreError::Validation(ValidationError::NotFinite { .. }))
        ));
        assert_eq!(quote.items[0].quantity, 1.0);
    }

    #[test]
    fn test_custom_material_never_merges_or_gets_copper() {
        let mut quote = Quote::new("Ana");
        let a = quote
            .add_custom_material("Tubo de Cobre 1/2\"", "m", 50.0)
            .unwrap();
        let b = quote
            .add_custom_material("Tubo de Cobre 1/2\"", "m", 50.0)
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(quote.items.len(), 2);
        assert!(quote.items.iter().all(|l| l.is_custom() && !l.is_copper_tube()));
        assert_eq!(quote.subtotal_materials, 100.0);
    }

    #[test]
    fn test_by_id_lookups() {
        let catalog = Catalog::new(
            vec![material("m-1", "Fita PVC", 8.5)],
            vec![service("s-1", 350.0)],
        );
        let resolver = CatalogResolver::new(75.0);
        let mut quote = Quote::new("Ana");

        quote.add_material_by_id(&catalog, &resolver, "m-1").unwrap();
        quote.add_service_by_id(&catalog, "s-1").unwrap();
        assert_eq!(quote.total, 358.5);

        assert!(matches!(
            quote.add_material_by_id(&catalog, &resolver, "s-1"),
            Err(CoreError::MaterialNotFound(_))
        ));
        assert!(matches!(
            quote.add_service_by_id(&catalog, "m-1"),
            Err(CoreError::ServiceNotFound(_))
        ));
    }

    #[test]
    fn test_service_lines() {
        let install = service("s-1", 350.0);
        let mut quote = Quote::new("Ana");

        let line_id = quote.add_service(&install);
        quote.add_service(&install);
        assert_eq!(quote.services.len(), 1);
        assert_eq!(quote.services[0].price, 700.0);

        assert_eq!(
            quote.update_service_quantity(&line_id, -1.0).unwrap(),
            QuantityUpdate::Applied { quantity: 1.0 }
        );
        assert_eq!(
            quote.update_service_quantity(&line_id, -1.0).unwrap(),
            QuantityUpdate::RejectedAtZero
        );

        let custom = quote.add_custom_service("Visita técnica", 80.0).unwrap();
        assert_eq!(quote.subtotal_services, 430.0);

        assert!(quote.remove_service(&custom));
        assert_eq!(quote.subtotal_services, 350.0);
        assert_totals_consistent(&quote);
    }

    #[test]
    fn test_mixed_quote_totals_both_discount_modes() {
        let resolver = CatalogResolver::new(75.0);
        let tube = material("m-1", "Tubo de Cobre 1/2\"", 0.0);
        let tape = material("m-2", "Fita PVC", 8.5);
        let install = service("s-1", 350.0);

        let mut quote = Quote::new("Ana");
        for _ in 0..3 {
            quote.add_material(&resolver, &tube);
        }
        quote.add_material(&resolver, &tape);
        quote.add_material(&resolver, &tape);
        quote.add_service(&install);

        let subtotal = 102.15 + 17.0 + 350.0;

        quote.set_discount(10.0, DiscountMode::Percentage).unwrap();
        assert!((quote.total - (subtotal - subtotal * 0.1)).abs() < 1e-9);
        assert_totals_consistent(&quote);

        quote.set_discount(10.0, DiscountMode::Fixed).unwrap();
        assert!((quote.total - (subtotal - 10.0)).abs() < 1e-9);
        assert_eq!(quote.discount, Discount::fixed(10.0));
        assert_totals_consistent(&quote);
    }

    #[test]
    fn test_percentage_discount_follows_line_changes() {
        let resolver = CatalogResolver::new(75.0);
        let mut quote = Quote::new("Ana");
        let line_id = quote.add_material(&resolver, &material("m-1", "Cabo PP", 100.0));
        quote.set_discount(10.0, DiscountMode::Percentage).unwrap();
        assert_eq!(quote.discount_value, 10.0);

        quote.update_item_quantity(&line_id, 1.0).unwrap();
        assert_eq!(quote.discount_value, 20.0);
        assert_eq!(quote.total, 180.0);
    }

    #[test]
    fn test_fixed_discount_can_go_negative() {
        let mut quote = Quote::new("Ana");
        quote.add_custom_service("Visita", 50.0).unwrap();
        quote.set_discount(80.0, DiscountMode::Fixed).unwrap();
        assert_eq!(quote.total, -30.0);
    }
}
