//! # Domain Types
//!
//! Core domain types used throughout ClimaQuote.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  CATALOG (reusable)            QUOTE (snapshots)                        │
//! │  ┌─────────────────┐           ┌──────────────────────────────┐         │
//! │  │    Material     │──add──►   │ QuoteLineItem                │         │
//! │  │  name, unit     │           │  name/unit/price snapshot    │         │
//! │  │  cost, price    │           │  quantity, total             │         │
//! │  │  category       │           │  copper: Option<Copper...>   │         │
//! │  └─────────────────┘           └──────────────────────────────┘         │
//! │  ┌─────────────────┐           ┌──────────────────────────────┐         │
//! │  │    Service      │──add──►   │ QuoteServiceLine             │         │
//! │  └─────────────────┘           └──────────────────────────────┘         │
//! │                                                                         │
//! │  ┌─────────────────┐           ┌──────────────────────────────┐         │
//! │  │ CompanySettings │           │ Quote                        │         │
//! │  │ copper R$/kg    │           │  status, client, discount    │         │
//! │  └─────────────────┘           │  subtotals, total            │         │
//! │                                └──────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Quote lines copy name, unit and price from the catalog when they are
//! created. Editing or deleting a catalog item never changes existing quotes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::{
    CUSTOM_ITEM_PREFIX, DEFAULT_COPPER_PRICE_PER_KG, DEFAULT_FOOTER_TEXT, DEFAULT_PAYMENT_TERMS,
    DEFAULT_VALIDITY_DAYS,
};

// =============================================================================
// Categories
// =============================================================================

/// Material catalog category.
///
/// Declaration order is the display order of the catalog picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    /// Copper tubing and pipe work.
    Tubing,
    /// Insulation foam, tapes and supports.
    InsulationAndTape,
    /// Power and interconnect cables.
    ElectricalCables,
    #[default]
    Other,
}

impl MaterialCategory {
    /// All categories in display order.
    pub const ALL: [MaterialCategory; 4] = [
        MaterialCategory::Tubing,
        MaterialCategory::InsulationAndTape,
        MaterialCategory::ElectricalCables,
        MaterialCategory::Other,
    ];

    /// Label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            MaterialCategory::Tubing => "Tubulações",
            MaterialCategory::InsulationAndTape => "Esponjoso e fitas",
            MaterialCategory::ElectricalCables => "Cabos elétricos",
            MaterialCategory::Other => "Outros",
        }
    }

    /// Storage slug.
    pub fn slug(&self) -> &'static str {
        match self {
            MaterialCategory::Tubing => "tubing",
            MaterialCategory::InsulationAndTape => "insulation_and_tape",
            MaterialCategory::ElectricalCables => "electrical_cables",
            MaterialCategory::Other => "other",
        }
    }

    /// Maps a free-text label (current, legacy or slug) to a category.
    ///
    /// Unknown labels land in [`MaterialCategory::Other`].
    ///
    /// ## Example
    /// ```rust
    /// use clima_core::MaterialCategory;
    ///
    /// assert_eq!(MaterialCategory::from_label("Tubulação e tubo isolante"), MaterialCategory::Tubing);
    /// assert_eq!(MaterialCategory::from_label("Suportes e fitas"), MaterialCategory::InsulationAndTape);
    /// assert_eq!(MaterialCategory::from_label("whatever"), MaterialCategory::Other);
    /// ```
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Tubulações" | "Tubulação e tubo isolante" | "tubing" => MaterialCategory::Tubing,
            "Esponjoso e fitas" | "Suportes e fitas" | "insulation_and_tape" => {
                MaterialCategory::InsulationAndTape
            }
            "Cabos elétricos" | "electrical_cables" => MaterialCategory::ElectricalCables,
            _ => MaterialCategory::Other,
        }
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Service catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Installation,
    Cleaning,
    Repairs,
    #[default]
    Other,
}

impl ServiceCategory {
    /// All categories in display order.
    pub const ALL: [ServiceCategory; 4] = [
        ServiceCategory::Installation,
        ServiceCategory::Cleaning,
        ServiceCategory::Repairs,
        ServiceCategory::Other,
    ];

    /// Label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::Installation => "Instalação",
            ServiceCategory::Cleaning => "Limpeza",
            ServiceCategory::Repairs => "Consertos",
            ServiceCategory::Other => "Outros",
        }
    }

    /// Storage slug.
    pub fn slug(&self) -> &'static str {
        match self {
            ServiceCategory::Installation => "installation",
            ServiceCategory::Cleaning => "cleaning",
            ServiceCategory::Repairs => "repairs",
            ServiceCategory::Other => "other",
        }
    }

    /// Maps a free-text label (or slug) to a category.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Instalação" | "installation" => ServiceCategory::Installation,
            "Limpeza" | "cleaning" => ServiceCategory::Cleaning,
            "Consertos" | "repairs" => ServiceCategory::Repairs,
            _ => ServiceCategory::Other,
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Catalog Items
// =============================================================================

/// A material sold by length, weight or unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Material {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name. Copper classification is derived from it.
    pub name: String,

    /// Unit of measure ("m", "kg", "un").
    pub unit: String,

    /// Purchase cost.
    pub cost: f64,

    /// Sale price per unit.
    pub price: f64,

    pub category: MaterialCategory,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Material {
    /// Returns the sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::new(self.price)
    }

    /// Returns the purchase cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::new(self.cost)
    }
}

/// A service billed per execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub cost: f64,
    pub price: f64,
    pub category: ServiceCategory,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Returns the sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::new(self.price)
    }
}

/// Either kind of catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogItem {
    Material(Material),
    Service(Service),
}

impl CatalogItem {
    pub fn id(&self) -> &str {
        match self {
            CatalogItem::Material(m) => &m.id,
            CatalogItem::Service(s) => &s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogItem::Material(m) => &m.name,
            CatalogItem::Service(s) => &s.name,
        }
    }

    pub fn price(&self) -> Money {
        match self {
            CatalogItem::Material(m) => m.price(),
            CatalogItem::Service(s) => s.price(),
        }
    }
}

// =============================================================================
// Company Settings
// =============================================================================

/// Singleton company identity and pricing defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CompanySettings {
    pub name: String,
    /// CNPJ/CPF printed on the document header.
    pub tax_id: String,
    pub phone: String,
    pub address: String,
    /// Logo as a data URL or file path; rendered by the document layer.
    pub logo: String,
    pub footer_text: String,
    /// Current copper price in R$/kg.
    pub copper_price_per_kg: f64,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CompanySettings {
    /// Copper rate to price new copper lines with.
    ///
    /// A zero, negative or non-finite stored value counts as unset.
    ///
    /// ## Example
    /// ```rust
    /// use clima_core::CompanySettings;
    ///
    /// let mut settings = CompanySettings::default();
    /// settings.copper_price_per_kg = 0.0;
    /// assert_eq!(settings.effective_copper_price_per_kg(), 75.0);
    /// ```
    pub fn effective_copper_price_per_kg(&self) -> f64 {
        if self.copper_price_per_kg.is_finite() && self.copper_price_per_kg > 0.0 {
            self.copper_price_per_kg
        } else {
            DEFAULT_COPPER_PRICE_PER_KG
        }
    }
}

impl Default for CompanySettings {
    fn default() -> Self {
        CompanySettings {
            name: String::new(),
            tax_id: String::new(),
            phone: String::new(),
            address: String::new(),
            logo: String::new(),
            footer_text: DEFAULT_FOOTER_TEXT.to_string(),
            copper_price_per_kg: DEFAULT_COPPER_PRICE_PER_KG,
            updated_at: Utc::now(),
        }
    }
}

// =============================================================================
// Quote Status & Discount
// =============================================================================

/// Lifecycle status of a quote.
///
/// Transitions are user-driven and unrestricted: any status may move to any
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Approved,
    Cancelled,
}

impl QuoteStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [QuoteStatus; 4] = [
        QuoteStatus::Draft,
        QuoteStatus::Sent,
        QuoteStatus::Approved,
        QuoteStatus::Cancelled,
    ];

    /// Label shown on quote cards.
    pub fn label(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "Rascunho",
            QuoteStatus::Sent => "Enviado",
            QuoteStatus::Approved => "Aprovado",
            QuoteStatus::Cancelled => "Cancelado",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Approved => "approved",
            QuoteStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(QuoteStatus::Draft),
            "sent" => Ok(QuoteStatus::Sent),
            "approved" => Ok(QuoteStatus::Approved),
            "cancelled" | "canceled" => Ok(QuoteStatus::Cancelled),
            other => Err(format!("unknown quote status '{}'", other)),
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the discount input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMode {
    /// Discount is an absolute amount in Reais.
    #[default]
    Fixed,
    /// Discount is a percentage of the subtotal.
    Percentage,
}

impl FromStr for DiscountMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(DiscountMode::Fixed),
            "percentage" | "percent" | "%" => Ok(DiscountMode::Percentage),
            other => Err(format!("unknown discount mode '{}'", other)),
        }
    }
}

/// The discount exactly as the user entered it.
///
/// The input is kept (not the derived amount) so a percentage discount is
/// redisplayed as the same percentage even after lines change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Discount {
    pub value: f64,
    pub mode: DiscountMode,
}

impl Discount {
    pub const fn fixed(value: f64) -> Self {
        Discount {
            value,
            mode: DiscountMode::Fixed,
        }
    }

    pub const fn percentage(value: f64) -> Self {
        Discount {
            value,
            mode: DiscountMode::Percentage,
        }
    }
}

// =============================================================================
// Quote Lines
// =============================================================================

/// Copper pricing parameters frozen on a copper tube line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CopperDetails {
    /// Size token as found in the material name (e.g. `1/2"`).
    pub size: String,
    pub weight_per_meter: f64,
    /// Weight for the current quantity, kg rounded to thousandths.
    pub total_weight: f64,
    /// R$/kg in effect when the line was created.
    pub price_per_kg: f64,
}

/// A material line on a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteLineItem {
    /// Line id, distinct from the catalog id.
    pub id: String,
    /// Source material id, or a `custom-` id for ad-hoc lines.
    pub material_id: String,
    /// Name at time of adding (frozen).
    pub name: String,
    /// Unit at time of adding (frozen).
    pub unit: String,
    pub quantity: f64,
    /// Unit price at time of adding (frozen).
    pub unit_price: f64,
    pub total: f64,
    /// Present only on detected copper tube lines.
    pub copper: Option<CopperDetails>,
}

impl QuoteLineItem {
    #[inline]
    pub fn is_copper_tube(&self) -> bool {
        self.copper.is_some()
    }

    /// Whether the line was entered by hand rather than picked from the catalog.
    #[inline]
    pub fn is_custom(&self) -> bool {
        self.material_id.starts_with(CUSTOM_ITEM_PREFIX)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::new(self.total)
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::new(self.unit_price)
    }
}

/// A service line on a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteServiceLine {
    pub id: String,
    /// Source service id, or a `custom-` id for ad-hoc lines.
    pub service_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: f64,
    /// `unit_price * quantity`.
    pub price: f64,
}

impl QuoteServiceLine {
    #[inline]
    pub fn is_custom(&self) -> bool {
        self.service_id.starts_with(CUSTOM_ITEM_PREFIX)
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::new(self.price)
    }
}

// =============================================================================
// Quote
// =============================================================================

/// A quote for a client.
///
/// The derived fields (`subtotal_*`, `discount_value`, `total`) are
/// refreshed by the line engine after every mutation and are never edited
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quote {
    pub id: String,
    /// Sequence number assigned by the store on create (0 until saved).
    pub number: i64,
    /// Incremented on every persisted update.
    pub version: i64,
    pub status: QuoteStatus,

    pub client_name: String,
    pub client_phone: String,
    pub client_address: String,

    pub items: Vec<QuoteLineItem>,
    pub services: Vec<QuoteServiceLine>,

    pub discount: Discount,

    pub subtotal_materials: f64,
    pub subtotal_services: f64,
    /// Discount amount actually applied.
    pub discount_value: f64,
    pub total: f64,

    pub internal_notes: String,
    pub client_notes: String,
    pub validity_days: u32,
    pub payment_terms: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// Creates an empty draft quote for a client.
    pub fn new(client_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Quote {
            id: uuid::Uuid::new_v4().to_string(),
            number: 0,
            version: 1,
            status: QuoteStatus::Draft,
            client_name: client_name.into(),
            client_phone: String::new(),
            client_address: String::new(),
            items: Vec::new(),
            services: Vec::new(),
            discount: Discount::default(),
            subtotal_materials: 0.0,
            subtotal_services: 0.0,
            discount_value: 0.0,
            total: 0.0,
            internal_notes: String::new(),
            client_notes: String::new(),
            validity_days: DEFAULT_VALIDITY_DAYS,
            payment_terms: DEFAULT_PAYMENT_TERMS.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::new(self.total)
    }

    /// Sum of both subtotals.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::new(self.subtotal_materials + self.subtotal_services)
    }

    /// Whether the quote has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.services.is_empty()
    }

    /// Changes the status. Every transition is allowed.
    pub fn set_status(&mut self, status: QuoteStatus) {
        self.status = status;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_category_legacy_labels() {
        assert_eq!(
            MaterialCategory::from_label("Tubulação e tubo isolante"),
            MaterialCategory::Tubing
        );
        assert_eq!(
            MaterialCategory::from_label("Tubulações"),
            MaterialCategory::Tubing
        );
        assert_eq!(
            MaterialCategory::from_label("Suportes e fitas"),
            MaterialCategory::InsulationAndTape
        );
        assert_eq!(
            MaterialCategory::from_label(" Cabos elétricos "),
            MaterialCategory::ElectricalCables
        );
        assert_eq!(MaterialCategory::from_label(""), MaterialCategory::Other);
    }

    #[test]
    fn test_category_slug_roundtrips_through_from_label() {
        for category in MaterialCategory::ALL {
            assert_eq!(MaterialCategory::from_label(category.slug()), category);
        }
        for category in ServiceCategory::ALL {
            assert_eq!(ServiceCategory::from_label(category.slug()), category);
        }
    }

    #[test]
    fn test_quote_status_parse() {
        assert_eq!("draft".parse::<QuoteStatus>(), Ok(QuoteStatus::Draft));
        assert_eq!("APPROVED".parse::<QuoteStatus>(), Ok(QuoteStatus::Approved));
        assert_eq!("canceled".parse::<QuoteStatus>(), Ok(QuoteStatus::Cancelled));
        assert!("paid".parse::<QuoteStatus>().is_err());
    }

    #[test]
    fn test_any_status_transition_is_allowed() {
        let mut quote = Quote::new("Maria");
        quote.set_status(QuoteStatus::Cancelled);
        quote.set_status(QuoteStatus::Draft);
        quote.set_status(QuoteStatus::Approved);
        assert_eq!(quote.status, QuoteStatus::Approved);
    }

    #[test]
    fn test_new_quote_defaults() {
        let quote = Quote::new("João");
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(quote.version, 1);
        assert_eq!(quote.validity_days, 15);
        assert_eq!(quote.discount, Discount::fixed(0.0));
        assert!(quote.is_empty());
        assert!(quote.total().is_zero());
    }

    #[test]
    fn test_effective_copper_price() {
        let mut settings = CompanySettings::default();
        assert_eq!(settings.effective_copper_price_per_kg(), 75.0);

        settings.copper_price_per_kg = 82.5;
        assert_eq!(settings.effective_copper_price_per_kg(), 82.5);

        settings.copper_price_per_kg = f64::NAN;
        assert_eq!(settings.effective_copper_price_per_kg(), 75.0);

        settings.copper_price_per_kg = -3.0;
        assert_eq!(settings.effective_copper_price_per_kg(), 75.0);
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            serde_json::to_string(&QuoteStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        assert_eq!(
            serde_json::to_string(&MaterialCategory::InsulationAndTape).unwrap(),
            "\"insulation_and_tape\""
        );

        let json = serde_json::to_value(Discount::percentage(10.0)).unwrap();
        assert_eq!(json["mode"], "percentage");
        assert_eq!(json["value"], 10.0);
    }

    #[test]
    fn test_discount_mode_parse() {
        assert_eq!("%".parse::<DiscountMode>(), Ok(DiscountMode::Percentage));
        assert_eq!("fixed".parse::<DiscountMode>(), Ok(DiscountMode::Fixed));
        assert!("half".parse::<DiscountMode>().is_err());
    }
}
