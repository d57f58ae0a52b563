//! # clima-core: Pure Business Logic for ClimaQuote
//!
//! This crate is the **heart** of ClimaQuote. It turns catalog items and
//! quantities into priced quote lines, folds them into subtotals, applies
//! the discount and produces the final total. Everything here is a pure
//! function over caller-owned values.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ClimaQuote Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    climaquote CLI (apps/cli)                     │   │
//! │  │    catalog ──► quote add-material ──► discount ──► share        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ clima-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  copper   │  │ resolver  │  │  engine   │  │  totals   │  │   │
//! │  │   │ detection │  │ Catalog   │  │ Quote     │  │ discount  │  │   │
//! │  │   │ pricing   │  │ Resolver  │  │ lines     │  │ subtotal  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO GLOBAL STATE • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    clima-db (Database Layer)                    │   │
//! │  │            SQLite record store, migrations, repositories        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Material, Service, Quote, CompanySettings)
//! - [`money`] - Money type and the rounding contract
//! - [`copper`] - Copper tube detection and weight-based pricing
//! - [`resolver`] - Catalog resolver and catalog lookup interface
//! - [`engine`] - Quote line engine (add/update/remove lines)
//! - [`totals`] - Subtotal, discount and total computation
//! - [`diff`] - Line-level change sets for persistence
//! - [`share`] - Quote numbering and share message helpers
//! - [`validation`] - Caller-level validation gates
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use clima_core::copper::{detect_copper_tube, price_copper_tube};
//!
//! let detection = detect_copper_tube("Tubo de Cobre 1/2\"");
//! assert!(detection.is_copper_tube);
//!
//! let price = price_copper_tube(3.0, 0.454, 75.0);
//! assert_eq!(price.total_weight, 1.362);
//! assert_eq!(price.total_price, 102.15);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod copper;
pub mod diff;
pub mod engine;
pub mod error;
pub mod money;
pub mod resolver;
pub mod share;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use copper::{detect_copper_tube, price_copper_tube, CopperDetection, CopperPrice};
pub use diff::LineChanges;
pub use engine::QuantityUpdate;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use resolver::{Catalog, CatalogLookup, CatalogResolver, ResolvedMaterial};
pub use totals::QuoteTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Copper price per kilogram used when company settings carry none.
pub const DEFAULT_COPPER_PRICE_PER_KG: f64 = 75.0;

/// Validity period of a new quote, in days.
pub const DEFAULT_VALIDITY_DAYS: u32 = 15;

/// Payment terms pre-filled on a new quote.
pub const DEFAULT_PAYMENT_TERMS: &str = "À vista ou em até 3x no cartão";

/// Footer printed on quote documents until the company sets its own.
pub const DEFAULT_FOOTER_TEXT: &str =
    "Garantia de 90 dias para serviços executados. Orçamento válido por 15 dias.";

/// Prefix of the synthetic catalog reference given to custom lines.
///
/// Custom lines never match a real catalog id, so "add" never merges into them.
pub const CUSTOM_ITEM_PREFIX: &str = "custom-";
