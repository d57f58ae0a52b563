//! # Copper Tube Detection & Pricing
//!
//! Copper tubing is priced by weight, not by the catalog's per-meter price.
//! A material is classified as copper tube purely by inspecting its name;
//! nothing is persisted.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Tubo de Cobre 1/2\""                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  detect_copper_tube()  ── "tubo" + "cobre"? ── size token? ──► 0.454    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_copper_tube(3 m, 0.454 kg/m, R$ 75/kg)                           │
//! │       │                                                                 │
//! │       ├── weight = round3(3 × 0.454)        = 1.362 kg                  │
//! │       └── price  = round2(1.362 × 75)       = R$ 102,15                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The weight is rounded BEFORE the price is derived from it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::round_to;

// =============================================================================
// Size Table
// =============================================================================

/// Nominal sizes (bitolas) and their weight in kg per meter.
///
/// Order matters: detection returns the first size found in the name.
pub const COPPER_TUBE_WEIGHTS: [(&str, f64); 5] = [
    ("1/4", 0.198),
    ("3/8", 0.308),
    ("1/2", 0.454),
    ("5/8", 0.620),
    ("3/4", 0.830),
];

/// Suffixes a size token may carry, most specific first.
const SIZE_SUFFIXES: [&str; 3] = ["\"", "'", ""];

/// Returns the weight per meter for a size token such as `3/8`, `3/8"` or `3/8'`.
pub fn weight_per_meter(size: &str) -> Option<f64> {
    let bare = size.trim_end_matches(['"', '\'']);
    COPPER_TUBE_WEIGHTS
        .iter()
        .find(|(token, _)| *token == bare)
        .map(|(_, weight)| *weight)
}

// =============================================================================
// Detection
// =============================================================================

/// Result of classifying a material name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CopperDetection {
    pub is_copper_tube: bool,
    /// Size token as spelled in the name.
    pub size: Option<String>,
    pub weight_per_meter: Option<f64>,
}

impl CopperDetection {
    fn not_copper() -> Self {
        CopperDetection {
            is_copper_tube: false,
            size: None,
            weight_per_meter: None,
        }
    }
}

/// Classifies a material by name.
///
/// The name must mention both "tubo" and "cobre" (any case) and contain one
/// of the known size tokens (case-sensitive substring). A copper-looking name
/// with an unknown size is NOT copper: it keeps its catalog price.
///
/// ## Example
/// ```rust
/// use clima_core::copper::detect_copper_tube;
///
/// let hit = detect_copper_tube("Tubo de Cobre 1/2\"");
/// assert!(hit.is_copper_tube);
/// assert_eq!(hit.size.as_deref(), Some("1/2\""));
/// assert_eq!(hit.weight_per_meter, Some(0.454));
///
/// assert!(!detect_copper_tube("Cabo PP 3x1.5mm").is_copper_tube);
/// assert!(!detect_copper_tube("Tubo de Cobre 7/8").is_copper_tube);
/// ```
pub fn detect_copper_tube(name: &str) -> CopperDetection {
    let lower = name.to_lowercase();
    if !lower.contains("tubo") || !lower.contains("cobre") {
        return CopperDetection::not_copper();
    }

    for (token, weight) in COPPER_TUBE_WEIGHTS {
        for suffix in SIZE_SUFFIXES {
            let spelled = format!("{}{}", token, suffix);
            if name.contains(&spelled) {
                return CopperDetection {
                    is_copper_tube: true,
                    size: Some(spelled),
                    weight_per_meter: Some(weight),
                };
            }
        }
    }

    CopperDetection::not_copper()
}

// =============================================================================
// Pricing
// =============================================================================

/// Weight and price of a length of copper tube.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CopperPrice {
    /// kg, rounded to thousandths.
    pub total_weight: f64,
    /// R$, rounded to cents, derived from the rounded weight.
    pub total_price: f64,
}

/// Prices `meters` of tube at `price_per_kg`.
///
/// `weight_per_meter` must be positive; this is not checked.
///
/// ## Example
/// ```rust
/// use clima_core::copper::price_copper_tube;
///
/// let price = price_copper_tube(3.0, 0.454, 75.0);
/// assert_eq!(price.total_weight, 1.362);
/// assert_eq!(price.total_price, 102.15);
/// ```
pub fn price_copper_tube(meters: f64, weight_per_meter: f64, price_per_kg: f64) -> CopperPrice {
    let total_weight = round_to(meters * weight_per_meter, 3);
    let total_price = round_to(total_weight * price_per_kg, 2);

    CopperPrice {
        total_weight,
        total_price,
    }
}

/// Formats a weight for display: `1.362 kg`.
pub fn format_weight(kg: f64) -> String {
    format!("{:.3} kg", kg)
}

// =============================================================================
// Unit Tests
// =============================================================================
