//! # Totals
//!
//! Subtotal, discount and grand total computation.
//!
//! ```text
//! subtotal_materials = Σ item.total
//! subtotal_services  = Σ service.price
//! subtotal           = subtotal_materials + subtotal_services
//! discount_value     = subtotal × pct / 100      (percentage)
//!                    = value                     (fixed)
//! total              = subtotal − discount_value (may go negative)
//! ```
//!
//! Full floating precision throughout; rounding to cents happens only when
//! an amount is displayed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Discount, DiscountMode, QuoteLineItem, QuoteServiceLine};

/// Derived amounts of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteTotals {
    pub subtotal_materials: Money,
    pub subtotal_services: Money,
    pub subtotal: Money,
    pub discount_value: Money,
    pub total: Money,
}

impl QuoteTotals {
    /// Folds lines and discount into totals.
    ///
    /// ## Example
    /// ```rust
    /// use clima_core::{Discount, QuoteTotals};
    ///
    /// let totals = QuoteTotals::compute(&[], &[], Discount::fixed(10.0));
    /// assert_eq!(totals.total.amount(), -10.0);
    /// ```
    pub fn compute(
        items: &[QuoteLineItem],
        services: &[QuoteServiceLine],
        discount: Discount,
    ) -> Self {
        let subtotal_materials: Money = items.iter().map(QuoteLineItem::total).sum();
        let subtotal_services: Money = services.iter().map(QuoteServiceLine::price).sum();
        let subtotal = subtotal_materials + subtotal_services;
        let discount_value = discount.amount_for(subtotal);

        QuoteTotals {
            subtotal_materials,
            subtotal_services,
            subtotal,
            discount_value,
            total: subtotal - discount_value,
        }
    }
}

impl Discount {
    /// Discount amount for a given subtotal.
    pub fn amount_for(&self, subtotal: Money) -> Money {
        match self.mode {
            DiscountMode::Percentage => subtotal.percentage(self.value),
            DiscountMode::Fixed => Money::new(self.value),
        }
    }
}
