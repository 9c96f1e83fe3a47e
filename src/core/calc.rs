use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::types::{InvoiceItem, VatRate};

/// Largest quantity or unit price accepted from the form (10^11).
///
/// Within this bound a full invoice of 10 000 lines stays exact, also when
/// converted at rates of several hundred PLN per unit. Values beyond it are rejected by the builder,
/// `validate_invoice` and `parse_amount`; if one slips through a direct edit,
/// the arithmetic below saturates instead of panicking.
pub const MAX_LINE_VALUE: Decimal = dec!(100000000000);

/// Whether `value` lies within [`MAX_LINE_VALUE`] in magnitude.
pub fn is_within_line_limit(value: Decimal) -> bool {
    value.abs() <= MAX_LINE_VALUE
}

/// Net, VAT and gross amounts of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAmounts {
    pub net: Decimal,
    pub vat: Decimal,
    pub gross: Decimal,
}

impl ItemAmounts {
    const ZERO: Self = Self {
        net: Decimal::ZERO,
        vat: Decimal::ZERO,
        gross: Decimal::ZERO,
    };

    /// `net = quantity × unit_price`, VAT only for percentage rates.
    pub fn for_item(item: &InvoiceItem) -> Self {
        let net = item.quantity.saturating_mul(item.unit_price);
        let vat = match item.vat_rate.percentage() {
            Some(pct) => net.saturating_mul(pct) / Decimal::ONE_HUNDRED,
            None => Decimal::ZERO,
        };
        Self {
            net,
            vat,
            gross: net.saturating_add(vat),
        }
    }

    /// Every amount multiplied by `rate`.
    pub fn converted(&self, rate: Decimal) -> Self {
        Self {
            net: self.net.saturating_mul(rate),
            vat: self.vat.saturating_mul(rate),
            gross: self.gross.saturating_mul(rate),
        }
    }

    fn accumulate(&mut self, other: &Self) {
        self.net = self.net.saturating_add(other.net);
        self.vat = self.vat.saturating_add(other.vat);
        self.gross = self.gross.saturating_add(other.gross);
    }
}

/// Sums for one VAT rate code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatGroup {
    pub rate: VatRate,
    pub net: Decimal,
    pub vat: Decimal,
    pub gross: Decimal,
}

/// Derived totals of an invoice. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculations {
    pub net_total: Decimal,
    pub vat_total: Decimal,
    pub gross_total: Decimal,
    /// One entry per distinct rate code, sorted by code.
    pub breakdown: Vec<VatGroup>,
}

impl Calculations {
    /// All totals and groups multiplied by `rate`.
    pub fn converted(&self, rate: Decimal) -> Self {
        Self {
            net_total: self.net_total.saturating_mul(rate),
            vat_total: self.vat_total.saturating_mul(rate),
            gross_total: self.gross_total.saturating_mul(rate),
            breakdown: self
                .breakdown
                .iter()
                .map(|g| VatGroup {
                    rate: g.rate,
                    net: g.net.saturating_mul(rate),
                    vat: g.vat.saturating_mul(rate),
                    gross: g.gross.saturating_mul(rate),
                })
                .collect(),
        }
    }
}

/// Compute totals and the per-rate breakdown.
///
/// Arithmetic is exact for lines within [`MAX_LINE_VALUE`]; rounding is left
/// to presentation. An empty slice yields zero totals and an empty breakdown.
/// Never panics.
pub fn calculate(items: &[InvoiceItem]) -> Calculations {
    let mut groups: BTreeMap<VatRate, ItemAmounts> = BTreeMap::new();
    for item in items {
        groups
            .entry(item.vat_rate)
            .or_insert(ItemAmounts::ZERO)
            .accumulate(&ItemAmounts::for_item(item));
    }

    let mut totals = ItemAmounts::ZERO;
    let breakdown: Vec<VatGroup> = groups
        .into_iter()
        .map(|(rate, a)| {
            totals.accumulate(&a);
            VatGroup {
                rate,
                net: a.net,
                vat: a.vat,
                gross: a.gross,
            }
        })
        .collect();

    Calculations {
        net_total: totals.net,
        vat_total: totals.vat,
        gross_total: totals.gross,
        breakdown,
    }
}
