use rust_decimal::Decimal;
use serde::Serialize;

use super::format::{format_amount, format_date, format_quantity, format_rate};
use crate::core::{
    Calculations, CompanyInfo, DOMESTIC_CURRENCY, InvoiceData, ItemAmounts, calculate,
};

/// Formatted net / VAT / gross triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmountsView {
    pub net: String,
    pub vat: String,
    pub gross: String,
}

impl AmountsView {
    fn from_parts(net: Decimal, vat: Decimal, gross: Decimal) -> Self {
        Self {
            net: format_amount(net),
            vat: format_amount(vat),
            gross: format_amount(gross),
        }
    }
}

impl From<&ItemAmounts> for AmountsView {
    fn from(a: &ItemAmounts) -> Self {
        Self::from_parts(a.net, a.vat, a.gross)
    }
}

/// Seller or buyer block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyView {
    pub name: String,
    pub address: String,
    /// "00-001 Warszawa".
    pub postal_code_city: String,
    pub tax_id: String,
    pub bank_account: Option<String>,
}

impl From<&CompanyInfo> for PartyView {
    fn from(c: &CompanyInfo) -> Self {
        let postal_code_city = format!("{} {}", c.postal_code.trim(), c.city.trim())
            .trim()
            .to_string();
        Self {
            name: c.name.clone(),
            address: c.address.clone(),
            postal_code_city,
            tax_id: c.tax_id.clone(),
            bank_account: c.bank_account.clone().filter(|a| !a.trim().is_empty()),
        }
    }
}

/// One printed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    /// 1-based position on the printout.
    pub position: usize,
    pub description: String,
    pub quantity: String,
    pub unit: String,
    pub unit_price: String,
    pub vat_label: String,
    pub amounts: AmountsView,
    /// PLN equivalents, when the invoice shows a conversion.
    pub converted: Option<AmountsView>,
}

/// One row of the VAT summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub vat_label: String,
    pub amounts: AmountsView,
    pub converted: Option<AmountsView>,
}

/// The PLN conversion block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionView {
    /// e.g. "EUR/PLN".
    pub pair: String,
    pub rate: String,
    /// Publication date of the rate.
    pub as_of: String,
    /// "1 EUR = 4,3213 PLN (NBP, 2024-03-15)".
    pub as_of_label: String,
    /// Present when the rate was published for an earlier day than requested.
    pub note: Option<String>,
    /// Totals in PLN.
    pub totals: AmountsView,
}

/// Everything a renderer needs to print the invoice. No further arithmetic
/// is required on this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceView {
    pub number: String,
    pub place_of_issue: String,
    pub issue_date: String,
    pub sale_date: String,
    pub due_date: String,
    pub payment_method: String,
    pub currency: String,
    pub seller: PartyView,
    pub buyer: PartyView,
    /// Logo as a data URI.
    pub logo: Option<String>,
    pub items: Vec<ItemView>,
    pub breakdown: Vec<BreakdownRow>,
    pub totals: AmountsView,
    pub conversion: Option<ConversionView>,
    pub notes: String,
}

impl InvoiceView {
    /// Derive the printable view of an invoice.
    pub fn build(invoice: &InvoiceData) -> Self {
        let calc = calculate(&invoice.items);
        let rate = if invoice.should_show_conversion() {
            invoice.exchange_rate.value()
        } else {
            None
        };

        let items = invoice
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let amounts = ItemAmounts::for_item(item);
                ItemView {
                    position: i + 1,
                    description: item.description.clone(),
                    quantity: format_quantity(item.quantity),
                    unit: item.unit.clone(),
                    unit_price: format_amount(item.unit_price),
                    vat_label: item.vat_rate.label(),
                    amounts: AmountsView::from(&amounts),
                    converted: rate.map(|r| AmountsView::from(&amounts.converted(r))),
                }
            })
            .collect();

        let converted_calc = rate.map(|r| calc.converted(r));
        let breakdown = breakdown_rows(&calc, converted_calc.as_ref());

        let conversion = match (rate, converted_calc.as_ref(), invoice.exchange_rate.effective_date()) {
            (Some(rate), Some(converted), Some(effective)) => {
                let currency = invoice.currency_code.as_str();
                let as_of = format_date(Some(effective));
                let note = invoice
                    .exchange_rate
                    .differs_from_target()
                    .then(|| {
                        format!(
                            "No rate was published on {}; the rate of {as_of} applies.",
                            format_date(invoice.exchange_rate.target_date)
                        )
                    });
                Some(ConversionView {
                    pair: format!("{currency}/{DOMESTIC_CURRENCY}"),
                    rate: format_rate(rate),
                    as_of_label: format!(
                        "1 {currency} = {} {DOMESTIC_CURRENCY} (NBP, {as_of})",
                        format_rate(rate)
                    ),
                    as_of,
                    note,
                    totals: AmountsView::from_parts(
                        converted.net_total,
                        converted.vat_total,
                        converted.gross_total,
                    ),
                })
            }
            _ => None,
        };

        Self {
            number: invoice.number.clone(),
            place_of_issue: invoice.place_of_issue.clone(),
            issue_date: format_date(invoice.issue_date),
            sale_date: format_date(invoice.sale_date),
            due_date: format_date(invoice.due_date),
            payment_method: invoice.payment_method.label().to_string(),
            currency: invoice.currency_code.clone(),
            seller: PartyView::from(&invoice.seller),
            buyer: PartyView::from(&invoice.buyer),
            logo: invoice.logo.as_ref().map(|l| l.data_uri.clone()),
            items,
            breakdown,
            totals: AmountsView::from_parts(calc.net_total, calc.vat_total, calc.gross_total),
            conversion,
            notes: invoice.notes.clone(),
        }
    }
}

fn breakdown_rows(calc: &Calculations, converted: Option<&Calculations>) -> Vec<BreakdownRow> {
    calc.breakdown
        .iter()
        .enumerate()
        .map(|(i, group)| BreakdownRow {
            vat_label: group.rate.label(),
            amounts: AmountsView::from_parts(group.net, group.vat, group.gross),
            converted: converted
                .and_then(|c| c.breakdown.get(i))
                .map(|g| AmountsView::from_parts(g.net, g.vat, g.gross)),
        })
        .collect()
}
