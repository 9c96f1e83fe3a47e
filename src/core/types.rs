use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::currencies::DOMESTIC_CURRENCY;
use super::logo::Logo;

/// The invoice being drafted; the aggregate root of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceData {
    /// Invoice number (e.g. "FV/7/03/2024").
    pub number: String,
    /// Place of issue (miejsce wystawienia).
    pub place_of_issue: String,
    /// Issue date. `None` when the form field is empty or unparseable.
    pub issue_date: Option<NaiveDate>,
    /// Date of sale / service completion (data sprzedaży).
    pub sale_date: Option<NaiveDate>,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// How the buyer pays.
    pub payment_method: PaymentMethod,
    /// Invoice currency code (ISO 4217). "PLN" is the domestic currency.
    pub currency_code: String,
    pub seller: CompanyInfo,
    pub buyer: CompanyInfo,
    /// Line items. Never empty.
    pub items: Vec<InvoiceItem>,
    /// Free text printed below the totals.
    pub notes: String,
    /// Optional seller logo, already embedded as a data URI.
    pub logo: Option<Logo>,
    /// Exchange rate used to present PLN equivalents.
    pub exchange_rate: ExchangeRateState,
}

impl InvoiceData {
    /// Whether the invoice is in the domestic currency (PLN).
    pub fn is_domestic(&self) -> bool {
        is_domestic_currency(&self.currency_code)
    }

    /// True when line items and totals must also be presented in PLN.
    pub fn should_show_conversion(&self) -> bool {
        !self.is_domestic() && self.exchange_rate.value().is_some()
    }

    /// Look up an item by id.
    pub fn item(&self, id: u64) -> Option<&InvoiceItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Next free item id (one above the current maximum).
    pub fn next_item_id(&self) -> u64 {
        self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }
}

/// Whether `code` denotes the domestic currency.
pub fn is_domestic_currency(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(DOMESTIC_CURRENCY)
}

/// One billable line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Identity within the invoice (stable across edits).
    pub id: u64,
    /// Name of the goods or service.
    pub description: String,
    /// Quantity (non-negative).
    pub quantity: Decimal,
    /// Unit label, e.g. "szt." or "godz.".
    pub unit: String,
    /// Net price per unit. May be zero.
    pub unit_price: Decimal,
    /// VAT rate code.
    pub vat_rate: VatRate,
}

/// VAT rate code: a non-negative percentage or a negative sentinel.
///
/// Sentinels contribute no VAT and only affect the printed label:
/// -1 → "ZW" (exempt), -2 → "NP" (not subject to VAT), -3 → "OO" (reverse
/// charge). Any other negative code also prints as "ZW".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VatRate(Decimal);

impl VatRate {
    /// 23%: basic rate.
    pub const STANDARD: VatRate = VatRate(dec!(23));
    /// 8%: first reduced rate.
    pub const REDUCED: VatRate = VatRate(dec!(8));
    /// 5%: second reduced rate.
    pub const SUPER_REDUCED: VatRate = VatRate(dec!(5));
    /// 0%.
    pub const ZERO: VatRate = VatRate(dec!(0));
    /// ZW: exempt.
    pub const EXEMPT: VatRate = VatRate(dec!(-1));
    /// NP: not subject to VAT.
    pub const NOT_SUBJECT: VatRate = VatRate(dec!(-2));
    /// OO: reverse charge / other.
    pub const REVERSE_CHARGE: VatRate = VatRate(dec!(-3));

    /// Build a rate from its raw code (percentage or sentinel).
    pub fn from_code(code: Decimal) -> Self {
        Self(code)
    }

    /// Build a percentage rate from an integer, e.g. `VatRate::percent(23)`.
    pub fn percent(rate: u32) -> Self {
        Self(Decimal::from(rate))
    }

    /// The raw code.
    pub fn code(&self) -> Decimal {
        self.0
    }

    /// The percentage, or `None` for sentinel codes.
    pub fn percentage(&self) -> Option<Decimal> {
        (self.0 >= Decimal::ZERO).then_some(self.0)
    }

    /// Whether this is a sentinel (negative) code.
    pub fn is_sentinel(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Printed label: "23%", "ZW", "NP" or "OO".
    pub fn label(&self) -> String {
        match self.percentage() {
            Some(pct) => format!("{}%", pct.normalize()),
            None if self.0 == dec!(-2) => "NP".to_string(),
            None if self.0 == dec!(-3) => "OO".to_string(),
            None => "ZW".to_string(),
        }
    }

    /// The rates offered by the item form, in display order.
    pub fn offered() -> [VatRate; 7] {
        [
            Self::STANDARD,
            Self::REDUCED,
            Self::SUPER_REDUCED,
            Self::ZERO,
            Self::EXEMPT,
            Self::NOT_SUBJECT,
            Self::REVERSE_CHARGE,
        ]
    }
}

impl Default for VatRate {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl std::fmt::Display for VatRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Seller or buyer. The name doubles as the address-book key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    pub name: String,
    /// Street and number.
    pub address: String,
    pub postal_code: String,
    pub city: String,
    /// NIP.
    pub tax_id: String,
    /// Bank account number; normally present for the seller only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,
}

/// Payment method printed on the invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Przelew.
    #[default]
    BankTransfer,
    /// Gotówka.
    Cash,
    /// Karta.
    Card,
}

impl PaymentMethod {
    /// Label as printed on the invoice.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BankTransfer => "Przelew",
            Self::Cash => "Gotówka",
            Self::Card => "Karta",
        }
    }
}

/// A published rate and the date it is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRate {
    /// Publication date reported by the source (may precede the target date).
    pub effective_date: NaiveDate,
    /// Mid rate: PLN per one unit of the invoice currency.
    pub value: Decimal,
}

/// Exchange-rate state of an invoice.
///
/// The effective date and value only exist together, inside `resolved`.
/// For a PLN invoice both fields stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateState {
    /// Date the user asked to price against.
    pub target_date: Option<NaiveDate>,
    /// The rate found for `target_date`, if any.
    pub resolved: Option<ResolvedRate>,
}

impl ExchangeRateState {
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.resolved.map(|r| r.effective_date)
    }

    pub fn value(&self) -> Option<Decimal> {
        self.resolved.map(|r| r.value)
    }

    /// True when no target date and no rate are set.
    pub fn is_empty(&self) -> bool {
        self.target_date.is_none() && self.resolved.is_none()
    }

    /// Reset to the empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when a rate was found and it was published on a different day
    /// than the one requested.
    pub fn differs_from_target(&self) -> bool {
        match (self.target_date, self.effective_date()) {
            (Some(target), Some(effective)) => target != effective,
            _ => false,
        }
    }
}
