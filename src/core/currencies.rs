//! Currency codes offered on the invoice form.
//!
//! Foreign codes are limited to those published in NBP table A, the only
//! source of reference rates. PLN is the domestic currency and never needs a
//! rate.

/// The domestic currency; invoices in it carry no exchange-rate state.
pub const DOMESTIC_CURRENCY: &str = "PLN";

/// Check whether `code` is PLN or a currency quoted in NBP table A.
pub fn is_known_currency_code(code: &str) -> bool {
    code == DOMESTIC_CURRENCY || TABLE_A_CODES.binary_search(&code).is_ok()
}

/// Currencies with a daily mid rate in NBP table A.
pub fn table_a_codes() -> &'static [&'static str] {
    TABLE_A_CODES
}

// NBP table A, kept in ascending order for `binary_search`.
static TABLE_A_CODES: &[&str] = &[
    "AUD", "BGN", "BRL", "CAD", "CHF", "CLP", "CNY", "CZK", "DKK", "EUR", "GBP",
    "HKD", "HUF", "IDR", "ILS", "INR", "ISK", "JPY", "KRW", "MXN", "MYR", "NOK",
    "NZD", "PHP", "RON", "SEK", "SGD", "THB", "TRY", "UAH", "USD", "XDR", "ZAR",
];
