use rust_decimal::Decimal;

use super::calc::{MAX_LINE_VALUE, is_within_line_limit};
use super::currencies;
use super::error::ValidationError;
use super::types::*;

/// Check an invoice draft before it is printed.
/// Returns all validation errors found (not just the first).
///
/// Nothing here blocks editing; the UI shows the list next to the preview.
pub fn validate_invoice(invoice: &InvoiceData) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if invoice.number.trim().is_empty() {
        errors.push(ValidationError::new(
            "number",
            "invoice number must not be empty",
        ));
    }

    if invoice.issue_date.is_none() {
        errors.push(ValidationError::new("issue_date", "issue date is required"));
    }

    if let (Some(issue), Some(due)) = (invoice.issue_date, invoice.due_date) {
        if due < issue {
            errors.push(ValidationError::new(
                "due_date",
                "due date must not be before the issue date",
            ));
        }
    }

    if !currencies::is_known_currency_code(&invoice.currency_code) {
        errors.push(ValidationError::new(
            "currency_code",
            format!("currency code '{}' is not supported", invoice.currency_code),
        ));
    }

    validate_company(&invoice.seller, "seller", &mut errors);
    validate_company(&invoice.buyer, "buyer", &mut errors);

    // Seller tax id is mandatory on a VAT invoice; buyer's may be absent (consumer)
    if invoice.seller.tax_id.trim().is_empty() {
        errors.push(ValidationError::new("seller.tax_id", "seller NIP is required"));
    }

    if invoice.items.is_empty() {
        errors.push(ValidationError::new("items", "at least one item is required"));
    }

    for (i, item) in invoice.items.iter().enumerate() {
        let path = format!("items[{i}]");
        if item.description.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{path}.description"),
                "item description must not be empty",
            ));
        }
        if item.quantity < Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("{path}.quantity"),
                "quantity must not be negative",
            ));
        }
        if !is_within_line_limit(item.quantity) {
            errors.push(ValidationError::new(
                format!("{path}.quantity"),
                format!("quantity must not exceed {MAX_LINE_VALUE}"),
            ));
        }
        if !is_within_line_limit(item.unit_price) {
            errors.push(ValidationError::new(
                format!("{path}.unit_price"),
                format!("unit price must not exceed {MAX_LINE_VALUE}"),
            ));
        }
    }

    errors
}

fn validate_company(company: &CompanyInfo, prefix: &str, errors: &mut Vec<ValidationError>) {
    if company.name.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.name"),
            "name must not be empty",
        ));
    }

    if !company.tax_id.trim().is_empty() && !validate_nip(&company.tax_id) {
        errors.push(ValidationError::new(
            format!("{prefix}.tax_id"),
            format!("'{}' is not a valid NIP", company.tax_id),
        ));
    }

    if !company.postal_code.trim().is_empty() && !is_postal_code(company.postal_code.trim()) {
        errors.push(ValidationError::new(
            format!("{prefix}.postal_code"),
            "postal code must have the form 00-000",
        ));
    }
}

/// Validate a Polish tax identification number (NIP).
///
/// Dashes and spaces are ignored, as is a leading "PL" country prefix.
/// The tenth digit is the checksum: the weighted sum of the first nine
/// digits (weights 6,5,7,2,3,4,5,6,7) modulo 11.
pub fn validate_nip(nip: &str) -> bool {
    const WEIGHTS: [u32; 9] = [6, 5, 7, 2, 3, 4, 5, 6, 7];

    let trimmed = nip.trim();
    let trimmed = trimmed
        .strip_prefix("PL")
        .or_else(|| trimmed.strip_prefix("pl"))
        .unwrap_or(trimmed);
    let digits: Option<Vec<u32>> = trimmed
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .map(|c| c.to_digit(10))
        .collect();
    let Some(digits) = digits else {
        return false;
    };
    if digits.len() != 10 {
        return false;
    }

    let sum: u32 = digits.iter().zip(WEIGHTS).map(|(d, w)| d * w).sum();
    let check = sum % 11;
    check != 10 && check == digits[9]
}

fn is_postal_code(code: &str) -> bool {
    let b = code.as_bytes();
    b.len() == 6
        && b[2] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 2 || c.is_ascii_digit())
}
