use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calc::{MAX_LINE_VALUE, is_within_line_limit};
use super::currencies;
use super::error::InvoiceError;
use super::logo::Logo;
use super::types::*;

/// Builder for an invoice draft.
///
/// ```
/// use faktura_pl::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = InvoiceBuilder::new("FV/1/03/2024")
///     .issue_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
///     .seller(CompanyBuilder::new("ACME Sp. z o.o.")
///         .address("ul. Prosta 1", "00-001", "Warszawa")
///         .tax_id("5260250274")
///         .bank_account("PL61109010140000071219812874")
///         .build())
///     .buyer(CompanyBuilder::new("Klient S.A.").build())
///     .add_item(ItemBuilder::new("Konsultacje", dec!(10), "godz.", dec!(150))
///         .vat(VatRate::STANDARD))
///     .build()
///     .unwrap();
///
/// assert_eq!(invoice.items[0].id, 1);
/// ```
pub struct InvoiceBuilder {
    number: String,
    place_of_issue: String,
    issue_date: Option<NaiveDate>,
    sale_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    payment_method: PaymentMethod,
    currency_code: String,
    seller: CompanyInfo,
    buyer: CompanyInfo,
    items: Vec<ItemBuilder>,
    notes: String,
    logo: Option<Logo>,
}

impl InvoiceBuilder {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            place_of_issue: String::new(),
            issue_date: None,
            sale_date: None,
            due_date: None,
            payment_method: PaymentMethod::default(),
            currency_code: currencies::DOMESTIC_CURRENCY.to_string(),
            seller: CompanyInfo::default(),
            buyer: CompanyInfo::default(),
            items: Vec::new(),
            notes: String::new(),
            logo: None,
        }
    }

    pub fn place_of_issue(mut self, place: impl Into<String>) -> Self {
        self.place_of_issue = place.into();
        self
    }

    pub fn issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
        self
    }

    pub fn sale_date(mut self, date: NaiveDate) -> Self {
        self.sale_date = Some(date);
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self
    }

    pub fn seller(mut self, company: CompanyInfo) -> Self {
        self.seller = company;
        self
    }

    pub fn buyer(mut self, company: CompanyInfo) -> Self {
        self.buyer = company;
        self
    }

    pub fn add_item(mut self, item: ItemBuilder) -> Self {
        self.items.push(item);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn logo(mut self, logo: Logo) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Build the draft. Items get ids 1, 2, 3… in insertion order; the
    /// exchange-rate state starts empty.
    pub fn build(self) -> Result<InvoiceData, InvoiceError> {
        if self.items.is_empty() {
            return Err(InvoiceError::Builder(
                "at least one line item is required".into(),
            ));
        }

        // Keep pasted or imported drafts within what the form can render.
        if self.items.len() > 10_000 {
            return Err(InvoiceError::Builder(
                "invoice cannot have more than 10,000 line items".into(),
            ));
        }
        if self.number.len() > 200 {
            return Err(InvoiceError::Builder(
                "invoice number cannot exceed 200 characters".into(),
            ));
        }

        if let Some(pos) = self.items.iter().position(|i| {
            !is_within_line_limit(i.quantity) || !is_within_line_limit(i.unit_price)
        }) {
            return Err(InvoiceError::Builder(format!(
                "item {} exceeds {MAX_LINE_VALUE} in quantity or unit price",
                pos + 1
            )));
        }

        let currency_code = self.currency_code.trim().to_uppercase();
        if !currencies::is_known_currency_code(&currency_code) {
            return Err(InvoiceError::UnknownCurrency(currency_code));
        }

        let items = self
            .items
            .into_iter()
            .zip(1u64..)
            .map(|(item, id)| item.build_with_id(id))
            .collect();

        Ok(InvoiceData {
            number: self.number,
            place_of_issue: self.place_of_issue,
            issue_date: self.issue_date,
            sale_date: self.sale_date,
            due_date: self.due_date,
            payment_method: self.payment_method,
            currency_code,
            seller: self.seller,
            buyer: self.buyer,
            items,
            notes: self.notes,
            logo: self.logo,
            exchange_rate: ExchangeRateState::default(),
        })
    }
}

/// Builder for [`CompanyInfo`].
pub struct CompanyBuilder {
    name: String,
    address: String,
    postal_code: String,
    city: String,
    tax_id: String,
    bank_account: Option<String>,
}

impl CompanyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: String::new(),
            postal_code: String::new(),
            city: String::new(),
            tax_id: String::new(),
            bank_account: None,
        }
    }

    pub fn address(
        mut self,
        street: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        self.address = street.into();
        self.postal_code = postal_code.into();
        self.city = city.into();
        self
    }

    pub fn tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = tax_id.into();
        self
    }

    pub fn bank_account(mut self, account: impl Into<String>) -> Self {
        self.bank_account = Some(account.into());
        self
    }

    pub fn build(self) -> CompanyInfo {
        CompanyInfo {
            name: self.name,
            address: self.address,
            postal_code: self.postal_code,
            city: self.city,
            tax_id: self.tax_id,
            bank_account: self.bank_account,
        }
    }
}

/// Builder for [`InvoiceItem`]. The id is assigned by the invoice.
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    description: String,
    quantity: Decimal,
    unit: String,
    unit_price: Decimal,
    vat_rate: VatRate,
}

impl ItemBuilder {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            vat_rate: VatRate::default(),
        }
    }

    pub fn vat(mut self, rate: VatRate) -> Self {
        self.vat_rate = rate;
        self
    }

    /// Finish the item with an explicit id.
    pub fn build_with_id(self, id: u64) -> InvoiceItem {
        InvoiceItem {
            id,
            description: self.description,
            quantity: self.quantity,
            unit: self.unit,
            unit_price: self.unit_price,
            vat_rate: self.vat_rate,
        }
    }
}

/// A fresh, empty line as produced by the "add item" button.
pub fn blank_item(id: u64) -> InvoiceItem {
    ItemBuilder::new("", Decimal::ONE, "szt.", Decimal::ZERO).build_with_id(id)
}
