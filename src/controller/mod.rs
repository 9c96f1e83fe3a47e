//! Reactive invoice state.
//!
//! [`InvoiceController`] owns the invoice being drafted and reduces user
//! [`Intent`]s into at most one exchange-rate lookup at a time. Three actions
//! feed into the rate (currency, issue date, rate date) and they all converge
//! on a single trigger: entering [`RateStatus::Pending`], which returns a
//! [`RateRequest`].
//!
//! Lookups run outside the controller so the UI stays responsive. Each
//! request carries a generation number and a cancellation token; starting a
//! newer lookup cancels the older one and bumps the generation, so a slow
//! stale answer can never overwrite a newer one.
//!
//! ```ignore
//! let mut ctl = InvoiceController::new(invoice);
//! if let Some(request) = ctl.handle(Intent::SetCurrency("EUR".into()))? {
//!     let outcome = request.execute(&nbp).await;
//!     ctl.apply(outcome);
//! }
//! ```

mod intent;
mod status;

pub use intent::{Intent, RateOutcome, RateRequest};
pub use status::RateStatus;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::dates::{previous_business_day, today_utc};
use crate::core::{
    Calculations, CompanyInfo, InvoiceData, InvoiceError, InvoiceItem, ItemBuilder, Logo,
    PaymentMethod, blank_item, calculate, is_known_currency_code,
};
use crate::rates::{RateConfig, RateSource};

/// Owner of the invoice draft and its exchange-rate state machine.
#[derive(Debug)]
pub struct InvoiceController {
    invoice: InvoiceData,
    status: RateStatus,
    generation: u64,
    in_flight: Option<CancellationToken>,
    /// Default target date the current target was set from. `None` once the
    /// user picked a rate date; only a target equal to it follows issue-date
    /// changes.
    last_default: Option<NaiveDate>,
    max_attempts: u32,
    clock: fn() -> NaiveDate,
}

impl InvoiceController {
    /// Take ownership of a draft with default rate settings.
    pub fn new(invoice: InvoiceData) -> Self {
        Self::with_config(invoice, &RateConfig::default())
    }

    /// Take ownership of a draft.
    ///
    /// A PLN draft has its exchange-rate state cleared. A foreign draft with a
    /// stored rate starts `Resolved`; one with a target date but no rate
    /// starts `Failed` until refreshed.
    pub fn with_config(mut invoice: InvoiceData, config: &RateConfig) -> Self {
        let status = if invoice.is_domestic() {
            invoice.exchange_rate.clear();
            RateStatus::Domestic
        } else {
            match (invoice.exchange_rate.target_date, invoice.exchange_rate.resolved) {
                (Some(_), Some(_)) => RateStatus::Resolved,
                (Some(_), None) => RateStatus::Failed {
                    message: "Exchange rate has not been loaded yet. Refresh to fetch it."
                        .to_string(),
                },
                (None, _) => {
                    invoice.exchange_rate.clear();
                    RateStatus::ForeignNoDate
                }
            }
        };

        let mut controller = Self {
            invoice,
            status,
            generation: 0,
            in_flight: None,
            last_default: None,
            max_attempts: config.max_attempts,
            clock: today_utc,
        };
        controller.sync_last_default();
        controller
    }

    /// Replace the source of "today" (UTC by default).
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self.sync_last_default();
        self
    }

    fn sync_last_default(&mut self) {
        let default = self.default_rate_date();
        self.last_default = (self.invoice.exchange_rate.target_date == Some(default))
            .then_some(default);
    }

    pub fn invoice(&self) -> &InvoiceData {
        &self.invoice
    }

    pub fn into_invoice(self) -> InvoiceData {
        self.invoice
    }

    pub fn status(&self) -> &RateStatus {
        &self.status
    }

    /// Identity of the most recent lookup.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a lookup was handed out and has not been applied yet.
    pub fn has_lookup_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The previous business day before the issue date (or before today when
    /// the issue date is empty). Rate dates are never later than this.
    pub fn default_rate_date(&self) -> NaiveDate {
        previous_business_day(self.invoice.issue_date, (self.clock)())
    }

    /// Current totals.
    pub fn calculations(&self) -> Calculations {
        calculate(&self.invoice.items)
    }

    /// Reduce one intent. Returns the lookup to perform, if the intent calls
    /// for one.
    ///
    /// # Errors
    ///
    /// `InvoiceError::UnknownCurrency` for a currency without NBP rates.
    pub fn handle(&mut self, intent: Intent) -> Result<Option<RateRequest>, InvoiceError> {
        debug!(?intent, status = ?self.status, "Handling intent");
        match intent {
            Intent::SetCurrency(code) => self.set_currency(code),
            Intent::SetIssueDate(date) => Ok(self.set_issue_date(date)),
            Intent::SetRateDate(date) => Ok(self.set_rate_date(date)),
            Intent::UsePreviousBusinessDay => Ok(self.use_previous_business_day()),
            Intent::Refresh => Ok(self.refresh()),
        }
    }

    /// Apply the outcome of a lookup.
    ///
    /// Returns false, leaving the state untouched, when the outcome belongs to
    /// a superseded request. A current request whose token the caller
    /// cancelled ends up `Failed`, never stuck in `Pending`.
    pub fn apply(&mut self, outcome: RateOutcome) -> bool {
        let current = matches!(
            self.status,
            RateStatus::Pending { generation } if generation == outcome.generation
        );
        if !current {
            debug!(
                outcome_generation = outcome.generation,
                current_generation = self.generation,
                "Discarding stale rate outcome"
            );
            return false;
        }

        self.in_flight = None;
        match outcome.result {
            Ok(rate) => {
                info!(
                    currency = %outcome.currency,
                    target_date = %outcome.target_date,
                    effective_date = %rate.effective_date,
                    "Rate applied"
                );
                self.invoice.exchange_rate.resolved = Some(rate);
                self.status = RateStatus::Resolved;
            }
            Err(e) => {
                warn!(currency = %outcome.currency, target_date = %outcome.target_date, error = %e, "Rate lookup failed");
                self.invoice.exchange_rate.resolved = None;
                self.status = RateStatus::Failed {
                    message: e.user_message(),
                };
            }
        }
        true
    }

    /// Handle an intent and, if it triggers a lookup, run it to completion and
    /// apply the result. Returns whether a rate outcome was applied.
    pub async fn dispatch<S>(&mut self, source: &S, intent: Intent) -> Result<bool, InvoiceError>
    where
        S: RateSource + ?Sized,
    {
        match self.handle(intent)? {
            Some(request) => {
                let outcome = request.execute(source).await;
                Ok(self.apply(outcome))
            }
            None => Ok(false),
        }
    }

    fn set_currency(&mut self, code: String) -> Result<Option<RateRequest>, InvoiceError> {
        let code = code.trim().to_uppercase();
        if !is_known_currency_code(&code) {
            return Err(InvoiceError::UnknownCurrency(code));
        }
        if code == self.invoice.currency_code {
            return Ok(None);
        }

        let was_domestic = self.invoice.is_domestic();
        self.invoice.currency_code = code;

        if self.invoice.is_domestic() {
            self.enter_domestic();
            return Ok(None);
        }

        if was_domestic {
            let default = self.default_rate_date();
            self.last_default = Some(default);
            return Ok(Some(self.start_lookup(default)));
        }

        match self.invoice.exchange_rate.target_date {
            Some(target) => Ok(Some(self.start_lookup(target))),
            None => {
                self.enter_no_date();
                Ok(None)
            }
        }
    }

    fn set_issue_date(&mut self, date: Option<NaiveDate>) -> Option<RateRequest> {
        self.invoice.issue_date = date;
        if self.invoice.is_domestic() {
            return None;
        }

        let target = self.invoice.exchange_rate.target_date;
        let follows_default = target.is_some() && target == self.last_default;
        if !follows_default {
            return None;
        }

        let new_default = self.default_rate_date();
        self.last_default = Some(new_default);
        (target != Some(new_default)).then(|| self.start_lookup(new_default))
    }

    fn set_rate_date(&mut self, date: Option<NaiveDate>) -> Option<RateRequest> {
        if self.invoice.is_domestic() {
            debug!("Ignoring rate date on a PLN invoice");
            return None;
        }
        match date {
            None => {
                self.enter_no_date();
                None
            }
            Some(date) => {
                // An explicit date is owned by the user, even when it equals
                // the default, and no longer follows the issue date.
                self.last_default = None;
                let latest = self.default_rate_date();
                Some(self.start_lookup(date.min(latest)))
            }
        }
    }

    fn use_previous_business_day(&mut self) -> Option<RateRequest> {
        if self.invoice.is_domestic() {
            return None;
        }
        let default = self.default_rate_date();
        self.last_default = Some(default);
        Some(self.start_lookup(default))
    }

    fn refresh(&mut self) -> Option<RateRequest> {
        if self.invoice.is_domestic() {
            return None;
        }
        let target = match self.invoice.exchange_rate.target_date {
            Some(target) => target,
            None => {
                let default = self.default_rate_date();
                self.last_default = Some(default);
                default
            }
        };
        Some(self.start_lookup(target))
    }

    /// Invalidate whatever lookup is running.
    fn supersede(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation += 1;
    }

    fn start_lookup(&mut self, target: NaiveDate) -> RateRequest {
        self.supersede();
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.invoice.exchange_rate.target_date = Some(target);
        self.invoice.exchange_rate.resolved = None;
        self.status = RateStatus::Pending {
            generation: self.generation,
        };
        debug!(
            currency = %self.invoice.currency_code,
            %target,
            generation = self.generation,
            "Starting rate lookup"
        );
        RateRequest {
            generation: self.generation,
            currency: self.invoice.currency_code.clone(),
            target_date: target,
            max_attempts: self.max_attempts,
            cancel,
        }
    }

    fn enter_domestic(&mut self) {
        self.supersede();
        self.invoice.exchange_rate.clear();
        self.last_default = None;
        self.status = RateStatus::Domestic;
    }

    fn enter_no_date(&mut self) {
        self.supersede();
        self.invoice.exchange_rate.clear();
        self.status = RateStatus::ForeignNoDate;
    }

    // -- Form editing ---------------------------------------------------------

    /// Append an empty line and return its id.
    pub fn add_item(&mut self) -> u64 {
        let id = self.invoice.next_item_id();
        self.invoice.items.push(blank_item(id));
        id
    }

    /// Append a prepared line and return its id.
    pub fn push_item(&mut self, item: ItemBuilder) -> u64 {
        let id = self.invoice.next_item_id();
        self.invoice.items.push(item.build_with_id(id));
        id
    }

    /// Remove a line. The last remaining line cannot be removed.
    pub fn remove_item(&mut self, id: u64) -> Result<InvoiceItem, InvoiceError> {
        let index = self
            .invoice
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(InvoiceError::UnknownItem(id))?;
        if self.invoice.items.len() == 1 {
            return Err(InvoiceError::LastItem);
        }
        Ok(self.invoice.items.remove(index))
    }

    /// Edit a line in place.
    pub fn item_mut(&mut self, id: u64) -> Option<&mut InvoiceItem> {
        self.invoice.items.iter_mut().find(|i| i.id == id)
    }

    pub fn set_number(&mut self, number: impl Into<String>) {
        self.invoice.number = number.into();
    }

    pub fn set_place_of_issue(&mut self, place: impl Into<String>) {
        self.invoice.place_of_issue = place.into();
    }

    pub fn set_sale_date(&mut self, date: Option<NaiveDate>) {
        self.invoice.sale_date = date;
    }

    pub fn set_due_date(&mut self, date: Option<NaiveDate>) {
        self.invoice.due_date = date;
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.invoice.payment_method = method;
    }

    pub fn set_seller(&mut self, seller: CompanyInfo) {
        self.invoice.seller = seller;
    }

    pub fn set_buyer(&mut self, buyer: CompanyInfo) {
        self.invoice.buyer = buyer;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.invoice.notes = notes.into();
    }

    pub fn set_logo(&mut self, logo: Option<Logo>) {
        self.invoice.logo = logo;
    }
}
