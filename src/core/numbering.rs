use chrono::{Datelike, NaiveDate};

use super::error::InvoiceError;

/// Monthly invoice number sequence.
///
/// Generates numbers in the common Polish format `{prefix}{n}/{MM}/{YYYY}`,
/// e.g. "FV/1/03/2024", "FV/2/03/2024". The counter restarts at 1 with every
/// new month.
#[derive(Debug, Clone)]
pub struct InvoiceNumberSequence {
    prefix: String,
    year: i32,
    month: u32,
    next_number: u64,
}

impl InvoiceNumberSequence {
    /// Create a sequence for the month of `date`, starting at 1.
    pub fn new(prefix: impl Into<String>, date: NaiveDate) -> Self {
        Self::starting_at(prefix, date, 1)
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(prefix: impl Into<String>, date: NaiveDate, next_number: u64) -> Self {
        Self {
            prefix: prefix.into(),
            year: date.year(),
            month: date.month(),
            next_number,
        }
    }

    /// Generate the next invoice number.
    pub fn next_number(&mut self) -> String {
        let number = self.peek();
        self.next_number += 1;
        number
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> String {
        format!(
            "{}{}/{:02}/{}",
            self.prefix, self.next_number, self.month, self.year
        )
    }

    /// The (year, month) the sequence currently numbers.
    pub fn period(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    /// Get the next number that will be issued (without prefix/formatting).
    pub fn next_raw(&self) -> u64 {
        self.next_number
    }

    /// Move to the month of `date`, restarting the counter.
    ///
    /// Fails when `date` lies in the current or an earlier month.
    pub fn advance_to(&mut self, date: NaiveDate) -> Result<(), InvoiceError> {
        if (date.year(), date.month()) <= (self.year, self.month) {
            return Err(InvoiceError::Numbering(format!(
                "{:02}/{} is not after the current period {:02}/{}",
                date.month(),
                date.year(),
                self.month,
                self.year
            )));
        }
        self.year = date.year();
        self.month = date.month();
        self.next_number = 1;
        Ok(())
    }

    /// Advance if `date` is in a later month. Returns true if it did.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        self.advance_to(date).is_ok()
    }

    /// Parse the running number out of a number produced by this sequence's
    /// format, e.g. "FV/12/03/2024" → 12 for prefix "FV/".
    pub fn parse_running_number(&self, number: &str) -> Option<u64> {
        let rest = number.strip_prefix(&self.prefix)?;
        let mut parts = rest.split('/');
        let n = parts.next()?.parse().ok()?;
        let month: u32 = parts.next()?.parse().ok()?;
        let year: i32 = parts.next()?.parse().ok()?;
        if parts.next().is_some() || month != self.month || year != self.year {
            return None;
        }
        Some(n)
    }
}
