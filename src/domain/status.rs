//! Status-check session: look up purchase history for a TC address and page
//! through the results.

use super::{
    history::{HistoryRecord, HistoryRow},
    validation::validate_status_address,
};

pub const DEFAULT_PAGE_SIZE: usize = 10;

pub struct StatusSession {
    pub address: String,
    touched: bool,
    error: Option<String>,
    is_processing: bool,
    last_error: Option<String>,
    rows: Vec<HistoryRow>,
    page: usize,
    page_size: usize,
}

impl StatusSession {
    pub fn new(page_size: usize) -> Self {
        Self {
            address: String::new(),
            touched: false,
            error: None,
            is_processing: false,
            last_error: None,
            rows: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
        self.touched = true;
        self.error = validate_status_address(&self.address);
    }

    pub fn visible_error(&self) -> Option<&str> {
        if self.touched {
            self.error.as_deref()
        } else {
            None
        }
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// Message of the last failed lookup, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validate and start a lookup. Returns the address to query, or `None`
    /// when the address is invalid or a lookup is already running. Previous
    /// results are cleared as soon as a lookup starts.
    pub fn begin_lookup(&mut self) -> Option<String> {
        if self.is_processing {
            return None;
        }
        self.touched = true;
        self.error = validate_status_address(&self.address);
        if self.error.is_some() {
            return None;
        }

        self.is_processing = true;
        self.last_error = None;
        self.rows.clear();
        self.page = 0;
        Some(self.address.clone())
    }

    pub fn finish_lookup(&mut self, result: Result<Vec<HistoryRecord>, String>) {
        self.is_processing = false;
        match result {
            Ok(records) => {
                self.rows = records.iter().map(HistoryRow::from_record).collect();
            }
            Err(message) => {
                self.rows.clear();
                self.last_error = Some(message);
            }
        }
        self.page = 0;
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    pub fn current_page_rows(&self) -> &[HistoryRow] {
        let start = (self.page * self.page_size).min(self.rows.len());
        let end = (start + self.page_size).min(self.rows.len());
        &self.rows[start..end]
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }
}

impl Default for StatusSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
