//! Statement parser state machine.
//!
//! Rows arrive page by page in reading order. Each page starts in
//! [`ParserState::HeaderScan`], where header metadata and the working year
//! are collected until the statement table's column-header row is seen.
//! From there rows are [`ingested`](StatementParser::ingest_row): a row led
//! by a date in the date column opens a transaction, anything else is a
//! continuation of the open one, and the provider's footer marker ends the
//! page.

use std::sync::LazyLock;

use chrono::NaiveDate;
use omniscan_core::{
    Direction, Row, ScanError, ScanResult, StatementHeader, TextRun, Transaction, push_line,
};
use regex::Regex;

use crate::provider::{Column, HeaderField, HeaderRule, Provider, ProviderProfile};

/// Year used when no statement period was found.
pub const FALLBACK_YEAR: i32 = 1900;

static MONTH_YEAR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:JANUARI|FEBRUARI|MARET|APRIL|MEI|JUNI|JULI|AGUSTUS|SEPTEMBER|OKTOBER|NOVEMBER|DESEMBER) (\d{4})\b",
    )
    .ok()
});

static AMOUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*(?:DB|CR)?\s*$").ok());

/// Where the parser is within the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Looking for header metadata and the column-header row.
    HeaderScan,
    /// Reading transaction rows.
    Ingest,
    /// Footer seen; the rest of the page is skipped.
    PageDone,
}

/// What [`StatementParser::ingest_row`] did with a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// A dated row opened a new transaction.
    NewTransaction,
    /// The row was folded into the open transaction.
    Continuation,
    /// The footer marker ended the page.
    Footer,
    /// No open transaction to fold into, or nothing to read.
    Ignored,
}

/// Accumulates header metadata and transactions across a statement's pages.
#[derive(Debug, Clone)]
pub struct StatementParser {
    provider: Provider,
    state: ParserState,
    page_number: usize,
    year: Option<i32>,
    warned_fallback_year: bool,
    header: StatementHeader,
    transactions: Vec<Transaction>,
}

impl StatementParser {
    /// Create a parser for `provider`'s layout.
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            state: ParserState::HeaderScan,
            page_number: 0,
            year: None,
            warned_fallback_year: false,
            header: StatementHeader {
                bank: provider.bank_name().to_string(),
                ..StatementHeader::default()
            },
            transactions: Vec::new(),
        }
    }

    fn profile(&self) -> &'static ProviderProfile {
        self.provider.profile()
    }

    /// Current state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Working year, once seeded.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Header collected so far.
    pub fn header(&self) -> &StatementHeader {
        &self.header
    }

    /// Transactions collected so far.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Start a new page (1-based). Every page begins in header scan.
    pub fn begin_page(&mut self, page_number: usize) {
        self.page_number = page_number;
        self.state = ParserState::HeaderScan;
    }

    /// Feed one row of the current page.
    pub fn feed_row(&mut self, row: &Row) {
        match self.state {
            ParserState::HeaderScan => {
                self.scan_header(row);
                if self.matches_header_row(row) {
                    tracing::debug!(page = self.page_number, "found column header row");
                    self.state = ParserState::Ingest;
                }
            }
            ParserState::Ingest => {
                if self.ingest_row(row) == RowOutcome::Footer {
                    tracing::debug!(page = self.page_number, "footer marker reached");
                    self.state = ParserState::PageDone;
                }
            }
            ParserState::PageDone => {}
        }
    }

    /// Collect header fields (page 1 only) and seed the working year.
    pub fn scan_header(&mut self, row: &Row) {
        if self.year.is_none() {
            self.year = row.texts().find_map(year_from_month_name);
            if let Some(year) = self.year {
                tracing::debug!(year, "seeded year from month name");
            }
        }
        if self.page_number > 1 {
            return;
        }
        for rule in self.profile().header_rules {
            self.apply_header_rule(rule, row);
        }
    }

    fn apply_header_rule(&mut self, rule: &HeaderRule, row: &Row) {
        let Some(first) = row.text_at(0) else {
            return;
        };
        match *rule {
            HeaderRule::TokenAt {
                anchor,
                index,
                field,
            } => {
                if first.contains(anchor) {
                    if let Some(value) = row.text_at(index) {
                        self.set_header_field(field, value.trim().to_string());
                    }
                }
            }
            HeaderRule::JoinedFrom {
                anchor,
                from,
                field,
                year_index,
            } => {
                if first.contains(anchor) && row.len() > from {
                    let value = row.texts().skip(from).collect::<Vec<_>>().join(" ");
                    self.set_header_field(field, value);
                    if let Some(year) = year_index
                        .and_then(|i| row.text_at(i))
                        .and_then(|token| token.rsplit('/').next())
                        .and_then(|part| part.trim().parse::<i32>().ok())
                    {
                        self.year = Some(year);
                    }
                }
            }
            HeaderRule::SoleToken { keyword, field } => {
                if row.len() == 1 && first.contains(keyword) {
                    self.set_header_field(field, first.trim().to_string());
                }
            }
        }
    }

    fn set_header_field(&mut self, field: HeaderField, value: String) {
        let slot = match field {
            HeaderField::Product => &mut self.header.product,
            HeaderField::Account => &mut self.header.account,
            HeaderField::Period => &mut self.header.period,
        };
        *slot = value;
    }

    /// Returns `true` if the row's leading tokens are the provider's column
    /// headers, each at its own ordinal.
    pub fn matches_header_row(&self, row: &Row) -> bool {
        let expected = self.profile().column_headers;
        !expected.is_empty()
            && expected.iter().enumerate().all(|(i, keyword)| {
                row.text_at(i)
                    .is_some_and(|text| text.trim().eq_ignore_ascii_case(keyword))
            })
    }

    /// Apply one table row.
    pub fn ingest_row(&mut self, row: &Row) -> RowOutcome {
        let profile = self.profile();
        let Some(first) = row.content.first() else {
            return RowOutcome::Ignored;
        };

        let is_footer = row.content.iter().any(|run| {
            profile.columns.column_at(run.x) == Some(Column::Description)
                && run.text == profile.footer_marker
        });
        if is_footer {
            return RowOutcome::Footer;
        }

        if profile.columns.date.contains(first.x) {
            if let Some(date) = self.parse_date(&first.text) {
                let mut transaction = Transaction::new(date);
                classify(profile, &mut transaction, &row.content[1..]);
                self.transactions.push(transaction);
                return RowOutcome::NewTransaction;
            }
        }

        match self.transactions.last_mut() {
            Some(open) => {
                classify(profile, open, &row.content);
                RowOutcome::Continuation
            }
            None => RowOutcome::Ignored,
        }
    }

    /// Parse a `DD/MM` token against the working year.
    fn parse_date(&mut self, token: &str) -> Option<NaiveDate> {
        let year = match self.year {
            Some(year) => year,
            None => {
                if !self.warned_fallback_year {
                    tracing::warn!(
                        year = FALLBACK_YEAR,
                        "no statement year found, dates use the fallback year"
                    );
                    self.warned_fallback_year = true;
                }
                FALLBACK_YEAR
            }
        };
        NaiveDate::parse_from_str(&format!("{}/{year}", token.trim()), "%d/%m/%Y").ok()
    }

    /// Finish the scan.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::EmptyResult`] if no transaction was found.
    pub fn finish(self) -> Result<ScanResult, ScanError> {
        if self.transactions.is_empty() {
            return Err(ScanError::EmptyResult);
        }
        Ok(ScanResult {
            header: self.header,
            transactions: self.transactions,
        })
    }
}

/// Bucket tokens into the transaction's fields by column.
fn classify(profile: &ProviderProfile, transaction: &mut Transaction, runs: &[TextRun]) {
    for run in runs {
        match profile.columns.column_at(run.x) {
            Some(Column::Description) => push_line(&mut transaction.description1, &run.text),
            Some(Column::Description2) => push_line(&mut transaction.description2, &run.text),
            Some(Column::Branch) => push_line(&mut transaction.branch, &run.text),
            Some(Column::Debit) => {
                if let Some(amount) = parse_amount(&run.text) {
                    transaction.claim_amount(Direction::Debit, amount);
                }
            }
            Some(Column::Credit) => {
                if let Some(amount) = parse_amount(&run.text) {
                    transaction.claim_amount(Direction::Credit, amount);
                }
            }
            Some(Column::Balance) => {
                if let Some(amount) = parse_amount(&run.text) {
                    transaction.balance = amount;
                }
            }
            Some(Column::Date) | None => {}
        }
    }
}

/// Parse an amount such as `1,250,000.00` or `75,000.00 DB`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let captures = AMOUNT.as_ref()?.captures(text)?;
    captures.get(1)?.as_str().replace(',', "").parse().ok()
}

/// Year following an Indonesian month name (e.g. `"JANUARI 2024"`).
pub fn year_from_month_name(text: &str) -> Option<i32> {
    let captures = MONTH_YEAR.as_ref()?.captures(text)?;
    captures.get(1)?.as_str().parse().ok()
}
