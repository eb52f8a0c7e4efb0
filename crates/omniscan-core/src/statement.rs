//! Statement data model: header metadata, transactions, and the scan result.

use chrono::NaiveDate;

/// Flow of money for a transaction.
///
/// Starts as [`Unknown`](Direction::Unknown) and is fixed by the first
/// amount column that claims it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// No amount column has been seen yet.
    #[default]
    Unknown,
    /// Money into the account.
    Credit,
    /// Money out of the account.
    Debit,
}

impl Direction {
    /// Set the direction if it is still unknown. Returns `true` if it changed.
    pub fn assign_once(&mut self, direction: Direction) -> bool {
        if *self == Direction::Unknown {
            *self = direction;
            true
        } else {
            false
        }
    }

    /// Returns `true` once a credit or debit has been assigned.
    pub fn is_known(&self) -> bool {
        *self != Direction::Unknown
    }

    /// Lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Unknown => "unknown",
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Account metadata found in the first page's header block.
///
/// Every field is empty when its anchor is missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatementHeader {
    /// Bank display name.
    pub bank: String,
    /// Account product (e.g. `"REKENING TAHAPAN"`).
    pub product: String,
    /// Account number.
    pub account: String,
    /// Statement period as printed.
    pub period: String,
}

/// One dated ledger entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    /// Posting date.
    pub date: NaiveDate,
    /// Main description lines, newline-joined.
    pub description1: String,
    /// Secondary description lines, newline-joined.
    pub description2: String,
    /// Branch code.
    pub branch: String,
    /// Unsigned amount moved.
    pub change: f64,
    /// Whether `change` is a credit or a debit.
    pub direction: Direction,
    /// Running balance after the transaction, when printed.
    pub balance: f64,
}

impl Transaction {
    /// Start an empty transaction on `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            description1: String::new(),
            description2: String::new(),
            branch: String::new(),
            change: 0.0,
            direction: Direction::Unknown,
            balance: 0.0,
        }
    }

    /// Record an amount for `direction` if no direction has been set yet.
    ///
    /// Returns `true` if the amount was taken.
    pub fn claim_amount(&mut self, direction: Direction, amount: f64) -> bool {
        if self.direction.assign_once(direction) {
            self.change = amount;
            true
        } else {
            false
        }
    }
}

/// Append `line` to a newline-joined text field.
pub fn push_line(field: &mut String, line: &str) {
    if !field.is_empty() {
        field.push('\n');
    }
    field.push_str(line);
}

/// Everything extracted from one statement.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanResult {
    /// Header metadata from page 1.
    pub header: StatementHeader,
    /// Transactions in the order they appear.
    pub transactions: Vec<Transaction>,
}
