//! Provider registry: per-bank statement layouts.
//!
//! Each supported bank is one [`Provider`] variant with a static
//! [`ProviderProfile`] describing where its statement puts things. The
//! parsing machinery in [`crate::parser`] is shared; only the profile
//! differs between banks.

use omniscan_core::{DEFAULT_ROW_TOLERANCE, ScanError};

/// A registered statement provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Provider {
    /// Bank Central Asia.
    Bca,
    /// Bank Mandiri.
    Mandiri,
}

impl Provider {
    /// Look up a provider by registry key. Case-insensitive, surrounding
    /// whitespace ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::UnsupportedProvider`] for unknown keys.
    pub fn from_key(key: &str) -> Result<Self, ScanError> {
        let wanted = key.trim();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ScanError::UnsupportedProvider(key.to_string()))
    }

    /// Every registered provider.
    pub fn all() -> &'static [Provider] {
        &[Provider::Bca, Provider::Mandiri]
    }

    /// Registry key.
    pub fn key(&self) -> &'static str {
        self.profile().key
    }

    /// Display name of the bank.
    pub fn bank_name(&self) -> &'static str {
        self.profile().bank_name
    }

    /// Static layout profile.
    pub fn profile(&self) -> &'static ProviderProfile {
        match self {
            Provider::Bca => &BCA,
            Provider::Mandiri => &MANDIRI,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Provider {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

/// Half-open horizontal interval `[start, end)` in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XRange {
    /// Inclusive left edge.
    pub start: f64,
    /// Exclusive right edge.
    pub end: f64,
}

impl XRange {
    /// Interval `[start, end)`.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Interval open to the right.
    pub const fn open_ended(start: f64) -> Self {
        Self {
            start,
            end: f64::INFINITY,
        }
    }

    /// Returns `true` if `x` lies in the interval.
    pub fn contains(&self, x: f64) -> bool {
        self.start <= x && x < self.end
    }
}

/// A statement table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Posting date.
    Date,
    /// Main description.
    Description,
    /// Secondary description.
    Description2,
    /// Branch code.
    Branch,
    /// Debit amount.
    Debit,
    /// Credit amount.
    Credit,
    /// Running balance.
    Balance,
}

/// X-ranges of a provider's statement table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub date: XRange,
    pub description: XRange,
    pub description2: Option<XRange>,
    pub branch: Option<XRange>,
    pub debit: XRange,
    pub credit: XRange,
    pub balance: Option<XRange>,
}

impl ColumnLayout {
    /// Column whose range contains `x`, checked left to right.
    pub fn column_at(&self, x: f64) -> Option<Column> {
        [
            (Column::Date, Some(self.date)),
            (Column::Description, Some(self.description)),
            (Column::Description2, self.description2),
            (Column::Branch, self.branch),
            (Column::Debit, Some(self.debit)),
            (Column::Credit, Some(self.credit)),
            (Column::Balance, self.balance),
        ]
        .into_iter()
        .find_map(|(column, range)| range.filter(|r| r.contains(x)).map(|_| column))
    }
}

/// Header field populated by a [`HeaderRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    Product,
    Account,
    Period,
}

/// How a header row populates a [`HeaderField`].
///
/// Anchors match when the row's first token contains them.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderRule {
    /// Value is the token at `index` of the anchored row.
    TokenAt {
        anchor: &'static str,
        index: usize,
        field: HeaderField,
    },
    /// Value is tokens `from..` of the anchored row, joined by spaces. The
    /// working year is also taken from the last `/` part of token
    /// `year_index`, when that row has one.
    JoinedFrom {
        anchor: &'static str,
        from: usize,
        field: HeaderField,
        year_index: Option<usize>,
    },
    /// A row with exactly one token containing the keyword gives the value.
    SoleToken {
        keyword: &'static str,
        field: HeaderField,
    },
}

/// Everything that distinguishes one bank's statement layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProfile {
    /// Bank display name.
    pub bank_name: &'static str,
    /// Registry key.
    pub key: &'static str,
    /// Table column ranges.
    pub columns: ColumnLayout,
    /// Column-header keywords expected at ordinals `0..n`.
    pub column_headers: &'static [&'static str],
    /// Description-column text that ends a page's table.
    pub footer_marker: &'static str,
    /// Vertical tolerance for row grouping.
    pub row_tolerance: f64,
    /// Header anchors, applied on page 1.
    pub header_rules: &'static [HeaderRule],
}

static BCA: ProviderProfile = ProviderProfile {
    bank_name: "BCA",
    key: "bca",
    columns: ColumnLayout {
        date: XRange::new(25.0, 60.0),
        description: XRange::new(60.0, 300.0),
        description2: None,
        branch: Some(XRange::new(300.0, 340.0)),
        debit: XRange::new(340.0, 420.0),
        credit: XRange::new(420.0, 500.0),
        balance: Some(XRange::open_ended(500.0)),
    },
    column_headers: &["TANGGAL", "KETERANGAN", "CBG", "MUTASI", "SALDO"],
    footer_marker: "SALDO AWAL :",
    row_tolerance: DEFAULT_ROW_TOLERANCE,
    header_rules: &[
        HeaderRule::SoleToken {
            keyword: "REKENING",
            field: HeaderField::Product,
        },
        HeaderRule::TokenAt {
            anchor: "NO. REKENING",
            index: 2,
            field: HeaderField::Account,
        },
        HeaderRule::TokenAt {
            anchor: "PERIODE",
            index: 2,
            field: HeaderField::Period,
        },
    ],
};

static MANDIRI: ProviderProfile = ProviderProfile {
    bank_name: "Mandiri",
    key: "mandiri",
    columns: ColumnLayout {
        date: XRange::new(41.04, 51.04),
        description: XRange::new(94.61, 104.61),
        description2: None,
        branch: None,
        debit: XRange::new(400.0, 500.0),
        credit: XRange::new(500.0, 560.0),
        balance: Some(XRange::open_ended(560.0)),
    },
    column_headers: &["TANGGAL", "TRANSAKSI", "DEBIT", "KREDIT"],
    footer_marker: "Saldo Awal",
    row_tolerance: 4.0,
    header_rules: &[
        HeaderRule::SoleToken {
            keyword: "REKENING",
            field: HeaderField::Product,
        },
        HeaderRule::TokenAt {
            anchor: "Nomor Rekening",
            index: 1,
            field: HeaderField::Account,
        },
        HeaderRule::JoinedFrom {
            anchor: "Periode",
            from: 1,
            field: HeaderField::Period,
            year_index: Some(3),
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_key_is_case_insensitive() {
        assert_eq!(Provider::from_key("bca").unwrap(), Provider::Bca);
        assert_eq!(Provider::from_key(" MANDIRI ").unwrap(), Provider::Mandiri);
        assert_eq!("Bca".parse::<Provider>().unwrap(), Provider::Bca);
    }

    #[test]
    fn unknown_key_is_unsupported() {
        assert_eq!(
            Provider::from_key("bni"),
            Err(ScanError::UnsupportedProvider("bni".to_string()))
        );
    }

    #[test]
    fn registry_lists_every_provider() {
        let keys: Vec<_> = Provider::all().iter().map(Provider::key).collect();
        assert_eq!(keys, vec!["bca", "mandiri"]);
        assert_eq!(Provider::Mandiri.bank_name(), "Mandiri");
        assert_eq!(Provider::Bca.to_string(), "bca");
    }

    #[test]
    fn xrange_is_half_open() {
        let r = XRange::new(10.0, 20.0);
        assert!(r.contains(10.0));
        assert!(r.contains(19.99));
        assert!(!r.contains(20.0));
        assert!(XRange::open_ended(5.0).contains(1.0e9));
    }

    #[test]
    fn bca_columns_classify() {
        let cols = &Provider::Bca.profile().columns;
        assert_eq!(cols.column_at(30.0), Some(Column::Date));
        assert_eq!(cols.column_at(120.0), Some(Column::Description));
        assert_eq!(cols.column_at(310.0), Some(Column::Branch));
        assert_eq!(cols.column_at(380.0), Some(Column::Debit));
        assert_eq!(cols.column_at(450.0), Some(Column::Credit));
        assert_eq!(cols.column_at(540.0), Some(Column::Balance));
        assert_eq!(cols.column_at(10.0), None);
    }

    #[test]
    fn mandiri_columns_leave_gaps() {
        let cols = &Provider::Mandiri.profile().columns;
        assert_eq!(cols.column_at(46.04), Some(Column::Date));
        assert_eq!(cols.column_at(99.61), Some(Column::Description));
        assert_eq!(cols.column_at(200.0), None);
        assert_eq!(cols.column_at(450.0), Some(Column::Debit));
        assert_eq!(cols.column_at(520.0), Some(Column::Credit));
        assert_eq!(cols.column_at(570.0), Some(Column::Balance));
    }

    #[test]
    fn mandiri_uses_wider_row_tolerance() {
        assert_eq!(Provider::Mandiri.profile().row_tolerance, 4.0);
        assert_eq!(Provider::Bca.profile().row_tolerance, DEFAULT_ROW_TOLERANCE);
    }
}
