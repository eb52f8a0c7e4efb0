//! End-to-end scans of lopdf-built statements.
//!
//! PDF bytes → Scanner → ScanResult.

mod common;

use common::{bca_page, bca_statement, bca_table_header, build_pdf, cell, mandiri_statement, winansi_fonts};
use omniscan::{Direction, Document, NaiveDate, Provider, ScanError, ScanOptions, Scanner, scan};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// --- BCA ---

#[test]
fn bca_statement_end_to_end() {
    let result = scan("bca", &bca_statement()).unwrap();

    assert_eq!(result.header.bank, "BCA");
    assert_eq!(result.header.product, "REKENING TAHAPAN");
    assert_eq!(result.header.account, "0123456789");
    assert_eq!(result.header.period, "JANUARI 2024");

    assert_eq!(result.transactions.len(), 2);

    let debit = &result.transactions[0];
    assert_eq!(debit.date, date(2024, 1, 2));
    assert_eq!(debit.direction, Direction::Debit);
    assert_eq!(debit.change, 150_000.0);
    assert_eq!(debit.description1, "TRSF E-BANKING DB\nANDI WIJAYA");
    assert_eq!(debit.branch, "0998");
    assert_eq!(debit.balance, 1_850_000.0);

    let credit = &result.transactions[1];
    assert_eq!(credit.date, date(2024, 1, 5));
    assert_eq!(credit.direction, Direction::Credit);
    assert_eq!(credit.change, 500_000.0);
    assert_eq!(credit.description1, "SETORAN TUNAI");
    assert_eq!(credit.balance, 2_350_000.0);
}

#[test]
fn provider_key_is_case_insensitive() {
    let result = scan(" BCA ", &bca_statement()).unwrap();
    assert_eq!(result.transactions.len(), 2);
}

#[test]
fn header_fields_come_from_first_page_only() {
    let page2 = [
        cell(300.0, 760.0, "NO. REKENING"),
        cell(360.0, 760.0, ":"),
        cell(370.0, 760.0, "9999999999"),
        bca_table_header(700.0),
        cell(100.0, 690.0, "LANJUTAN"),
        cell(30.0, 680.0, "06/01"),
        cell(100.0, 680.0, "BIAYA ADM"),
        cell(380.0, 680.0, "10,000.00 DB"),
    ]
    .concat();
    let pdf = build_pdf(&[bca_page(), page2], winansi_fonts);

    let result = scan("bca", &pdf).unwrap();
    assert_eq!(result.header.account, "0123456789");
    assert_eq!(result.transactions.len(), 3);
    // Rows before the page-2 column header are not table rows.
    assert_eq!(result.transactions[1].description1, "SETORAN TUNAI\nLANJUTAN");
    assert_eq!(result.transactions[2].date, date(2024, 1, 6));
}

// --- Mandiri (Identity-H) ---

#[test]
fn mandiri_identity_h_statement() {
    let result = scan("mandiri", &mandiri_statement()).unwrap();

    assert_eq!(result.header.bank, "Mandiri");
    assert_eq!(result.header.product, "TABUNGAN REKENING");
    assert_eq!(result.header.account, "1230007654321");
    assert_eq!(result.header.period, "01/05/2024 - 31/05/2024");

    assert_eq!(result.transactions.len(), 2);
    let credit = &result.transactions[0];
    assert_eq!(credit.date, date(2024, 5, 3));
    assert_eq!(credit.direction, Direction::Credit);
    assert_eq!(credit.change, 2_500_000.0);
    assert_eq!(credit.description1, "Transfer dari\nPT MAJU JAYA");
    assert_eq!(credit.balance, 7_500_000.0);

    let debit = &result.transactions[1];
    assert_eq!(debit.direction, Direction::Debit);
    assert_eq!(debit.change, 300_000.0);
}

// --- errors ---

#[test]
fn unsupported_provider_ignores_bytes() {
    let inputs: Vec<Vec<u8>> = vec![Vec::new(), b"garbage".to_vec(), bca_statement()];
    for bytes in &inputs {
        assert_eq!(
            scan("bni", bytes),
            Err(ScanError::UnsupportedProvider("bni".to_string()))
        );
    }
}

#[test]
fn statement_without_rows_is_empty_result() {
    let pdf = build_pdf(&[bca_table_header(700.0)], winansi_fonts);
    assert_eq!(scan("bca", &pdf), Err(ScanError::EmptyResult));
}

#[test]
fn wrong_provider_layout_is_empty_result() {
    assert_eq!(scan("mandiri", &bca_statement()), Err(ScanError::EmptyResult));
}

#[test]
fn invalid_pdf_is_structural() {
    let err = scan("bca", b"not a pdf at all").unwrap_err();
    assert!(matches!(err, ScanError::Structural(_)));
}

#[test]
fn input_size_limit() {
    let pdf = bca_statement();
    let scanner = Scanner::new(ScanOptions {
        max_input_bytes: Some(100),
        ..ScanOptions::default()
    });
    assert_eq!(
        scanner.scan("bca", &pdf),
        Err(ScanError::ResourceLimitExceeded {
            limit_name: "max_input_bytes".to_string(),
            limit_value: 100,
            actual_value: pdf.len(),
        })
    );
}

#[test]
fn page_limit() {
    let pdf = build_pdf(&[bca_page(), bca_page(), bca_page()], winansi_fonts);
    let scanner = Scanner::new(ScanOptions {
        max_pages: Some(2),
        ..ScanOptions::default()
    });
    assert_eq!(
        scanner.scan("bca", &pdf),
        Err(ScanError::ResourceLimitExceeded {
            limit_name: "max_pages".to_string(),
            limit_value: 2,
            actual_value: 3,
        })
    );

    let relaxed = Scanner::new(ScanOptions {
        max_pages: Some(3),
        ..ScanOptions::default()
    });
    assert!(relaxed.scan("bca", &pdf).is_ok());
}

#[cfg(feature = "std")]
#[test]
fn scan_file_reads_from_disk() {
    let dir = std::env::temp_dir().join(format!("omniscan-scan-file-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("statement.pdf");
    std::fs::write(&path, bca_statement()).unwrap();

    let result = Scanner::default().scan_file("bca", &path).unwrap();
    assert_eq!(result.transactions.len(), 2);

    std::fs::remove_dir_all(&dir).unwrap();
}

// --- Document diagnostics ---

#[test]
fn document_rows_follow_reading_order() {
    let doc = Document::open(&bca_statement(), &ScanOptions::default()).unwrap();
    assert_eq!(doc.page_count(), 1);

    let rows = doc.page_rows(0, Provider::Bca.profile().row_tolerance).unwrap();
    let first: Vec<_> = rows.iter().filter_map(|r| r.text_at(0)).collect();
    assert_eq!(first[0], "REKENING TAHAPAN");
    assert_eq!(first[3], "TANGGAL");
    assert!(rows.windows(2).all(|w| w[0].anchor_y > w[1].anchor_y));
    assert_eq!(
        rows[4].texts().collect::<Vec<_>>(),
        vec!["02/01", "TRSF E-BANKING DB", "0998", "150,000.00 DB", "1,850,000.00"]
    );
}

#[test]
fn document_runs_keep_positions() {
    let doc = Document::open(&bca_statement(), &ScanOptions::default()).unwrap();
    let runs = doc.page_runs(0).unwrap();
    assert_eq!(runs[0].text, "REKENING TAHAPAN");
    assert_eq!((runs[0].x, runs[0].y), (30.0, 780.0));
    assert_eq!(runs[0].font, "F1");
    assert_eq!(runs[0].font_size, 8.0);
}

#[cfg(feature = "serde")]
#[test]
fn result_serializes_to_json() {
    let result = scan("bca", &bca_statement()).unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["header"]["account"], "0123456789");
    assert_eq!(value["transactions"][0]["direction"], "debit");
    assert_eq!(value["transactions"][1]["date"], "2024-01-05");
}

#[cfg(feature = "parallel")]
#[test]
fn batch_scans_each_job() {
    let jobs = vec![
        ("bca", bca_statement()),
        ("mandiri", mandiri_statement()),
        ("bni", Vec::new()),
    ];
    let results = Scanner::default().scan_batch(&jobs);
    assert_eq!(results[0].as_ref().unwrap().header.bank, "BCA");
    assert_eq!(results[1].as_ref().unwrap().header.bank, "Mandiri");
    assert!(matches!(results[2], Err(ScanError::UnsupportedProvider(_))));
}
