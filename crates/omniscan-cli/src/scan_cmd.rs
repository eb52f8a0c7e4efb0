use std::path::Path;

use omniscan::{ScanOptions, ScanResult, Scanner};

use crate::cli::OutputFormat;
use crate::shared::{report_error, single_line};

pub fn run(
    file: &Path,
    provider: &str,
    format: OutputFormat,
    row_tolerance: Option<f64>,
    max_pages: Option<usize>,
) -> Result<(), i32> {
    let scanner = Scanner::new(ScanOptions {
        row_tolerance,
        max_pages,
        ..ScanOptions::default()
    });
    let result = scanner.scan_file(provider, file).map_err(report_error)?;

    match format {
        OutputFormat::Text => write_text(&result),
        OutputFormat::Json => write_json(&result),
    }
}

fn write_text(result: &ScanResult) -> Result<(), i32> {
    let header = &result.header;
    println!("bank\t{}", header.bank);
    println!("product\t{}", header.product);
    println!("account\t{}", header.account);
    println!("period\t{}", header.period);
    println!();
    println!("date\tdirection\tchange\tbalance\tbranch\tdescription1\tdescription2");

    for t in &result.transactions {
        println!(
            "{}\t{}\t{:.2}\t{:.2}\t{}\t{}\t{}",
            t.date,
            t.direction,
            t.change,
            t.balance,
            t.branch,
            single_line(&t.description1),
            single_line(&t.description2),
        );
    }
    Ok(())
}

fn write_json(result: &ScanResult) -> Result<(), i32> {
    let json = serde_json::to_string_pretty(result).map_err(|e| {
        eprintln!("Error: failed to serialize result: {e}");
        1
    })?;
    println!("{json}");
    Ok(())
}
