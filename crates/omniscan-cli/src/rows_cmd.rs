use std::path::Path;

use omniscan::{Document, ScanOptions};

use crate::cli::OutputFormat;
use crate::shared::{ProgressReporter, open_document, report_error, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    tolerance: f64,
    format: OutputFormat,
) -> Result<(), i32> {
    let doc = open_document(file, &ScanOptions::default())?;
    let page_indices = resolve_pages(pages, doc.page_count())?;
    let progress = ProgressReporter::new(page_indices.len());

    let result = match format {
        OutputFormat::Text => write_text(&doc, &page_indices, tolerance, &progress),
        OutputFormat::Json => write_json(&doc, &page_indices, tolerance, &progress),
    };
    progress.finish();
    result
}

fn write_text(
    doc: &Document,
    page_indices: &[usize],
    tolerance: f64,
    progress: &ProgressReporter,
) -> Result<(), i32> {
    println!("page\ty\truns");

    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);

        let rows = doc.page_rows(idx, tolerance).map_err(report_error)?;
        for row in &rows {
            let runs: Vec<String> = row
                .content
                .iter()
                .map(|run| format!("{:.2}:{}", run.x, run.text))
                .collect();
            println!("{}\t{:.2}\t{}", idx + 1, row.anchor_y, runs.join("\t"));
        }
    }
    Ok(())
}

fn write_json(
    doc: &Document,
    page_indices: &[usize],
    tolerance: f64,
    progress: &ProgressReporter,
) -> Result<(), i32> {
    let mut all_rows = Vec::new();

    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);

        let rows = doc.page_rows(idx, tolerance).map_err(report_error)?;
        for row in &rows {
            let runs: Vec<_> = row
                .content
                .iter()
                .map(|run| {
                    serde_json::json!({
                        "x": run.x,
                        "text": run.text,
                        "font": run.font,
                        "font_size": run.font_size,
                    })
                })
                .collect();
            all_rows.push(serde_json::json!({
                "page": idx + 1,
                "y": row.anchor_y,
                "runs": runs,
            }));
        }
    }

    let json = serde_json::to_string(&all_rows).map_err(|e| {
        eprintln!("Error: failed to serialize rows: {e}");
        1
    })?;
    println!("{json}");
    Ok(())
}
