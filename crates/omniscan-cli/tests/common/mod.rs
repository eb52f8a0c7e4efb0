//! lopdf-built statement fixtures for CLI tests.

#![allow(dead_code)]

use std::io::Write;

use lopdf::{Object, Stream, dictionary};

/// A WinAnsi text item in font `F1`.
pub fn cell(x: f64, y: f64, text: &str) -> String {
    format!("BT /F1 8 Tf {x} {y} Td ({text}) Tj ET\n")
}

/// Build a PDF with one page per content stream, all sharing `F1`.
pub fn pdf_with_pages(pages: &[String]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut page_ids = Vec::new();
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.clone().into_bytes()));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        }));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(pages.len() as i64),
    });
    for &pid in &page_ids {
        if let Ok(dict) = doc.get_object_mut(pid).and_then(Object::as_dict_mut) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// One BCA statement page: header block, a debit with a continuation line,
/// a credit, and the footer.
pub fn bca_page() -> String {
    [
        cell(30.0, 780.0, "REKENING TAHAPAN"),
        cell(300.0, 760.0, "NO. REKENING"),
        cell(360.0, 760.0, ":"),
        cell(370.0, 760.0, "0123456789"),
        cell(300.0, 745.0, "PERIODE"),
        cell(360.0, 745.0, ":"),
        cell(370.0, 745.0, "JANUARI 2024"),
        cell(30.0, 700.0, "TANGGAL"),
        cell(100.0, 700.0, "KETERANGAN"),
        cell(310.0, 700.0, "CBG"),
        cell(380.0, 700.0, "MUTASI"),
        cell(520.0, 700.0, "SALDO"),
        cell(30.0, 680.0, "02/01"),
        cell(100.0, 680.0, "TRSF E-BANKING DB"),
        cell(310.0, 680.0, "0998"),
        cell(380.0, 680.0, "150,000.00 DB"),
        cell(520.0, 680.0, "1,850,000.00"),
        cell(100.0, 668.0, "ANDI WIJAYA"),
        cell(30.0, 656.0, "05/01"),
        cell(100.0, 656.0, "SETORAN TUNAI"),
        cell(450.0, 656.0, "500,000.00"),
        cell(520.0, 656.0, "2,350,000.00"),
        cell(100.0, 640.0, "SALDO AWAL :"),
    ]
    .concat()
}

/// Write PDF bytes to a temporary file.
pub fn write_temp_pdf(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}
