//! Synthetic statement PDFs built with lopdf.
//!
//! Every text item is its own `BT .. ET` object placed with `Td`, the way
//! statement generators usually emit table cells.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

/// Maps CID `n` to U+0020 + n for `n` in `0..=255`.
pub const IDENTITY_TO_UNICODE: &[u8] = b"\
    /CIDInit /ProcSet findresource begin\n\
    12 dict begin\n\
    begincmap\n\
    /CMapName /Adobe-Identity-UCS def\n\
    /CMapType 2 def\n\
    1 begincodespacerange\n\
    <0000> <FFFF>\n\
    endcodespacerange\n\
    1 beginbfrange\n\
    <0000> <00FF> <0020>\n\
    endbfrange\n\
    endcmap\n";

/// A WinAnsi-encoded text item in font `F1`.
pub fn cell(x: f64, y: f64, text: &str) -> String {
    format!("BT /F1 8 Tf {x} {y} Td ({text}) Tj ET\n")
}

/// An Identity-H text item in font `C2_0`, encoded for [`IDENTITY_TO_UNICODE`].
pub fn cid_cell(x: f64, y: f64, text: &str) -> String {
    let hex: String = text
        .bytes()
        .map(|b| format!("{:04X}", u16::from(b) - 0x20))
        .collect();
    format!("BT /C2_0 9 Tf 1 0 0 1 {x} {y} Tm <{hex}> Tj ET\n")
}

/// Build a PDF with one page per content stream and the given page fonts.
pub fn build_pdf<P: AsRef<[u8]>>(pages: &[P], fonts: impl Fn(&mut Document) -> Dictionary) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();
    let font_dict = fonts(&mut doc);

    let mut kids: Vec<Object> = Vec::new();
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_ref().to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => font_dict.clone() },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// `F1`: Helvetica with WinAnsiEncoding.
pub fn winansi_fonts(doc: &mut Document) -> Dictionary {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    dictionary! { "F1" => font_id }
}

/// `C2_0`: an Identity-H Type0 font with a ToUnicode map.
pub fn identity_fonts(doc: &mut Document) -> Dictionary {
    let tounicode_id = doc.add_object(Stream::new(dictionary! {}, IDENTITY_TO_UNICODE.to_vec()));
    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "ABCDEF+Arial",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
    });
    let type0_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "ABCDEF+Arial",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => tounicode_id,
    });
    dictionary! { "C2_0" => type0_id }
}

/// BCA column-header row at `y`.
pub fn bca_table_header(y: f64) -> String {
    [
        cell(30.0, y, "TANGGAL"),
        cell(100.0, y, "KETERANGAN"),
        cell(310.0, y, "CBG"),
        cell(380.0, y, "MUTASI"),
        cell(520.0, y, "SALDO"),
    ]
    .concat()
}

/// One BCA page: header block, two transactions with a continuation line,
/// the footer, and a dated row after the footer.
pub fn bca_page() -> String {
    [
        cell(30.0, 780.0, "REKENING TAHAPAN"),
        cell(300.0, 760.0, "NO. REKENING"),
        cell(360.0, 760.0, ":"),
        cell(370.0, 760.0, "0123456789"),
        cell(300.0, 745.0, "PERIODE"),
        cell(360.0, 745.0, ":"),
        cell(370.0, 745.0, "JANUARI 2024"),
        bca_table_header(700.0),
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
        cell(520.0, 640.0, "2,000,000.00"),
        cell(30.0, 620.0, "31/01"),
        cell(100.0, 620.0, "AFTER FOOTER"),
    ]
    .concat()
}

/// Single-page BCA statement.
pub fn bca_statement() -> Vec<u8> {
    build_pdf(&[bca_page()], winansi_fonts)
}

/// Single-page Mandiri statement set in an Identity-H font.
pub fn mandiri_statement() -> Vec<u8> {
    let page = [
        cid_cell(40.0, 780.0, "TABUNGAN REKENING"),
        cid_cell(40.0, 760.0, "Nomor Rekening"),
        cid_cell(150.0, 760.0, "1230007654321"),
        cid_cell(40.0, 745.0, "Periode"),
        cid_cell(150.0, 745.0, "01/05/2024"),
        cid_cell(200.0, 745.0, "-"),
        cid_cell(220.0, 745.0, "31/05/2024"),
        cid_cell(46.04, 700.0, "Tanggal"),
        cid_cell(99.61, 700.0, "Transaksi"),
        cid_cell(450.0, 700.0, "Debit"),
        cid_cell(520.0, 700.0, "Kredit"),
        cid_cell(580.0, 700.0, "Saldo"),
        cid_cell(46.04, 680.0, "03/05"),
        cid_cell(99.61, 680.0, "Transfer dari"),
        cid_cell(520.0, 680.0, "2,500,000.00"),
        cid_cell(580.0, 680.0, "7,500,000.00"),
        cid_cell(99.61, 670.0, "PT MAJU JAYA"),
        cid_cell(46.04, 655.0, "04/05"),
        cid_cell(99.61, 655.0, "Tarik Tunai"),
        cid_cell(450.0, 655.0, "300,000.00"),
        cid_cell(580.0, 655.0, "7,200,000.00"),
        cid_cell(99.61, 630.0, "Saldo Awal"),
    ]
    .concat();
    build_pdf(&[page], identity_fonts)
}
