//! Font resolution: from raw font dictionary facts to a decoding mode.
//!
//! Backends describe each font resource as a [`FontDescriptor`]; a
//! [`FontTable`] resolves descriptors into [`Font`]s keyed by resource id.
//! Each page gets its own table, with a document-wide table behind it for
//! names the page does not declare.

use std::collections::BTreeMap;

use omniscan_core::SimpleEncoding;

use crate::cmap::CMap;

/// Facts read from a font dictionary, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontDescriptor {
    /// Resource name as used by `Tf` (e.g. `"F1"`).
    pub resource_id: String,
    /// `/BaseFont` name, if present.
    pub base_font: String,
    /// `/Encoding` name, or `/BaseEncoding` of an encoding dictionary.
    pub encoding_name: Option<String>,
    /// Decoded `/ToUnicode` stream bytes.
    pub to_unicode: Option<Vec<u8>>,
}

impl FontDescriptor {
    /// Create a descriptor with only a resource id and encoding name.
    pub fn new(resource_id: impl Into<String>, encoding_name: Option<&str>) -> Self {
        Self {
            resource_id: resource_id.into(),
            base_font: String::new(),
            encoding_name: encoding_name.map(str::to_string),
            to_unicode: None,
        }
    }

    /// Attach a ToUnicode program.
    pub fn with_to_unicode(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.to_unicode = Some(data.into());
        self
    }

    /// Resolve the decoding mode for this font.
    pub fn resolve(&self) -> Font {
        let composite = || EncodingMode::Composite(self.to_unicode.as_deref().map(CMap::parse).unwrap_or_default());

        let mode = match self.encoding_name.as_deref() {
            Some("WinAnsiEncoding") => EncodingMode::Simple(SimpleEncoding::WinAnsi),
            Some("MacRomanEncoding") => EncodingMode::Simple(SimpleEncoding::MacRoman),
            Some("Identity-H" | "Identity-V") => composite(),
            Some(_) if self.to_unicode.is_some() => composite(),
            _ => EncodingMode::Simple(SimpleEncoding::PdfDoc),
        };

        Font {
            resource_id: self.resource_id.clone(),
            base_font: self.base_font.clone(),
            mode,
        }
    }
}

/// How a font's shown bytes become text.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodingMode {
    /// One byte per character through a fixed table.
    Simple(SimpleEncoding),
    /// Variable-length codes through a CMap.
    Composite(CMap),
}

/// A resolved font.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Resource name as used by `Tf`.
    pub resource_id: String,
    /// `/BaseFont` name.
    pub base_font: String,
    /// Decoding mode.
    pub mode: EncodingMode,
}

impl Font {
    /// Returns `true` for CMap-decoded fonts.
    pub fn is_composite(&self) -> bool {
        matches!(self.mode, EncodingMode::Composite(_))
    }
}

#[derive(Debug, Clone)]
struct Entry {
    /// Every distinct descriptor folded into this entry, first one first.
    seen: Vec<FontDescriptor>,
    font: Font,
}

/// Font table keyed by resource id.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    entries: BTreeMap<String, Entry>,
}

impl FontTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from one set of descriptors.
    pub fn from_descriptors(descriptors: &[FontDescriptor]) -> Self {
        let mut table = Self::new();
        table.absorb(descriptors);
        table
    }

    /// Fold font descriptors into the table.
    ///
    /// The first definition of an id is kept. A later composite definition
    /// of the same id only adds the codes the existing CMap lacks; any other
    /// redefinition is ignored.
    pub fn absorb(&mut self, descriptors: &[FontDescriptor]) {
        for descriptor in descriptors {
            let id = descriptor.resource_id.clone();
            match self.entries.get_mut(&id) {
                Some(existing) if existing.seen.contains(descriptor) => {}
                Some(existing) => {
                    existing.seen.push(descriptor.clone());
                    match (&mut existing.font.mode, descriptor.resolve().mode) {
                        (EncodingMode::Composite(older), EncodingMode::Composite(newer)) => {
                            older.merge(newer);
                            tracing::debug!(font = %id, "merged composite font definitions");
                        }
                        _ => tracing::debug!(font = %id, "kept earlier font definition"),
                    }
                }
                None => {
                    let font = descriptor.resolve();
                    tracing::trace!(font = %id, composite = font.is_composite(), "resolved font");
                    self.entries.insert(
                        id,
                        Entry {
                            seen: vec![descriptor.clone()],
                            font,
                        },
                    );
                }
            }
        }
    }

    /// This table plus every entry of `fallback` whose id it does not have.
    pub fn with_fallback(&self, fallback: &FontTable) -> FontTable {
        let mut entries = self.entries.clone();
        for (id, entry) in &fallback.entries {
            entries.entry(id.clone()).or_insert_with(|| entry.clone());
        }
        FontTable { entries }
    }

    /// Look up a font by resource name.
    ///
    /// Falls back to the first id, in sorted order, that contains `name`.
    pub fn get(&self, name: &str) -> Option<&Font> {
        let name = name.trim_start_matches('/');
        self.entries
            .get(name)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(id, _)| id.contains(name))
                    .map(|(_, entry)| entry)
            })
            .map(|entry| &entry.font)
    }

    /// Number of fonts in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no fonts are known.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resource ids in sorted order.
    pub fn resource_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
