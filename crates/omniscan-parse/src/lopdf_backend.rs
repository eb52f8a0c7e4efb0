//! lopdf-based document backend.
//!
//! Implements [`StatementBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate for the PDF object model. This is the default backend for omniscan.

use std::collections::HashSet;

use omniscan_core::ScanError;

use crate::backend::{PageContent, StatementBackend};
use crate::error::BackendError;
use crate::font::FontDescriptor;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    /// The underlying lopdf document.
    inner: lopdf::Document,
    /// Cached ordered list of page ObjectIds (indexed by 0-based page number).
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// The lopdf-based backend.
///
/// # Example
///
/// ```ignore
/// use omniscan_parse::{LopdfBackend, StatementBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let page = LopdfBackend::page_content(&doc, 0)?;
/// ```
pub struct LopdfBackend;

impl StatementBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(ScanError::Structural(
                "document is encrypted".to_string(),
            )));
        }

        // get_pages returns BTreeMap<u32, ObjectId> with 1-based keys
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();
        tracing::debug!(pages = page_ids.len(), "opened document");

        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn page_content(doc: &Self::Document, index: usize) -> Result<PageContent, Self::Error> {
        let page_id = *doc.page_ids.get(index).ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            ))
        })?;
        let inner = &doc.inner;

        let page_dict = inner
            .get_object(page_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        let content = get_page_content_bytes(inner, page_dict)?;
        if content.is_empty() {
            tracing::warn!(page = index + 1, "page has no content stream");
        }

        let resources = get_page_resources(inner, page_id)?;
        let fonts = font_descriptors(inner, resources)?;

        Ok(PageContent { content, fonts })
    }
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
///
/// A `/Parent` chain that revisits a node is a parse error.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut visited = HashSet::new();
    let mut current_id = page_id;
    loop {
        if !visited.insert(current_id) {
            return Err(BackendError::Parse(format!(
                "page tree /Parent cycle at object {} {}",
                current_id.0, current_id.1
            )));
        }
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent_obj) => {
                current_id = parent_obj
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// Get the raw (decoded) content bytes of a page.
///
/// An array of streams is concatenated with a space between parts.
fn get_page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &lopdf::Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let contents_obj = match page_dict.get(b"Contents") {
        Ok(obj) => obj,
        Err(_) => return Ok(Vec::new()),
    };

    match contents_obj {
        lopdf::Object::Reference(id) => {
            let obj = doc
                .get_object(*id)
                .map_err(|e| BackendError::Parse(format!("failed to resolve /Contents: {e}")))?;
            match obj {
                lopdf::Object::Stream(stream) => decode_stream(stream),
                lopdf::Object::Array(arr) => concat_content_streams(doc, arr),
                _ => Err(BackendError::Parse("/Contents is not a stream".to_string())),
            }
        }
        lopdf::Object::Array(arr) => concat_content_streams(doc, arr),
        _ => Err(BackendError::Parse(
            "/Contents is not a reference or array".to_string(),
        )),
    }
}

fn concat_content_streams(
    doc: &lopdf::Document,
    arr: &[lopdf::Object],
) -> Result<Vec<u8>, BackendError> {
    let mut content = Vec::new();
    for item in arr {
        let id = item.as_reference().map_err(|e| {
            BackendError::Parse(format!("/Contents array item is not a reference: {e}"))
        })?;
        let stream = doc
            .get_object(id)
            .and_then(|o| o.as_stream())
            .map_err(|e| BackendError::Parse(format!("/Contents array item is not a stream: {e}")))?;
        let bytes = decode_stream(stream)?;
        if !content.is_empty() {
            content.push(b' ');
        }
        content.extend_from_slice(&bytes);
    }
    Ok(content)
}

/// Decode a stream, decompressing if needed.
fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// Get the resources dictionary for a page, handling inheritance.
fn get_page_resources(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<&lopdf::Dictionary, BackendError> {
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve_ref(doc, obj)
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => {
            static EMPTY_DICT: std::sync::LazyLock<lopdf::Dictionary> =
                std::sync::LazyLock::new(lopdf::Dictionary::new);
            Ok(&EMPTY_DICT)
        }
    }
}

/// Describe every font in a resources dictionary.
fn font_descriptors(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
) -> Result<Vec<FontDescriptor>, BackendError> {
    let Ok(fonts_obj) = resources.get(b"Font") else {
        return Ok(Vec::new());
    };
    let fonts = resolve_ref(doc, fonts_obj)
        .as_dict()
        .map_err(|_| BackendError::Font("/Font resource is not a dictionary".to_string()))?;

    let mut descriptors = Vec::with_capacity(fonts.len());
    for (name, obj) in fonts.iter() {
        let resource_id = String::from_utf8_lossy(name).into_owned();
        let Ok(font_dict) = resolve_ref(doc, obj).as_dict() else {
            tracing::warn!(font = %resource_id, "font resource is not a dictionary, skipping");
            continue;
        };
        descriptors.push(describe_font(doc, resource_id, font_dict));
    }
    Ok(descriptors)
}

fn describe_font(
    doc: &lopdf::Document,
    resource_id: String,
    font_dict: &lopdf::Dictionary,
) -> FontDescriptor {
    let base_font = font_dict
        .get(b"BaseFont")
        .and_then(|o| o.as_name())
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .unwrap_or_default();

    let encoding_name = font_dict.get(b"Encoding").ok().and_then(|obj| {
        let obj = resolve_ref(doc, obj);
        let name = match obj.as_dict() {
            Ok(enc_dict) => enc_dict.get(b"BaseEncoding").and_then(|o| o.as_name()).ok()?,
            Err(_) => obj.as_name().ok()?,
        };
        Some(String::from_utf8_lossy(name).into_owned())
    });

    let to_unicode = font_dict.get(b"ToUnicode").ok().and_then(|obj| {
        let decoded = resolve_ref(doc, obj)
            .as_stream()
            .map_err(|e| BackendError::Font(format!("/ToUnicode is not a stream: {e}")))
            .and_then(decode_stream);
        match decoded {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(font = %resource_id, error = %e, "ignoring unreadable /ToUnicode");
                None
            }
        }
    });

    tracing::debug!(
        font = %resource_id,
        base_font = %base_font,
        encoding = encoding_name.as_deref().unwrap_or("-"),
        to_unicode = to_unicode.is_some(),
        "described font"
    );

    FontDescriptor {
        resource_id,
        base_font,
        encoding_name,
        to_unicode,
    }
}

/// Resolve an indirect reference, returning the referenced object.
/// If the object is not a reference, returns it as-is.
fn resolve_ref<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}
