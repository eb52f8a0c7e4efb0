use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Parse a page selection like "1,3-5" into sorted, deduplicated 0-indexed pages.
///
/// Pages are 1-indexed on input. Empty items are skipped.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = BTreeSet::new();

    for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let span = parse_item(item)?;
        for page in [*span.start(), *span.end()] {
            if page > page_count {
                return Err(format!(
                    "page {page} exceeds document page count ({page_count})"
                ));
            }
        }
        pages.extend(span.map(|p| p - 1));
    }

    Ok(pages.into_iter().collect())
}

fn parse_item(item: &str) -> Result<RangeInclusive<usize>, String> {
    let (start, end) = match item.split_once('-') {
        Some((start, end)) => (page_number(start)?, page_number(end)?),
        None => {
            let page = page_number(item)?;
            (page, page)
        }
    };
    if start > end {
        return Err(format!("page range '{item}' is reversed"));
    }
    Ok(start..=end)
}

fn page_number(text: &str) -> Result<usize, String> {
    match text.trim().parse::<usize>() {
        Ok(0) => Err("page 0 is invalid (pages start at 1)".to_string()),
        Ok(page) => Ok(page),
        Err(_) => Err(format!("invalid page number: '{}'", text.trim())),
    }
}
