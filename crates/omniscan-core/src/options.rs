use crate::error::ScanError;

/// Options controlling row grouping and resource limits for a scan.
///
/// The default applies each provider's own row tolerance and sets no limits.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanOptions {
    /// Vertical tolerance for row grouping. `None` uses the provider default.
    pub row_tolerance: Option<f64>,
    /// Maximum input size in bytes (default: None = no limit).
    pub max_input_bytes: Option<usize>,
    /// Maximum number of pages to process (default: None = no limit).
    pub max_pages: Option<usize>,
}

impl ScanOptions {
    /// Fail if `len` exceeds `max_input_bytes`.
    pub fn check_input_size(&self, len: usize) -> Result<(), ScanError> {
        check_limit("max_input_bytes", self.max_input_bytes, len)
    }

    /// Fail if `count` exceeds `max_pages`.
    pub fn check_page_count(&self, count: usize) -> Result<(), ScanError> {
        check_limit("max_pages", self.max_pages, count)
    }
}

fn check_limit(name: &str, limit: Option<usize>, actual: usize) -> Result<(), ScanError> {
    match limit {
        Some(limit) if actual > limit => Err(ScanError::ResourceLimitExceeded {
            limit_name: name.to_string(),
            limit_value: limit,
            actual_value: actual,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_limits() {
        let opts = ScanOptions::default();
        assert_eq!(opts.row_tolerance, None);
        assert!(opts.check_input_size(usize::MAX).is_ok());
        assert!(opts.check_page_count(10_000).is_ok());
    }

    #[test]
    fn input_size_at_limit_is_allowed() {
        let opts = ScanOptions {
            max_input_bytes: Some(1024),
            ..ScanOptions::default()
        };
        assert!(opts.check_input_size(1024).is_ok());
        assert_eq!(
            opts.check_input_size(1025),
            Err(ScanError::ResourceLimitExceeded {
                limit_name: "max_input_bytes".to_string(),
                limit_value: 1024,
                actual_value: 1025,
            })
        );
    }

    #[test]
    fn page_limit() {
        let opts = ScanOptions {
            max_pages: Some(3),
            ..ScanOptions::default()
        };
        assert!(opts.check_page_count(3).is_ok());
        assert!(matches!(
            opts.check_page_count(4),
            Err(ScanError::ResourceLimitExceeded { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_partial_config() {
        let opts: ScanOptions = serde_json::from_str(r#"{"max_pages": 50}"#).unwrap();
        assert_eq!(opts.max_pages, Some(50));
        assert_eq!(opts.row_tolerance, None);
    }
}
