//! String helpers for values read from loosely-typed graph properties.

/// Returns `None` for empty or whitespace-only input, otherwise the trimmed text.
///
/// # Examples
///
/// ```
/// use curricula_domain::common::non_blank;
///
/// assert_eq!(non_blank("  Giải tích 1 "), Some("Giải tích 1"));
/// assert_eq!(non_blank("   "), None);
/// ```
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extension trait for owned strings.
pub trait StringExt {
    /// Converts to `None` when blank, otherwise `Some(trimmed)`.
    fn into_option(self) -> Option<String>;
}

impl StringExt for String {
    fn into_option(self) -> Option<String> {
        non_blank(&self).map(str::to_string)
    }
}

impl StringExt for Option<String> {
    fn into_option(self) -> Option<String> {
        self.and_then(StringExt::into_option)
    }
}
