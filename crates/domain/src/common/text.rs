//! Small string helpers used when reading stored records and user-authored text.

/// Returns the trimmed value, or `None` when it is empty or whitespace only.
///
/// ```
/// use realmlore_domain::common::non_blank;
///
/// assert_eq!(non_blank("  gate "), Some("gate"));
/// assert_eq!(non_blank(" \n\t"), None);
/// ```
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extension trait converting empty database strings into `None`.
pub trait StringExt {
    /// Converts this string to `None` if empty, otherwise `Some(self)`.
    fn into_option(self) -> Option<String>;
}

impl StringExt for String {
    fn into_option(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank("hero"), Some("hero"));
        assert_eq!(non_blank("  hero  "), Some("hero"));
        assert_eq!(non_blank(""), None);
    }

    #[test]
    fn into_option_handles_empty() {
        assert_eq!(String::new().into_option(), None);
        assert_eq!("x".to_string().into_option(), Some("x".to_string()));
    }
}
