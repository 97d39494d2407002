//! Character-level cleanup of cell values, labels and headers.

use regex::Regex;

use crate::error::TableError;

/// Strips value cells down to an allow-listed character set.
///
/// Spaces are removed first, which undoes thousands separators inserted by
/// extraction (`"300 000"` → `"300000"`). Every remaining character outside
/// the allow-list is then dropped.
#[derive(Debug, Clone)]
pub struct ValueSanitizer {
    disallowed: Regex,
}

impl ValueSanitizer {
    /// Build a sanitizer keeping the characters of `charset`, given as the
    /// body of a regex character class (e.g. `0-9.,%x^`).
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSettings`] if the class does not compile.
    pub fn new(charset: &str) -> Result<Self, TableError> {
        let disallowed = Regex::new(&format!("[^{charset}]"))
            .map_err(|e| TableError::InvalidSettings(format!("value charset {charset:?}: {e}")))?;
        Ok(Self { disallowed })
    }

    /// Clean a single value.
    pub fn clean(&self, value: &str) -> String {
        let compact = value.replace(' ', "");
        self.disallowed.replace_all(&compact, "").into_owned()
    }

    /// Returns `true` if `value` already consists only of allowed characters.
    pub fn is_clean(&self, value: &str) -> bool {
        !self.disallowed.is_match(value)
    }
}

/// Drop every character outside printable ASCII (`' '..='~'`).
pub fn strip_non_printable(text: &str) -> String {
    text.chars().filter(|c| (' '..='~').contains(c)).collect()
}
