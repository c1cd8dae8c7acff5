//! Helpers shared by the numeric conversion rules

use serde::de;

/// Map key under which serde_json hands over the exact text of a number
const NUMBER_KEY: &str = "$serde_json::private::Number";

/// Error raised when a numeric field holds a token of the wrong kind
pub(crate) fn unexpected<E: de::Error>(kind: &str) -> E {
    E::custom(format!("Unexpected token type: {kind}"))
}

/// Exact text of a number that serde_json delivered as a single-entry map.
///
/// Numbers that do not fit a native integer or float arrive this way. Any
/// other map is a real JSON object and yields `None`.
pub(crate) fn number_text<'de, A>(mut map: A) -> Result<Option<String>, A::Error>
where
    A: de::MapAccess<'de>,
{
    match map.next_key::<String>()? {
        Some(key) if key == NUMBER_KEY => map.next_value::<String>().map(Some),
        _ => Ok(None),
    }
}

/// Whether a string token stands for an absent value
pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Rewrites a localized number into invariant notation.
///
/// The right-most of `,` and `.` is the decimal separator and the other one
/// groups thousands, so `1.234,56` and `1,234.56` both become `1234.56`.
/// A lone `,` is a decimal separator.
pub(crate) fn normalize_localized(text: &str) -> String {
    let text = text.trim();
    let decimal_separator = match (text.rfind(','), text.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => ',',
        (Some(_), None) => ',',
        _ => '.',
    };
    let group_separator = if decimal_separator == ',' { '.' } else { ',' };

    text.chars()
        .filter(|c| *c != group_separator)
        .map(|c| if c == decimal_separator { '.' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_invariant() {
        assert_eq!(normalize_localized("12.5"), "12.5");
        assert_eq!(normalize_localized(" 1,234.56 "), "1234.56");
    }

    #[test]
    fn test_normalize_comma_decimal() {
        assert_eq!(normalize_localized("12,5"), "12.5");
        assert_eq!(normalize_localized("1.234,56"), "1234.56");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" 0 "));
    }
}
