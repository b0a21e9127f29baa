//! Author name normalization.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a display name into a registry key.
///
/// Accents are stripped (NFD, then combining marks dropped), C0 control
/// characters removed, every remaining non-ASCII-alphanumeric character
/// replaced by `_`, and the result lower-cased. Surrounding whitespace is
/// trimmed first so padded input does not turn into leading underscores.
pub fn normalize_author_name(raw: &str) -> String {
    raw.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !matches!(c, '\u{0000}'..='\u{001f}'))
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_accents_and_case() {
        assert_eq!(normalize_author_name("José"), "jose");
        assert_eq!(normalize_author_name("Zoë Müller"), "zoe_muller");
    }

    #[test]
    fn test_control_characters_are_removed() {
        assert_eq!(normalize_author_name("a\u{0007}b\tc"), "abc");
    }

    #[test]
    fn test_symbols_become_underscores() {
        assert_eq!(normalize_author_name("o'brien@lab"), "o_brien_lab");
        assert_eq!(normalize_author_name("  padded  "), "padded");
        assert_eq!(normalize_author_name("日本"), "__");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["Émile", "x-y z", "UNKNOWN", "ß"] {
            let once = normalize_author_name(raw);
            assert_eq!(normalize_author_name(&once), once);
        }
    }
}
