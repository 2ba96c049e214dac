use lazy_static::lazy_static;
use regex::Regex;

use crate::processing::normalizer::normalize_ocr_text;

/// Lexical shape of an NRIC/FIN after normalization: optional OCR junk, a
/// prefix letter (or a digit it is commonly misread as), seven digits and a
/// trailing check character. The check character is not verified against the
/// checksum algorithm.
pub const NRIC_PATTERN: &str = r"(?i)^[=:$\s-]*[15$STFG]\d{7}[!210A-Z]$";

lazy_static! {
    static ref NRIC_REGEX: Regex = Regex::new(NRIC_PATTERN).unwrap();
}

/// True when the whole of `normalized` has the NRIC/FIN shape.
pub fn is_identifier(normalized: &str) -> bool {
    NRIC_REGEX.is_match(normalized)
}

/// Outcome of running one raw OCR token through normalization and matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    pub normalized: String,
    pub matched: bool,
}

/// Trims, normalizes and matches a raw token. Returns `None` for empty text.
pub fn match_token(raw: &str) -> Option<TokenMatch> {
    if raw.is_empty() {
        return None;
    }
    let normalized = normalize_ocr_text(raw.trim());
    let matched = is_identifier(&normalized);
    Some(TokenMatch { normalized, matched })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers_match() {
        for id in ["S1234567D", "T0123456Z", "F7654321X", "G1111111!", "s1234567d"] {
            assert!(is_identifier(id), "{} should match", id);
        }
    }

    #[test]
    fn test_leading_ocr_junk_is_allowed() {
        assert!(is_identifier("=S1234567D"));
        assert!(is_identifier(": S1234567D"));
        assert!(is_identifier("--S1234567D"));
    }

    #[test]
    fn test_misread_prefix_digits_are_allowed() {
        assert!(is_identifier("51234567A"));
        assert!(is_identifier("11234567A"));
    }

    #[test]
    fn test_match_is_anchored() {
        assert!(!is_identifier("XS1234567D"));
        assert!(!is_identifier("S1234567DX"));
        assert!(!is_identifier("ID:S1234567D"));
        assert!(!is_identifier("S1234567D."));
        assert!(!is_identifier("S123456D"));
        assert!(!is_identifier("S12345678D"));
    }

    #[test]
    fn test_wrong_prefix_or_suffix() {
        assert!(!is_identifier("A1234567D"));
        assert!(!is_identifier("M1234567D"));
        assert!(!is_identifier("S12345679"));
    }

    #[test]
    fn test_match_token_scenarios() {
        let m = match_token("S1234567D").unwrap();
        assert_eq!(m.normalized, "S1234567D");
        assert!(m.matched);

        let m = match_token("$1234567A").unwrap();
        assert_eq!(m.normalized, "S1234567A");
        assert!(m.matched);

        let m = match_token("SI234567A").unwrap();
        assert_eq!(m.normalized, "S1234567A");
        assert!(m.matched);

        let m = match_token("Invoice#12345").unwrap();
        assert!(!m.matched);

        assert!(match_token("").is_none());
    }

    #[test]
    fn test_match_token_trims_whitespace() {
        let m = match_token("  S1234567D\n").unwrap();
        assert_eq!(m.normalized, "S1234567D");
        assert!(m.matched);
    }
}
