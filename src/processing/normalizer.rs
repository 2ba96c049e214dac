// Character-level repair of OCR misreads before identifier matching

use std::collections::HashMap;
use lazy_static::lazy_static;

lazy_static! {
    /// Single-character substitutions applied to every OCR token.
    ///
    /// Every target (`0`, `1`, `S`) maps to itself, so normalization is idempotent.
    pub static ref OCR_CORRECTIONS: HashMap<char, char> = {
        let mut m = HashMap::new();
        // Letter/digit confusions in the digit run
        m.insert('O', '0');
        m.insert('o', '0');
        m.insert('I', '1');
        m.insert('l', '1');
        // Glyphs read in place of the S prefix
        m.insert('$', 'S');
        m.insert('§', 'S');
        // Valid prefix letters stay as they are
        for c in ['S', 'T', 'F', 'G', 'M'] {
            m.insert(c, c);
        }
        m
    };
}

/// Returns `text` with each character passed through [`OCR_CORRECTIONS`].
/// Characters outside the table are kept; the result has the same number of chars.
pub fn normalize_ocr_text(text: &str) -> String {
    text.chars()
        .map(|c| *OCR_CORRECTIONS.get(&c).unwrap_or(&c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_digit_confusions() {
        assert_eq!(normalize_ocr_text("SI234567A"), "S1234567A");
        assert_eq!(normalize_ocr_text("S12345O7D"), "S1234507D");
        assert_eq!(normalize_ocr_text("Tl23456oZ"), "T1234560Z");
    }

    #[test]
    fn test_currency_glyphs_become_s() {
        assert_eq!(normalize_ocr_text("$1234567A"), "S1234567A");
        assert_eq!(normalize_ocr_text("§1234567A"), "S1234567A");
    }

    #[test]
    fn test_unknown_characters_pass_through() {
        assert_eq!(normalize_ocr_text("Invoice#12345"), "1nv0ice#12345");
        assert_eq!(normalize_ocr_text(""), "");
        assert_eq!(normalize_ocr_text("xyz-789"), "xyz-789");
    }

    #[test]
    fn test_preserves_char_count() {
        let raw = "§$OoIl STFGM é漢";
        assert_eq!(normalize_ocr_text(raw).chars().count(), raw.chars().count());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let table_keys: String = OCR_CORRECTIONS.keys().collect();
        let samples = [
            "",
            "S1234567D",
            "$1234567A",
            "SI234567A",
            "Invoice#12345",
            "=: -§OolI",
            "ОO0 (cyrillic O first)",
            table_keys.as_str(),
        ];
        for sample in samples {
            let once = normalize_ocr_text(sample);
            assert_eq!(normalize_ocr_text(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_every_target_is_a_fixed_point() {
        for target in OCR_CORRECTIONS.values() {
            let s = target.to_string();
            assert_eq!(normalize_ocr_text(&s), s);
        }
    }
}
