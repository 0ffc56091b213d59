//! ISO 639-1 language code validation.
//!
//! Projects and translator registrations carry two-letter ISO 639-1 codes.
//! Validation is a lookup against the full registered set; no normalization
//! is performed, codes must already be lowercase.

/// Every registered two-letter ISO 639-1 code, sorted for binary search.
const ISO_639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az",
    "ba", "be", "bg", "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce",
    "ch", "co", "cr", "cs", "cu", "cv", "cy", "da", "de", "dv", "dz", "ee",
    "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi", "fj", "fo", "fr",
    "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is",
    "it", "iu", "ja", "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn",
    "ko", "kr", "ks", "ku", "kv", "kw", "ky", "la", "lb", "lg", "li", "ln",
    "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml", "mn", "mr", "ms",
    "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu",
    "rm", "rn", "ro", "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk",
    "sl", "sm", "sn", "so", "sq", "sr", "ss", "st", "su", "sv", "sw", "ta",
    "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr", "ts", "tt", "tw",
    "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zh", "zu",
];

/// Whether `code` is a registered ISO 639-1 language code.
pub fn is_iso_639_1(code: &str) -> bool {
    ISO_639_1.binary_search(&code).is_ok()
}

/// Validate a language code, returning it on success.
pub fn validate_language_code(code: &str) -> Result<&str, String> {
    if is_iso_639_1(code) {
        Ok(code)
    } else {
        Err(format!("'{code}' is not a valid ISO 639-1 language code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_unique() {
        for pair in ISO_639_1.windows(2) {
            assert!(pair[0] < pair[1], "{} must sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_common_codes_accepted() {
        assert!(is_iso_639_1("cs"));
        assert!(is_iso_639_1("fr"));
        assert!(is_iso_639_1("en"));
        assert!(is_iso_639_1("zh"));
    }

    #[test]
    fn test_invalid_codes_rejected() {
        assert!(!is_iso_639_1("xx"));
        assert!(!is_iso_639_1("eng"));
        assert!(!is_iso_639_1(""));
        // Case-sensitive by design; clients send lowercase.
        assert!(!is_iso_639_1("EN"));
    }

    #[test]
    fn test_validate_reports_offending_code() {
        let err = validate_language_code("klingon").unwrap_err();
        assert!(err.contains("klingon"));
    }
}
