//! Field Extraction
//!
//! Pulls the structured fields out of raw OCR text: the 13-digit CNP
//! (personal numeric code) and the document series (two-letter county
//! code followed by six digits). First match wins for both fields.

use regex::Regex;
use std::sync::OnceLock;

/// County codes accepted in a document series prefix.
pub const VALID_COUNTY_CODES: &[&str] = &[
    "DP", "DR", "DT", "RD", "RR", "RT", "RX", "RK", "AX", "TR", "AR", "ZR",
    "XC", "ZC", "MM", "XM", "XB", "XT", "ZT", "BV", "ZV", "XR", "TF", "XZ",
    "ZB", "KL", "KC", "CJ", "KT", "KZ", "DX", "DZ", "HD", "MH", "VN", "GL",
    "ZL", "GG", "MX", "MZ", "IZ", "HR", "XH", "ZH", "NT", "NZ", "AS", "AZ",
    "PH", "PX", "PK", "KS", "VX", "SM", "KV", "SB", "SR", "OT", "SL", "SZ",
    "SV", "XV", "TM", "TZ", "DD", "GZ", "MS", "ZS", "TC", "VS", "SX",
];

/// Fields extracted from one document scan. Either field may be absent
/// when the OCR text contains no match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    /// 13-digit personal numeric code
    pub cnp: Option<String>,
    /// Series: county code + 6 digits
    pub series: Option<String>,
}

impl ExtractedFields {
    /// Extract both fields from OCR text in one pass.
    pub fn from_text(text: &str) -> Self {
        Self {
            cnp: extract_cnp(text),
            series: extract_series(text),
        }
    }

    /// Whether the scan produced everything the upload needs.
    pub fn is_complete(&self) -> bool {
        self.cnp.is_some() && self.series.is_some()
    }
}

fn cnp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bCNP[\s:]*(\d{13})\b").expect("CNP pattern is valid"))
}

fn series_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let codes = VALID_COUNTY_CODES.join("|");
        let pattern = format!(r"\b({codes})[^\d]*?(\d{{6}})\b");
        Regex::new(&pattern).expect("series pattern is valid")
    })
}

/// Extract the 13-digit CNP following a "CNP" label.
pub fn extract_cnp(text: &str) -> Option<String> {
    cnp_regex().captures(text).map(|c| c[1].to_string())
}

/// Extract the document series: a valid county code followed (possibly
/// after OCR noise, but no digits) by exactly six digits.
pub fn extract_series(text: &str) -> Option<String> {
    series_regex()
        .captures(text)
        .map(|c| format!("{}{}", &c[1], &c[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_cnp_labeled() {
        let text = "ROMANIA CNP 1234567890123 SPECIMEN";
        assert_eq!(extract_cnp(text), Some("1234567890123".to_string()));
    }

    #[test]
    fn test_extract_cnp_with_colon_and_spaces() {
        assert_eq!(
            extract_cnp("CNP: 5021231234567"),
            Some("5021231234567".to_string())
        );
        assert_eq!(
            extract_cnp("CNP:5021231234567"),
            Some("5021231234567".to_string())
        );
    }

    #[test]
    fn test_extract_cnp_requires_label() {
        // A bare 13-digit run without the CNP label must not match
        assert_eq!(extract_cnp("SERIA 1234567890123"), None);
    }

    #[test]
    fn test_extract_cnp_wrong_length() {
        assert_eq!(extract_cnp("CNP 123456789012"), None);
        assert_eq!(extract_cnp("CNP 12345678901234"), None);
    }

    #[test]
    fn test_extract_series_basic() {
        let text = "SERIA XB NR 123456";
        assert_eq!(extract_series(text), Some("XB123456".to_string()));
    }

    #[test]
    fn test_extract_series_invalid_county_code() {
        // "QQ" is not in the county list
        assert_eq!(extract_series("SERIA QQ NR 123456"), None);
    }

    #[test]
    fn test_extract_series_first_match_wins() {
        let text = "XB 111111 then KL 222222";
        assert_eq!(extract_series(text), Some("XB111111".to_string()));
    }

    #[test]
    fn test_extract_series_tolerates_punctuation_gap() {
        // OCR noise between code and digits is fine as long as it has no digits
        assert_eq!(extract_series("XB NR. 123456"), Some("XB123456".to_string()));
    }

    #[test]
    fn test_extract_series_wrong_digit_count() {
        assert_eq!(extract_series("XB 12345"), None);
    }

    #[test]
    fn test_fields_from_text() {
        let text = "CNP 1980101223344 SERIA CJ NR 654321";
        let fields = ExtractedFields::from_text(text);
        assert_eq!(fields.cnp.as_deref(), Some("1980101223344"));
        assert_eq!(fields.series.as_deref(), Some("CJ654321"));
        assert!(fields.is_complete());
    }

    #[test]
    fn test_fields_incomplete() {
        let fields = ExtractedFields::from_text("nothing useful here");
        assert!(fields.cnp.is_none());
        assert!(fields.series.is_none());
        assert!(!fields.is_complete());
    }

    #[test]
    fn test_county_code_list_shape() {
        assert_eq!(VALID_COUNTY_CODES.len(), 70);
        assert!(VALID_COUNTY_CODES.iter().all(|c| c.len() == 2));
    }
}
