use crate::error::CoreError;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Trunk `0`, then the STD code, an optional closing paren, at least one
/// separator, then the local number. Candidates are filtered afterwards:
/// only a known STD code whose length plus the local length is exactly 10
/// counts as a landline.
static LANDLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?\s*0\s*([0-9]+)\s*\)?[\s\-.,/]+([0-9]+)").unwrap());

/// Indian STD area codes, stored without the trunk `0`. Not exhaustive
/// (the fixed network has thousands of codes) but covers the metros and
/// district headquarters that show up in contact dumps. Overridable via
/// `StdCodes::from_codes`.
const DEFAULT_STD_CODES: &[&str] = &[
    // metros
    "11", "20", "22", "33", "40", "44", "79", "80",
    // north
    "120", "121", "124", "129", "131", "132", "135", "141", "144", "145", "151", "161", "164",
    "171", "172", "175", "177", "180", "181", "183", "184", "191", "194", "291", "294", "512",
    "522", "532", "542", "551", "562", "581", "591", "1332", "1334", "1482", "1892",
    // west
    "231", "233", "240", "241", "253", "257", "260", "261", "265", "278", "281", "288", "712",
    "721", "724", "2692",
    // east
    "326", "341", "342", "343", "353", "354", "361", "364", "381", "385", "612", "621", "631",
    "641", "651", "657", "661", "671", "674", "680",
    // central
    "731", "734", "744", "751", "755", "761", "771", "788",
    // south
    "413", "416", "421", "422", "427", "431", "452", "461", "462", "471", "474", "477", "481",
    "484", "487", "491", "495", "497", "816", "820", "821", "824", "831", "836", "861", "863",
    "866", "870", "877", "883", "884", "891", "4362", "8192",
];

/// The set of STD codes the landline scrubber recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdCodes(BTreeSet<String>);

impl Default for StdCodes {
    fn default() -> Self {
        Self(
            DEFAULT_STD_CODES
                .iter()
                .map(|code| (*code).to_string())
                .collect(),
        )
    }
}

impl StdCodes {
    pub fn from_codes<I>(codes: I) -> Result<Self, CoreError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for code in codes {
            set.insert(validate_std_code(code.as_ref())?);
        }
        Ok(Self(set))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalize and validate one STD code: a leading trunk `0` is stripped,
/// the rest must be 2-4 ASCII digits.
pub fn validate_std_code(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    let code = trimmed.strip_prefix('0').unwrap_or(trimmed);
    if (2..=4).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(code.to_string())
    } else {
        Err(CoreError::InvalidStdCode(raw.to_string()))
    }
}

/// Blank out every valid landline (STD + local, exactly 10 digits combined)
/// so landline digits cannot be misread as mobile fragments. Matched spans
/// are replaced with an equal run of spaces, keeping the offsets of the
/// remaining text stable. Near-misses stay untouched: a wrong digit count
/// means the span is not a landline and may still hold mobile digits.
pub fn scrub_landlines<'a>(text: &'a str, codes: &StdCodes) -> Cow<'a, str> {
    let mut scrubbed: Option<String> = None;
    for caps in LANDLINE_RE.captures_iter(text) {
        let (Some(span), Some(std_code), Some(local)) =
            (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if !codes.contains(std_code.as_str()) {
            continue;
        }
        if std_code.len() + local.len() != 10 {
            continue;
        }
        let out = scrubbed.get_or_insert_with(|| text.to_string());
        out.replace_range(span.range(), &" ".repeat(span.len()));
    }
    match scrubbed {
        Some(out) => Cow::Owned(out),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::{scrub_landlines, validate_std_code, StdCodes};

    #[test]
    fn scrub_blanks_dashed_landline() {
        let codes = StdCodes::default();
        let scrubbed = scrub_landlines("Office: 079-12345678, Mobile: 9876543210", &codes);
        assert!(!scrubbed.contains("12345678"));
        assert!(scrubbed.contains("9876543210"));
    }

    #[test]
    fn scrub_preserves_text_length() {
        let codes = StdCodes::default();
        let text = "call 011 23456789 today";
        let scrubbed = scrub_landlines(text, &codes);
        assert_eq!(scrubbed.len(), text.len());
        assert!(!scrubbed.contains("23456789"));
        assert!(scrubbed.contains("call"));
        assert!(scrubbed.contains("today"));
    }

    #[test]
    fn scrub_handles_parenthesized_std() {
        let codes = StdCodes::default();
        let scrubbed = scrub_landlines("(0522) 2345678", &codes);
        assert_eq!(scrubbed.trim(), "");
    }

    #[test]
    fn scrub_leaves_wrong_digit_count_alone() {
        // 79 + 6 digits is 8 total, not a landline; removal could eat
        // digits that belong to something else.
        let codes = StdCodes::default();
        let text = "079-123456";
        assert_eq!(scrub_landlines(text, &codes), text);
    }

    #[test]
    fn scrub_leaves_unknown_std_alone() {
        let codes = StdCodes::default();
        let text = "0999-1234567";
        assert_eq!(scrub_landlines(text, &codes), text);
    }

    #[test]
    fn scrub_leaves_mobiles_alone() {
        let codes = StdCodes::default();
        let text = "9867550819/9867550818";
        assert_eq!(scrub_landlines(text, &codes), text);
    }

    #[test]
    fn validate_std_code_strips_trunk_zero() {
        assert_eq!(validate_std_code("079").expect("valid"), "79");
        assert_eq!(validate_std_code("79").expect("valid"), "79");
        assert_eq!(validate_std_code(" 4362 ").expect("valid"), "4362");
    }

    #[test]
    fn validate_std_code_rejects_bad_input() {
        assert!(validate_std_code("9").is_err());
        assert!(validate_std_code("12345").is_err());
        assert!(validate_std_code("7a").is_err());
        assert!(validate_std_code("").is_err());
    }

    #[test]
    fn from_codes_validates_each_entry() {
        let codes = StdCodes::from_codes(["011", "522"]).expect("valid codes");
        assert!(codes.contains("11"));
        assert!(codes.contains("522"));
        assert_eq!(codes.len(), 2);
        assert!(StdCodes::from_codes(["11", "bogus"]).is_err());
    }
}
