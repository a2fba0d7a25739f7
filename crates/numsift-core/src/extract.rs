use crate::domain::mobile::is_valid_mobile;
use crate::domain::MobileNumber;
use crate::landline::{scrub_landlines, StdCodes};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// A candidate chunk: optional leading `+`/`(`/`)`, then at least ten
/// characters drawn from digits, whitespace, hyphens, and parentheses.
static CHUNK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+()]?[\d\s\-()]{10,}").unwrap());

/// Pulls valid Indian mobile numbers out of free-form text.
///
/// The pipeline blanks out landlines once, then scans the text two ways:
/// split on `/` and `,` (treating the separators as entity boundaries),
/// and again with commas joined into spaces (recovering numbers broken at
/// a thousands-style comma). `/` is never joined across: in this corpus a
/// slash always separates unrelated entities, and joining over it glues
/// short fragments into spurious 10-digit runs.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    std_codes: StdCodes,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_std_codes(std_codes: StdCodes) -> Self {
        Self { std_codes }
    }

    /// Extract every valid mobile number from one cell of text, sorted
    /// ascending and deduplicated. Empty or whitespace-only input yields
    /// an empty vec; there is no failure path.
    pub fn extract(&self, text: &str) -> Vec<MobileNumber> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let cleaned = scrub_landlines(text, &self.std_codes);
        let mut found = BTreeSet::new();

        // Slash and comma as boundaries: each part stands on its own.
        for part in cleaned.split(['/', ',']) {
            let part = part.trim();
            if !part.is_empty() {
                scan_chunks(part, &mut found);
            }
        }

        // Comma-only join: a comma may split one number in two. A slash
        // never does, so it stays put.
        let joined = cleaned.replace(',', " ");
        scan_chunks(&joined, &mut found);

        found.into_iter().collect()
    }
}

/// Extract with the builtin STD-code table.
pub fn extract(text: &str) -> Vec<MobileNumber> {
    Extractor::new().extract(text)
}

/// Run the chunk pipeline over one fragment: match candidate chunks, strip
/// non-digits, gate on 10-12 digits, resolve the `91`/trunk-`0` prefix,
/// and keep what validates as a mobile number.
fn scan_chunks(fragment: &str, found: &mut BTreeSet<MobileNumber>) {
    for chunk in CHUNK_RE.find_iter(fragment) {
        let digits: String = chunk
            .as_str()
            .chars()
            .filter(|ch| ch.is_ascii_digit())
            .collect();

        if digits.len() < 10 || digits.len() > 12 {
            continue;
        }

        let resolved = resolve_prefix(digits);
        if is_valid_mobile(&resolved) {
            found.insert(MobileNumber::from_digits(resolved));
        }
    }
}

/// The "91 exception": `91` is stripped only when it is unambiguously the
/// country code (12 digits total). At 10 or 11 digits the `91` belongs to
/// the subscriber number. A leading trunk `0` is dropped otherwise.
fn resolve_prefix(digits: String) -> String {
    if digits.starts_with("91") {
        if digits.len() == 12 {
            return digits[2..].to_string();
        }
        digits
    } else if let Some(rest) = digits.strip_prefix('0') {
        rest.to_string()
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::{extract, resolve_prefix, Extractor};
    use crate::landline::StdCodes;

    fn extracted(text: &str) -> Vec<String> {
        extract(text)
            .into_iter()
            .map(|number| number.as_str().to_string())
            .collect()
    }

    #[test]
    fn prefix_resolution_rules() {
        assert_eq!(resolve_prefix("919891286374".into()), "9891286374");
        assert_eq!(resolve_prefix("91123456789".into()), "91123456789");
        assert_eq!(resolve_prefix("9112345678".into()), "9112345678");
        assert_eq!(resolve_prefix("09876543210".into()), "9876543210");
        assert_eq!(resolve_prefix("9876543210".into()), "9876543210");
    }

    #[test]
    fn empty_and_whitespace_yield_nothing() {
        assert!(extract("").is_empty());
        assert!(extract("   ").is_empty());
    }

    #[test]
    fn plain_ten_digit_mobile() {
        assert_eq!(extracted("9876543210"), ["9876543210"]);
    }

    #[test]
    fn formatted_mobile_is_cleaned() {
        assert_eq!(extracted("+91 98765 43210"), ["9876543210"]);
        assert_eq!(extracted("(91) 98765-43210"), ["9876543210"]);
    }

    #[test]
    fn slash_separates_two_numbers() {
        assert_eq!(extracted("9867550819/9867550818"), ["9867550818", "9867550819"]);
    }

    #[test]
    fn short_fragments_never_join_across_slash() {
        assert!(extracted("83857 / 82593").is_empty());
    }

    #[test]
    fn comma_join_recovers_split_number() {
        assert_eq!(extracted("9891, 286374"), ["9891286374"]);
    }

    #[test]
    fn country_code_stripped_at_twelve_digits() {
        assert_eq!(extracted("919891286374"), ["9891286374"]);
    }

    #[test]
    fn ten_digit_number_starting_91_is_kept() {
        assert_eq!(extracted("9112345678"), ["9112345678"]);
    }

    #[test]
    fn eleven_digit_91_number_is_rejected() {
        assert!(extracted("91123456789").is_empty());
    }

    #[test]
    fn leading_trunk_zero_is_dropped() {
        assert_eq!(extracted("09876543210"), ["9876543210"]);
    }

    #[test]
    fn landline_is_scrubbed_before_extraction() {
        assert_eq!(
            extracted("Office: 079-12345678, Mobile: 9876543210"),
            ["9876543210"]
        );
    }

    #[test]
    fn landline_digits_do_not_leak_into_results() {
        // Without the scrub, 079-12345678 cleans to 11 digits, loses the
        // trunk zero, and masquerades as mobile 7912345678.
        assert!(extracted("079-12345678").is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(extracted("9876543210, 9876543210"), ["9876543210"]);
    }

    #[test]
    fn output_is_sorted_ascending() {
        assert_eq!(
            extracted("9912345678 / 6712345678 / 8812345678"),
            ["6712345678", "8812345678", "9912345678"]
        );
    }

    #[test]
    fn rejects_landline_prefix_digits_and_extensions() {
        assert!(extracted("ext. 4521").is_empty());
        assert!(extracted("1234567890").is_empty());
    }

    #[test]
    fn extract_is_idempotent() {
        let text = "9867550819/9867550818, Office: 079-12345678";
        assert_eq!(extracted(text), extracted(text));
    }

    #[test]
    fn custom_std_codes_change_scrubbing() {
        let only_delhi = Extractor::with_std_codes(
            StdCodes::from_codes(["11"]).expect("valid codes"),
        );
        // 79 is no longer a known STD code, so the scrub leaves the span
        // and the trunk-zero rule turns it into a 10-digit candidate.
        assert_eq!(
            only_delhi
                .extract("079-12345678")
                .into_iter()
                .map(|number| number.as_str().to_string())
                .collect::<Vec<_>>(),
            ["7912345678"]
        );
    }
}
