use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated Indian mobile number: exactly 10 ASCII digits, first digit
/// 6, 7, 8, or 9. Sorts lexicographically, which for equal-length digit
/// strings is numeric order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MobileNumber(String);

impl MobileNumber {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if is_valid_mobile(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(CoreError::InvalidMobileNumber(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap digits the extraction pipeline has already validated.
    pub(crate) fn from_digits(digits: String) -> Self {
        debug_assert!(is_valid_mobile(&digits));
        Self(digits)
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MobileNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

pub(crate) fn is_valid_mobile(digits: &str) -> bool {
    digits.len() == 10
        && digits.bytes().all(|b| b.is_ascii_digit())
        && matches!(digits.as_bytes()[0], b'6'..=b'9')
}
