//! GS1 Serial Shipping Container Code validation.
//!
//! An SSCC as printed on a logistics label is 20 digits: a two-digit
//! application identifier (normally `00`) followed by 18 digits whose last
//! digit is a GS1 Mod-10 check digit.
//!
//! The check digit is computed over positions 2..=18 (0-indexed), walking
//! from position 18 down to 2 with weights 3, 1, 3, 1, ... The expected
//! digit is `(10 - sum % 10) % 10`.
//!
//! ```
//! use sscc_labels::sscc::{validate, InvalidCodeReason};
//!
//! let code = validate("00123456789012345675").unwrap();
//! assert_eq!(code.formatted(), "(00)123456789012345675");
//!
//! assert_eq!(
//!     validate("0012345").unwrap_err(),
//!     InvalidCodeReason::WrongLength { length: 7 }
//! );
//! ```

use std::fmt;
use std::str::FromStr;

/// Total length of an SSCC including the application identifier.
pub const SSCC_LENGTH: usize = 20;

/// Number of leading application-identifier digits.
pub const AI_LENGTH: usize = 2;

/// Why a candidate string is not a valid SSCC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCodeReason {
    /// Not exactly 20 characters long
    #[error("wrong length: expected 20 characters, found {length}")]
    WrongLength {
        /// Number of characters found
        length: usize,
    },

    /// A character outside `0`-`9`
    #[error("non-digit character {found:?} at position {position}")]
    NonDigitCharacter {
        /// 0-indexed character position
        position: usize,
        /// The offending character
        found: char,
    },

    /// The embedded check digit does not match the computed one
    #[error("check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch {
        /// Check digit computed from positions 2..=18
        expected: u8,
        /// Check digit present at position 19
        found: u8,
    },
}

/// A validated 20-digit SSCC.
///
/// Only obtainable through [`validate`] (or `str::parse`), so every value
/// satisfies the length, digit and check-digit invariants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SsccCode {
    digits: String,
}

impl SsccCode {
    /// The raw 20 digits.
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// The two leading application-identifier digits.
    pub fn application_identifier(&self) -> &str {
        &self.digits[..AI_LENGTH]
    }

    /// The 18 digits following the application identifier.
    pub fn serial(&self) -> &str {
        &self.digits[AI_LENGTH..]
    }

    /// The trailing check digit.
    pub fn check_digit(&self) -> u8 {
        self.digits.as_bytes()[SSCC_LENGTH - 1] - b'0'
    }

    /// Human-readable form: `(AA)` followed by the remaining 18 digits.
    pub fn formatted(&self) -> String {
        format!("({}){}", self.application_identifier(), self.serial())
    }
}

impl fmt::Display for SsccCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

impl FromStr for SsccCode {
    type Err = InvalidCodeReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

impl AsRef<str> for SsccCode {
    fn as_ref(&self) -> &str {
        &self.digits
    }
}

/// Validate a candidate string as an SSCC.
///
/// Checks, in order: length (in characters), that every character is an
/// ASCII digit, and the Mod-10 check digit.
pub fn validate(candidate: &str) -> Result<SsccCode, InvalidCodeReason> {
    let length = candidate.chars().count();
    if length != SSCC_LENGTH {
        return Err(InvalidCodeReason::WrongLength { length });
    }

    if let Some((position, found)) = candidate
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(InvalidCodeReason::NonDigitCharacter { position, found });
    }

    // All 20 characters are ASCII digits from here on.
    let digits = candidate.as_bytes();
    let expected = compute_check_digit(digits);
    let found = digits[SSCC_LENGTH - 1] - b'0';
    if expected != found {
        return Err(InvalidCodeReason::CheckDigitMismatch { expected, found });
    }

    Ok(SsccCode {
        digits: candidate.to_string(),
    })
}

/// Compute the Mod-10 check digit for an SSCC.
///
/// `digits` must hold at least 19 ASCII digits; only positions 2..=18 are
/// read, so both a full 20-digit code and a 19-digit prefix work.
///
/// # Panics
///
/// Panics if `digits` is shorter than 19 bytes.
pub fn compute_check_digit(digits: &[u8]) -> u8 {
    let mut sum: u32 = 0;
    let mut multiplier = 3;
    for &byte in digits[AI_LENGTH..SSCC_LENGTH - 1].iter().rev() {
        sum += u32::from(byte - b'0') * multiplier;
        multiplier = if multiplier == 3 { 1 } else { 3 };
    }
    ((10 - sum % 10) % 10) as u8
}

/// Complete a 19-digit prefix into a valid SSCC by appending its check digit.
pub fn with_check_digit(prefix: &str) -> Result<SsccCode, InvalidCodeReason> {
    let length = prefix.chars().count();
    if length != SSCC_LENGTH - 1 {
        return Err(InvalidCodeReason::WrongLength { length: length + 1 });
    }
    if let Some((position, found)) = prefix.chars().enumerate().find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(InvalidCodeReason::NonDigitCharacter { position, found });
    }
    let check = compute_check_digit(prefix.as_bytes());
    Ok(SsccCode {
        digits: format!("{}{}", prefix, check),
    })
}
