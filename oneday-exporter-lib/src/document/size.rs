use core::fmt::{Display, Formatter};
use regex::Regex;
use std::sync::LazyLock;

static DIGITS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new("[0-9]+").expect("invalid regex"));

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Why a size string could not be turned into a byte count
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeParseError {
    /// The string holds no digits at all.
    NoDigits(String),

    /// The two-character suffix is neither a known unit nor part of the number.
    UnknownUnit(String),

    /// The number does not fit in 64 bits once scaled.
    Overflow(String),
}

impl Display for SizeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoDigits(s) => write!(f, "no digits in size '{s}'"),
            Self::UnknownUnit(s) => write!(f, "unknown unit in size '{s}'"),
            Self::Overflow(s) => write!(f, "size '{s}' overflows 64 bits"),
        }
    }
}

impl core::error::Error for SizeParseError {}

/// Convert a human-readable size such as `12gb` into bytes.
///
/// The first run of digits is the magnitude. The last two characters select the unit:
/// `kb`, `mb` and `gb` scale by powers of 1024, and a suffix starting with a digit (or a
/// string shorter than two characters) means the magnitude is already in bytes. Only the
/// first digit run is used, so a fractional size like `1.5gb` reads as `1gb`.
pub fn normalize_size(size: &str) -> Result<u64, SizeParseError> {
    let digits = DIGITS_REGEX
        .find(size)
        .ok_or_else(|| SizeParseError::NoDigits(size.to_owned()))?;

    let magnitude: u64 = digits
        .as_str()
        .parse()
        .map_err(|_overflow: core::num::ParseIntError| SizeParseError::Overflow(size.to_owned()))?;

    magnitude
        .checked_mul(unit_multiplier(size)?)
        .ok_or_else(|| SizeParseError::Overflow(size.to_owned()))
}

fn unit_multiplier(size: &str) -> Result<u64, SizeParseError> {
    let suffix = size
        .char_indices()
        .rev()
        .nth(1)
        .and_then(|(start, _)| size.get(start..))
        .unwrap_or(size);

    match suffix {
        "kb" => Ok(KIB),
        "mb" => Ok(MIB),
        "gb" => Ok(GIB),
        s if s.starts_with(|c: char| c.is_ascii_digit()) => Ok(1),
        _ => Err(SizeParseError::UnknownUnit(size.to_owned())),
    }
}
