use alloc::string::String;
use core::{fmt, str::FromStr};

/// An arbitrary-precision integer.
///
/// Only the decimal text is stored. The crate renders big integers, it never
/// does arithmetic on them.
///
/// # Examples
///
/// ```
/// use errscribe::value::BigInt;
///
/// let big: BigInt = "-000123456789012345678901234567890".parse().unwrap();
/// assert_eq!(big.to_string(), "-123456789012345678901234567890");
/// assert_eq!(BigInt::from(0_u8).to_string(), "0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BigInt {
    negative: bool,
    /// Decimal digits without leading zeros, `"0"` for zero.
    digits: String,
}

/// Error returned when parsing a [`BigInt`] from text that is not a decimal
/// integer.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct ParseBigIntError;

impl fmt::Debug for ParseBigIntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseBigIntError").finish()
    }
}

impl fmt::Display for ParseBigIntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid digit found in big integer literal")
    }
}

impl core::error::Error for ParseBigIntError {}

impl BigInt {
    /// Returns `true` for values below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Returns the decimal digits of the magnitude.
    #[must_use]
    pub fn magnitude_digits(&self) -> &str {
        &self.digits
    }

    fn from_parts(negative: bool, digits: &str) -> Self {
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            Self {
                negative: false,
                digits: String::from("0"),
            }
        } else {
            Self {
                negative,
                digits: String::from(digits),
            }
        }
    }
}

impl FromStr for BigInt {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseBigIntError);
        }
        Ok(Self::from_parts(negative, digits))
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for BigInt {
                fn from(value: $ty) -> Self {
                    let text = alloc::format!("{value}");
                    match text.strip_prefix('-') {
                        Some(digits) => Self::from_parts(true, digits),
                        None => Self::from_parts(false, &text),
                    }
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.digits)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<BigInt>(), Err(ParseBigIntError));
        assert_eq!("-".parse::<BigInt>(), Err(ParseBigIntError));
        assert_eq!("12a".parse::<BigInt>(), Err(ParseBigIntError));
        assert_eq!("1.5".parse::<BigInt>(), Err(ParseBigIntError));
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let zero: BigInt = "-0000".parse().unwrap();
        assert!(!zero.is_negative());
        assert_eq!(zero, BigInt::from(0_i32));
        assert_eq!(zero.to_string(), "0");
    }

    #[test]
    fn test_from_extreme_ints() {
        assert_eq!(
            BigInt::from(i128::MIN).to_string(),
            "-170141183460469231731687303715884105728"
        );
        assert_eq!(BigInt::from(u64::MAX).magnitude_digits(), "18446744073709551615");
    }
}
