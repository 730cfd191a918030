//! Phone number type.
//!
//! Phones are stored as bare digits: country code, area code, then the
//! subscriber number (e.g. `5511987654321`). The client renders a mask per
//! country; the server only ever sees and stores the digits.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contains no digits.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is neither a digit nor formatting.
    #[error("phone number may only contain digits")]
    InvalidCharacter(char),
    /// Too few digits to hold a country code and subscriber number.
    #[error("phone number is incomplete (at least {min} digits required)")]
    TooShort {
        /// Minimum digit count.
        min: usize,
    },
    /// More digits than E.164 allows.
    #[error("phone number must be at most {max} digits")]
    TooLong {
        /// Maximum digit count.
        max: usize,
    },
}

/// A phone number normalized to digits only.
///
/// Common formatting characters (`+`, spaces, `-`, `(`, `)`, `.`) are
/// stripped on parse. Anything else is rejected.
///
/// ```
/// use nexus_core::Phone;
///
/// let phone = Phone::parse("+55 (11) 9 8765-4321").unwrap();
/// assert_eq!(phone.as_str(), "5511987654321");
///
/// assert!(Phone::parse("12345").is_err());
/// assert!(Phone::parse("55-11-abc").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum digit count (country code + area code + 8 digits, shortest plans).
    pub const MIN_DIGITS: usize = 10;
    /// Maximum digit count (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input contains characters other than digits and
    /// formatting, or if the digit count is outside `MIN_DIGITS..=MAX_DIGITS`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let mut digits = String::with_capacity(s.len());

        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '+' | '-' | '(' | ')' | '.' => {}
                c if c.is_whitespace() => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        if digits.len() < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }

        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_digits() {
        let phone = Phone::parse("5511987654321").unwrap();
        assert_eq!(phone.as_str(), "5511987654321");
    }

    #[test]
    fn test_parse_strips_formatting() {
        assert_eq!(
            Phone::parse("+1 (415) 555-0100").unwrap().as_str(),
            "14155550100"
        );
        assert_eq!(
            Phone::parse("351 912.345.678").unwrap().as_str(),
            "351912345678"
        );
    }

    #[test]
    fn test_parse_rejects_letters() {
        assert_eq!(
            Phone::parse("55119876x4321"),
            Err(PhoneError::InvalidCharacter('x'))
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("+ ()"), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_length_bounds() {
        assert!(matches!(
            Phone::parse("123456789"),
            Err(PhoneError::TooShort { min: 10 })
        ));
        assert!(Phone::parse("1234567890").is_ok());
        assert!(Phone::parse("123456789012345").is_ok());
        assert!(matches!(
            Phone::parse("1234567890123456"),
            Err(PhoneError::TooLong { max: 15 })
        ));
    }
}
