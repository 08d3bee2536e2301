//! Currency code types.

use std::fmt;

/// Error returned when parsing an invalid currency code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid currency code: {reason}")]
pub struct InvalidCurrency {
    reason: &'static str,
}

/// A valid 3-letter ISO 4217 currency code.
///
/// Currency codes are always 3 uppercase ASCII letters. This type guarantees
/// that any `Currency` value is valid by construction, so conversion requests
/// never carry garbage codes to the exchange-rate service.
///
/// # Examples
///
/// ```
/// use trip_server::domain::Currency;
///
/// let usd = Currency::parse("USD").unwrap();
/// assert_eq!(usd.as_str(), "USD");
///
/// // Lowercase is rejected by the strict parser
/// assert!(Currency::parse("usd").is_err());
///
/// // ...but accepted by the normalizing one
/// assert_eq!(Currency::parse_normalized("usd").unwrap(), usd);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency([u8; 3]);

impl Currency {
    /// Parse a currency code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidCurrency> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidCurrency {
                reason: "must be exactly 3 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidCurrency {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(Currency([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse a currency code, trimming whitespace and uppercasing first.
    ///
    /// User and wire input arrives in mixed case ("usd", " Vnd "); this is
    /// the entry point for those, while `parse` stays strict for data that
    /// is already canonical.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCurrency> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the currency code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only valid ASCII uppercase letters are ever stored
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.as_str())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(Currency::parse("USD").is_ok());
        assert!(Currency::parse("VND").is_ok());
        assert!(Currency::parse("EUR").is_ok());
        assert!(Currency::parse("AAA").is_ok());
        assert!(Currency::parse("ZZZ").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(Currency::parse("usd").is_err());
        assert!(Currency::parse("Usd").is_err());
        assert!(Currency::parse("USd").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(Currency::parse("").is_err());
        assert!(Currency::parse("U").is_err());
        assert!(Currency::parse("US").is_err());
        assert!(Currency::parse("USDD").is_err());
        assert!(Currency::parse("DOLLAR").is_err());
    }

    #[test]
    fn reject_non_letters() {
        assert!(Currency::parse("U5D").is_err());
        assert!(Currency::parse("U-D").is_err());
        assert!(Currency::parse("U D").is_err());
        assert!(Currency::parse("UÖD").is_err());
    }

    #[test]
    fn normalized_accepts_mixed_case_and_whitespace() {
        let usd = Currency::parse("USD").unwrap();
        assert_eq!(Currency::parse_normalized("usd").unwrap(), usd);
        assert_eq!(Currency::parse_normalized("  Usd ").unwrap(), usd);
        assert!(Currency::parse_normalized("dollars").is_err());
    }

    #[test]
    fn as_str_roundtrip() {
        let vnd = Currency::parse("VND").unwrap();
        assert_eq!(vnd.as_str(), "VND");
    }

    #[test]
    fn display_and_debug() {
        let eur = Currency::parse("EUR").unwrap();
        assert_eq!(format!("{}", eur), "EUR");
        assert_eq!(format!("{:?}", eur), "Currency(EUR)");
    }

    #[test]
    fn equality_and_hash() {
        use std::collections::HashSet;

        let a = Currency::parse("USD").unwrap();
        let b = Currency::parse("USD").unwrap();
        let c = Currency::parse("VND").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }
}
