use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// ISO 3166-1 alpha-3 style country code: exactly three uppercase ASCII letters.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode([u8; 3]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid country code {0:?}: expected three uppercase letters")]
pub struct ParseCountryCodeError(pub String);

impl CountryCode {
    /// Compile-time constructor for table literals. Panics on invalid input,
    /// which is a compile error in const context.
    pub const fn from_static(code: &'static str) -> Self {
        let b = code.as_bytes();
        assert!(b.len() == 3, "country code must have three letters");
        assert!(
            b[0].is_ascii_uppercase() && b[1].is_ascii_uppercase() && b[2].is_ascii_uppercase(),
            "country code must be uppercase ASCII"
        );
        Self([b[0], b[1], b[2]])
    }

    pub fn as_str(&self) -> &str {
        // Only uppercase ASCII bytes are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for CountryCode {
    type Err = ParseCountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() != 3 || !b.iter().all(u8::is_ascii_uppercase) {
            return Err(ParseCountryCodeError(s.to_string()));
        }
        Ok(Self([b[0], b[1], b[2]]))
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ParseCountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::CountryCode;

    #[test]
    fn parses_three_uppercase_letters() {
        let usa: CountryCode = "USA".parse().unwrap();
        assert_eq!(usa, CountryCode::from_static("USA"));
        assert_eq!(usa.to_string(), "USA");
        assert!("usa".parse::<CountryCode>().is_err());
        assert!("US".parse::<CountryCode>().is_err());
        assert!("USAA".parse::<CountryCode>().is_err());
        assert!("U5A".parse::<CountryCode>().is_err());
    }

    #[test]
    fn orders_alphabetically() {
        let mut codes: Vec<CountryCode> = ["ZAF", "ARG", "DEU"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        codes.sort();
        let names: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["ARG", "DEU", "ZAF"]);
    }

    #[test]
    fn serde_uses_plain_strings() {
        let code = CountryCode::from_static("JPN");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"JPN\"");
        assert!(serde_json::from_str::<CountryCode>("\"jp\"").is_err());
    }
}
