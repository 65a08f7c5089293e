use std::collections::BTreeMap;

use crate::code::CountryCode;

/// ISO 3166-1 numeric id -> alpha-3 for the countries tracked by default.
pub const BUILTIN_CODES: [(&str, CountryCode); 20] = [
    ("840", CountryCode::from_static("USA")),
    ("156", CountryCode::from_static("CHN")),
    ("356", CountryCode::from_static("IND")),
    ("076", CountryCode::from_static("BRA")),
    ("643", CountryCode::from_static("RUS")),
    ("392", CountryCode::from_static("JPN")),
    ("276", CountryCode::from_static("DEU")),
    ("826", CountryCode::from_static("GBR")),
    ("250", CountryCode::from_static("FRA")),
    ("380", CountryCode::from_static("ITA")),
    ("124", CountryCode::from_static("CAN")),
    ("036", CountryCode::from_static("AUS")),
    ("484", CountryCode::from_static("MEX")),
    ("360", CountryCode::from_static("IDN")),
    ("792", CountryCode::from_static("TUR")),
    ("682", CountryCode::from_static("SAU")),
    ("032", CountryCode::from_static("ARG")),
    ("818", CountryCode::from_static("EGY")),
    ("566", CountryCode::from_static("NGA")),
    ("710", CountryCode::from_static("ZAF")),
];

/// Closed mapping from source feature ids to country codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCodeResolver {
    table: BTreeMap<String, CountryCode>,
}

impl CountryCodeResolver {
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_CODES.iter().map(|(id, code)| (*id, *code)))
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, CountryCode)>) -> Self {
        let table = pairs
            .into_iter()
            .map(|(id, code)| (normalize_id(id), code))
            .collect();
        Self { table }
    }

    /// `None` is the expected answer for most features of a world dataset.
    pub fn resolve(&self, id: &str) -> Option<CountryCode> {
        self.table.get(&normalize_id(id)).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, CountryCode)> {
        self.table.iter().map(|(id, code)| (id.as_str(), *code))
    }

    pub fn codes(&self) -> Vec<CountryCode> {
        let mut codes: Vec<CountryCode> = self.table.values().copied().collect();
        codes.sort();
        codes.dedup();
        codes
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for CountryCodeResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Numeric ids are zero-padded to three digits so `36`, `036` and `"036"`
/// resolve alike; other ids are used verbatim.
fn normalize_id(id: &str) -> String {
    let id = id.trim();
    if !id.is_empty() && id.len() <= 3 && id.bytes().all(|b| b.is_ascii_digit()) {
        format!("{id:0>3}")
    } else {
        id.to_string()
    }
}
