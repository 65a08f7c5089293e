use catalog::CountryCode;

/// Demonstration dataset loaded at startup.
pub const SAMPLE_VALUES: [(CountryCode, u8); 20] = [
    (CountryCode::from_static("USA"), 75),
    (CountryCode::from_static("CHN"), 90),
    (CountryCode::from_static("IND"), 60),
    (CountryCode::from_static("BRA"), 45),
    (CountryCode::from_static("RUS"), 55),
    (CountryCode::from_static("JPN"), 80),
    (CountryCode::from_static("DEU"), 70),
    (CountryCode::from_static("GBR"), 65),
    (CountryCode::from_static("FRA"), 62),
    (CountryCode::from_static("ITA"), 58),
    (CountryCode::from_static("CAN"), 72),
    (CountryCode::from_static("AUS"), 68),
    (CountryCode::from_static("MEX"), 40),
    (CountryCode::from_static("IDN"), 35),
    (CountryCode::from_static("TUR"), 42),
    (CountryCode::from_static("SAU"), 48),
    (CountryCode::from_static("ARG"), 38),
    (CountryCode::from_static("EGY"), 30),
    (CountryCode::from_static("NGA"), 25),
    (CountryCode::from_static("ZAF"), 33),
];
