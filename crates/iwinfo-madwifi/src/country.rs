//! Regulatory domain table.
//!
//! The driver reports its regulatory domain as a numeric code in
//! `<proc>/sys/dev/<radio>/countrycode`. [`COUNTRY_CODES`] maps those codes to
//! two-character identifiers. The mapping is many-to-one (France and South
//! Korea have two codes, Japan dozens, the UK appears under both `GB` and
//! `UK`) and the table is ordered by identifier, so lookups take the first
//! match and the country list collapses runs of one identifier.

use std::fs;

use iwinfo_core::{CountryCode, CountryEntry, Error, InterfaceName, Result};
use tracing::debug;

use crate::classify::{DeviceClassifier, DeviceKind};

const fn entry(iso: [u8; 2], regulatory_code: u16) -> CountryEntry {
    CountryEntry {
        iso: CountryCode::from_bytes(iso),
        regulatory_code,
    }
}

/// Regulatory codes known to madwifi, ordered by identifier.
pub static COUNTRY_CODES: &[CountryEntry] = &[
    entry(*b"00", 0), // World
    entry(*b"AE", 784), // U.A.E.
    entry(*b"AL", 8), // Albania
    entry(*b"AM", 51), // Armenia
    entry(*b"AR", 32), // Argentina
    entry(*b"AT", 40), // Austria
    entry(*b"AU", 36), // Australia
    entry(*b"AZ", 31), // Azerbaijan
    entry(*b"BE", 56), // Belgium
    entry(*b"BG", 100), // Bulgaria
    entry(*b"BH", 48), // Bahrain
    entry(*b"BN", 96), // Brunei Darussalam
    entry(*b"BO", 68), // Bolivia
    entry(*b"BR", 76), // Brazil
    entry(*b"BY", 112), // Belarus
    entry(*b"BZ", 84), // Belize
    entry(*b"CA", 124), // Canada
    entry(*b"CH", 756), // Switzerland
    entry(*b"CL", 152), // Chile
    entry(*b"CN", 156), // People's Republic of China
    entry(*b"CO", 170), // Colombia
    entry(*b"CR", 188), // Costa Rica
    entry(*b"CY", 196), // Cyprus
    entry(*b"CZ", 203), // Czech Republic
    entry(*b"DE", 276), // Germany
    entry(*b"DK", 208), // Denmark
    entry(*b"DO", 214), // Dominican Republic
    entry(*b"DZ", 12), // Algeria
    entry(*b"EC", 218), // Ecuador
    entry(*b"EE", 233), // Estonia
    entry(*b"EG", 818), // Egypt
    entry(*b"ES", 724), // Spain
    entry(*b"FI", 246), // Finland
    entry(*b"FO", 234), // Faeroe Islands
    entry(*b"FR", 250), // France
    entry(*b"FR", 255), // France2
    entry(*b"GB", 826), // United Kingdom
    entry(*b"GE", 268), // Georgia
    entry(*b"GR", 300), // Greece
    entry(*b"GT", 320), // Guatemala
    entry(*b"HK", 344), // Hong Kong S.A.R., P.R.C.
    entry(*b"HN", 340), // Honduras
    entry(*b"HR", 191), // Croatia
    entry(*b"HU", 348), // Hungary
    entry(*b"ID", 360), // Indonesia
    entry(*b"IE", 372), // Ireland
    entry(*b"IL", 376), // Israel
    entry(*b"IN", 356), // India
    entry(*b"IQ", 368), // Iraq
    entry(*b"IR", 364), // Iran
    entry(*b"IS", 352), // Iceland
    entry(*b"IT", 380), // Italy
    entry(*b"JM", 388), // Jamaica
    entry(*b"JO", 400), // Jordan
    entry(*b"JP", 392), // Japan
    entry(*b"JP", 393), // Japan (JP1)
    entry(*b"JP", 394), // Japan (JP0)
    entry(*b"JP", 395), // Japan (JP1-1)
    entry(*b"JP", 396), // Japan (JE1)
    entry(*b"JP", 397), // Japan (JE2)
    entry(*b"JP", 399), // Japan (JP6)
    entry(*b"JP", 900), // Japan
    entry(*b"JP", 901), // Japan
    entry(*b"JP", 902), // Japan
    entry(*b"JP", 903), // Japan
    entry(*b"JP", 904), // Japan
    entry(*b"JP", 905), // Japan
    entry(*b"JP", 906), // Japan
    entry(*b"JP", 907), // Japan
    entry(*b"JP", 908), // Japan
    entry(*b"JP", 909), // Japan
    entry(*b"JP", 910), // Japan
    entry(*b"JP", 911), // Japan
    entry(*b"JP", 912), // Japan
    entry(*b"JP", 913), // Japan
    entry(*b"JP", 914), // Japan
    entry(*b"JP", 915), // Japan
    entry(*b"JP", 916), // Japan
    entry(*b"JP", 917), // Japan
    entry(*b"JP", 918), // Japan
    entry(*b"JP", 919), // Japan
    entry(*b"JP", 920), // Japan
    entry(*b"JP", 921), // Japan
    entry(*b"JP", 922), // Japan
    entry(*b"JP", 923), // Japan
    entry(*b"JP", 924), // Japan
    entry(*b"JP", 925), // Japan
    entry(*b"JP", 926), // Japan
    entry(*b"JP", 927), // Japan
    entry(*b"JP", 928), // Japan
    entry(*b"JP", 929), // Japan
    entry(*b"JP", 930), // Japan
    entry(*b"JP", 931), // Japan
    entry(*b"JP", 932), // Japan
    entry(*b"JP", 933), // Japan
    entry(*b"JP", 934), // Japan
    entry(*b"JP", 935), // Japan
    entry(*b"JP", 936), // Japan
    entry(*b"JP", 937), // Japan
    entry(*b"JP", 938), // Japan
    entry(*b"JP", 939), // Japan
    entry(*b"JP", 940), // Japan
    entry(*b"JP", 941), // Japan
    entry(*b"KE", 404), // Kenya
    entry(*b"KP", 408), // North Korea
    entry(*b"KR", 410), // South Korea
    entry(*b"KR", 411), // South Korea
    entry(*b"KW", 414), // Kuwait
    entry(*b"KZ", 398), // Kazakhstan
    entry(*b"LB", 422), // Lebanon
    entry(*b"LI", 438), // Liechtenstein
    entry(*b"LT", 440), // Lithuania
    entry(*b"LU", 442), // Luxembourg
    entry(*b"LV", 428), // Latvia
    entry(*b"LY", 434), // Libya
    entry(*b"MA", 504), // Morocco
    entry(*b"MC", 492), // Principality of Monaco
    entry(*b"MK", 807), // the Former Yugoslav Republic of Macedonia
    entry(*b"MO", 446), // Macau
    entry(*b"MX", 484), // Mexico
    entry(*b"MY", 458), // Malaysia
    entry(*b"NI", 558), // Nicaragua
    entry(*b"NL", 528), // Netherlands
    entry(*b"NO", 578), // Norway
    entry(*b"NZ", 554), // New Zealand
    entry(*b"OM", 512), // Oman
    entry(*b"PA", 591), // Panama
    entry(*b"PE", 604), // Peru
    entry(*b"PH", 608), // Republic of the Philippines
    entry(*b"PK", 586), // Islamic Republic of Pakistan
    entry(*b"PL", 616), // Poland
    entry(*b"PR", 630), // Puerto Rico
    entry(*b"PT", 620), // Portugal
    entry(*b"PY", 600), // Paraguay
    entry(*b"QA", 634), // Qatar
    entry(*b"RO", 642), // Romania
    entry(*b"RU", 643), // Russia
    entry(*b"SA", 682), // Saudi Arabia
    entry(*b"SE", 752), // Sweden
    entry(*b"SG", 702), // Singapore
    entry(*b"SI", 705), // Slovenia
    entry(*b"SK", 703), // Slovak Republic
    entry(*b"SV", 222), // El Salvador
    entry(*b"SY", 760), // Syria
    entry(*b"TH", 764), // Thailand
    entry(*b"TN", 788), // Tunisia
    entry(*b"TR", 792), // Turkey
    entry(*b"TT", 780), // Trinidad y Tobago
    entry(*b"TW", 158), // Taiwan
    entry(*b"UA", 804), // Ukraine
    entry(*b"UK", 826), // United Kingdom
    entry(*b"US", 840), // United States
    entry(*b"US", 842), // United States (Public Safety)
    entry(*b"UY", 858), // Uruguay
    entry(*b"UZ", 860), // Uzbekistan
    entry(*b"VE", 862), // Venezuela
    entry(*b"VN", 704), // Viet Nam
    entry(*b"YE", 887), // Yemen
    entry(*b"ZA", 710), // South Africa
    entry(*b"ZW", 716), // Zimbabwe
];

/// First entry of `table` carrying `code`.
pub fn lookup_in(table: &[CountryEntry], code: u32) -> Result<CountryCode> {
    table
        .iter()
        .find(|e| e.regulatory_code as u32 == code)
        .map(|e| e.iso)
        .ok_or_else(|| Error::NotFound(format!("no country for regulatory code {code}")))
}

/// Identifier for a driver regulatory code.
pub fn lookup_by_regulatory_code(code: u32) -> Result<CountryCode> {
    lookup_in(COUNTRY_CODES, code)
}

/// One entry per run of identical identifiers, keeping the run's first code.
pub fn dedup_by_iso(table: &[CountryEntry]) -> Vec<CountryEntry> {
    let mut list: Vec<CountryEntry> = Vec::new();
    for e in table {
        if list.last().is_none_or(|prev| prev.iso != e.iso) {
            list.push(*e);
        }
    }
    list
}

/// The country list reported to the consumer.
pub fn country_list() -> Vec<CountryEntry> {
    dedup_by_iso(COUNTRY_CODES)
}

/// The radio whose regulatory domain applies to `name`.
pub fn resolve_backing_radio(
    classifier: &DeviceClassifier,
    name: &InterfaceName,
) -> Result<InterfaceName> {
    match classifier.classify(name)? {
        DeviceKind::Radio => Ok(name.clone()),
        DeviceKind::Virtual { parent } => Ok(parent),
    }
}

/// Parse the decimal text of a `countrycode` node.
///
/// Leading whitespace is skipped and parsing stops at the first non-digit.
pub fn parse_regulatory_code(text: &str) -> Result<u32> {
    let text = text.trim_start();
    let digits = text
        .find(|c: char| !c.is_ascii_digit())
        .map_or(text, |end| &text[..end]);
    if digits.is_empty() {
        return Err(Error::Decode(format!(
            "regulatory code {text:?} is not numeric"
        )));
    }
    digits
        .parse()
        .map_err(|_| Error::Decode(format!("regulatory code {digits} is out of range")))
}

/// Read the numeric regulatory code of `radio`.
pub fn read_regulatory_code(classifier: &DeviceClassifier, radio: &InterfaceName) -> Result<u32> {
    let path = classifier.radio_dir(radio).join("countrycode");
    let text = fs::read_to_string(&path)
        .map_err(|e| Error::NotFound(format!("{}: {e}", path.display())))?;
    parse_regulatory_code(&text)
}

/// Regulatory domain currently applied to the radio behind `name`.
pub fn get_country(classifier: &DeviceClassifier, name: &InterfaceName) -> Result<CountryCode> {
    let radio = resolve_backing_radio(classifier, name)?;
    let code = read_regulatory_code(classifier, &radio)?;
    debug!(ifname = %name, radio = %radio, code, "read regulatory code");
    lookup_by_regulatory_code(code)
}
