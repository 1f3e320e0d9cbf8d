use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};

/// The shipping contact PayPal hands to the shipping-change callback.
///
/// `state` is free text: a subdivision code most of the time, a full region
/// name for some buyers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingContact {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub country_code: String,
    #[serde(default)]
    pub postal_code: String,
}

/// The storefront's canonical shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
    pub state_or_region_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdivision {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub subdivisions: Vec<Subdivision>,
}

/// Store countries with their subdivision tables, as returned by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountryTable {
    pub data: Vec<Country>,
}

impl CountryTable {
    pub fn country(&self, code: &str) -> Option<&Country> {
        self.data
            .iter()
            .find(|country| country.code.eq_ignore_ascii_case(code))
    }
}

const US_STATES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("american samoa", "AS"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("district of columbia", "DC"),
    ("federated states of micronesia", "FM"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("guam", "GU"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("marshall islands", "MH"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("northern mariana islands", "MP"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("palau", "PW"),
    ("pennsylvania", "PA"),
    ("puerto rico", "PR"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virgin islands", "VI"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
    ("armed forces americas", "AA"),
    ("armed forces europe", "AE"),
    ("armed forces pacific", "AP"),
];

/// Looks up the USPS abbreviation for a US state or territory name.
pub fn us_state_abbreviation(name: &str) -> Option<&'static str> {
    let needle = name.trim().to_lowercase();
    US_STATES
        .iter()
        .find(|(state, _)| *state == needle)
        .map(|(_, code)| *code)
}

/// Converts a PayPal shipping contact into a storefront `Address`.
///
/// The region must resolve to a subdivision of the contact's country, either
/// by code or, failing that, through the US state-name table. A country
/// with no subdivisions has nothing to resolve against and is rejected.
pub fn translate(contact: &ShippingContact, countries: &CountryTable) -> Result<Address> {
    let country = countries.country(&contact.country_code).ok_or_else(|| {
        CheckoutError::InvalidAddress(format!(
            "unsupported country `{}`",
            contact.country_code
        ))
    })?;

    let state_or_region_code = resolve_subdivision(country, &contact.state).ok_or_else(|| {
        CheckoutError::InvalidAddress(format!(
            "unknown state `{}` for country `{}`",
            contact.state, country.code
        ))
    })?;

    Ok(Address {
        city: contact.city.clone(),
        postal_code: contact.postal_code.clone(),
        country_code: country.code.clone(),
        state_or_region_code,
    })
}

fn resolve_subdivision(country: &Country, state: &str) -> Option<String> {
    let code = state.trim().to_uppercase();
    let known = |candidate: &str| {
        country
            .subdivisions
            .iter()
            .any(|subdivision| subdivision.code == candidate)
    };

    if !code.is_empty() && known(code.as_str()) {
        return Some(code);
    }

    us_state_abbreviation(state)
        .filter(|abbreviation| known(*abbreviation))
        .map(str::to_string)
}
