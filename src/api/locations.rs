//! Birth-place lookup with a built-in fallback

use serde::{Deserialize, Serialize};

/// Longitude assumed when the birth city is unknown (UTC+8 meridian)
pub const DEFAULT_LONGITUDE: f64 = 120.0;

const FALLBACK_PROVINCE: &str = "北京市";
const FALLBACK_CITY: &str = "北京";
const FALLBACK_LONGITUDE: f64 = 116.41;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProvincesResponse {
    #[serde(default)]
    pub(super) provinces: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CitiesResponse {
    #[serde(default)]
    pub(super) cities: Vec<City>,
}

/// Provinces used when the lookup service is unreachable
pub fn default_provinces() -> Vec<String> {
    vec![FALLBACK_PROVINCE.to_string()]
}

/// Cities of a province from the built-in table
pub fn default_cities(province: &str) -> Vec<City> {
    if province == FALLBACK_PROVINCE {
        vec![City {
            name: FALLBACK_CITY.to_string(),
            longitude: FALLBACK_LONGITUDE,
        }]
    } else {
        Vec::new()
    }
}
