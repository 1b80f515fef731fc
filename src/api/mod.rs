//! Fortune service payloads and HTTP client

mod client;
mod locations;

pub use client::FortuneClient;
pub use locations::{City, DEFAULT_LONGITUDE, default_cities, default_provinces};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Error};
use crate::insight::{InsightContext, Pillar};
use crate::lookup::{Element, Strength};
use crate::trend::{MultiDimensionTrend, TrendPoint, TrendStore};

/// `{ success, data }` wrapper used by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Unsuccessful);
        }
        self.data.ok_or(ApiError::MissingField("data"))
    }
}

/// Body of `POST /api/calculate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthInput {
    pub nickname: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    /// 1 = male, 0 = female
    pub gender: u8,
    #[serde(default)]
    pub is_lunar: bool,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default = "default_longitude")]
    pub city_long: f64,
}

fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BirthInfo {
    /// e.g. `1990年5月15日 10时30分`
    #[serde(default)]
    pub solar: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub longitude: f64,
    /// Minutes added for true solar time
    #[serde(default)]
    pub true_solar_offset: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bazi {
    #[serde(default)]
    pub pillars: Vec<Pillar>,
    #[serde(default)]
    pub day_master: String,
    #[serde(default)]
    pub climate: String,
    #[serde(default)]
    pub favorable: Vec<String>,
    /// Element glyph to strength
    #[serde(default)]
    pub energy_scores: BTreeMap<String, f64>,
}

impl Bazi {
    pub fn day_master_element(&self) -> Option<Element> {
        self.day_master.chars().next().and_then(Element::of_stem)
    }

    /// Energy of one element, zero when the service left it out
    pub fn energy(&self, element: Element) -> f64 {
        self.energy_scores
            .get(element.glyph().to_string().as_str())
            .copied()
            .unwrap_or(0.0)
    }

    /// `None` without a known day master or any energy scores
    pub fn day_master_strength(&self) -> Option<Strength> {
        if self.energy_scores.is_empty() {
            return None;
        }
        let element = self.day_master_element()?;
        Some(Strength::from_share(self.energy(element)))
    }

    /// Favorable elements the lookup table knows, in service order
    pub fn favorable_elements(&self) -> Vec<Element> {
        self.favorable
            .iter()
            .filter_map(|f| f.chars().next().and_then(Element::from_glyph))
            .collect()
    }
}

/// Day master profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Soul {
    #[serde(default)]
    pub gan: String,
    #[serde(default)]
    pub wuxing: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub traits: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub pattern: Option<String>,
    #[serde(default)]
    pub fav_gods: Vec<String>,
    pub soul: Option<Soul>,
}

/// The parts of a computation response this crate consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FortuneReport {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub birth_info: BirthInfo,
    #[serde(default)]
    pub bazi: Bazi,
    #[serde(default)]
    pub life_trend: Vec<TrendPoint>,
    pub multi_dimension_trend: Option<MultiDimensionTrend>,
    #[serde(default)]
    pub gender: String,
    pub meta: Option<ReportMeta>,
}

impl FortuneReport {
    /// Parse a saved response: either the `{ success, data }` envelope or a bare report
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let is_envelope = value.get("success").is_some() && value.get("data").is_some();
        if is_envelope {
            let envelope: ApiEnvelope<FortuneReport> = serde_json::from_value(value)?;
            Ok(envelope.into_data()?)
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    /// Year parsed from `birth_info.solar`
    pub fn birth_year(&self) -> Option<i32> {
        let digits: String = self
            .birth_info
            .solar
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }

    pub fn trend_store(&self) -> TrendStore {
        TrendStore::new(self.life_trend.clone(), self.multi_dimension_trend.clone())
            .with_birth_year(self.birth_year())
    }

    /// Pattern and favorable elements come from `meta`, falling back to the bazi block
    pub fn insight_context(&self) -> InsightContext {
        let meta = self.meta.as_ref();
        let pattern = meta
            .and_then(|m| m.pattern.clone())
            .or_else(|| Some(self.bazi.climate.clone()))
            .filter(|p| !p.is_empty());
        let favorable = match meta {
            Some(m) if !m.fav_gods.is_empty() => m.fav_gods.clone(),
            _ => self.bazi.favorable.clone(),
        };
        InsightContext {
            pillars: self.bazi.pillars.clone(),
            pattern,
            favorable,
        }
    }
}
