//! Trend data as delivered by the fortune service

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::error::DataError;

/// Score at or above which a year is favorable
pub const FAVORABLE_THRESHOLD: u8 = 70;
/// Score below which a year is unfavorable
pub const UNFAVORABLE_THRESHOLD: u8 = 40;

/// Life aspect with its own score series
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    #[default]
    Overall,
    Career,
    Wealth,
    Health,
    Love,
    Parents,
    Children,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Overall,
        Dimension::Career,
        Dimension::Wealth,
        Dimension::Health,
        Dimension::Love,
        Dimension::Parents,
        Dimension::Children,
    ];

    /// Wire key used by the service
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Overall => "overall",
            Dimension::Career => "career",
            Dimension::Wealth => "wealth",
            Dimension::Health => "health",
            Dimension::Love => "love",
            Dimension::Parents => "parents",
            Dimension::Children => "children",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dimension {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Dimension::ALL
            .into_iter()
            .find(|d| d.key() == key)
            .ok_or_else(|| DataError::UnknownDimension(s.to_string()))
    }
}

/// Category of a marker, decoded from the service's one-character labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum MarkerKind {
    Favorable,
    Unfavorable,
    Romantic,
    Eventful,
    #[default]
    Neutral,
}

impl MarkerKind {
    /// Map a service label (吉/凶/缘/动/平) or an English name. Unknown labels are neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "吉" | "favorable" => MarkerKind::Favorable,
            "凶" | "unfavorable" => MarkerKind::Unfavorable,
            "缘" | "romantic" => MarkerKind::Romantic,
            "动" | "eventful" => MarkerKind::Eventful,
            _ => MarkerKind::Neutral,
        }
    }
}

impl From<String> for MarkerKind {
    fn from(label: String) -> Self {
        MarkerKind::from_label(&label)
    }
}

/// Annotated life event attached to a year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "type", default)]
    pub kind: MarkerKind,
    #[serde(default)]
    pub desc: String,
}

impl Marker {
    /// Annual-conflict markers (值/冲/刑/害/破太岁) take precedence when drawing
    pub fn is_annual_conflict(&self) -> bool {
        self.name.contains(ANNUAL_CONFLICT_PATTERN)
    }
}

pub const ANNUAL_CONFLICT_PATTERN: &str = "太岁";

/// Score band of a year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Favorable,
    Average,
    Unfavorable,
}

/// One calendar year within a dimension series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    #[serde(default)]
    pub ganzhi: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl TrendPoint {
    pub fn band(&self) -> ScoreBand {
        if self.score >= FAVORABLE_THRESHOLD {
            ScoreBand::Favorable
        } else if self.score < UNFAVORABLE_THRESHOLD {
            ScoreBand::Unfavorable
        } else {
            ScoreBand::Average
        }
    }

    /// Heavenly stem of the year label
    pub fn stem(&self) -> Option<char> {
        self.ganzhi.chars().next()
    }

    /// Earthly branch of the year label
    pub fn branch(&self) -> Option<char> {
        self.ganzhi.chars().nth(1)
    }
}

/// Round and clamp a raw score into 0..=100
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_finite() {
        raw.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    f64::deserialize(deserializer).map(clamp_score)
}

/// Year-ordered series for one dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSeries {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: Vec<TrendPoint>,
}

impl DimensionSeries {
    pub fn new(name: impl Into<String>, data: Vec<TrendPoint>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check that years strictly ascend
    pub fn check_order(&self, label: &str) -> Result<(), DataError> {
        for (index, pair) in self.data.windows(2).enumerate() {
            if pair[1].year == pair[0].year {
                return Err(DataError::DuplicateYear {
                    dimension: label.to_string(),
                    year: pair[1].year,
                });
            }
            if pair[1].year < pair[0].year {
                return Err(DataError::UnorderedYears {
                    dimension: label.to_string(),
                    index: index + 1,
                });
            }
        }
        Ok(())
    }
}

/// All dimension series of one chart, keyed by dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, DimensionSeries>")]
pub struct MultiDimensionTrend {
    series: BTreeMap<Dimension, DimensionSeries>,
}

impl MultiDimensionTrend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dimension: Dimension, series: DimensionSeries) {
        self.series.insert(dimension, series);
    }

    pub fn get(&self, dimension: Dimension) -> Option<&DimensionSeries> {
        self.series.get(&dimension)
    }

    pub fn dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.series.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Every series must hold the same years at the same indices
    pub fn validate(&self) -> Result<(), DataError> {
        let mut iter = self.series.iter();
        let Some((first_dim, reference)) = iter.next() else {
            return Ok(());
        };
        reference.check_order(first_dim.key())?;

        for (dimension, series) in iter {
            if series.len() != reference.len() {
                return Err(DataError::MisalignedSeries {
                    dimension: dimension.key().to_string(),
                    expected: reference.len(),
                    actual: series.len(),
                });
            }
            let mismatch = reference
                .data
                .iter()
                .zip(&series.data)
                .position(|(a, b)| a.year != b.year);
            if let Some(index) = mismatch {
                return Err(DataError::MisalignedYear {
                    dimension: dimension.key().to_string(),
                    index,
                    expected: reference.data[index].year,
                    found: series.data[index].year,
                });
            }
        }
        Ok(())
    }
}

impl From<BTreeMap<String, DimensionSeries>> for MultiDimensionTrend {
    fn from(raw: BTreeMap<String, DimensionSeries>) -> Self {
        let mut trend = MultiDimensionTrend::new();
        for (key, series) in raw {
            match key.parse::<Dimension>() {
                Ok(dimension) => trend.insert(dimension, series),
                Err(e) => warn!(error = %e, "skipping unknown dimension series"),
            }
        }
        trend
    }
}

impl FromIterator<(Dimension, DimensionSeries)> for MultiDimensionTrend {
    fn from_iter<I: IntoIterator<Item = (Dimension, DimensionSeries)>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

impl Serialize for MultiDimensionTrend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.series.serialize(serializer)
    }
}

/// The year currently focused by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedYear {
    pub point: TrendPoint,
    pub dimension: Dimension,
}
