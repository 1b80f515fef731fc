//! Analysis request payload and the offline fallback text

use serde::{Deserialize, Serialize};

use crate::trend::{SelectedYear, TrendPoint};

/// Pattern sent when the payload carries none
pub const UNKNOWN_PATTERN: &str = "未知";

/// One birth pillar as returned by the fortune service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillar {
    #[serde(default)]
    pub name: String,
    pub gan: String,
    pub zhi: String,
}

impl Pillar {
    /// Stem and branch joined, e.g. `甲子`. Empty unless both are known.
    pub fn ganzhi(&self) -> String {
        let (gan, zhi) = (self.gan.trim(), self.zhi.trim());
        if gan.is_empty() || zhi.is_empty() {
            return String::new();
        }
        format!("{}{}", gan, zhi)
    }
}

/// Person-level data every analysis request carries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsightContext {
    /// Year, month, day and hour pillars in that order
    pub pillars: Vec<Pillar>,
    pub pattern: Option<String>,
    pub favorable: Vec<String>,
}

/// Birth pillars keyed the way the analysis endpoint expects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBazi {
    pub year: String,
    pub month: String,
    pub day: String,
    pub time: String,
}

impl UserBazi {
    pub fn from_pillars(pillars: &[Pillar]) -> Self {
        let at = |i: usize| pillars.get(i).map(Pillar::ganzhi).unwrap_or_default();
        Self {
            year: at(0),
            month: at(1),
            day: at(2),
            time: at(3),
        }
    }
}

/// Body of `POST /api/analyze_year`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRequest {
    pub user_bazi: UserBazi,
    pub target_year: i32,
    pub year_gan: String,
    pub year_zhi: String,
    pub year_score: u8,
    /// Marker names of the year
    pub shensha: Vec<String>,
    /// Dimension key, e.g. `career`
    pub dimension: String,
    pub pattern: String,
    pub fav_gods: Vec<String>,
}

impl InsightRequest {
    pub fn new(selection: &SelectedYear, context: &InsightContext) -> Self {
        let point = &selection.point;
        Self {
            user_bazi: UserBazi::from_pillars(&context.pillars),
            target_year: point.year,
            year_gan: point.stem().map(String::from).unwrap_or_default(),
            year_zhi: point.branch().map(String::from).unwrap_or_default(),
            year_score: point.score,
            shensha: point.markers.iter().map(|m| m.name.clone()).collect(),
            dimension: selection.dimension.key().to_string(),
            pattern: context
                .pattern
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| UNKNOWN_PATTERN.to_string()),
            fav_gods: context.favorable.clone(),
        }
    }
}

/// Text shown when the analysis service cannot be reached
pub fn fallback_text(point: &TrendPoint) -> String {
    format!(
        "【天机暂隐】连接云端失败，请稍后重试。({}年 {} 运势指数: {}分)",
        point.year, point.ganzhi, point.score
    )
}
