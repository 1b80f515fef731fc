//! Trend dataset and its filtered views

mod model;
mod view;

pub use model::{
    ANNUAL_CONFLICT_PATTERN, Dimension, DimensionSeries, FAVORABLE_THRESHOLD, Marker, MarkerKind,
    MultiDimensionTrend, ScoreBand, SelectedYear, TrendPoint, UNFAVORABLE_THRESHOLD, clamp_score,
};
pub use view::{
    TimeWindow, ViewAction, ViewState, WINDOW_SPLIT, apply_window, reduce, select_series,
};

use tracing::warn;

use crate::lookup::dimension_info;

/// Holds the full dataset for one chart mount
#[derive(Debug, Clone, Default)]
pub struct TrendStore {
    legacy: DimensionSeries,
    multi: Option<MultiDimensionTrend>,
    birth_year: Option<i32>,
}

impl TrendStore {
    /// Build from the legacy `life_trend` sequence and the optional per-dimension set.
    /// A misaligned per-dimension set is dropped so every view uses the legacy series.
    /// Out-of-order legacy years are only reported; that series has nothing to fall back to.
    pub fn new(life_trend: Vec<TrendPoint>, multi: Option<MultiDimensionTrend>) -> Self {
        let legacy = DimensionSeries::new(dimension_info(Dimension::Overall).name, life_trend);
        if let Err(e) = legacy.check_order("life_trend") {
            warn!(error = %e, "legacy trend years are out of order");
        }
        let multi = multi.filter(|trend| match trend.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "discarding multi-dimension trend");
                false
            }
        });
        Self {
            legacy,
            multi,
            birth_year: None,
        }
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    pub fn legacy(&self) -> &DimensionSeries {
        &self.legacy
    }

    pub fn multi(&self) -> Option<&MultiDimensionTrend> {
        self.multi.as_ref()
    }

    /// Whether a dedicated series exists for the dimension
    pub fn has_dimension(&self, dimension: Dimension) -> bool {
        self.multi
            .as_ref()
            .is_some_and(|m| m.get(dimension).is_some())
    }

    pub fn series(&self, dimension: Dimension) -> &DimensionSeries {
        select_series(self.multi.as_ref(), dimension, &self.legacy)
    }

    /// Points visible under the given view
    pub fn filtered(&self, view: &ViewState) -> &[TrendPoint] {
        apply_window(&self.series(view.active_dimension).data, view.time_window)
    }
}
