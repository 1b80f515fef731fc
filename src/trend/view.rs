//! View-state reducers: dimension switch and time window filter

use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

use super::model::{Dimension, DimensionSeries, MultiDimensionTrend, TrendPoint};

/// Number of years in the first window
pub const WINDOW_SPLIT: usize = 40;

/// Year window shown by the chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    /// First 40 years
    FirstHalf,
    /// Everything from year index 40
    SecondHalf,
    #[default]
    All,
}

impl TimeWindow {
    pub fn key(self) -> &'static str {
        match self {
            TimeWindow::FirstHalf => "first-half",
            TimeWindow::SecondHalf => "second-half",
            TimeWindow::All => "all",
        }
    }

    /// Tab caption
    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::FirstHalf => "前40年",
            TimeWindow::SecondHalf => "后40年",
            TimeWindow::All => "全部",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TimeWindow {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-half" | "first40" | "first" => Ok(TimeWindow::FirstHalf),
            "second-half" | "last40" | "second" => Ok(TimeWindow::SecondHalf),
            "all" => Ok(TimeWindow::All),
            _ => Err(DataError::UnknownWindow(s.to_string())),
        }
    }
}

/// Client-local view parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub active_dimension: Dimension,
    pub time_window: TimeWindow,
}

/// Explicit user actions that change the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    SelectDimension(Dimension),
    SelectWindow(TimeWindow),
}

pub fn reduce(state: ViewState, action: ViewAction) -> ViewState {
    match action {
        ViewAction::SelectDimension(active_dimension) => ViewState {
            active_dimension,
            ..state
        },
        ViewAction::SelectWindow(time_window) => ViewState {
            time_window,
            ..state
        },
    }
}

/// Pick the series for a dimension, falling back to the legacy single series
pub fn select_series<'a>(
    trend: Option<&'a MultiDimensionTrend>,
    dimension: Dimension,
    legacy: &'a DimensionSeries,
) -> &'a DimensionSeries {
    trend.and_then(|t| t.get(dimension)).unwrap_or(legacy)
}

/// Slice a series to a window. Short series saturate instead of failing.
pub fn apply_window(points: &[TrendPoint], window: TimeWindow) -> &[TrendPoint] {
    let split = WINDOW_SPLIT.min(points.len());
    match window {
        TimeWindow::FirstHalf => &points[..split],
        TimeWindow::SecondHalf => &points[split..],
        TimeWindow::All => points,
    }
}
