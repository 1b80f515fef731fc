//! Trend chart: option building, surfaces and pointer resolution

mod colors;
mod controller;
mod layout;
mod markers;
mod option;
mod resolver;
mod surface;

pub use controller::{ChartController, DimensionChangedHandler, YearSelectedHandler};
pub use layout::{ChartLayout, PlotRect, Point, Size};
pub use markers::{
    CORE_GLYPH_SIZE, CORE_HALO_BLUR, CORE_LABEL_FONT_SIZE, DEFAULT_ICON, GLYPH_SIZE,
    LABEL_FONT_SIZE, MarkerGlyph, glyphs, primary_marker,
};
pub use option::{
    ChartFrame, FAVORABLE_GUIDE, MAIN_SERIES_INDEX, UNFAVORABLE_GUIDE, build_frame,
    render_trend_chart,
};
pub use resolver::{CoordinateResolver, Resolution, Strategy};
pub use surface::{ChartSurface, HeadlessSurface, VERTEX_HIT_RADIUS};
