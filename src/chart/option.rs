//! Trend chart option: line, gradient area, guide lines and marker glyphs

use charming::{
    Chart, ImageRenderer,
    component::{Axis, DataZoom, DataZoomType, Grid, Legend, Title, VisualMap, VisualMapPiece},
    element::{
        AreaStyle, AxisLabel, AxisType, Color, ColorStop, ItemStyle, Label, LabelPosition, LineStyle,
        LineStyleType, SplitLine, Symbol, TextStyle, Tooltip, Trigger,
    },
    renderer::ImageFormat,
    series::{EffectScatter, Line, ShowEffectOn},
};

use crate::error::SurfaceError;
use crate::lookup::dimension_info;
use crate::trend::{Dimension, TrendPoint};

use super::colors::{
    COLOR_BACKGROUND, COLOR_CORE_HALO, COLOR_FAVORABLE, COLOR_GRID, COLOR_SUBTEXT, COLOR_TEXT,
    COLOR_UNFAVORABLE, rgba,
};
use super::layout::{ChartLayout, Size};
use super::markers::{CORE_HALO_BLUR, MarkerGlyph, glyphs};

/// Series names of the threshold guide lines
pub const FAVORABLE_GUIDE: &str = "吉";
pub const UNFAVORABLE_GUIDE: &str = "凶";

/// Position of the dimension line among the series; the score bands color only this one
pub const MAIN_SERIES_INDEX: usize = 1;

/// A fully built chart plus the geometry hosts need for hit testing
pub struct ChartFrame {
    pub chart: Chart,
    pub dimension: Dimension,
    pub layout: ChartLayout,
    /// X axis labels, one per visible year
    pub categories: Vec<String>,
    pub scores: Vec<u8>,
    pub glyphs: Vec<MarkerGlyph>,
}

impl ChartFrame {
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// ECharts option as JSON
    pub fn to_json(&self) -> Result<String, SurfaceError> {
        serde_json::to_string_pretty(&self.chart).map_err(|e| SurfaceError::Render(e.to_string()))
    }
}

/// Build the chart for a visible sequence. The whole option is rebuilt on every call.
pub fn build_frame(points: &[TrendPoint], dimension: Dimension, layout: ChartLayout) -> ChartFrame {
    let info = dimension_info(dimension);
    let categories: Vec<String> = points.iter().map(|p| p.year.to_string()).collect();
    let scores: Vec<u8> = points.iter().map(|p| p.score).collect();
    let values: Vec<f64> = scores.iter().map(|&s| f64::from(s)).collect();
    let glyphs = glyphs(points, info.color);

    let subtitle = match (points.first(), points.last()) {
        (Some(first), Some(last)) => format!("{} - {}", first.year, last.year),
        _ => "暂无数据".to_string(),
    };

    let mut chart = Chart::new()
        .background_color(Color::Value(COLOR_BACKGROUND.to_string()))
        .title(
            Title::new()
                .text(format!("{} {}", info.icon, info.name))
                .subtext(subtitle)
                .left("center")
                .top("3%")
                .text_style(TextStyle::new().color(COLOR_TEXT).font_size(20))
                .subtext_style(TextStyle::new().color(COLOR_SUBTEXT).font_size(12)),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(
            Legend::new()
                .data(vec![
                    info.name.to_string(),
                    FAVORABLE_GUIDE.to_string(),
                    UNFAVORABLE_GUIDE.to_string(),
                ])
                .bottom("2%")
                .text_style(TextStyle::new().color(COLOR_TEXT).font_size(12)),
        )
        .grid(
            Grid::new()
                .left(layout.left)
                .right(layout.right)
                .top(layout.top)
                .bottom(layout.bottom),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .boundary_gap(false)
                .data(categories.clone())
                .axis_label(AxisLabel::new().color(COLOR_TEXT).font_size(12)),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .min(0)
                .max(100)
                .axis_label(AxisLabel::new().color(COLOR_TEXT).font_size(12))
                .split_line(
                    SplitLine::new().line_style(LineStyle::new().width(0.5).color(COLOR_GRID)),
                ),
        )
        // Bands follow the 40/70 score thresholds
        .visual_map(
            VisualMap::new()
                .show(false)
                .series_index(MAIN_SERIES_INDEX as f64)
                .pieces(vec![
                    VisualMapPiece::new().lte(39).color(COLOR_UNFAVORABLE),
                    VisualMapPiece::new().gte(40).lte(69).color(info.color),
                    VisualMapPiece::new().gte(70).color(COLOR_FAVORABLE),
                ]),
        )
        .data_zoom(DataZoom::new().type_(DataZoomType::Inside).start(0.0).end(100.0));

    // Glow layer under the main line
    chart = chart.series(
        Line::new()
            .name("glow")
            .data(values.clone())
            .smooth(true)
            .show_symbol(false)
            .line_style(LineStyle::new().width(8).color(rgba(info.color, 0.25).as_str())),
    );

    chart = chart.series(
        Line::new()
            .name(info.name)
            .data(values)
            .smooth(true)
            .symbol(Symbol::Circle)
            .symbol_size(6)
            .line_style(LineStyle::new().width(3).color(info.color))
            .item_style(ItemStyle::new().color(info.color))
            .area_style(AreaStyle::new().color(Color::LinearGradient {
                x: 0.0,
                y: 0.0,
                x2: 0.0,
                y2: 1.0,
                color_stops: vec![
                    ColorStop::new(0.0, rgba(info.color, 0.35).as_str()),
                    ColorStop::new(1.0, rgba(info.color, 0.02).as_str()),
                ],
            })),
    );

    for (name, level, color) in [
        (FAVORABLE_GUIDE, 70.0, COLOR_FAVORABLE),
        (UNFAVORABLE_GUIDE, 40.0, COLOR_UNFAVORABLE),
    ] {
        chart = chart.series(
            Line::new()
                .name(name)
                .data(vec![level; points.len()])
                .show_symbol(false)
                .line_style(
                    LineStyle::new()
                        .width(1)
                        .color(color)
                        .type_(LineStyleType::Dashed),
                ),
        );
    }

    // One series per glyph so each keeps its own size and halo. Only core glyphs ripple.
    for glyph in &glyphs {
        let mut style = ItemStyle::new()
            .color(glyph.color)
            .border_width(2)
            .border_color(COLOR_TEXT);
        if glyph.emphasized {
            style = style
                .shadow_blur(CORE_HALO_BLUR)
                .shadow_color(COLOR_CORE_HALO);
        }
        chart = chart.series(
            EffectScatter::new()
                .name(glyph.label())
                .show_effect_on(if glyph.emphasized {
                    ShowEffectOn::Render
                } else {
                    ShowEffectOn::Emphasis
                })
                .symbol_size(f64::from(glyph.size))
                .data(vec![vec![glyph.index as f64, f64::from(glyph.score)]])
                .label(
                    Label::new()
                        .show(true)
                        .position(LabelPosition::Inside)
                        .font_size(f64::from(glyph.label_size))
                        .formatter(glyph.icon.as_str()),
                )
                .item_style(style),
        );
    }

    ChartFrame {
        chart,
        dimension,
        layout,
        categories,
        scores,
        glyphs,
    }
}

/// Render a frame to a PNG file
pub fn render_trend_chart(
    frame: &ChartFrame,
    size: Size,
    output_path: &str,
) -> Result<(), SurfaceError> {
    if !size.is_valid() {
        return Err(SurfaceError::InvalidSize {
            width: size.width,
            height: size.height,
        });
    }
    let mut renderer = ImageRenderer::new(size.width as u32, size.height as u32);
    renderer
        .save_format(ImageFormat::Png, &frame.chart, output_path)
        .map_err(|e| SurfaceError::Render(format!("failed to save chart: {}", e)))
}
