//! Marker glyph selection: at most one glyph per year

use crate::lookup::marker_kind_color;
use crate::trend::{Marker, MarkerKind, TrendPoint};

use super::colors::COLOR_CORE_FILL;

pub const GLYPH_SIZE: i32 = 50;
pub const CORE_GLYPH_SIZE: i32 = 70;
pub const LABEL_FONT_SIZE: i32 = 16;
pub const CORE_LABEL_FONT_SIZE: i32 = 22;
pub const CORE_HALO_BLUR: i32 = 20;

/// Shown when a marker carries no icon
pub const DEFAULT_ICON: &str = "★";

/// Marker drawn for a point: the first annual-conflict marker, else the first marker
pub fn primary_marker(markers: &[Marker]) -> Option<&Marker> {
    markers
        .iter()
        .find(|m| m.is_annual_conflict())
        .or_else(|| markers.first())
}

/// One drawable glyph on the trend line
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerGlyph {
    /// Index into the visible sequence
    pub index: usize,
    pub score: u8,
    pub icon: String,
    pub name: String,
    pub kind: MarkerKind,
    /// Set for annual-conflict markers
    pub emphasized: bool,
    pub size: i32,
    pub label_size: i32,
    pub color: &'static str,
}

impl MarkerGlyph {
    pub fn for_point(index: usize, point: &TrendPoint, accent: &'static str) -> Option<Self> {
        let marker = primary_marker(&point.markers)?;
        let emphasized = marker.is_annual_conflict();
        let icon = if marker.icon.trim().is_empty() {
            DEFAULT_ICON.to_string()
        } else {
            marker.icon.clone()
        };
        Some(Self {
            index,
            score: point.score,
            icon,
            name: marker.name.clone(),
            kind: marker.kind,
            emphasized,
            size: if emphasized { CORE_GLYPH_SIZE } else { GLYPH_SIZE },
            label_size: if emphasized {
                CORE_LABEL_FONT_SIZE
            } else {
                LABEL_FONT_SIZE
            },
            color: if emphasized {
                COLOR_CORE_FILL
            } else {
                marker_kind_color(marker.kind, accent)
            },
        })
    }

    /// Series name, also shown in the legend
    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}

/// Glyphs for every point that carries markers
pub fn glyphs(points: &[TrendPoint], accent: &'static str) -> Vec<MarkerGlyph> {
    points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| MarkerGlyph::for_point(i, p, accent))
        .collect()
}
