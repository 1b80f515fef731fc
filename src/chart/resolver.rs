//! Pixel to data-index resolution with fallbacks

use tracing::debug;

use super::layout::{ChartLayout, Point, Size};
use super::surface::ChartSurface;

/// Which step produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The surface's own pixel to axis conversion
    InverseTransform,
    /// Linear interpolation over the grid margins
    LinearInterpolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub index: usize,
    pub strategy: Strategy,
}

/// Maps a click anywhere in the plot area to a data index.
///
/// Order: the surface hit test gates the click, then the inverse transform,
/// then interpolation over the shared layout when the transform is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateResolver {
    layout: ChartLayout,
}

impl CoordinateResolver {
    pub fn new(layout: ChartLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> ChartLayout {
        self.layout
    }

    pub fn resolve<S: ChartSurface + ?Sized>(
        &self,
        surface: &S,
        point: Point,
        len: usize,
    ) -> Option<Resolution> {
        if len == 0 || !surface.contains_pixel(point) {
            return None;
        }

        match surface.pixel_to_index(point) {
            Ok(raw) if raw.is_finite() => {
                return Some(Resolution {
                    index: clamp_index(raw, len),
                    strategy: Strategy::InverseTransform,
                });
            }
            Ok(raw) => debug!(raw, "inverse transform returned non-finite index"),
            Err(e) => debug!(error = %e, "inverse transform failed"),
        }

        self.interpolate(surface.size(), point.x, len)
            .map(|index| Resolution {
                index,
                strategy: Strategy::LinearInterpolation,
            })
    }

    /// `round((x - left) / (width - left - right) * (len - 1))`, clamped
    pub fn interpolate(&self, size: Size, x: f64, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let left = f64::from(self.layout.left);
        let span = size.width - left - f64::from(self.layout.right);
        if span.is_nan() || span <= 0.0 || !x.is_finite() {
            return None;
        }
        let raw = (x - left) / span * (len - 1) as f64;
        Some(clamp_index(raw, len))
    }
}

fn clamp_index(raw: f64, len: usize) -> usize {
    raw.round().clamp(0.0, (len - 1) as f64) as usize
}
