//! Rendering surface capability and the in-process headless implementation

use tracing::debug;

use crate::error::SurfaceError;

use super::layout::{ChartLayout, PlotRect, Point, Size};
use super::option::{ChartFrame, render_trend_chart};

/// Pixel radius around a line vertex that counts as a series hit
pub const VERTEX_HIT_RADIUS: f64 = 7.0;

/// What the controller needs from a rendering engine
pub trait ChartSurface {
    /// Replace the displayed chart wholesale
    fn render(&mut self, frame: ChartFrame) -> Result<(), SurfaceError>;

    /// Relayout to a new size. The current chart is kept.
    fn resize(&mut self, size: Size) -> Result<(), SurfaceError>;

    /// Release the surface. Further calls become no-ops or errors.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;

    fn size(&self) -> Size;

    /// Whether a pixel falls inside the plot grid
    fn contains_pixel(&self, point: Point) -> bool;

    /// Inverse transform of a pixel into a (fractional) category index
    fn pixel_to_index(&self, point: Point) -> Result<f64, SurfaceError>;

    /// Index of the data element drawn under a pixel, if any
    fn hit_series(&self, point: Point) -> Option<usize>;
}

/// Surface that lays out the chart in memory and can save it as an image
pub struct HeadlessSurface {
    size: Size,
    layout: ChartLayout,
    frame: Option<ChartFrame>,
    disposed: bool,
}

impl HeadlessSurface {
    pub fn new(size: Size, layout: ChartLayout) -> Result<Self, SurfaceError> {
        if !size.is_valid() {
            return Err(SurfaceError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }
        Ok(Self {
            size,
            layout,
            frame: None,
            disposed: false,
        })
    }

    pub fn frame(&self) -> Option<&ChartFrame> {
        self.frame.as_ref()
    }

    fn plot_rect(&self) -> Option<PlotRect> {
        self.layout.plot_rect(self.size)
    }

    /// Save the current chart as PNG
    pub fn save_image(&self, output_path: &str) -> Result<(), SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| SurfaceError::Render("nothing rendered yet".to_string()))?;
        render_trend_chart(frame, self.size, output_path)
    }
}

impl ChartSurface for HeadlessSurface {
    fn render(&mut self, frame: ChartFrame) -> Result<(), SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        debug!(
            dimension = %frame.dimension,
            points = frame.len(),
            glyphs = frame.glyphs.len(),
            "rendering trend chart"
        );
        self.frame = Some(frame);
        Ok(())
    }

    fn resize(&mut self, size: Size) -> Result<(), SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        if !size.is_valid() {
            return Err(SurfaceError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }
        self.size = size;
        Ok(())
    }

    fn dispose(&mut self) {
        self.frame = None;
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn size(&self) -> Size {
        self.size
    }

    fn contains_pixel(&self, point: Point) -> bool {
        !self.disposed && self.plot_rect().is_some_and(|rect| rect.contains(point))
    }

    fn pixel_to_index(&self, point: Point) -> Result<f64, SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        let frame = self
            .frame
            .as_ref()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| SurfaceError::ConversionUnavailable("no category axis".to_string()))?;
        let rect = self.plot_rect().ok_or_else(|| {
            SurfaceError::ConversionUnavailable("plot area collapsed".to_string())
        })?;
        Ok(rect.category_at(point.x, frame.len()))
    }

    fn hit_series(&self, point: Point) -> Option<usize> {
        if self.disposed {
            return None;
        }
        let frame = self.frame.as_ref()?;
        let rect = self.plot_rect()?;
        let count = frame.len();
        let spacing = if count > 1 {
            rect.width / (count - 1) as f64
        } else {
            rect.width
        };
        let distance = |index: usize, score: u8| {
            let dx = rect.category_x(index, count) - point.x;
            let dy = rect.value_y(f64::from(score)) - point.y;
            (dx * dx + dy * dy).sqrt()
        };

        // A glyph never reaches past half the gap to its neighbour
        let glyphs = frame
            .glyphs
            .iter()
            .filter(|g| g.index < count)
            .map(|g| {
                let radius = (f64::from(g.size) / 2.0).min(spacing / 2.0);
                (g.index, distance(g.index, g.score), radius)
            });
        let vertices = frame
            .scores
            .iter()
            .enumerate()
            .map(|(i, &score)| (i, distance(i, score), VERTEX_HIT_RADIUS));

        glyphs
            .chain(vertices)
            .filter(|&(_, d, radius)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _, _)| index)
    }
}
