//! Plot-area geometry shared by the chart option and pointer resolution

/// Pixel size of a chart surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Pointer position in surface pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Grid margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            top: 60,
            right: 40,
            bottom: 80,
            left: 60,
        }
    }
}

impl ChartLayout {
    /// Plot area for a surface, `None` when the margins leave no room
    pub fn plot_rect(&self, size: Size) -> Option<PlotRect> {
        let x = f64::from(self.left);
        let y = f64::from(self.top);
        let width = size.width - x - f64::from(self.right);
        let height = size.height - y - f64::from(self.bottom);
        (size.is_valid() && width > 0.0 && height > 0.0).then_some(PlotRect {
            x,
            y,
            width,
            height,
        })
    }
}

/// Plot area inside the grid margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edges are inclusive
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Center x of a category. Categories sit on the axis ticks (no boundary gap),
    /// so the first and last land on the plot edges.
    pub fn category_x(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.x;
        }
        self.x + index as f64 * self.width / (count - 1) as f64
    }

    /// Fractional category index under a pixel column
    pub fn category_at(&self, x: f64, count: usize) -> f64 {
        if count <= 1 {
            return 0.0;
        }
        (x - self.x) / self.width * (count - 1) as f64
    }

    /// Pixel row of a score on the fixed 0..100 value axis
    pub fn value_y(&self, score: f64) -> f64 {
        self.bottom() - score / 100.0 * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_rect_uses_margins() {
        let rect = ChartLayout::default()
            .plot_rect(Size::new(1000.0, 400.0))
            .unwrap();
        assert_eq!(rect.x, 60.0);
        assert_eq!(rect.y, 60.0);
        assert_eq!(rect.width, 900.0);
        assert_eq!(rect.height, 260.0);
    }

    #[test]
    fn test_tiny_surface_has_no_plot_area() {
        assert!(ChartLayout::default().plot_rect(Size::new(90.0, 400.0)).is_none());
        assert!(ChartLayout::default().plot_rect(Size::new(0.0, 0.0)).is_none());
        assert!(ChartLayout::default().plot_rect(Size::new(f64::NAN, 400.0)).is_none());
    }

    #[test]
    fn test_category_positions() {
        let rect = ChartLayout::default()
            .plot_rect(Size::new(1000.0, 400.0))
            .unwrap();
        assert_eq!(rect.category_x(0, 10), 60.0);
        assert_eq!(rect.category_x(9, 10), 960.0);
        assert_eq!(rect.category_at(960.0, 10), 9.0);
        assert_eq!(rect.category_x(0, 1), 60.0);
        assert_eq!(rect.category_at(500.0, 1), 0.0);
        assert_eq!(rect.value_y(0.0), 320.0);
        assert_eq!(rect.value_y(100.0), 60.0);
    }
}
