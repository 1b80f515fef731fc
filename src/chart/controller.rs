//! Chart lifecycle, view changes and pointer selection

use tracing::{debug, warn};

use crate::trend::{
    Dimension, SelectedYear, TrendPoint, TrendStore, ViewAction, ViewState, reduce,
};

use super::layout::{ChartLayout, Point, Size};
use super::option::build_frame;
use super::resolver::CoordinateResolver;
use super::surface::ChartSurface;

pub type YearSelectedHandler = Box<dyn FnMut(&SelectedYear) + Send>;
pub type DimensionChangedHandler = Box<dyn FnMut(Dimension) + Send>;

/// Owns one surface per mount and turns pointer events into year selections
pub struct ChartController<S: ChartSurface> {
    store: TrendStore,
    view: ViewState,
    layout: ChartLayout,
    resolver: CoordinateResolver,
    surface: Option<S>,
    /// Snapshot of the filtered sequence currently on the surface
    visible: Vec<TrendPoint>,
    selected: Option<SelectedYear>,
    listening: bool,
    on_year_selected: Option<YearSelectedHandler>,
    on_dimension_changed: Option<DimensionChangedHandler>,
}

impl<S: ChartSurface> ChartController<S> {
    pub fn new(store: TrendStore, layout: ChartLayout) -> Self {
        let view = ViewState::default();
        let visible = store.filtered(&view).to_vec();
        Self {
            store,
            view,
            layout,
            resolver: CoordinateResolver::new(layout),
            surface: None,
            visible,
            selected: None,
            listening: false,
            on_year_selected: None,
            on_dimension_changed: None,
        }
    }

    pub fn on_year_selected(&mut self, handler: impl FnMut(&SelectedYear) + Send + 'static) {
        self.on_year_selected = Some(Box::new(handler));
    }

    pub fn on_dimension_changed(&mut self, handler: impl FnMut(Dimension) + Send + 'static) {
        self.on_dimension_changed = Some(Box::new(handler));
    }

    pub fn store(&self) -> &TrendStore {
        &self.store
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn layout(&self) -> ChartLayout {
        self.layout
    }

    pub fn visible(&self) -> &[TrendPoint] {
        &self.visible
    }

    pub fn selected(&self) -> Option<&SelectedYear> {
        self.selected.as_ref()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Attach a surface and draw the current view. A previous surface is disposed first.
    pub fn mount(&mut self, surface: S) {
        self.unmount();
        self.surface = Some(surface);
        self.listening = true;
        self.refresh();
    }

    /// Stop listening and release the surface
    pub fn unmount(&mut self) {
        self.listening = false;
        if let Some(mut surface) = self.surface.take() {
            surface.dispose();
            debug!("chart surface disposed");
        }
    }

    /// Apply a view action, rebuilding the chart when the view changed
    pub fn dispatch(&mut self, action: ViewAction) {
        let next = reduce(self.view, action);
        if next == self.view {
            return;
        }
        let dimension_changed = next.active_dimension != self.view.active_dimension;
        self.view = next;
        self.refresh();

        if dimension_changed {
            if let Some(handler) = self.on_dimension_changed.as_mut() {
                handler(next.active_dimension);
            }
        }
    }

    /// Recompute the visible sequence and hand a fresh chart to the surface
    pub fn refresh(&mut self) {
        self.visible = self.store.filtered(&self.view).to_vec();
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let frame = build_frame(&self.visible, self.view.active_dimension, self.layout);
        if let Err(e) = surface.render(frame) {
            warn!(error = %e, "chart render failed");
        }
    }

    /// Relayout only; view state and selection are kept
    pub fn resize(&mut self, size: Size) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let Err(e) = surface.resize(size) {
            warn!(error = %e, "chart resize skipped");
        }
    }

    /// Handle one pointer event. Emits at most one selection.
    pub fn handle_click(&mut self, point: Point) -> Option<SelectedYear> {
        if !self.listening {
            return None;
        }
        let surface = self.surface.as_ref()?;
        let len = self.visible.len();

        let index = match surface.hit_series(point).filter(|&i| i < len) {
            Some(index) => {
                debug!(index, "series hit");
                index
            }
            None => {
                let resolution = self.resolver.resolve(surface, point, len)?;
                debug!(
                    index = resolution.index,
                    strategy = ?resolution.strategy,
                    "click resolved"
                );
                resolution.index
            }
        };
        self.select_index(index)
    }

    /// Select a visible year directly
    pub fn select_year(&mut self, year: i32) -> Option<SelectedYear> {
        let index = self.visible.iter().position(|p| p.year == year)?;
        self.select_index(index)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn select_index(&mut self, index: usize) -> Option<SelectedYear> {
        let point = self.visible.get(index)?.clone();
        let selection = SelectedYear {
            point,
            dimension: self.view.active_dimension,
        };
        self.selected = Some(selection.clone());
        if let Some(handler) = self.on_year_selected.as_mut() {
            handler(&selection);
        }
        Some(selection)
    }
}

impl<S: ChartSurface> Drop for ChartController<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
