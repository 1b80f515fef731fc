//! CLI mode implementations

mod compute;
mod insight;
mod table;

pub use compute::{BirthQuery, BirthTime, Gender, compute_report};
pub use insight::{Target, run_insight};
pub use table::run_table;

use std::fs;

use anyhow::{Context, Result};

use lifetrend::api::FortuneReport;
use lifetrend::chart::{ChartController, ChartLayout, HeadlessSurface, Size};
use lifetrend::lookup::dimension_info;
use lifetrend::trend::{ViewAction, ViewState};

use crate::output::{get_display_name, print_warning};

/// Read a saved calculate response
pub fn load_report(path: &str) -> Result<FortuneReport> {
    let json = fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    FortuneReport::from_json(&json)
        .with_context(|| format!("invalid payload {}", get_display_name(path)))
}

/// Controller for the report with the requested view, mounted on a headless surface
pub fn mount_chart(
    report: &FortuneReport,
    view: ViewState,
    size: Size,
) -> Result<ChartController<HeadlessSurface>> {
    let layout = ChartLayout::default();
    let mut controller = ChartController::new(report.trend_store(), layout);

    let dimension = view.active_dimension;
    let store = controller.store();
    if store.multi().is_some() && !store.has_dimension(dimension) {
        print_warning(&format!(
            "payload has no {} series, showing the overall trend",
            dimension_info(dimension).name
        ));
    }

    controller.dispatch(ViewAction::SelectDimension(dimension));
    controller.dispatch(ViewAction::SelectWindow(view.time_window));
    controller.mount(HeadlessSurface::new(size, layout)?);
    Ok(controller)
}

/// Write the mounted chart as PNG
pub fn save_chart(controller: &ChartController<HeadlessSurface>, path: &str) -> Result<()> {
    let surface = controller.surface().context("chart is not mounted")?;
    surface.save_image(path)?;
    eprintln!("Chart saved to: {}", path);
    Ok(())
}
