//! Year table mode (scores and markers of the visible window)

use anyhow::{Result, bail};

use lifetrend::api::FortuneReport;
use lifetrend::chart::Size;
use lifetrend::trend::ViewState;

use crate::output::{print_legend, print_report_info, print_view_info, print_year_table};

use super::{mount_chart, save_chart};

/// Print the filtered series, optionally saving the chart image
pub fn run_table(
    source: &str,
    report: &FortuneReport,
    view: ViewState,
    size: Size,
    image_path: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let controller = mount_chart(report, view, size)?;
    let points = controller.visible();
    if points.is_empty() {
        bail!("no years in the {} window", view.time_window);
    }

    if !quiet {
        print_report_info(source, report);
        print_view_info(view.active_dimension, view.time_window, points.len());
    }

    print_year_table(points);

    if !quiet {
        println!();
        print_legend(view.active_dimension);
    }

    if let Some(path) = image_path {
        save_chart(&controller, path)?;
    }
    Ok(())
}
