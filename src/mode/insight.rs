//! Insight mode: select a year on the chart and stream its interpretation

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Result, bail};
use colored::*;
use tokio::sync::mpsc;
use tracing::debug;

use lifetrend::api::{FortuneClient, FortuneReport};
use lifetrend::chart::Point;
use lifetrend::config::Config;
use lifetrend::insight::{InsightSession, InsightState, InsightView};
use lifetrend::trend::ViewState;

use crate::output::{print_report_info, print_selection, print_warning};

use super::mount_chart;

/// How the year is chosen
#[derive(Debug, Clone)]
pub enum Target {
    Year(i32),
    /// Pointer events in order; each one supersedes the previous selection
    Clicks(Vec<Point>),
}

pub async fn run_insight(
    source: &str,
    report: &FortuneReport,
    view: ViewState,
    target: &Target,
    config: &Config,
    quiet: bool,
) -> Result<()> {
    let mut controller = mount_chart(report, view, config.chart.size())?;
    let (tx, mut selections) = mpsc::unbounded_channel();
    controller.on_year_selected(move |selection| {
        let _ = tx.send(selection.clone());
    });

    match target {
        Target::Year(year) => {
            if controller.select_year(*year).is_none() {
                bail!("year {} is not in the {} window", year, view.time_window);
            }
        }
        Target::Clicks(points) => {
            for point in points {
                if controller.handle_click(*point).is_none() {
                    print_warning(&format!(
                        "click at {},{} is outside the plot area",
                        point.x, point.y
                    ));
                }
            }
        }
    }
    controller.unmount();

    let client = FortuneClient::new(&config.api)?;
    let mut session = InsightSession::new(
        Arc::new(client),
        report.insight_context(),
        config.insight.timing(),
    );

    let mut latest = None;
    while let Ok(selection) = selections.try_recv() {
        if let Some(previous) = latest.replace(session.select(selection)) {
            debug!(previous, "selection superseded");
        }
    }
    if latest.is_none() {
        bail!("no year selected");
    }

    if !quiet {
        print_report_info(source, report);
    }
    let view = session.view();
    if let Some(selection) = view.state.selection() {
        print_selection(selection, view.state.status_label());
    }

    let view = stream_insight(&mut session).await?;
    match view.state {
        InsightState::Canceled { .. } => print_warning("insight canceled"),
        _ if !quiet => println!("{}", view.state.status_label().dimmed()),
        _ => {}
    }
    Ok(())
}

/// Print revealed text as it arrives until the session settles. Ctrl-C cancels.
async fn stream_insight(session: &mut InsightSession) -> Result<InsightView> {
    let mut updates = session.subscribe();
    let mut stdout = io::stdout();
    let mut printed = 0;
    let mut interrupted = false;

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        let view = updates.borrow_and_update().clone();
        if let Some(fresh) = view.text.get(printed..)
            && !fresh.is_empty()
        {
            write!(stdout, "{}", fresh)?;
            stdout.flush()?;
        }
        printed = view.text.len();

        if !view.state.is_active() {
            println!();
            return Ok(view);
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    println!();
                    return Ok(view);
                }
            }
            _ = &mut interrupt, if !interrupted => {
                interrupted = true;
                session.cancel();
            }
        }
    }
}
