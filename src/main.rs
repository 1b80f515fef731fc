mod mode;
mod output;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lifetrend::chart::Point;
use lifetrend::config::Config;
use lifetrend::trend::{Dimension, TimeWindow, ViewState};

use mode::{
    BirthQuery, BirthTime, Gender, Target, compute_report, load_report, run_insight, run_table,
};
use output::print_error;

#[derive(Parser)]
#[command(
    name = "lifetrend",
    version,
    about = "Life-fortune trend chart with click-to-year selection and streamed yearly insights",
    after_help = "Examples:
  lifetrend report.json                                 Year table of the overall trend
  lifetrend report.json -d career -w second-half        Career scores from year 40 on
  lifetrend report.json --image trend.png               Also save the chart as PNG
  lifetrend report.json --year 2024                     Stream the insight for 2024
  lifetrend report.json --click 510,200                 Select the year under a pointer click
  lifetrend report.json --api http://host:8000 -y 2030  Use another analysis service
  lifetrend --birth 1990-05-15T10:30 --gender female --province 北京市 --city 北京
                                                        Calculate a fresh report first

Dimensions: overall, career, wealth, health, love, parents, children
Logging: set RUST_LOG (default warn)"
)]
struct Args {
    /// Fortune payload (saved response of the calculate endpoint)
    #[arg(required_unless_present = "birth", conflicts_with = "birth")]
    payload: Option<String>,

    /// Calculate the report from a birth date and time (YYYY-MM-DDTHH:MM)
    #[arg(long, value_name = "DATETIME", value_parser = BirthTime::from_str)]
    birth: Option<BirthTime>,

    /// Gender for the calculation: male or female
    #[arg(long, default_value = "male", value_parser = Gender::from_str, requires = "birth")]
    gender: Gender,

    /// The birth date is a lunar calendar date
    #[arg(long, requires = "birth")]
    lunar: bool,

    /// Birth province, used to look up the city longitude
    #[arg(long, requires = "birth")]
    province: Option<String>,

    /// Birth city (defaults to the first city of the province)
    #[arg(long, requires = "province")]
    city: Option<String>,

    /// Name shown in the report header
    #[arg(long, default_value = "", requires = "birth")]
    nickname: String,

    /// Life dimension to chart
    #[arg(short, long, default_value = "overall", value_parser = Dimension::from_str)]
    dimension: Dimension,

    /// Year window: first-half, second-half or all
    #[arg(short, long, default_value = "all", value_parser = TimeWindow::from_str)]
    window: TimeWindow,

    /// Output the chart as PNG image (table mode only)
    #[arg(long, value_name = "PATH")]
    image: Option<String>,

    /// Select a year and stream its insight
    #[arg(short, long, conflicts_with = "click")]
    year: Option<i32>,

    /// Simulated pointer click in chart pixels; repeat to supersede
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    click: Vec<Point>,

    /// Analysis service base URL
    #[arg(long, value_name = "URL")]
    api: Option<String>,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Chart width in pixels
    #[arg(long)]
    width: Option<f64>,

    /// Chart height in pixels
    #[arg(long)]
    height: Option<f64>,

    /// Suppress headers and legends (show data only)
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y (got {})", s))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate {}: {}", v, e))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

fn init_tracing(ansi: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .init();
}

fn run(args: Args) -> Result<()> {
    let target = match args.year {
        Some(year) => Some(Target::Year(year)),
        None if !args.click.is_empty() => Some(Target::Clicks(args.click.clone())),
        None => None,
    };

    if args.image.is_some() && target.is_some() {
        bail!("--image cannot be used with --year or --click");
    }

    // Validate image output path
    if let Some(ref path) = args.image
        && let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        bail!("Directory does not exist: {}", parent.display());
    }

    let mut config = Config::load(args.config.as_deref())?;
    config.override_base_url(args.api.clone());
    if let Some(width) = args.width {
        config.chart.width = width;
    }
    if let Some(height) = args.height {
        config.chart.height = height;
    }
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let (source, report) = match (args.payload, args.birth) {
        (Some(path), _) => {
            let report = load_report(&path)?;
            (path, report)
        }
        (None, Some(time)) => {
            let query = BirthQuery {
                nickname: args.nickname,
                time,
                gender: args.gender,
                is_lunar: args.lunar,
                province: args.province,
                city: args.city,
            };
            let report = runtime.block_on(compute_report(&query, &config.api))?;
            (query.source(), report)
        }
        (None, None) => bail!("a payload file or --birth is required"),
    };
    let view = ViewState {
        active_dimension: args.dimension,
        time_window: args.window,
    };

    match target {
        None => run_table(
            &source,
            &report,
            view,
            config.chart.size(),
            args.image.as_deref(),
            args.quiet,
        ),
        Some(target) => runtime.block_on(run_insight(
            &source,
            &report,
            view,
            &target,
            &config,
            args.quiet,
        )),
    }
}

fn main() {
    let args = Args::parse();

    // Handle --no-color
    if args.no_color {
        colored::control::set_override(false);
    }
    init_tracing(!args.no_color);

    if let Err(e) = run(args) {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
