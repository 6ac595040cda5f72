//! CLI entry point for the Olympics stats dashboard.
//!
//! Each subcommand computes one dashboard tab (or all of them) from the
//! reference tables and hands the result to a presenter: files under
//! `--out`, or log output when no directory is given.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use olympics_stats::config::{DataOverrides, DataPaths};
use olympics_stats::dashboard::{
    AGE_TITLE, BODY_TITLE, Dashboard, FilterParams, HEATMAP_TITLE, LEADERBOARD_TITLE,
    MEDALS_TITLE, WORLD_MAP_TITLE,
};
use olympics_stats::data::DataContext;
use olympics_stats::data::loader::load_regions;
use olympics_stats::output::{FilePresenter, LogPresenter, Presenter};
use olympics_stats::pipeline::types::{ChoroplethFeature, Heatmap, Series};
use olympics_stats::pipeline::{
    SortMode, biometrics, filter_results, heatmap, join_geometry, leaderboard, medal_pivot_global,
    medal_series, medals_by_country_year,
};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "olympics_stats")]
#[command(about = "Explore Olympic Games medals, athletes and trends", long_about = None)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// JSON file overriding data file locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding noc_regions.csv, results.csv and bios_locs.csv
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// GeoJSON file with country boundaries
    #[arg(long, global = true)]
    geometry: Option<PathBuf>,
}

#[derive(Args)]
struct Selection {
    /// NOC code to include; repeat for several countries (default: POL)
    #[arg(short, long = "country", value_name = "NOC")]
    countries: Vec<String>,

    /// Only include Summer Games results
    #[arg(long, default_value_t = false)]
    no_winter: bool,
}

#[derive(Args)]
struct Output {
    /// Directory to write artifacts into; logs a summary when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List country codes ordered by region name
    Regions,
    /// Medal counts by year for the selected countries
    Medals {
        #[command(flatten)]
        selection: Selection,
        #[command(flatten)]
        output: Output,
    },
    /// Total medals per country joined onto country geometry
    WorldMap {
        #[command(flatten)]
        output: Output,
    },
    /// Birth locations of athletes from the selected countries
    Heatmap {
        #[command(flatten)]
        selection: Selection,
        #[command(flatten)]
        output: Output,
    },
    /// Top 50 athletes by medal count
    Leaderboard {
        #[command(flatten)]
        selection: Selection,
        /// Sort by total medals or by gold/silver/bronze
        #[arg(short, long, default_value_t = SortMode::Total)]
        sort: SortMode,
        #[command(flatten)]
        output: Output,
    },
    /// Mean height, weight and age by year
    Biometrics {
        #[command(flatten)]
        selection: Selection,
        #[command(flatten)]
        output: Output,
    },
    /// Compute every tab at once
    Dashboard {
        #[command(flatten)]
        selection: Selection,
        #[arg(short, long, default_value_t = SortMode::Total)]
        sort: SortMode,
        #[command(flatten)]
        output: Output,
    },
}

/// Presenter chosen at runtime from `--out`.
enum Sink {
    Files(FilePresenter),
    Log(LogPresenter),
}

impl Sink {
    fn open(output: &Output) -> Result<Self> {
        match &output.out {
            Some(dir) => Ok(Sink::Files(FilePresenter::new(dir)?)),
            None => Ok(Sink::Log(LogPresenter { max_rows: Some(10) })),
        }
    }

    fn finish(self) {
        if let Sink::Files(files) = self {
            for path in files.written() {
                info!(path = %path.display(), "Artifact written");
            }
        }
    }
}

impl Presenter for Sink {
    fn render_line_chart(&mut self, title: &str, series: &[Series]) -> Result<()> {
        match self {
            Sink::Files(p) => p.render_line_chart(title, series),
            Sink::Log(p) => p.render_line_chart(title, series),
        }
    }

    fn render_choropleth(&mut self, title: &str, features: &[ChoroplethFeature]) -> Result<()> {
        match self {
            Sink::Files(p) => p.render_choropleth(title, features),
            Sink::Log(p) => p.render_choropleth(title, features),
        }
    }

    fn render_heatmap(&mut self, title: &str, heatmap: &Heatmap) -> Result<()> {
        match self {
            Sink::Files(p) => p.render_heatmap(title, heatmap),
            Sink::Log(p) => p.render_heatmap(title, heatmap),
        }
    }

    fn render_table<T: Serialize>(&mut self, title: &str, rows: &[T]) -> Result<()> {
        match self {
            Sink::Files(p) => p.render_table(title, rows),
            Sink::Log(p) => p.render_table(title, rows),
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/olympics_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("olympics_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let paths = resolve_paths(&cli.data)?;

    match cli.command {
        Commands::Regions => list_regions(&paths.regions)?,
        Commands::Medals { selection, output } => {
            let ctx = load(&paths)?;
            let params = filter_params(&selection, SortMode::Total);
            let view = filter_results(&ctx, &params.countries, params.include_winter);
            let medals = medals_by_country_year(&view);
            let series = medal_series(&medals, &params.countries, ctx.regions());

            let mut sink = Sink::open(&output)?;
            sink.render_line_chart(MEDALS_TITLE, &series)?;
            sink.finish();
        }
        Commands::WorldMap { output } => {
            let ctx = load(&paths)?;
            let pivot = medal_pivot_global(&ctx);
            let features = join_geometry(&pivot, ctx.geometries());

            let mut sink = Sink::open(&output)?;
            sink.render_choropleth(WORLD_MAP_TITLE, &features)?;
            sink.render_table("Medal Pivot", &pivot)?;
            sink.finish();
        }
        Commands::Heatmap { selection, output } => {
            let ctx = load(&paths)?;
            let params = filter_params(&selection, SortMode::Total);
            let map = heatmap(&ctx, &params.countries);

            let mut sink = Sink::open(&output)?;
            sink.render_heatmap(HEATMAP_TITLE, &map)?;
            sink.finish();
        }
        Commands::Leaderboard {
            selection,
            sort,
            output,
        } => {
            let ctx = load(&paths)?;
            let params = filter_params(&selection, sort);
            let view = filter_results(&ctx, &params.countries, params.include_winter);
            let board = leaderboard(&ctx, &view, params.sort_mode);

            let mut sink = Sink::open(&output)?;
            sink.render_table(LEADERBOARD_TITLE, &board)?;
            sink.finish();
        }
        Commands::Biometrics { selection, output } => {
            let ctx = load(&paths)?;
            let params = filter_params(&selection, SortMode::Total);
            let view = filter_results(&ctx, &params.countries, params.include_winter);
            let stats = biometrics(&ctx, &view);

            let mut sink = Sink::open(&output)?;
            sink.render_table(BODY_TITLE, &stats.body)?;
            sink.render_table(AGE_TITLE, &stats.age)?;
            sink.finish();
        }
        Commands::Dashboard {
            selection,
            sort,
            output,
        } => {
            let ctx = load(&paths)?;
            let params = filter_params(&selection, sort);
            let dashboard = Dashboard::compute(&ctx, &params);

            let mut sink = Sink::open(&output)?;
            dashboard.render(&mut sink)?;
            sink.finish();
        }
    }

    Ok(())
}

/// Loads every table. Each tab depends on complete reference data, so a
/// failure here aborts before anything is rendered.
fn load(paths: &DataPaths) -> Result<DataContext> {
    DataContext::load(paths).context("failed to load reference data")
}

/// Defaults, then environment, then `--config`, then explicit flags.
fn resolve_paths(args: &DataArgs) -> Result<DataPaths> {
    let mut paths = DataPaths::from_env();

    if let Some(config) = &args.config {
        paths = paths.with_overrides(DataOverrides::load(config)?);
    }

    Ok(paths.with_overrides(DataOverrides {
        data_dir: args.data_dir.clone(),
        geometry: args.geometry.clone(),
        ..Default::default()
    }))
}

fn filter_params(selection: &Selection, sort_mode: SortMode) -> FilterParams {
    if selection.countries.is_empty() {
        FilterParams {
            include_winter: !selection.no_winter,
            sort_mode,
            ..FilterParams::default()
        }
    } else {
        FilterParams::new(&selection.countries, !selection.no_winter, sort_mode)
    }
}

/// Logs every known country code, ordered by region name.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
fn list_regions(path: &Path) -> Result<()> {
    let regions = load_regions(path).context("failed to load region directory")?;
    let directory = olympics_stats::data::RegionDirectory::new(regions);

    for region in directory.ordered() {
        info!(code = %region.code, region = %region.name, "Region");
    }
    info!(total = directory.len(), "Region list complete");
    Ok(())
}
