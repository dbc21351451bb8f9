//! CLI entry point for the traffic delay tool.
//!
//! Provides subcommands for sampling road traffic into the observation log,
//! listing the roads of a city, and aggregating the log by road and by hour.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use traffic_delay::analyzers::analyzer::{analyze_hours, analyze_roads};
use traffic_delay::{
    collector::{TrafficSampleCollector, average_delay_index, top_delayed},
    config::TrafficConfig,
    delay::{DelayIndexCalculator, round2},
    infra::amap::AmapClient,
    output::append_observations,
    services::road_catalog::list_roads,
    speed::FreeFlowSpeedResolver,
};

#[derive(Parser)]
#[command(name = "traffic_delay")]
#[command(about = "Samples road traffic and ranks congestion by delay index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample traffic for every road in the city and append it to the log
    Collect {
        /// City to sample
        #[arg(long, default_value = "福州市")]
        city: String,

        /// Place-search keyword used to discover roads
        #[arg(short, long, default_value = "道路")]
        keyword: String,

        /// Number of place-search pages to read (50 roads per page)
        #[arg(short, long, default_value_t = 10)]
        pages: u32,

        /// CSV file to append observations to
        #[arg(short, long, default_value = "fuzhou_traffic.csv")]
        output: String,

        /// Optional JSON file with free-flow speeds and status fallbacks
        #[arg(long)]
        config: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Number of sample rounds to collect (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 1)]
        num_samples: usize,

        /// Sample rate: wait X seconds between rounds
        #[arg(short = 'r', long, default_value_t = 600)]
        sample_rate: u64,

        /// Number of most delayed roads to report per round
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// List the road names found for the city
    ListRoads {
        #[arg(long, default_value = "福州市")]
        city: String,

        #[arg(short, long, default_value = "道路")]
        keyword: String,

        #[arg(short, long, default_value_t = 5)]
        pages: u32,

        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
    /// Sum the delay index of each road over the whole log
    RoadSummary {
        /// Observation log to read
        #[arg(short, long, default_value = "fuzhou_traffic.csv")]
        input: String,

        /// CSV file to write the per-road totals to
        #[arg(short, long, default_value = "road_delay_summary.csv")]
        output: String,

        /// Number of roads to report
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Gzip compress the summary file
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Sum the delay index of each hour of day and find the peak hours
    HourlyTrend {
        /// Observation log to read
        #[arg(short, long, default_value = "fuzhou_traffic.csv")]
        input: String,

        /// CSV file to write the per-hour totals to
        #[arg(short, long, default_value = "hourly_traffic_summary.csv")]
        output: String,

        /// Number of peak hours to report
        #[arg(long, default_value_t = 3)]
        peaks: usize,

        /// Gzip compress the summary file
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/traffic_delay.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("traffic_delay.log"));

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

    if let Err(e) = run(cli.command).await {
        error!(error = ?e, "Run failed");
        return Err(e);
    }
    Ok(())
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Collect {
            city,
            keyword,
            pages,
            output,
            config,
            timeout,
            num_samples,
            sample_rate,
            top,
        } => {
            let config = match config {
                Some(path) => TrafficConfig::load(&path)?,
                None => TrafficConfig::default(),
            };
            collect(
                &city,
                &keyword,
                pages,
                &output,
                &config,
                Duration::from_secs(timeout),
                num_samples,
                sample_rate,
                top,
            )
            .await?;
        }
        Commands::ListRoads {
            city,
            keyword,
            pages,
            timeout,
        } => {
            let client = AmapClient::new(amap_key()?, Duration::from_secs(timeout))?;
            let roads = list_roads(&client, &city, &keyword, pages).await?;

            for road in &roads {
                info!(road = %road, "Road");
            }
            info!(total = roads.len(), city = %city, "Road list fetched");
        }
        Commands::RoadSummary {
            input,
            output,
            top,
            gzip,
        } => {
            let roads = analyze_roads(&input, &output, gzip)?;
            info!(roads = roads.len(), top, "Most congested roads");
            for (rank, road) in roads.iter().take(top).enumerate() {
                info!(
                    rank = rank + 1,
                    road = %road.road_name,
                    delay_index = round2(road.delay_index),
                    "Road total"
                );
            }
        }
        Commands::HourlyTrend {
            input,
            output,
            peaks,
            gzip,
        } => {
            let (hourly, peak) = analyze_hours(&input, &output, peaks, gzip)?;
            for h in &hourly {
                info!(
                    hour = %format!("{:02}:00", h.hour),
                    delay_index = round2(h.delay_index),
                    "Hourly total"
                );
            }
            for h in &peak {
                info!(
                    hour = %format!("{:02}:00", h.hour),
                    delay_index = round2(h.delay_index),
                    "Peak hour"
                );
            }
        }
    }

    Ok(())
}

fn amap_key() -> Result<String> {
    std::env::var("AMAP_KEY").context("AMAP_KEY must be set")
}

/// Discovers the city's roads once, then samples them for `num_samples`
/// rounds, appending every round to `output`.
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(skip(config))]
async fn collect(
    city: &str,
    keyword: &str,
    pages: u32,
    output: &str,
    config: &TrafficConfig,
    timeout: Duration,
    num_samples: usize,
    sample_rate: u64,
    top: usize,
) -> Result<()> {
    let client = AmapClient::new(amap_key()?, timeout)?;

    let roads = list_roads(&client, city, keyword, pages).await?;
    info!(road_count = roads.len(), "Roads ready for sampling");

    let collector = TrafficSampleCollector::new(
        &client,
        FreeFlowSpeedResolver::new(&config.free_flow_speeds),
        DelayIndexCalculator::new(&config.status_fallback),
    );

    if num_samples == 0 {
        info!(sample_rate, "Sampling infinitely. Press Ctrl+C to stop.");
    }

    let mut sample_count = 0;

    loop {
        // Check if we've reached the sample limit (0 = infinite)
        if num_samples > 0 && sample_count >= num_samples {
            break;
        }
        sample_count += 1;

        info!(sample = sample_count, "Starting sample round");

        let observations = collector.collect(city, &roads).await;
        let failed = observations.iter().filter(|o| o.status.is_error()).count();
        info!(
            observations = observations.len(),
            failed,
            average_delay_index = average_delay_index(&observations),
            "Sample round collected"
        );

        append_observations(output, &observations, Local::now().naive_local())?;
        info!(output, "Observations saved");

        for (rank, o) in top_delayed(&observations, top).into_iter().enumerate() {
            info!(
                rank = rank + 1,
                road = %o.road_name,
                delay_index = o.delay_index,
                speed = ?o.speed,
                status = %o.status,
                "Most delayed"
            );
        }

        // If not the last sample, wait before next round
        if num_samples == 0 || sample_count < num_samples {
            info!(sample_rate, "Waiting before next sample");
            tokio::time::sleep(Duration::from_secs(sample_rate)).await;
        }
    }

    info!(output, "Finished sampling");
    Ok(())
}
