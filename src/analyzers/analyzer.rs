use anyhow::Result;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::aggregate::{peak_hours, total_by_hour, total_by_road};
use crate::analyzers::error::AnalysisError;
use crate::analyzers::types::{HistoryRecord, HourlyAggregate, RoadAggregate};
use crate::output::write_summary;

/// Reads every row of the observation log at `path`.
///
/// A missing file is reported as [`AnalysisError::NoInputData`]; nothing is
/// aggregated from a log that cannot be read completely.
pub fn load_history(path: &str) -> Result<Vec<HistoryRecord>, AnalysisError> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(AnalysisError::NoInputData(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: HistoryRecord = result?;
        rows.push(record);
    }

    let without_index = rows.iter().filter(|r| r.delay_index.is_none()).count();
    if without_index > 0 {
        debug!(without_index, "Rows without a delay index count as zero");
    }
    info!(path = %path.display(), rows = rows.len(), "Observation log loaded");
    Ok(rows)
}

/// Per-road totals for the log at `input`, exported to `output`.
#[tracing::instrument]
pub fn analyze_roads(input: &str, output: &str, gzip: bool) -> Result<Vec<RoadAggregate>> {
    let history = load_history(input)?;
    let roads = total_by_road(&history);
    info!(roads = roads.len(), "Road totals computed");

    write_summary(output, &roads, gzip)?;
    Ok(roads)
}

/// Hour-of-day totals for the log at `input`, exported to `output`, along
/// with the `peaks` most congested hours.
#[tracing::instrument]
pub fn analyze_hours(
    input: &str,
    output: &str,
    peaks: usize,
    gzip: bool,
) -> Result<(Vec<HourlyAggregate>, Vec<HourlyAggregate>)> {
    let history = load_history(input)?;
    let hourly = total_by_hour(&history);
    let peak = peak_hours(&hourly, peaks);
    info!(hours = hourly.len(), peaks = peak.len(), "Hourly totals computed");

    write_summary(output, &hourly, gzip)?;
    Ok((hourly, peak))
}
