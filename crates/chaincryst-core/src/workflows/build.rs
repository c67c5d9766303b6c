use crate::engine::config::SearchConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::workflows::search::{self, UnitResult, resolve_input_path, unit_id_from_path};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const SUMMARY_COLUMNS: [&str; 3] = ["ID", "Count", "radius"];

/// One row of the batch summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Count")]
    pub count: usize,
    pub radius: f64,
}

impl From<&UnitResult> for SummaryRow {
    fn from(result: &UnitResult) -> Self {
        Self {
            id: result.unit_id.clone(),
            count: result.accepted_count,
            radius: result.radius,
        }
    }
}

/// A unit whose search could not run. Sibling units are unaffected.
#[derive(Debug)]
pub struct UnitFailure {
    pub unit_id: String,
    pub path: PathBuf,
    pub error: EngineError,
}

#[derive(Debug)]
pub struct BuildReport {
    /// Successful units, in input order.
    pub results: Vec<UnitResult>,
    /// Failed units, in input order.
    pub failures: Vec<UnitFailure>,
    /// Upper bound on crystals per unit (`n_samples³`).
    pub candidates_per_unit: usize,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        self.results.iter().map(SummaryRow::from).collect()
    }

    pub fn total_accepted(&self) -> usize {
        self.results.iter().map(|r| r.accepted_count).sum()
    }

    /// Serializes the `ID, Count, radius` table as CSV. The header row is always
    /// written, also when no unit succeeded.
    pub fn write_summary<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(SUMMARY_COLUMNS)?;
        for row in self.summary_rows() {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the summary table to a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Summary`] if the file cannot be created or written.
    pub fn write_summary_to_path(&self, path: &Path) -> Result<(), EngineError> {
        let to_error = |source: csv::Error| EngineError::Summary {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::create(path).map_err(|e| to_error(e.into()))?;
        self.write_summary(file).map_err(to_error)
    }
}

/// Searches every unit independently and collects their results.
///
/// Units run in parallel on the current rayon pool when the `parallel` feature is
/// enabled. A unit that fails (unreadable, malformed, degenerate) is recorded in
/// [`BuildReport::failures`] and never aborts its siblings.
///
/// # Errors
///
/// Returns [`EngineError::OutputDirectory`] if `out_dir` cannot be created.
#[instrument(skip_all, name = "build_workflow", fields(units = unit_paths.len()))]
pub fn run(
    unit_paths: &[PathBuf],
    config: &SearchConfig,
    out_dir: &Path,
    reporter: &ProgressReporter,
) -> Result<BuildReport, EngineError> {
    let start = Instant::now();
    std::fs::create_dir_all(out_dir).map_err(|e| EngineError::OutputDirectory {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    info!(
        n_samples = config.n_samples,
        radius = %config.radius,
        candidates_per_unit = config.candidates_per_unit(),
        "Crystal building started."
    );
    reporter.report(Progress::PhaseStart {
        name: "Crystal building",
    });
    reporter.report(Progress::TaskStart {
        total_steps: unit_paths.len() as u64,
    });

    let search_unit = |path: &PathBuf| -> Result<UnitResult, UnitFailure> {
        let outcome = search::run_from_path(path, config, out_dir);
        match &outcome {
            Ok(result) => {
                if result.failed_writes > 0 {
                    reporter.report(Progress::Message(format!(
                        "{}: {} of {} accepted crystal file(s) could not be written",
                        result.unit_id, result.failed_writes, result.accepted_count
                    )));
                }
                reporter.report(Progress::UnitFinished {
                    unit_id: result.unit_id.clone(),
                    accepted: result.accepted_count,
                });
            }
            Err(e) => {
                let unit_id = unit_id_from_path(&resolve_input_path(path));
                error!(unit = %unit_id, error = %e, "Unit search failed.");
                reporter.report(Progress::UnitFailed {
                    unit_id,
                    reason: e.to_string(),
                });
            }
        }
        reporter.report(Progress::TaskIncrement);
        outcome.map_err(|error| UnitFailure {
            unit_id: unit_id_from_path(&resolve_input_path(path)),
            path: path.clone(),
            error,
        })
    };

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<_> = unit_paths.iter().map(search_unit).collect();

    #[cfg(feature = "parallel")]
    let outcomes: Vec<_> = unit_paths.par_iter().map(search_unit).collect();

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let mut results = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(failure) => failures.push(failure),
        }
    }

    let report = BuildReport {
        results,
        failures,
        candidates_per_unit: config.candidates_per_unit(),
        elapsed: start.elapsed(),
    };
    info!(
        succeeded = report.results.len(),
        failed = report.failures.len(),
        total_accepted = report.total_accepted(),
        elapsed_secs = report.elapsed.as_secs_f64(),
        "Crystal building completed."
    );
    Ok(report)
}
