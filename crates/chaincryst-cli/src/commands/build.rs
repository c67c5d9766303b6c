use crate::cli::BuildArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use chaincryst::{
    core::utils::numeric::{format_decimal, round_to},
    engine::progress::ProgressReporter,
    workflows::{self, build::BuildReport},
};
use std::fmt::Write;
use tracing::{error, info};

pub async fn run(args: BuildArgs) -> Result<()> {
    let app = build_config(&args)?;
    info!(
        units = app.unit_paths.len(),
        output = %app.output_dir.display(),
        "Resolved configuration: {:?}",
        app.core_config
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Crystal Builder started ...");
    println!(
        "Maximum number of possible crystals for each polymer chain: {}",
        app.core_config.candidates_per_unit()
    );

    let report = tokio::task::block_in_place(|| {
        workflows::build::run(
            &app.unit_paths,
            &app.core_config,
            &app.output_dir,
            &reporter,
        )
    })?;

    print!("{}", format_summary(&report));
    println!("      crystal building completed.");
    println!(
        "      crystal building time: {} minutes",
        format_decimal(round_to(report.elapsed.as_secs_f64() / 60.0, 2))
    );

    if let Some(summary_path) = &app.summary_path {
        report.write_summary_to_path(summary_path)?;
        info!(path = %summary_path.display(), "Summary table written.");
        println!("Summary written to: {}", summary_path.display());
    }

    if report.failures.is_empty() {
        return Ok(());
    }
    for failure in &report.failures {
        error!(
            unit = %failure.unit_id,
            path = %failure.path.display(),
            "{}",
            failure.error
        );
    }
    Err(CliError::Other(anyhow::anyhow!(
        "{} of {} unit(s) failed: {}",
        report.failures.len(),
        report.failures.len() + report.results.len(),
        report
            .failures
            .iter()
            .map(|f| f.unit_id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

/// Renders the `ID, Count, radius` table, one row per successful unit.
fn format_summary(report: &BuildReport) -> String {
    let rows = report.summary_rows();
    let id_width = rows
        .iter()
        .map(|r| r.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<id_width$}  {:>7}  {:>8}", "ID", "Count", "radius");
    for row in rows {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:>7}  {:>8}",
            row.id,
            row.count,
            format_decimal(row.radius)
        );
    }
    out
}
