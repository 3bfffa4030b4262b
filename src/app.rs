//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the per-day sales CSVs
//! - generates synthetic datasets
//! - runs the daily/changepoint/gender/daypart analyses
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ReportArgs, SampleArgs};
use crate::domain::{ChartSize, PlotConfig, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `pulse` binary.
pub fn run() -> Result<(), AppError> {
    // We want `pulse` and `pulse -d sales/` to behave like `pulse report ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Sample(args) => handle_sample(args),
        Command::Debug(args) => handle_debug(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    // Print terminal output.
    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.series, &config)
    );
    if !run.ingest.row_errors.is_empty() {
        println!("{}", crate::report::format_row_errors(&run.ingest.row_errors, 5));
    }

    let changepoint = run
        .changepoint
        .as_ref()
        .ok()
        .map(|s| &s.changepoint);

    if config.plot {
        let plot = crate::plot::render_daily_trend(&run.series, changepoint, &config.plot_config);
        println!("{plot}");
    }

    match &run.changepoint {
        Ok(summary) => println!(
            "{}",
            crate::report::format_changepoint_summary(
                &summary.changepoint,
                &summary.ttest,
                config.alpha
            )
        ),
        Err(err) => println!("Changepoint analysis skipped: {err}\n"),
    }

    if config.plot {
        let plot = crate::plot::render_gender_trend(&run.gender, &config.plot_config);
        println!("{plot}");
    }
    println!("{}", crate::report::format_gender_summary(&run.gender));

    if config.plot {
        let plot = crate::plot::render_daypart_bars(&run.dayparts, &config.plot_config);
        println!("{plot}");
    }
    println!("{}", crate::report::format_daypart_table(&run.dayparts));

    // Optional exports.
    if let Some(path) = &config.export {
        crate::io::export::write_daily_csv(path, &run.series)?;
        println!("Exported daily series to {}", path.display());
    }
    if let Some(dir) = &config.render_dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::render(format!("Failed to create '{}': {e}", dir.display())))?;

        let daily = dir.join("daily_sales.svg");
        crate::plot::charts::render_daily_trend_svg(
            &daily,
            &run.series,
            changepoint,
            config.chart_size,
        )?;
        let gender = dir.join("gender_ratio.svg");
        crate::plot::charts::render_gender_trend_svg(&gender, &run.gender, config.chart_size)?;
        let dayparts = dir.join("daypart_shares.svg");
        crate::plot::charts::render_daypart_shares_svg(
            &dayparts,
            &run.dayparts,
            config.chart_size,
        )?;
        println!("Wrote charts to {}", dir.display());
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    let summary = crate::data::sample::write_sample_dataset(&config)?;
    println!(
        "Wrote {} files ({} rows) to {}",
        summary.files_written,
        summary.rows_written,
        config.out_dir.display()
    );
    Ok(())
}

fn handle_debug(args: ReportArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;
    let path = crate::debug::write_debug_bundle(&run, &config)?;
    println!("Wrote debug bundle to {}", path.display());
    Ok(())
}

pub fn run_config_from_args(args: &ReportArgs) -> RunConfig {
    RunConfig {
        data_dir: args.data_dir.clone(),
        alpha: args.alpha,
        expected_files: args.expected_files,
        boundary_mode: args.daypart_boundaries,
        plot: args.plot && !args.no_plot,
        plot_config: PlotConfig {
            width: args.width,
            height: args.height,
        },
        export: args.export.clone(),
        render_dir: args.render_dir.clone(),
        chart_size: ChartSize::default(),
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> crate::data::sample::SampleConfig {
    crate::data::sample::SampleConfig {
        out_dir: args.out_dir.clone(),
        days: args.days,
        start_day: args.start,
        seed: args.seed,
        base_rate: args.base_rate,
        jump_day: args.jump_day,
        jump_factor: args.jump_factor,
        male_share_start: args.male_share_start,
        male_share_end: args.male_share_end,
        unknown_share: args.unknown_share,
    }
}

/// Rewrite argv so `pulse` defaults to `pulse report`.
///
/// Rules:
/// - `pulse`                      -> `pulse report`
/// - `pulse -d sales/ ...`        -> `pulse report -d sales/ ...`
/// - `pulse --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "sample" | "debug");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "report flags".
    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_report() {
        assert_eq!(rewrite_args(args(&["pulse"])), args(&["pulse", "report"]));
    }

    #[test]
    fn leading_flags_go_to_report() {
        assert_eq!(
            rewrite_args(args(&["pulse", "-d", "sales"])),
            args(&["pulse", "report", "-d", "sales"])
        );
    }

    #[test]
    fn explicit_subcommands_pass_through() {
        assert_eq!(
            rewrite_args(args(&["pulse", "sample", "--days", "10"])),
            args(&["pulse", "sample", "--days", "10"])
        );
        assert_eq!(
            rewrite_args(args(&["pulse", "--help"])),
            args(&["pulse", "--help"])
        );
    }
}
