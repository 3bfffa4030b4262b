//! Debug bundle writer for inspecting every intermediate analysis table.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::app::pipeline::RunOutput;
use crate::domain::RunConfig;
use crate::error::AppError;

/// Write a markdown bundle with the full daily series, the changepoint
/// findings, and the gender/daypart tables.
pub fn write_debug_bundle(run: &RunOutput, config: &RunConfig) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::render(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("pulse_debug_{ts}.md"));

    let mut file = File::create(&path)
        .map_err(|e| AppError::render(format!("Failed to create debug file: {e}")))?;
    let write_err = |e: std::io::Error| AppError::render(format!("Failed to write debug: {e}"));

    writeln!(file, "# pulse debug bundle").map_err(write_err)?;
    writeln!(file, "- generated: {}", Local::now().to_rfc3339()).map_err(write_err)?;
    writeln!(file, "- data_dir: {}", config.data_dir.display()).map_err(write_err)?;
    writeln!(
        file,
        "- files: {} (expected {})",
        run.ingest.files_read, config.expected_files
    )
    .map_err(write_err)?;
    writeln!(
        file,
        "- rows: {} read, {} used, {} dropped",
        run.ingest.rows_read,
        run.ingest.rows_used,
        run.ingest.row_errors.len()
    )
    .map_err(write_err)?;
    writeln!(file, "- boundary_mode: {:?}", config.boundary_mode).map_err(write_err)?;
    writeln!(file, "- alpha: {}", config.alpha).map_err(write_err)?;

    if !run.ingest.row_errors.is_empty() {
        writeln!(file, "\n## Dropped rows").map_err(write_err)?;
        writeln!(file, "| file | line | reason |").map_err(write_err)?;
        writeln!(file, "| - | - | - |").map_err(write_err)?;
        for err in &run.ingest.row_errors {
            writeln!(
                file,
                "| {} | {} | {} |",
                err.file.display(),
                err.line,
                err.message
            )
            .map_err(write_err)?;
        }
    }

    writeln!(file, "\n## Daily series").map_err(write_err)?;
    writeln!(file, "| day | count | delta |").map_err(write_err)?;
    writeln!(file, "| - | - | - |").map_err(write_err)?;
    for entry in &run.series.days {
        writeln!(
            file,
            "| {} | {} | {} |",
            entry.day,
            entry.count,
            entry
                .delta
                .map(|v| format!("{v:+}"))
                .unwrap_or_else(|| "-".to_string())
        )
        .map_err(write_err)?;
    }

    writeln!(file, "\n## Changepoint").map_err(write_err)?;
    match &run.changepoint {
        Ok(summary) => {
            writeln!(
                file,
                "- day: {} (count {}, delta {:+})",
                summary.changepoint.day, summary.changepoint.count, summary.changepoint.delta
            )
            .map_err(write_err)?;
            writeln!(
                file,
                "- t-test: t={:.6}, p={:.6e}, n={}",
                summary.ttest.statistic, summary.ttest.p_value, summary.ttest.n
            )
            .map_err(write_err)?;
            writeln!(
                file,
                "- significant at alpha={}: {}",
                config.alpha,
                summary.ttest.is_significant(config.alpha)
            )
            .map_err(write_err)?;
        }
        Err(err) => {
            writeln!(file, "- skipped: {err}").map_err(write_err)?;
        }
    }

    writeln!(file, "\n## Gender by day").map_err(write_err)?;
    writeln!(file, "| day | male | female | ratio |").map_err(write_err)?;
    writeln!(file, "| - | - | - | - |").map_err(write_err)?;
    for g in &run.gender {
        writeln!(
            file,
            "| {} | {} | {} | {} |",
            g.day,
            g.male,
            g.female,
            g.ratio()
                .map(|r| format!("{r:.4}"))
                .unwrap_or_else(|| "-".to_string())
        )
        .map_err(write_err)?;
    }

    writeln!(file, "\n## Dayparts").map_err(write_err)?;
    writeln!(file, "| daypart | count | share |").map_err(write_err)?;
    writeln!(file, "| - | - | - |").map_err(write_err)?;
    for share in &run.dayparts.shares {
        writeln!(
            file,
            "| {} | {} | {:.4} |",
            share.part.display_name(),
            share.count,
            share.share
        )
        .map_err(write_err)?;
    }
    writeln!(file, "| labeled | {} | 1.0000 |", run.dayparts.labeled).map_err(write_err)?;
    writeln!(file, "| unlabeled | {} | - |", run.dayparts.unlabeled).map_err(write_err)?;

    Ok(path)
}
