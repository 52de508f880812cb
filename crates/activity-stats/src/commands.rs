//! One function per subcommand. Output goes to the supplied writer so the
//! console sink can be captured in tests.

use std::io::Write;
use std::path::Path;

use activity_core::formatting::{format_number, render_table};
use activity_core::settings::Command;
use activity_data::analysis::{summarize_file, ActivitySummary};
use activity_data::filters::{filter_file, DateRangeFilter, DurationFilter, RowFilter, UsernameFilter};
use activity_data::writer::ExportTarget;
use anyhow::Result;
use tracing::info;

/// Execute `command`, writing user-facing output to `out`.
pub fn run(command: &Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Summary { file, json } => run_summary(file, *json, out),

        Command::DateRange {
            file,
            start_date,
            end_date,
            export,
        } => {
            let filter = DateRangeFilter::new(start_date, end_date)?;
            info!(
                "Filtering {} for logins between {} and {}",
                file.display(),
                filter.start(),
                filter.end()
            );
            run_filter(&filter, file, export.as_deref(), out)
        }

        Command::Duration {
            file,
            duration,
            export,
        } => {
            let filter = DurationFilter::new(*duration)?;
            info!(
                "Filtering {} for sessions of at least {}",
                file.display(),
                filter.min_duration()
            );
            run_filter(&filter, file, export.as_deref(), out)
        }

        Command::Username {
            file,
            username,
            export,
        } => {
            let filter = UsernameFilter::new(username);
            info!("Searching {} for username '{}'", file.display(), username);
            run_filter(&filter, file, export.as_deref(), out)
        }
    }
}

/// Validate the export target, load and filter `file`, then print and
/// optionally export the result. Nothing is exported when no row matches.
fn run_filter(
    filter: &dyn RowFilter,
    file: &Path,
    export: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let target = export.map(ExportTarget::new).transpose()?;
    let outcome = filter_file(filter, file)?;

    if outcome.source_was_empty() {
        writeln!(out, "No records found in {}.", file.display())?;
        return Ok(());
    }
    let matched = outcome.matched;
    if matched.is_empty() {
        writeln!(out, "{}", filter.no_match_message())?;
        return Ok(());
    }

    writeln!(out, "{}", render_table(&matched))?;
    info!("{} rows matched", matched.len());

    if let Some(target) = target {
        target.write(&matched)?;
        writeln!(out, "Results exported to {}", target.path.display())?;
    }
    Ok(())
}

fn run_summary(file: &Path, json: bool, out: &mut impl Write) -> Result<()> {
    let summary = summarize_file(file)?;
    if json {
        writeln!(out, "{}", summary.to_json()?)?;
    } else {
        write_summary_text(&summary, out)?;
    }
    Ok(())
}

fn write_summary_text(summary: &ActivitySummary, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Records: {}", summary.records)?;
    writeln!(out, "Total unique users: {}", summary.total_users)?;

    writeln!(out, "Sessions per user:")?;
    for user in &summary.sessions_per_user {
        writeln!(out, "  {}: {}", user.username, user.sessions)?;
    }

    writeln!(out, "Average session duration per user:")?;
    for user in &summary.average_duration_per_user {
        writeln!(
            out,
            "  {}: {}",
            user.username,
            format_number(user.average_duration, 2)
        )?;
    }

    writeln!(
        out,
        "Most common activity type: {}",
        summary.most_common_activity_type.as_deref().unwrap_or("none")
    )?;
    writeln!(
        out,
        "Longest session recorded: {}",
        summary
            .longest_session
            .map(|d| format_number(d, 2))
            .unwrap_or_else(|| "none".to_string())
    )?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
