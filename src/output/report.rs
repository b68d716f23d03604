//! Console reports: dry run, probe table, elapsed time

use crate::config::Config;
use crate::miner::ProbeReport;
use std::time::Duration;

/// Width every probe table cell is padded or truncated to
pub const PROBE_CELL_WIDTH: usize = 15;

/// Formats a duration as `Xm Ys (S.SSs)`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}m {}s ({:.2}s)", secs / 60, secs % 60, elapsed.as_secs_f64())
}

fn cell(value: &str) -> String {
    let truncated: String = value.chars().take(PROBE_CELL_WIDTH).collect();
    format!("{:<width$}", truncated, width = PROBE_CELL_WIDTH)
}

/// Renders the probe results as a fixed-width table
pub fn format_probe_table(report: &ProbeReport) -> String {
    let mut lines = Vec::with_capacity(report.rows.len() + 2);

    let mut header = format!("{:<6}", "ID");
    for field in &report.fields {
        header.push_str("| ");
        header.push_str(&format!("{:<width$}", field, width = PROBE_CELL_WIDTH));
    }
    lines.push(header.trim_end().to_string());
    lines.push("-".repeat(header.trim_end().chars().count()));

    for (id, mapping) in &report.rows {
        let mut line = format!("{:<6}", id);
        for field in &report.fields {
            line.push_str("| ");
            line.push_str(&cell(mapping.get(field).unwrap_or_default()));
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Prints the probe table and the identifiers that were skipped
pub fn print_probe_report(report: &ProbeReport) {
    println!("=== Name Field Probe ({} foods) ===\n", report.rows.len());
    println!("{}", format_probe_table(report));

    if !report.skipped.is_empty() {
        println!("\nSkipped ({}):", report.skipped.len());
        for failure in &report.skipped {
            println!("  - {}: {}", failure.id, failure.reason);
        }
    }

    println!("\nThe right tag is the one that consistently holds the name, not the placeholder.");
}

/// Prints the effective configuration for `--dry-run`
pub fn print_dry_run(config: &Config) {
    println!("=== GastroMiner Dry Run ===\n");

    println!("Endpoints:");
    println!("  Query service: {}", config.endpoint.url);
    println!("  robots.txt: {}", config.endpoint.robots_url);

    println!("\nAgent:");
    println!("  User-Agent: {}", config.user_agent());

    println!("\nEngine:");
    println!("  Workers: {}", config.engine.workers);
    println!("  Throttle: {}ms", config.engine.throttle_ms);
    println!("  Request timeout: {}s", config.engine.timeout_secs);

    println!("\nOutput:");
    println!("  CSV file: {}", config.output.csv_path);
    println!("  Placeholder: {}", config.output.placeholder);

    let header = config.header();
    println!("\nSchema:");
    println!(
        "  Columns: {} ({} primary, {} detail)",
        header.len(),
        config.schema.primary_fields.len(),
        config.schema.detail_fields.len()
    );

    println!("\n✓ Configuration is valid");
}
