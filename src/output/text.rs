//! Human-readable text output
//!
//! Renders a report as a fixed set of labeled lines. The same lines go to the
//! log and, when requested, to an append-only result file.

use super::Report;
use crate::Result;
use anyhow::Context;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Failed task names listed before the rest are summarized
const MAX_LISTED_FAILURES: usize = 5;

/// Render the report lines
pub fn render_lines(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("----- dfsio ----- : {}", report.mode));
    lines.push(format!("           Date & time: {}", report.timestamp));
    if let Some(ref host) = report.hostname {
        lines.push(format!("                  Host: {}", host));
    }
    lines.push(format!(
        "       Number of files: {} (of {} requested)",
        report.executed_tasks, report.requested_tasks
    ));
    lines.push(format!("Total MBytes processed: {:.2}", report.total_mb));

    match report.rates {
        Some(rates) => {
            lines.push(format!("     Throughput mb/sec: {:.2}", rates.throughput_mb_s));
            lines.push(format!("Average IO rate mb/sec: {:.2}", rates.mean_rate_mb_s));
            lines.push(format!(" IO rate std deviation: {:.2}", rates.std_dev_mb_s));
        }
        None => {
            lines.push("     Throughput mb/sec: no data".to_string());
            lines.push("Average IO rate mb/sec: no data".to_string());
            lines.push(" IO rate std deviation: no data".to_string());
        }
    }

    lines.push(format!("    Test exec time sec: {:.3}", report.elapsed_secs));
    lines.push(format!("      Buffer size (B): {}", report.buffer_size));
    if let Some(codec) = report.compression {
        lines.push(format!("           Compression: {}", codec));
    }

    if !report.failures.is_empty() {
        let listed: Vec<&str> = report
            .failures
            .iter()
            .take(MAX_LISTED_FAILURES)
            .map(|f| f.task.as_str())
            .collect();
        let more = report.failures.len().saturating_sub(MAX_LISTED_FAILURES);
        let suffix = if more > 0 {
            format!(" and {} more", more)
        } else {
            String::new()
        };
        lines.push(format!(
            "          Failed tasks: {} ({}{})",
            report.failures.len(),
            listed.join(", "),
            suffix
        ));
    }

    lines
}

/// Emit the report through the log
pub fn log_report(report: &Report) {
    for line in render_lines(report) {
        info!("{}", line);
    }
    if report.is_degraded() {
        warn!(
            executed = report.executed_tasks,
            requested = report.requested_tasks,
            "degraded run: not every task succeeded"
        );
    }
}

/// Append the report lines, followed by a blank line, to `path`
pub fn append_to_file(report: &Report, path: &Path) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open result file: {}", path.display()))?;

    for line in render_lines(report) {
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write result file: {}", path.display()))?;
    }
    writeln!(file)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompressionCodec, RunMode};
    use crate::output::RateSummary;
    use crate::stats::aggregator::TaskFailure;
    use tempfile::TempDir;

    fn report(rates: Option<RateSummary>, failures: usize) -> Report {
        Report {
            mode: RunMode::Write,
            timestamp: "Sat Oct 17 12:00:00 +00:00 2026".into(),
            hostname: Some("node01".into()),
            requested_tasks: 10,
            executed_tasks: 10 - failures as u64,
            failures: (0..failures)
                .map(|i| TaskFailure {
                    task: format!("test_io_{}", i),
                    error: "boom".into(),
                })
                .collect(),
            total_bytes: 10 * 1024 * 1024,
            total_mb: 10.0,
            elapsed_secs: 2.5,
            buffer_size: 1_000_000,
            compression: Some(CompressionCodec::Gzip),
            rates,
        }
    }

    #[test]
    fn test_render_labeled_lines() {
        let rates = RateSummary {
            throughput_mb_s: 4.0,
            mean_rate_mb_s: 20.0,
            std_dev_mb_s: 8.165,
        };
        let lines = render_lines(&report(Some(rates), 0));
        let text = lines.join("\n");

        assert_eq!(lines[0], "----- dfsio ----- : write");
        assert!(text.contains("Date & time: Sat Oct 17"));
        assert!(text.contains("Number of files: 10 (of 10 requested)"));
        assert!(text.contains("Total MBytes processed: 10.00"));
        assert!(text.contains("Throughput mb/sec: 4.00"));
        assert!(text.contains("Average IO rate mb/sec: 20.00"));
        assert!(text.contains("IO rate std deviation: 8.17"));
        assert!(text.contains("Test exec time sec: 2.500"));
        assert!(text.contains("Compression: gzip"));
        assert!(!text.contains("Failed tasks"));
    }

    #[test]
    fn test_render_no_data() {
        let lines = render_lines(&report(None, 10));
        let text = lines.join("\n");
        assert!(text.contains("Throughput mb/sec: no data"));
        assert!(text.contains("Number of files: 0 (of 10 requested)"));
        assert!(text.contains("Failed tasks: 10 (test_io_0, test_io_1, test_io_2, test_io_3, test_io_4 and 5 more)"));
    }

    #[test]
    fn test_append_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("results.log");

        append_to_file(&report(None, 1), &path).unwrap();
        append_to_file(&report(None, 1), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("----- dfsio ----- : write").count(), 2);
        assert!(content.contains("Failed tasks: 1 (test_io_0)"));
    }
}
