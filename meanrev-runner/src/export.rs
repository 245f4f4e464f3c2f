//! Result export — aligned text tables, CSV artifacts, JSON round trips.
//!
//! Table and CSV columns are fixed: the varied parameter names in
//! enumeration order, then `total_trades, winrate, drawdown_%,
//! end_capital`, floats at two decimals. Failed combinations are rendered
//! as a separate listing, never interleaved with ranked rows.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::result::{BacktestReport, RunResult, SCHEMA_VERSION};
use crate::sweep::FailedCombination;

/// Metric column headers appended after the parameter columns.
const METRIC_HEADERS: [&str; 4] = ["total_trades", "winrate", "drawdown_%", "end_capital"];

/// Format a parameter value the way it was written: whole candidates
/// keep one decimal, others print naturally.
fn fmt_param(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn result_row(param_names: &[String], result: &RunResult) -> Vec<String> {
    let mut row: Vec<String> = param_names
        .iter()
        .map(|name| {
            result
                .params
                .get(name)
                .map(fmt_param)
                .unwrap_or_else(|| "-".to_string())
        })
        .collect();
    row.push(result.total_trades.to_string());
    row.push(format!("{:.2}", result.winrate_pct));
    row.push(format!("{:.2}", result.max_drawdown_pct));
    row.push(format!("{:.2}", result.end_capital));
    row
}

fn headers(param_names: &[String]) -> Vec<String> {
    param_names
        .iter()
        .cloned()
        .chain(METRIC_HEADERS.iter().map(|h| h.to_string()))
        .collect()
}

/// Render ranked results as a right-aligned text table.
pub fn format_results_table(param_names: &[String], results: &[RunResult]) -> String {
    let headers = headers(param_names);
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| result_row(param_names, r))
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .map(|row| row[col].len())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(header.len())
        })
        .collect();

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:>width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut out = String::new();
    out.push_str(&format_row(&headers));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

/// Render the single-run result record (includes the won column).
pub fn format_backtest_record(result: &RunResult) -> String {
    format!(
        "total_trades: {} | won: {} | winrate: {:.2}% | drawdown_%: {:.2} | end_capital: {:.2}",
        result.total_trades,
        result.won,
        result.winrate_pct,
        result.max_drawdown_pct,
        result.end_capital
    )
}

/// Render the failure listing: one line per failed combination. The
/// message already carries the error-kind prefix.
pub fn format_failures(failures: &[FailedCombination]) -> String {
    let mut out = String::new();
    for failure in failures {
        let params: Vec<String> = failure
            .params
            .iter()
            .map(|(name, value)| format!("{name}={}", fmt_param(value)))
            .collect();
        out.push_str(&format!(
            "[{}] {} -> {}\n",
            failure.index,
            params.join(", "),
            failure.message
        ));
    }
    out
}

/// Serialize ranked results to CSV with the fixed column order.
pub fn results_to_csv(param_names: &[String], results: &[RunResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(headers(param_names))?;
    for result in results {
        wtr.write_record(result_row(param_names, result))?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write ranked results to a CSV file, creating parent directories.
pub fn write_results_csv(
    path: &Path,
    param_names: &[String],
    results: &[RunResult],
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
    }
    let csv = results_to_csv(param_names, results)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write '{}'", path.display()))
}

// ─── JSON round trip ────────────────────────────────────────────────

/// Serialize a full report to pretty JSON.
pub fn export_json(report: &BacktestReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BacktestReport to JSON")
}

/// Deserialize a report from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestReport> {
    let report: BacktestReport =
        serde_json::from_str(json).context("failed to deserialize BacktestReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::FailureKind;
    use meanrev_core::ParamSet;

    fn sample_results() -> (Vec<String>, Vec<RunResult>) {
        let names = vec!["z_entry".to_string(), "sl_distance".to_string()];
        let results = vec![
            RunResult {
                params: ParamSet::new().set("z_entry", 1.5).set("sl_distance", 2.0),
                total_trades: 8,
                won: 5,
                winrate_pct: 62.5,
                max_drawdown_pct: 1.2345,
                end_capital: 10_120.0,
            },
            RunResult {
                params: ParamSet::new().set("z_entry", 1.0).set("sl_distance", 1.0),
                total_trades: 14,
                won: 6,
                winrate_pct: 42.857,
                max_drawdown_pct: 2.5,
                end_capital: 9_980.5,
            },
        ];
        (names, results)
    }

    #[test]
    fn table_has_headers_separator_and_rows() {
        let (names, results) = sample_results();
        let table = format_results_table(&names, &results);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("z_entry"));
        assert!(lines[0].contains("end_capital"));
        assert!(lines[1].contains("-+-"));
        assert!(lines[2].contains("10120.00"));
        assert!(lines[3].contains("42.86"));
    }

    #[test]
    fn csv_roundtrip_preserves_columns() {
        let (names, results) = sample_results();
        let csv_text = results_to_csv(&names, &results).unwrap();
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "z_entry",
                "sl_distance",
                "total_trades",
                "winrate",
                "drawdown_%",
                "end_capital"
            ]
        );
        let rows: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1.5");
        assert_eq!(&rows[1][5], "9980.50");
    }

    #[test]
    fn backtest_record_includes_won() {
        let (_, results) = sample_results();
        let record = format_backtest_record(&results[0]);
        assert!(record.contains("won: 5"));
        assert!(record.contains("winrate: 62.50%"));
    }

    #[test]
    fn failure_listing_names_the_tuple_and_kind() {
        let failures = vec![FailedCombination {
            index: 3,
            params: ParamSet::new().set("sl_distance", -1.0),
            kind: FailureKind::Config,
            message: "config error: parameter 'sl_distance' must be positive (got -1)".into(),
        }];
        let listing = format_failures(&failures);
        assert!(listing.contains("[3]"));
        assert!(listing.contains("sl_distance=-1.0"));
        assert!(listing.contains("config error"));
    }

    #[test]
    fn json_roundtrip_and_version_guard() {
        let (_, results) = sample_results();
        let report = BacktestReport {
            schema_version: SCHEMA_VERSION,
            run_id: "deadbeef".into(),
            summary: results[0].clone(),
            trades: vec![],
            equity_curve: vec![10_000.0, 10_120.0],
            bar_count: 2,
            warmup_bars: 0,
            initial_capital: 10_000.0,
            dataset_hash: "hash".into(),
        };
        let json = export_json(&report).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back.run_id, "deadbeef");

        let future = json.replace("\"schema_version\": 1", "\"schema_version\": 99");
        assert!(import_json(&future).is_err());
    }
}
