//! Output formatting and persistence for route reports.
//!
//! Supports log-line rendering, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::RouteReport;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One ranked entry flattened for CSV output.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    ranking: &'a str,
    rank: usize,
    key: &'a str,
    count: usize,
}

/// Logs each ranking as a headline followed by one line per entry.
pub fn print_pretty(report: &RouteReport) {
    let headlines = [
        "Top airlines covering the most cities",
        "Top airlines with the most direct routes",
        "Top cities served by the most airlines",
    ];

    for (headline, (_, ranked)) in headlines.iter().zip(report.rankings()) {
        info!("{}", headline);
        for (i, entry) in ranked.iter().enumerate() {
            info!("  {:>2}. {:<8} {}", i + 1, entry.key, entry.count);
        }
    }
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &RouteReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes the report as pretty-printed JSON, replacing any existing file.
pub fn write_json(path: &str, report: &RouteReport) -> Result<()> {
    debug!(path, "Writing JSON report");
    std::fs::write(path, serde_json::to_vec_pretty(report)?)?;
    Ok(())
}

/// Appends every ranked entry of the report as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_report(path: &str, report: &RouteReport) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for (ranking, ranked) in report.rankings() {
        for (i, entry) in ranked.iter().enumerate() {
            writer.serialize(ReportRow {
                ranking,
                rank: i + 1,
                key: &entry.key,
                count: entry.count,
            })?;
        }
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::analyze_routes;
    use crate::analyzers::types::RankLimits;
    use crate::record::Route;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_report() -> RouteReport {
        let routes = vec![
            Route::new("AA", "JFK", "LAX", 0),
            Route::new("BB", "JFK", "ORD", 1),
        ];
        analyze_routes(&routes, RankLimits::default())
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_report()).unwrap();
    }

    #[test]
    fn test_write_json_contents() {
        let path = temp_path("route_rater_test_report.json");
        let _ = fs::remove_file(&path);

        write_json(&path, &sample_report()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["routes_analyzed"], 2);
        assert_eq!(value["cities_by_airlines"][0]["key"], "JFK");
        assert_eq!(value["cities_by_airlines"][0]["count"], 2);
        assert_eq!(value["limits"]["cities_by_airlines"], 10);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_report_rows() {
        let path = temp_path("route_rater_test_rows.csv");
        let _ = fs::remove_file(&path);

        append_report(&path, &sample_report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // header + 2 airlines + 1 direct + 3 cities
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "ranking,rank,key,count");
        assert_eq!(lines[1], "airlines_by_cities,1,AA,2");
        assert_eq!(lines[3], "airlines_by_direct_routes,1,AA,1");
        assert_eq!(lines[4], "cities_by_airlines,1,JFK,2");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_report_writes_header_once() {
        let path = temp_path("route_rater_test_header.csv");
        let _ = fs::remove_file(&path);

        let report = sample_report();
        append_report(&path, &report).unwrap();
        append_report(&path, &report).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.starts_with("ranking,")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 13);

        fs::remove_file(&path).unwrap();
    }
}
