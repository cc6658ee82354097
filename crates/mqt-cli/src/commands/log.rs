//! Test log checking command

use std::path::Path;

use colored::Colorize;
use mqt_fs::NormalizedPath;
use mqt_manifest::OdooVersion;
use mqt_testlog::{LogClassifier, LogReport};

use crate::error::Result;

const SEPARATOR: &str = "----------";

/// Classify the log at `file` and print the reported records.
///
/// Returns 0 when exactly `expected` errors were found.
pub fn run_check_log(
    file: &Path,
    db: &str,
    version: &str,
    check_loaded: bool,
    expected: usize,
) -> Result<i32> {
    let version = OdooVersion::parse(version)?;
    let report = LogClassifier::new(db, &version)?
        .check_loaded(check_loaded)
        .check_file(&NormalizedPath::new(file))?;

    print!("{}", format_report(&report));

    let count = report.count();
    if count == expected {
        println!("{} {count} error(s), as expected", "Success:".green().bold());
        Ok(0)
    } else {
        println!(
            "{} found {count} error(s), expected {expected}",
            "FAIL:".red().bold()
        );
        Ok(1)
    }
}

fn format_report(report: &LogReport) -> String {
    let mut out = String::new();
    for message in report.messages() {
        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(message);
        out.push('\n');
    }
    if !report.is_empty() {
        out.push_str(SEPARATOR);
        out.push('\n');
    }
    out
}
