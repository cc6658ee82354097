//! Classifying log files on disk

use std::fs;

use mqt_fs::NormalizedPath;
use mqt_manifest::OdooVersion;
use mqt_testlog::{Error, LogClassifier, has_test_errors};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

const RUN_LOG: &str = "\
2020-01-01 00:00:00,000 4242 INFO openerp_test odoo.modules.loading: loading 42 modules...
2020-01-01 00:00:01,000 4242 \x1b[1;31mERROR\x1b[0m openerp_test odoo.addons.sale_x: \
FAIL: test_confirm
Traceback (most recent call last):
  File \"tests/test_sale.py\", line 12, in test_confirm
AssertionError: 1 != 2
2020-01-01 00:00:02,000 4242 ERROR openerp_test odoo.modules.loading: \
At least one test failed when loading the modules.
2020-01-01 00:00:03,000 4242 INFO openerp_test odoo.modules.loading: Modules loaded.
";

fn write_log(dir: &TempDir, content: &str) -> NormalizedPath {
    let path = dir.path().join("stdout.log");
    fs::write(&path, content).unwrap();
    NormalizedPath::new(path)
}

#[rstest]
#[case("12.0", 1)]
#[case("6.1", 2)]
fn errors_counted_per_version(#[case] version: &str, #[case] expected: usize) {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, RUN_LOG);
    let version = OdooVersion::parse(version).unwrap();

    let count = has_test_errors(&path, "openerp_test", &version, true).unwrap();

    assert_eq!(count, expected);
}

#[test]
fn invalid_utf8_is_replaced_not_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stdout.log");
    fs::write(
        &path,
        b"2020-01-01 00:00:00,000 1 CRITICAL openerp_test odoo: caf\xe9 boom\n",
    )
    .unwrap();
    let path = NormalizedPath::new(path);

    let count = has_test_errors(&path, "openerp_test", &OdooVersion::new(12, 0), false);

    assert!(matches!(count, Ok(1)));
}

#[test]
fn multi_line_record_is_reported_whole() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, RUN_LOG);
    let classifier = LogClassifier::new("openerp_test", &OdooVersion::new(6, 1)).unwrap();

    let report = classifier.check_file(&path).unwrap();

    assert_eq!(report.errors[0].logger.as_deref(), Some("odoo.addons.sale_x"));
    assert!(report.errors[0].message.ends_with("AssertionError: 1 != 2"));
    assert_eq!(report.errors[0].message.lines().count(), 4);
}

#[test]
fn other_database_lines_are_continuations() {
    let dir = TempDir::new().unwrap();
    let path = write_log(
        &dir,
        "2020-01-01 00:00:00,000 1 INFO other_db odoo: Modules loaded.\n",
    );

    // the only line belongs to another database, so it opens an anonymous
    // record whose message still contains the sentinel
    let count = has_test_errors(&path, "openerp_test", &OdooVersion::new(12, 0), true).unwrap();
    assert_eq!(count, 0);
}

#[test]
fn missing_log_file() {
    let dir = TempDir::new().unwrap();
    let path = NormalizedPath::new(dir.path().join("absent.log"));

    let result = has_test_errors(&path, "openerp_test", &OdooVersion::new(12, 0), true);
    assert!(matches!(result, Err(Error::Fs(_))));
}
