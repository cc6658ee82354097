//! Turning a parsed log into a verdict.

use mqt_fs::NormalizedPath;
use mqt_manifest::OdooVersion;

use crate::error::Result;
use crate::parser::LogParser;
use crate::record::LogRecord;
use crate::rules::RuleSet;

/// Message the server logs once every module is loaded.
pub const MODULES_LOADED: &str = "Modules loaded.";

/// Message of the record reported when [`MODULES_LOADED`] never shows up.
pub const MODULES_NOT_LOADED: &str = "Modules loaded message not found.";

/// Records that make a test run fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogReport {
    pub errors: Vec<LogRecord>,
}

impl LogReport {
    pub fn count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|r| r.message.as_str())
    }
}

/// Classifies the log of one test database.
#[derive(Debug)]
pub struct LogClassifier {
    parser: LogParser,
    rules: RuleSet,
    check_loaded: bool,
}

impl LogClassifier {
    /// Stock rules for `version`, with the modules-loaded check enabled.
    pub fn new(database: &str, version: &OdooVersion) -> Result<Self> {
        Self::with_rules(database, RuleSet::for_version(version))
    }

    pub fn with_rules(database: &str, rules: RuleSet) -> Result<Self> {
        Ok(Self {
            parser: LogParser::new(database)?,
            rules,
            check_loaded: true,
        })
    }

    /// Whether a log without the modules-loaded message is an error.
    pub fn check_loaded(mut self, check_loaded: bool) -> Self {
        self.check_loaded = check_loaded;
        self
    }

    /// Classify already parsed records.
    pub fn classify(&self, records: &[LogRecord]) -> LogReport {
        let mut errors: Vec<LogRecord> = records
            .iter()
            .filter(|record| self.rules.is_reported(record))
            .cloned()
            .collect();

        if self.check_loaded && !records.iter().any(|r| r.message.contains(MODULES_LOADED)) {
            errors.push(LogRecord::synthetic(MODULES_NOT_LOADED));
        }

        for error in &errors {
            tracing::debug!(
                level = ?error.level,
                logger = ?error.logger,
                message = %error.message,
                "Reported log record"
            );
        }
        LogReport { errors }
    }

    pub fn check_text(&self, text: &str) -> LogReport {
        self.classify(&self.parser.parse(text))
    }

    pub fn check_file(&self, path: &NormalizedPath) -> Result<LogReport> {
        let records = self.parser.parse_file(path)?;
        Ok(self.classify(&records))
    }
}

/// Number of errors in the log at `path`.
pub fn has_test_errors(
    path: &NormalizedPath,
    database: &str,
    version: &OdooVersion,
    check_loaded: bool,
) -> Result<usize> {
    let report = LogClassifier::new(database, version)?
        .check_loaded(check_loaded)
        .check_file(path)?;
    Ok(report.count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use pretty_assertions::assert_eq;

    fn classifier() -> LogClassifier {
        LogClassifier::new("testdb", &OdooVersion::new(12, 0)).unwrap()
    }

    #[test]
    fn test_loaded_critical_and_continuation() {
        let log = "2020-01-01 00:00:00,000 1 INFO ? odoo: Modules loaded.\n\
                   2020-01-01 00:00:01,000 1 CRITICAL testdb odoo.service: \
                   Failed to initialize database\n\
                   psycopg2.OperationalError: could not connect\n";

        let report = classifier().check_text(log);

        assert_eq!(report.count(), 1);
        assert_eq!(
            report.errors[0].message,
            "Failed to initialize database\npsycopg2.OperationalError: could not connect"
        );
        assert!(report.messages().all(|m| m != MODULES_NOT_LOADED));
    }

    #[test]
    fn test_missing_modules_loaded() {
        let log = "2020-01-01 00:00:00,000 1 INFO testdb odoo: starting\n";

        let report = classifier().check_text(log);
        assert_eq!(report.messages().collect::<Vec<_>>(), vec![MODULES_NOT_LOADED]);

        let report = classifier().check_loaded(false).check_text(log);
        assert!(report.is_empty());
    }

    #[test]
    fn test_ignore_skips_only_that_record() {
        let log = "2020-01-01 00:00:00,000 1 INFO testdb odoo: Modules loaded.\n\
                   2020-01-01 00:00:01,000 1 CRITICAL testdb odoo.mail: Mail delivery failed\n\
                   2020-01-01 00:00:02,000 1 ERROR testdb odoo.tests: \
                   At least one test failed when loading the modules.\n";

        let report = classifier().check_text(log);

        assert_eq!(
            report.messages().collect::<Vec<_>>(),
            vec!["At least one test failed when loading the modules."]
        );
    }

    #[test]
    fn test_custom_rules() {
        let rules = RuleSet::empty()
            .ignore(Rule::pattern(r"^known issue").unwrap())
            .report(Rule::level("WARNING"));
        let classifier = LogClassifier::with_rules("testdb", rules)
            .unwrap()
            .check_loaded(false);
        let log = "2020-01-01 00:00:00,000 1 WARNING testdb odoo: known issue #12\n\
                   2020-01-01 00:00:01,000 1 WARNING testdb odoo: new problem\n";

        let report = classifier.check_text(log);
        assert_eq!(report.messages().collect::<Vec<_>>(), vec!["new problem"]);
    }
}
