//! Record matching rules.

use std::fmt;

use mqt_manifest::OdooVersion;
use regex::Regex;

use crate::error::{Error, Result};
use crate::record::LogRecord;

/// Messages that look like failures but only mean no mail server is
/// reachable from the test environment.
pub const DEFAULT_IGNORED: &[&str] = &["Mail delivery failed", "failed sending mail"];

/// Messages that always fail a test run.
pub const DEFAULT_REPORTED: &[&str] = &[
    "At least one test failed",
    "no access rules, consider adding one",
    "invalid module names, ignored",
];

/// A test applied to one record.
pub enum Rule {
    /// The message contains the text.
    Substring(String),
    /// The regex finds a match anywhere in the message.
    Pattern(Regex),
    /// Arbitrary check over the whole record.
    Predicate(Box<dyn Fn(&LogRecord) -> bool + Send + Sync>),
}

impl Rule {
    pub fn substring(text: impl Into<String>) -> Self {
        Self::Substring(text.into())
    }

    /// Compile `pattern` into a [`Rule::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn predicate(f: impl Fn(&LogRecord) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Box::new(f))
    }

    /// Matches records logged at `level`.
    pub fn level(level: &str) -> Self {
        let level = level.to_string();
        Self::predicate(move |record| record.has_level(&level))
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        match self {
            Self::Substring(text) => record.message.contains(text.as_str()),
            Self::Pattern(regex) => regex.is_match(&record.message),
            Self::Predicate(f) => f(record),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring(text) => f.debug_tuple("Substring").field(text).finish(),
            Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Ordered ignore and report lists.
///
/// A record matching any ignore rule is skipped; otherwise it is reported
/// when any report rule matches. Only that record is affected by an ignore
/// match, the rest of the log is still checked.
#[derive(Debug, Default)]
pub struct RuleSet {
    ignore: Vec<Rule>,
    report: Vec<Rule>,
}

impl RuleSet {
    /// No rules at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock rules for a server of `version`.
    ///
    /// Servers before 7.0 report every `ERROR` record as well as `CRITICAL`
    /// ones.
    pub fn for_version(version: &OdooVersion) -> Self {
        let mut rules = Self::empty();
        for text in DEFAULT_IGNORED {
            rules = rules.ignore(Rule::substring(*text));
        }
        rules = rules.report(Rule::level("CRITICAL"));
        for text in DEFAULT_REPORTED {
            rules = rules.report(Rule::substring(*text));
        }
        if *version < OdooVersion::new(7, 0) {
            rules = rules.report(Rule::level("ERROR"));
        }
        rules
    }

    pub fn ignore(mut self, rule: Rule) -> Self {
        self.ignore.push(rule);
        self
    }

    pub fn report(mut self, rule: Rule) -> Self {
        self.report.push(rule);
        self
    }

    pub fn is_ignored(&self, record: &LogRecord) -> bool {
        self.ignore.iter().any(|rule| rule.matches(record))
    }

    /// Whether `record` has to be reported.
    pub fn is_reported(&self, record: &LogRecord) -> bool {
        !self.is_ignored(record) && self.report.iter().any(|rule| rule.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(level: &str, message: &str) -> LogRecord {
        LogRecord {
            level: Some(level.to_string()),
            message: message.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rule_kinds() {
        let rec = record("ERROR", "2 tests: At least one test failed");

        assert!(Rule::substring("test failed").matches(&rec));
        assert!(!Rule::substring("TEST FAILED").matches(&rec));
        assert!(Rule::pattern(r"^\d+ tests").unwrap().matches(&rec));
        assert!(Rule::level("ERROR").matches(&rec));
        assert!(!Rule::level("CRITICAL").matches(&rec));
        assert!(Rule::predicate(|r| r.message.len() > 5).matches(&rec));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            Rule::pattern("(unclosed"),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[rstest]
    #[case("6.1", true)]
    #[case("7.0", false)]
    #[case("12.0", false)]
    fn test_error_level_reported_before_7(#[case] version: &str, #[case] reported: bool) {
        let version = OdooVersion::parse(version).unwrap();
        let rules = RuleSet::for_version(&version);

        assert_eq!(rules.is_reported(&record("ERROR", "something broke")), reported);
        assert!(rules.is_reported(&record("CRITICAL", "something broke")));
    }

    #[test]
    fn test_ignore_wins_over_report() {
        let rules = RuleSet::for_version(&OdooVersion::new(12, 0));
        let rec = record("CRITICAL", "Mail delivery failed via SMTP server");

        assert!(rules.is_ignored(&rec));
        assert!(!rules.is_reported(&rec));
    }

    #[test]
    fn test_debug_output() {
        let rule = Rule::pattern("a+").unwrap();
        assert_eq!(format!("{rule:?}"), "Pattern(\"a+\")");
        assert_eq!(format!("{:?}", Rule::level("INFO")), "Predicate(..)");
    }
}
