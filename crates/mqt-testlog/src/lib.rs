//! Odoo test server log classification.
//!
//! A log is parsed into [`LogRecord`]s (one per header line, continuation
//! lines folded into the message) and every record is checked against an
//! ignore list and then a report list of [`Rule`]s. Reported records make up
//! the [`LogReport`].
//!
//! # Example
//!
//! ```
//! use mqt_manifest::OdooVersion;
//! use mqt_testlog::LogClassifier;
//!
//! let log = "\
//! 2020-01-01 00:00:00,000 1 INFO testdb odoo.modules.loading: Modules loaded.
//! 2020-01-01 00:00:01,000 1 CRITICAL testdb odoo.service.server: Failed to initialize database
//! ";
//! let classifier = LogClassifier::new("testdb", &OdooVersion::new(12, 0)).unwrap();
//! let report = classifier.check_text(log);
//! assert_eq!(report.count(), 1);
//! ```

pub mod classifier;
pub mod error;
pub mod parser;
pub mod record;
pub mod rules;

pub use classifier::{LogClassifier, LogReport, has_test_errors};
pub use error::{Error, Result};
pub use parser::LogParser;
pub use record::LogRecord;
pub use rules::{Rule, RuleSet};
