//! Odoo series parsing and comparison.
//!
//! Series strings come from CI configuration (`"8.0"`, `"10.0"`,
//! `"saas-11.3"`) or from the leading part of a module version
//! (`"12.0.1.0.0"`). Only the major and minor numbers matter; they are held
//! as a [`semver::Version`] with a zero patch so comparisons follow numeric
//! order (`"10.0" > "9.0"`).
//!
//! # Examples
//!
//! ```
//! use mqt_manifest::version::OdooVersion;
//!
//! let v = OdooVersion::parse("12.0.1.0.0").unwrap();
//! assert_eq!(v.major(), 12);
//! assert!(v >= OdooVersion::parse("10.0").unwrap());
//! assert!(OdooVersion::parse("6.1").unwrap() < OdooVersion::parse("7.0").unwrap());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An Odoo series, e.g. `12.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OdooVersion {
    version: semver::Version,
}

impl OdooVersion {
    /// Create a version from its numeric parts.
    pub fn new(major: u64, minor: u64) -> Self {
        Self {
            version: semver::Version::new(major, minor, 0),
        }
    }

    /// Parse a series string.
    ///
    /// A `saas-` or `saas~` prefix is dropped, components after the minor
    /// number are ignored and a missing minor number means `0`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let series = trimmed
            .strip_prefix("saas-")
            .or_else(|| trimmed.strip_prefix("saas~"))
            .unwrap_or(trimmed);

        let mut parts = series.split('.');
        let major = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| invalid(raw, "empty version"))?;
        let major: u64 = major
            .parse()
            .map_err(|_| invalid(raw, "major version is not a number"))?;
        let minor: u64 = match parts.next() {
            Some(minor) => minor
                .parse()
                .map_err(|_| invalid(raw, "minor version is not a number"))?,
            None => 0,
        };

        Ok(Self::new(major, minor))
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }
}

fn invalid(raw: &str, reason: &str) -> Error {
    Error::InvalidVersion {
        version: raw.to_string(),
        reason: reason.to_string(),
    }
}

impl FromStr for OdooVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for OdooVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.version.major, self.version.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("8.0", 8, 0)]
    #[case("10.0", 10, 0)]
    #[case("6.1", 6, 1)]
    #[case("saas-11.3", 11, 3)]
    #[case("saas~11.1", 11, 1)]
    #[case("12.0.1.0.0", 12, 0)]
    #[case("13", 13, 0)]
    fn test_parse(#[case] raw: &str, #[case] major: u64, #[case] minor: u64) {
        let v = OdooVersion::parse(raw).unwrap();
        assert_eq!((v.major(), v.minor()), (major, minor));
    }

    #[rstest]
    #[case("")]
    #[case("master")]
    #[case("12.x")]
    fn test_parse_invalid(#[case] raw: &str) {
        assert!(matches!(
            OdooVersion::parse(raw),
            Err(Error::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_numeric_ordering() {
        let nine = OdooVersion::parse("9.0").unwrap();
        let ten = OdooVersion::parse("10.0").unwrap();
        assert!(ten > nine);
    }

    #[test]
    fn test_display() {
        assert_eq!(OdooVersion::parse("saas-11.3").unwrap().to_string(), "11.3");
    }
}
