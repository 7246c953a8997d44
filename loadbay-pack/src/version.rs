//! Module version numbers.
//!
//! A version is the four-part `major.minor.micro.qualifier` scheme: the
//! first three parts are numeric (missing parts default to zero), the
//! qualifier is an arbitrary string compared lexically. A qualifier
//! containing `SNAPSHOT` marks an unstable, in-development version, which
//! gets recency-based tie-breaking during ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PackError;

/// Marker substring identifying a snapshot (unstable) version.
const SNAPSHOT_MARKER: &str = "SNAPSHOT";

/// A parsed module version.
///
/// Field order matters: the derived `Ord` compares major, then minor, then
/// micro numerically, then the qualifier lexically — exactly the version
/// precedence rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleVersion {
    major: u32,
    minor: u32,
    micro: u32,
    qualifier: String,
}

impl ModuleVersion {
    pub fn new(major: u32, minor: u32, micro: u32, qualifier: impl Into<String>) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: qualifier.into(),
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn micro(&self) -> u32 {
        self.micro
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Whether this version carries the snapshot marker in its qualifier.
    pub fn is_snapshot(&self) -> bool {
        self.qualifier.contains(SNAPSHOT_MARKER)
    }
}

impl FromStr for ModuleVersion {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| PackError::InvalidVersion {
            version: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty version string"));
        }

        let mut parts = trimmed.splitn(4, '.');
        let mut numeric = |name: &str| -> Result<u32, PackError> {
            match parts.next() {
                None => Ok(0),
                Some(p) => p
                    .parse::<u32>()
                    .map_err(|_| invalid(&format!("{name} part is not a number"))),
            }
        };

        let major = numeric("major")?;
        let minor = numeric("minor")?;
        let micro = numeric("micro")?;
        let qualifier = parts.next().unwrap_or("").to_string();

        Ok(Self {
            major,
            minor,
            micro,
            qualifier,
        })
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ModuleVersion {
        s.parse().unwrap()
    }

    #[test]
    fn parse_full() {
        let version = v("1.2.3.RC1");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.micro(), 3);
        assert_eq!(version.qualifier(), "RC1");
    }

    #[test]
    fn parse_short_forms_default_to_zero() {
        assert_eq!(v("1"), ModuleVersion::new(1, 0, 0, ""));
        assert_eq!(v("1.2"), ModuleVersion::new(1, 2, 0, ""));
        assert_eq!(v("1.2.3"), ModuleVersion::new(1, 2, 3, ""));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<ModuleVersion>().is_err());
        assert!("  ".parse::<ModuleVersion>().is_err());
        assert!("a.b.c".parse::<ModuleVersion>().is_err());
        assert!("1..2".parse::<ModuleVersion>().is_err());
        assert!("-1.0.0".parse::<ModuleVersion>().is_err());
    }

    #[test]
    fn ordering_is_numeric_then_lexical() {
        assert!(v("2.0.0") > v("1.9.9"));
        assert!(v("1.10.0") > v("1.9.0"));
        assert!(v("1.0.10") > v("1.0.9"));
        // Qualifier compares lexically, and an empty qualifier sorts first.
        assert!(v("1.0.0.RC2") > v("1.0.0.RC1"));
        assert!(v("1.0.0.RC1") > v("1.0.0"));
    }

    #[test]
    fn snapshot_marker() {
        assert!(v("1.0.0.SNAPSHOT").is_snapshot());
        assert!(v("2.1.0.20260115-SNAPSHOT").is_snapshot());
        assert!(!v("1.0.0.RC1").is_snapshot());
        assert!(!v("1.0.0").is_snapshot());
    }

    #[test]
    fn display_roundtrip() {
        for s in ["1.0.0", "1.2.3", "1.2.3.RC1", "4.5.6.SNAPSHOT"] {
            assert_eq!(v(s).to_string(), s);
        }
        // Short forms render with all three numeric parts.
        assert_eq!(v("1.2").to_string(), "1.2.0");
    }
}
