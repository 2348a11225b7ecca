//! Supported React target versions.

use crate::error::{MigrateError, Result};
use std::fmt;
use std::str::FromStr;

/// React major version a project is migrated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetVersion {
    V17,
    V18,
    V19,
}

impl TargetVersion {
    pub const ALL: [TargetVersion; 3] =
        [TargetVersion::V17, TargetVersion::V18, TargetVersion::V19];

    pub fn major(self) -> u64 {
        match self {
            TargetVersion::V17 => 17,
            TargetVersion::V18 => 18,
            TargetVersion::V19 => 19,
        }
    }

    /// The range written for `react` and `react-dom`, e.g. `^18`.
    pub fn caret_range(self) -> String {
        format!("^{}", self.major())
    }

    pub fn parse(input: &str) -> Result<Self> {
        input.parse()
    }
}

impl FromStr for TargetVersion {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "17" => Ok(TargetVersion::V17),
            "18" => Ok(TargetVersion::V18),
            "19" => Ok(TargetVersion::V19),
            other => Err(MigrateError::UnsupportedVersion(other.to_string())),
        }
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major())
    }
}

/// Coarse major-version extraction from a version or range string.
///
/// Leading range operators are skipped, then the integer before the first `.`
/// is parsed. Anything unparseable counts as major `0`.
pub fn major_of(range: &str) -> u64 {
    let trimmed = range.trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.');
    trimmed
        .split('.')
        .next()
        .and_then(|head| {
            let digits: String = head.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(0)
}
