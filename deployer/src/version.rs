//! Dotted product versions
//!
//! Appliance products are versioned with a variable number of numeric
//! segments (`1.6`, `1.6.4`, `1.6.11.0`). Versions order segment by segment,
//! with missing trailing segments counting as zero, so `1.6 == 1.6.0`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::DeployerError;

/// A dotted version of any number of numeric segments
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
}

impl Version {
    /// Parse a dotted version string
    pub fn parse(s: &str) -> Result<Self, DeployerError> {
        s.parse()
    }
}

impl FromStr for Version {
    type Err = DeployerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DeployerError::VersionFormat {
                version: s.to_string(),
                reason: "empty version".to_string(),
            });
        }

        let segments = trimmed
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(DeployerError::VersionFormat {
                        version: s.to_string(),
                        reason: format!("segment '{}' is not a non-negative integer", segment),
                    });
                }
                segment.parse::<u64>().map_err(|e| DeployerError::VersionFormat {
                    version: s.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| {
                let a = self.segments.get(i).copied().unwrap_or(0);
                let b = other.segments.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Compare two version strings
pub fn compare(a: &str, b: &str) -> Result<Ordering, DeployerError> {
    Ok(Version::parse(a)?.cmp(&Version::parse(b)?))
}
