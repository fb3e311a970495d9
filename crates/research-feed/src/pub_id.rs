//! Publication identifier extraction
//!
//! Upstream assigns identifiers in increasing publication order and only
//! exposes them through the page filename (`pub1234.html`). The identifier
//! is the single source of truth for feed ordering, so a filename that does
//! not match the pattern is an error, never a default.

use crate::error::{FeedError, Result};
use regex::Regex;

/// Whole-string filename pattern with one capture group for the digit run
#[derive(Debug, Clone)]
pub struct FilenamePattern {
    regex: Regex,
}

impl FilenamePattern {
    /// Compile `pattern`, anchored at both ends
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            FeedError::Config(format!("invalid filename pattern {:?}: {}", pattern, e))
        })?;

        // captures_len counts the implicit whole-match group
        if regex.captures_len() != 2 {
            return Err(FeedError::Config(format!(
                "filename pattern {:?} must have exactly one capture group",
                pattern
            )));
        }

        Ok(Self { regex })
    }

    /// Extract the numeric identifier embedded in `filename`
    pub fn extract(&self, filename: &str) -> Result<u64> {
        let digits = self
            .regex
            .captures(filename)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| {
                FeedError::UpstreamFormat(format!(
                    "filename {:?} does not match the publication pattern",
                    filename
                ))
            })?;

        digits.as_str().parse::<u64>().map_err(|e| {
            FeedError::UpstreamFormat(format!(
                "filename {:?} has an unusable identifier: {}",
                filename, e
            ))
        })
    }
}
