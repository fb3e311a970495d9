//! Data types for the publications listing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level shape of the publications JSON document
#[derive(Debug, Clone, Deserialize)]
pub struct PublicationListing {
    pub publications: Vec<RawPublication>,
}

/// One publication as received from upstream
///
/// Only the fields the feed needs are modelled; anything else upstream sends
/// is ignored. Optional text fields are `None` when absent or `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPublication {
    /// Page filename such as `pub1234.html`; empty when upstream has none
    #[serde(default)]
    pub filename_html: String,
    pub title: String,
    #[serde(default)]
    pub tag_pks: Vec<String>,
    #[serde(default)]
    pub year: Option<Year>,
    #[serde(default)]
    pub bibtex: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub description_html: Option<String>,
}

/// Publication year, which upstream sends either as a string or a number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    Text(String),
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}
