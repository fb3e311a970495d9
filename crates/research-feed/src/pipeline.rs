//! Filter, order and normalize the upstream publications
//!
//! Stages, in order: drop records without a filename, keep whitelisted
//! research areas, keep records with a download link, extract identifiers,
//! sort newest first, truncate, and map to feed entries.

use crate::config::{FeedConfig, ID_PLACEHOLDER};
use crate::error::Result;
use crate::filter::{has_download_link, ResearchAreaWhitelist};
use crate::pub_id::FilenamePattern;
use crate::types::NormalizedPublication;
use publications_api::RawPublication;
use tracing::{debug, error, info, warn};

pub struct FeedPipeline {
    whitelist: ResearchAreaWhitelist,
    pattern: FilenamePattern,
    max_entries: usize,
    id_url_template: String,
    description_limit: usize,
}

impl FeedPipeline {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        Ok(Self {
            whitelist: ResearchAreaWhitelist::new(&config.whitelist_areas),
            pattern: FilenamePattern::new(&config.filename_pattern)?,
            max_entries: config.max_entries,
            id_url_template: config.id_url_template.clone(),
            description_limit: config.description_limit,
        })
    }

    /// Turn the raw listing into at most `max_entries` feed entries, newest first
    ///
    /// Fails if any record that survives filtering has a malformed filename;
    /// a guessed identifier would break the ordering.
    pub fn run(&self, publications: Vec<RawPublication>) -> Result<Vec<NormalizedPublication>> {
        let received = publications.len();

        let (named, unnamed): (Vec<_>, Vec<_>) = publications
            .into_iter()
            .partition(|p| !p.filename_html.is_empty());
        if !unnamed.is_empty() {
            warn!(
                count = unnamed.len(),
                first_title = %unnamed[0].title,
                "Skipping publications without a filename"
            );
        }
        let with_filename = named.len();

        let in_area: Vec<_> = named
            .into_iter()
            .filter(|p| self.whitelist.matches(&p.tag_pks))
            .collect();
        let whitelisted = in_area.len();

        let downloadable: Vec<_> = in_area
            .into_iter()
            .filter(|p| has_download_link(&p.bibtex))
            .collect();
        let with_download = downloadable.len();

        debug!(
            received,
            with_filename, whitelisted, with_download, "Applied publication filters"
        );

        let mut identified = downloadable
            .into_iter()
            .map(|p| Ok((self.pattern.extract(&p.filename_html)?, p)))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                error!(
                    received,
                    with_filename,
                    whitelisted,
                    with_download,
                    error = %e,
                    "Identifier extraction failed"
                );
                e
            })?;

        identified.sort_by(|a, b| b.0.cmp(&a.0));

        let before_dedup = identified.len();
        identified.dedup_by_key(|(id, _)| *id);
        if identified.len() != before_dedup {
            warn!(
                dropped = before_dedup - identified.len(),
                "Upstream repeated publication identifiers"
            );
        }

        identified.truncate(self.max_entries);

        let entries: Vec<NormalizedPublication> = identified
            .into_iter()
            .enumerate()
            .map(|(idx, (id, publication))| {
                let entry = self.normalize(id, publication);
                debug!(
                    rank = idx + 1,
                    id = entry.id,
                    title = ?entry.title,
                    year = %entry.year.as_ref().map(|y| y.to_string()).unwrap_or_default(),
                    categories = %entry.categories.join(", "),
                    "Added publication"
                );
                entry
            })
            .collect();

        info!(
            received,
            with_download,
            output = entries.len(),
            max_entries = self.max_entries,
            "Selected publications for feed"
        );

        Ok(entries)
    }

    pub fn publication_url(&self, id: u64) -> String {
        self.id_url_template
            .replace(ID_PLACEHOLDER, &id.to_string())
    }

    fn normalize(&self, id: u64, publication: RawPublication) -> NormalizedPublication {
        let description = [
            publication.abstract_text.as_deref(),
            publication.description_html.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(|text| sanitize_description(text, self.description_limit))
        .find(|text| !text.is_empty());

        if description.is_none() {
            debug!(id, "Publication has no description");
        }

        NormalizedPublication {
            id,
            url: self.publication_url(id),
            guid: id.to_string(),
            title: publication.title,
            categories: publication.tag_pks,
            description,
            year: publication.year,
        }
    }
}

/// Printable text only, whitespace collapsed, at most `limit` characters
///
/// Text that had to be shortened ends with an ellipsis, which counts towards
/// the limit.
pub fn sanitize_description(text: &str, limit: usize) -> String {
    let collapsed = text
        .split_whitespace()
        .map(|word| word.chars().filter(|c| is_printable(*c)).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if collapsed.chars().count() <= limit {
        return collapsed;
    }
    if limit == 0 {
        return String::new();
    }

    let mut shortened: String = collapsed.chars().take(limit - 1).collect();
    shortened.truncate(shortened.trim_end().len());
    shortened.push('…');
    shortened
}

fn is_printable(c: char) -> bool {
    !c.is_control()
        && !matches!(
            c,
            '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
        )
}
