//! Publication filters: research-area whitelist and download availability

use std::collections::HashSet;

/// Prefix upstream uses for research-area tags
pub const RESEARCH_AREA_PREFIX: &str = "research-area-";

/// Citation marker for a populated URL field (`URL\t= {...}`)
pub const DOWNLOAD_MARKER: &str = "URL\t";

/// Canonical research-area tags derived from human-readable area names
#[derive(Debug, Clone)]
pub struct ResearchAreaWhitelist {
    tags: HashSet<String>,
}

impl ResearchAreaWhitelist {
    pub fn new<I, S>(areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = areas
            .into_iter()
            .map(|area| Self::canonical_tag(area.as_ref()))
            .collect();
        Self { tags }
    }

    /// "Machine Intelligence" -> "research-area-machine-intelligence"
    pub fn canonical_tag(area: &str) -> String {
        format!(
            "{}{}",
            RESEARCH_AREA_PREFIX,
            area.to_lowercase().replace(' ', "-")
        )
    }

    /// True when any of the publication's tags is whitelisted
    ///
    /// Publication tags are compared as-is; upstream already sends them in
    /// lower-kebab form.
    pub fn matches(&self, tag_pks: &[String]) -> bool {
        tag_pks.iter().any(|tag| self.tags.contains(tag))
    }

    pub fn tags(&self) -> &HashSet<String> {
        &self.tags
    }
}

/// Whether the citation text shows a downloadable artifact
pub fn has_download_link(bibtex: &str) -> bool {
    bibtex.contains(DOWNLOAD_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_canonical_tags() {
        let whitelist = ResearchAreaWhitelist::new(["Robotics", "Data Mining and Modeling"]);
        assert!(whitelist.tags().contains("research-area-robotics"));
        assert!(whitelist
            .tags()
            .contains("research-area-data-mining-and-modeling"));
        assert_eq!(whitelist.tags().len(), 2);
    }

    #[test]
    fn test_matches_on_any_intersection() {
        let whitelist = ResearchAreaWhitelist::new(["Robotics"]);
        assert!(whitelist.matches(&tags(&["team-brain", "research-area-robotics"])));
        assert!(whitelist.matches(&tags(&["research-area-robotics", "team-brain"])));
        assert!(!whitelist.matches(&tags(&["team-foo"])));
        assert!(!whitelist.matches(&[]));
    }

    #[test]
    fn test_publication_tags_are_not_case_folded() {
        let whitelist = ResearchAreaWhitelist::new(["Robotics"]);
        assert!(!whitelist.matches(&tags(&["Research-Area-Robotics"])));
    }

    #[test]
    fn test_download_marker() {
        assert!(has_download_link(
            "@inproceedings{x,\n\ttitle\t= {X},\n\tURL\t= {https://example.com/x.pdf}\n}"
        ));
        assert!(!has_download_link("@inproceedings{x,\n\ttitle\t= {X}\n}"));
        assert!(!has_download_link("url = {https://example.com}"));
        assert!(!has_download_link("URL = {https://example.com}"));
        assert!(!has_download_link(""));
    }
}
