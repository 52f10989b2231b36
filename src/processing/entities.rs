//! Named-entity recognition

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityLabel {
    Organization,
}

/// An entity span; `start`/`end` are byte offsets into the recognized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// Finds named entities in free text.
///
/// Shared across screenings like the embedder, so it must be `Send + Sync`.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<Entity>;
}

/// Recognizes organizations as capitalized spans anchored on an
/// organization noun ("State University", "Institute of Technology", "Acme Corp").
pub struct RuleBasedRecognizer {
    organization_regex: Regex,
}

impl Default for RuleBasedRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedRecognizer {
    pub fn new() -> Self {
        let word = r"[A-Z][\w&'.-]*";
        let anchor = r"(?:University|College|Institute|School|Academy|Polytechnic|Conservatory|Corporation|Company|Technologies|Labs|Group|Bank|Foundation|Inc|Corp|LLC|Ltd)\b\.?";
        let pattern = format!(
            r"\b(?:{word}[ \t]+(?:(?:of|and|for|the|&)[ \t]+)?){{0,4}}{anchor}(?:[ \t]+(?:of|for|at)[ \t]+(?:the[ \t]+)?{word}(?:[ \t]+{word}){{0,3}})?"
        );

        Self {
            organization_regex: Regex::new(&pattern).expect("Invalid organization regex"),
        }
    }
}

impl EntityRecognizer for RuleBasedRecognizer {
    fn recognize(&self, text: &str) -> Vec<Entity> {
        self.organization_regex
            .find_iter(text)
            .map(|m| Entity {
                text: m.as_str().trim_end_matches('.').to_string(),
                label: EntityLabel::Organization,
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organizations(text: &str) -> Vec<String> {
        RuleBasedRecognizer::new()
            .recognize(text)
            .into_iter()
            .map(|e| e.text)
            .collect()
    }

    #[test]
    fn test_universities() {
        assert_eq!(
            organizations("BSc Computer Science, State University, 2014"),
            vec!["State University"]
        );
        assert_eq!(
            organizations("MSc at Massachusetts Institute of Technology"),
            vec!["Massachusetts Institute of Technology"]
        );
        assert_eq!(
            organizations("University of California, Berkeley"),
            vec!["University of California"]
        );
    }

    #[test]
    fn test_companies() {
        assert_eq!(
            organizations("Engineer at Acme Corp. and later Globex Corporation"),
            vec!["Acme Corp", "Globex Corporation"]
        );
    }

    #[test]
    fn test_offsets_point_into_text() {
        let text = "Studied at Example College";
        let entities = RuleBasedRecognizer::new().recognize(text);

        assert_eq!(entities.len(), 1);
        assert_eq!(&text[entities[0].start..entities[0].end], "Example College");
        assert_eq!(entities[0].label, EntityLabel::Organization);
    }

    #[test]
    fn test_lowercase_mentions_are_ignored() {
        assert!(organizations("went to college and school").is_empty());
    }
}
