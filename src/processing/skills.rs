//! Skill vocabulary matching

use crate::config::AnalysisConfig;
use crate::error::{Result, ScreenerError};
use crate::processing::text_processor::TextProcessor;
use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::{BTreeSet, HashSet};

/// Matches a skill vocabulary against resume text.
///
/// A skill is found when its lowercase form occurs literally in the text, or
/// when every lemma of the skill also appears among the text's lemmas
/// ("manage" is found in "managing teams").
pub struct SkillMatcher {
    vocabulary: Vec<String>,
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl SkillMatcher {
    pub fn new(config: &AnalysisConfig) -> Self {
        let mut vocabulary = config.extra_skills.clone();
        if config.include_default_skills {
            vocabulary.extend(Self::default_skill_database());
        }
        Self {
            vocabulary: Self::dedup_case_insensitive(vocabulary),
        }
    }

    /// Find skills from `extra` (typically the job's criteria) and the configured vocabulary.
    ///
    /// Earlier spellings win when the same skill appears twice with different case.
    pub fn find_skills(
        &self,
        text: &str,
        extra: &[String],
        processor: &TextProcessor,
    ) -> Result<BTreeSet<String>> {
        let skills = Self::dedup_case_insensitive(
            extra.iter().chain(self.vocabulary.iter()).cloned().collect(),
        );
        if skills.is_empty() {
            return Ok(BTreeSet::new());
        }

        let text_lower = text.to_lowercase();
        let patterns: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();

        let literal_matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| ScreenerError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        let literal_hits: HashSet<usize> = literal_matcher
            .find_overlapping_iter(&text_lower)
            .map(|m| m.pattern().as_usize())
            .collect();

        let text_lemmas = processor.lemmas(&text_lower);

        let found = skills
            .iter()
            .enumerate()
            .filter(|(i, skill)| {
                if literal_hits.contains(i) {
                    return true;
                }
                // lemmas drop symbols, so "C#" and "C++" would share {"c"}
                if skill.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
                    return false;
                }
                let skill_lemmas = processor.lemmas(skill);
                !skill_lemmas.is_empty() && skill_lemmas.is_subset(&text_lemmas)
            })
            .map(|(_, skill)| skill.clone())
            .collect();

        Ok(found)
    }

    fn dedup_case_insensitive(skills: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
            .collect()
    }

    /// Default skill database
    fn default_skill_database() -> Vec<String> {
        [
            // Programming languages
            "rust", "python", "javascript", "typescript", "java", "c++", "c#", "golang", "ruby",
            "php", "swift", "kotlin", "scala", "haskell", "matlab",
            // Web
            "react", "vue", "angular", "html", "css", "node.js", "django", "flask",
            // Infrastructure
            "docker", "kubernetes", "aws", "azure", "gcp", "terraform", "ansible", "jenkins",
            "microservices", "graphql", "grpc", "redis", "elasticsearch", "nginx", "linux",
            // Databases
            "sql", "postgresql", "mysql", "mongodb", "sqlite", "dynamodb",
            // Data
            "machine learning", "deep learning", "tensorflow", "pytorch", "pandas", "numpy",
            "spark", "kafka", "airflow",
            // Soft skills
            "leadership", "communication", "teamwork", "problem solving", "project management",
            "mentoring", "negotiation", "customer service",
            // Practices
            "agile", "scrum", "git", "testing",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}
