//! Semantic analysis of a resume against a job description and its criteria

use crate::config::{AnalysisConfig, Config};
use crate::error::Result;
use crate::processing::criteria::{validate_criteria, CriterionId, CriterionSpec};
use crate::processing::embeddings::{cosine_similarity, Embedder, Model2VecEmbedder};
use crate::processing::entities::{EntityLabel, EntityRecognizer, RuleBasedRecognizer};
use crate::processing::skills::SkillMatcher;
use crate::processing::text_processor::TextProcessor;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

const JOB_TITLES: &[&str] = &[
    "vice president", "co-founder", "engineer", "developer", "manager", "director", "analyst",
    "specialist", "consultant", "coordinator", "assistant", "designer", "architect",
    "administrator", "supervisor", "lead", "head", "chief", "officer", "president", "vp",
    "executive", "founder",
];

/// Characters on either side of an organization searched for education keywords
const EDUCATION_CONTEXT: usize = 50;

/// Similarity of one criterion to the resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionMatch {
    pub id: CriterionId,
    pub criterion: CriterionSpec,
    pub similarity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_similarity: f32,
    pub skills_matched: BTreeSet<String>,
    pub education: Vec<String>,
    pub experience_years: u32,
    /// Deduplicated, in order of first occurrence
    pub job_titles: Vec<String>,
    /// Sorted by descending similarity; ties keep criteria order
    pub criteria_matches: Vec<CriterionMatch>,
}

impl AnalysisResult {
    /// Similarity recorded for `id`, or 0 when the analysis has no entry for it
    pub fn similarity_for(&self, id: CriterionId) -> f32 {
        self.criteria_matches
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.similarity)
            .unwrap_or(0.0)
    }
}

/// A job description and its criteria with embeddings computed once
#[derive(Debug, Clone)]
pub struct PreparedJob {
    criteria: Vec<CriterionSpec>,
    description_embedding: Vec<f32>,
    criterion_embeddings: Vec<Vec<f32>>,
}

impl PreparedJob {
    pub fn criteria(&self) -> &[CriterionSpec] {
        &self.criteria
    }
}

/// Embedding and pattern based resume analysis.
///
/// Construct once per process; every method takes `&self`, so one analyzer can
/// serve concurrent screenings.
pub struct SemanticAnalyzer {
    embedder: Box<dyn Embedder>,
    recognizer: Box<dyn EntityRecognizer>,
    processor: TextProcessor,
    skill_matcher: SkillMatcher,
    title_regex: Regex,
    education_regex: Regex,
    experience_patterns: Vec<Regex>,
}

impl SemanticAnalyzer {
    pub fn new(embedder: Box<dyn Embedder>, config: &AnalysisConfig) -> Self {
        let titles = JOB_TITLES
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let title_regex = Regex::new(&format!(
            r"\b(?:[A-Z][\w+#&./-]+[ \t]+){{0,3}}(?i:{titles})s?\b"
        ))
        .expect("Invalid job title regex");

        let education_regex = Regex::new(
            r"(?i)\b(?:bachelor|master|phd|doctorate|degree|diploma|bsc|msc|ba|ma|mba|university|college|institute|school)s?\b|\b(?:ph\.d|[bm]\.[sa])\.?",
        )
        .expect("Invalid education regex");

        let experience_patterns = [
            r"(\d+)\+?\s*years?\s*(?:of)?\s*experience",
            r"experience\s*(?:of)?\s*(\d+)\+?\s*years?",
            r"worked\s*(?:for)?\s*(\d+)\+?\s*years?",
            r"(\d+)\+?\s*years?\s*(?:in|at|with)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid experience regex"))
        .collect();

        Self {
            embedder,
            recognizer: Box::new(RuleBasedRecognizer::new()),
            processor: TextProcessor::new(),
            skill_matcher: SkillMatcher::new(config),
            title_regex,
            education_regex,
            experience_patterns,
        }
    }

    /// Load the configured embedding model; failure to load is fatal
    pub fn from_config(config: &Config, model: Option<&str>) -> Result<Self> {
        let embedder = Model2VecEmbedder::from_config(config, model)?;
        Ok(Self::new(Box::new(embedder), &config.analysis))
    }

    pub fn with_recognizer(mut self, recognizer: Box<dyn EntityRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Embed a job description and its criteria for reuse across candidates
    pub fn prepare_job(
        &self,
        job_description: &str,
        criteria: &[CriterionSpec],
    ) -> Result<PreparedJob> {
        validate_criteria(criteria)?;

        let description_embedding = self
            .embedder
            .encode_single(&self.processor.preprocess(job_description))?;

        let criterion_texts: Vec<String> = criteria
            .iter()
            .map(|c| self.processor.preprocess(&c.text))
            .collect();
        let criterion_embeddings = if criterion_texts.is_empty() {
            Vec::new()
        } else {
            self.embedder.encode(&criterion_texts)?
        };

        Ok(PreparedJob {
            criteria: criteria.to_vec(),
            description_embedding,
            criterion_embeddings,
        })
    }

    pub fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
        criteria: &[CriterionSpec],
    ) -> Result<AnalysisResult> {
        let job = self.prepare_job(job_description, criteria)?;
        self.analyze_prepared(resume_text, &job)
    }

    pub fn analyze_prepared(&self, resume_text: &str, job: &PreparedJob) -> Result<AnalysisResult> {
        let start_time = Instant::now();

        let resume_embedding = self
            .embedder
            .encode_single(&self.processor.preprocess(resume_text))?;
        let overall_similarity = cosine_similarity(&resume_embedding, &job.description_embedding)?;

        let mut criteria_matches = job
            .criteria
            .iter()
            .enumerate()
            .map(|(i, criterion)| -> Result<CriterionMatch> {
                let similarity = match job.criterion_embeddings.get(i) {
                    Some(embedding) => cosine_similarity(embedding, &resume_embedding)?,
                    None => 0.0,
                };
                Ok(CriterionMatch {
                    id: CriterionId(i),
                    criterion: criterion.clone(),
                    similarity,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        criteria_matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        let criterion_texts: Vec<String> = job.criteria.iter().map(|c| c.text.clone()).collect();
        let skills_matched =
            self.skill_matcher
                .find_skills(resume_text, &criterion_texts, &self.processor)?;

        let result = AnalysisResult {
            overall_similarity,
            skills_matched,
            education: self.extract_education(resume_text),
            experience_years: self.extract_experience_years(resume_text),
            job_titles: self.extract_job_titles(resume_text),
            criteria_matches,
        };

        debug!(
            "Analyzed resume against {} criteria in {:.2?} (overall similarity {:.3})",
            job.criteria.len(),
            start_time.elapsed(),
            result.overall_similarity
        );

        Ok(result)
    }

    /// Sentences mentioning education, then nearby educational institutions
    pub fn extract_education(&self, text: &str) -> Vec<String> {
        let mut education: Vec<String> = self
            .processor
            .sentences(text)
            .into_iter()
            .filter(|s| self.education_regex.is_match(s))
            .collect();

        for entity in self.recognizer.recognize(text) {
            if entity.label != EntityLabel::Organization {
                continue;
            }
            let context = context_window(text, entity.start, entity.end, EDUCATION_CONTEXT);
            if !self.education_regex.is_match(context) {
                continue;
            }
            if !education.join(" ").contains(&entity.text) {
                education.push(format!("{} (Educational Institution)", entity.text));
            }
        }

        education
    }

    /// Largest number of years stated in any experience phrasing, 0 if none
    pub fn extract_experience_years(&self, text: &str) -> u32 {
        let text = text.to_lowercase();
        self.experience_patterns
            .iter()
            .flat_map(|pattern| pattern.captures_iter(&text))
            .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
            .max()
            .unwrap_or(0)
    }

    pub fn extract_job_titles(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        text.lines()
            .flat_map(|line| self.title_regex.find_iter(line))
            .map(|m| m.as_str().trim().to_string())
            .filter(|title| seen.insert(title.to_lowercase()))
            .collect()
    }
}

/// Slice of `text` around `[start, end)`, widened by up to `radius` bytes on
/// either side and snapped to character boundaries
fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let mut from = start.saturating_sub(radius);
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + radius).min(text.len());
    while !text.is_char_boundary(to) {
        to += 1;
    }
    &text[from..to]
}
