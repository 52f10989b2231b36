//! Final score, verdict and summary for a screened candidate

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::processing::analyzer::{AnalysisResult, PreparedJob, SemanticAnalyzer};
use crate::processing::criteria::{CriterionId, CriterionSpec};
use crate::processing::extractor::ExtractedFields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top passed criteria listed in the summary
const SUMMARY_MATCHES: usize = 3;
const SUMMARY_ROLES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    /// Percentage of the attainable score
    pub score: f32,
    pub passed: bool,
    pub summary: Vec<String>,
    pub analysis: AnalysisResult,
    /// Met criteria, in criteria order
    pub passed_criteria: Vec<CriterionId>,
    /// Unmet required criteria, in criteria order
    pub failed_required: Vec<CriterionId>,
}

impl ScreeningOutcome {
    pub fn is_met(&self, id: CriterionId) -> bool {
        self.passed_criteria.contains(&id)
    }
}

pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(
        &self,
        analyzer: &SemanticAnalyzer,
        fields: &ExtractedFields,
        criteria: &[CriterionSpec],
        job_description: &str,
    ) -> Result<ScreeningOutcome> {
        let analysis = analyzer.analyze(&fields.raw_text, job_description, criteria)?;
        Ok(self.evaluate(fields, criteria, analysis))
    }

    pub fn score_prepared(
        &self,
        analyzer: &SemanticAnalyzer,
        fields: &ExtractedFields,
        job: &PreparedJob,
    ) -> Result<ScreeningOutcome> {
        let analysis = analyzer.analyze_prepared(&fields.raw_text, job)?;
        Ok(self.evaluate(fields, job.criteria(), analysis))
    }

    /// Score an existing analysis.
    ///
    /// A criterion is met when its text occurs in the resume (case-insensitive)
    /// or its similarity exceeds the threshold. Criteria without a match in
    /// `analysis` count as similarity 0.
    pub fn evaluate(
        &self,
        fields: &ExtractedFields,
        criteria: &[CriterionSpec],
        analysis: AnalysisResult,
    ) -> ScreeningOutcome {
        let similarities: BTreeMap<CriterionId, f32> = analysis
            .criteria_matches
            .iter()
            .map(|m| (m.id, m.similarity))
            .collect();
        let resume_text = fields.raw_text.to_lowercase();

        let mut score = 0.0f32;
        let mut max_score = 0.0f32;
        let mut passed_criteria = Vec::new();
        let mut failed_required = Vec::new();

        for (index, criterion) in criteria.iter().enumerate() {
            let id = CriterionId(index);
            let similarity = similarities.get(&id).copied().unwrap_or(0.0);
            max_score += criterion.weight;

            let met = resume_text.contains(&criterion.text.to_lowercase())
                || similarity > self.config.similarity_threshold;
            if met {
                score += criterion.weight;
                passed_criteria.push((id, similarity));
            } else if criterion.required {
                failed_required.push((id, similarity));
            }
        }

        score += analysis.overall_similarity * self.config.similarity_bonus;
        max_score += self.config.similarity_bonus;

        let mut percentage = if max_score == 0.0 {
            0.0
        } else {
            100.0 * score / max_score
        };
        if !percentage.is_finite() {
            percentage = 0.0;
        }
        if self.config.clamp_score {
            percentage = percentage.clamp(0.0, 100.0);
        }

        let passed = failed_required.is_empty() && percentage >= self.config.pass_mark;
        let summary = Self::summarize(percentage, criteria, &analysis, &passed_criteria, &failed_required);

        ScreeningOutcome {
            score: percentage,
            passed,
            summary,
            analysis,
            passed_criteria: passed_criteria.into_iter().map(|(id, _)| id).collect(),
            failed_required: failed_required.into_iter().map(|(id, _)| id).collect(),
        }
    }

    fn summarize(
        percentage: f32,
        criteria: &[CriterionSpec],
        analysis: &AnalysisResult,
        passed_criteria: &[(CriterionId, f32)],
        failed_required: &[(CriterionId, f32)],
    ) -> Vec<String> {
        let mut summary = vec![format!("Overall match: {:.1}%", percentage)];

        match analysis.experience_years {
            0 => {}
            1 => summary.push("1 year of experience".to_string()),
            years => summary.push(format!("{} years of experience", years)),
        }

        if !analysis.job_titles.is_empty() {
            let roles: Vec<&str> = analysis
                .job_titles
                .iter()
                .take(SUMMARY_ROLES)
                .map(String::as_str)
                .collect();
            summary.push(format!("Roles: {}", roles.join(", ")));
        }

        // stable sort keeps criteria order among equal similarities
        let mut top = passed_criteria.to_vec();
        top.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (id, similarity) in top.iter().take(SUMMARY_MATCHES) {
            summary.push(format!(
                "Matched: {} (similarity {:.2})",
                criteria[id.0].text, similarity
            ));
        }

        for (id, similarity) in failed_required {
            summary.push(format!(
                "Missing required: {} (similarity {:.2})",
                criteria[id.0].text, similarity
            ));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::CriterionMatch;
    use std::collections::BTreeSet;

    fn fields(text: &str) -> ExtractedFields {
        ExtractedFields {
            raw_text: text.to_string(),
            ..Default::default()
        }
    }

    fn analysis(overall: f32, criteria: &[CriterionSpec], similarities: &[f32]) -> AnalysisResult {
        AnalysisResult {
            overall_similarity: overall,
            skills_matched: BTreeSet::new(),
            education: Vec::new(),
            experience_years: 0,
            job_titles: Vec::new(),
            criteria_matches: similarities
                .iter()
                .enumerate()
                .map(|(i, &similarity)| CriterionMatch {
                    id: CriterionId(i),
                    criterion: criteria[i].clone(),
                    similarity,
                })
                .collect(),
        }
    }

    fn engine() -> ScoringEngine {
        ScoringEngine::new(ScoringConfig::default())
    }

    #[test]
    fn test_empty_criteria_scores_bonus_only() {
        let outcome = engine().evaluate(&fields("anything"), &[], analysis(0.0, &[], &[]));
        assert_eq!(outcome.score, 0.0);
        assert!(!outcome.passed);
        assert_eq!(outcome.summary, vec!["Overall match: 0.0%"]);

        let outcome = engine().evaluate(&fields("anything"), &[], analysis(0.8, &[], &[]));
        assert!((outcome.score - 80.0).abs() < 1e-4);
        assert!(outcome.passed);
    }

    #[test]
    fn test_no_bonus_and_no_criteria_is_zero_not_nan() {
        let engine = ScoringEngine::new(ScoringConfig {
            similarity_bonus: 0.0,
            ..Default::default()
        });
        let outcome = engine.evaluate(&fields(""), &[], analysis(0.9, &[], &[]));
        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn test_scores_are_not_clamped_by_default() {
        let criteria = vec![CriterionSpec::optional("Haskell", 1.0)];
        let outcome = engine().evaluate(&fields("python"), &criteria, analysis(-0.5, &criteria, &[0.1]));
        assert!((outcome.score - (-5.0 * 100.0 / 11.0)).abs() < 1e-4);

        let clamped = ScoringEngine::new(ScoringConfig {
            clamp_score: true,
            ..Default::default()
        })
        .evaluate(&fields("python"), &criteria, analysis(-0.5, &criteria, &[0.1]));
        assert_eq!(clamped.score, 0.0);
    }

    #[test]
    fn test_unmet_required_vetoes_high_score() {
        let criteria = vec![
            CriterionSpec::optional("Python", 30.0),
            CriterionSpec::required("Kubernetes", 1.0),
        ];
        let outcome = engine().evaluate(
            &fields("Python developer"),
            &criteria,
            analysis(1.0, &criteria, &[0.9, 0.2]),
        );

        assert!(outcome.score > 80.0);
        assert!(!outcome.passed);
        assert_eq!(outcome.failed_required, vec![CriterionId(1)]);
    }

    #[test]
    fn test_met_required_still_needs_pass_mark() {
        let criteria = vec![
            CriterionSpec::required("Python", 1.0),
            CriterionSpec::optional("Go", 1.0),
            CriterionSpec::optional("Java", 1.0),
        ];
        let outcome = engine().evaluate(
            &fields("Python developer"),
            &criteria,
            analysis(0.5, &criteria, &[0.3, 0.1, 0.1]),
        );

        assert!(outcome.failed_required.is_empty());
        assert!((outcome.score - 600.0 / 13.0).abs() < 1e-4);
        assert!(!outcome.passed);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let criteria = vec![
            CriterionSpec::optional("Terraform", 1.0),
            CriterionSpec::optional("Ansible", 1.0),
        ];
        let outcome = engine().evaluate(
            &fields("infrastructure as code"),
            &criteria,
            analysis(0.0, &criteria, &[0.70, 0.71]),
        );
        assert_eq!(outcome.passed_criteria, vec![CriterionId(1)]);
    }

    #[test]
    fn test_duplicate_criteria_score_independently() {
        let criteria = vec![
            CriterionSpec::optional("Python", 2.0),
            CriterionSpec::optional("Python", 2.0),
        ];
        let outcome = engine().evaluate(
            &fields("python"),
            &criteria,
            analysis(0.0, &criteria, &[0.5, 0.5]),
        );

        assert_eq!(outcome.passed_criteria, vec![CriterionId(0), CriterionId(1)]);
        assert!((outcome.score - 400.0 / 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_match_defaults_to_zero() {
        let criteria = vec![CriterionSpec::required("Kubernetes", 1.0)];
        let outcome = engine().evaluate(&fields("python"), &criteria, analysis(0.0, &[], &[]));

        assert_eq!(outcome.failed_required, vec![CriterionId(0)]);
        assert_eq!(
            outcome.summary.last().unwrap(),
            "Missing required: Kubernetes (similarity 0.00)"
        );
    }

    #[test]
    fn test_summary_order() {
        let criteria = vec![
            CriterionSpec::optional("Python", 1.0),
            CriterionSpec::optional("Rust", 1.0),
            CriterionSpec::optional("Docker", 1.0),
            CriterionSpec::optional("Kafka", 1.0),
            CriterionSpec::required("Kubernetes", 1.0),
        ];
        let mut result = analysis(0.5, &criteria, &[0.40, 0.90, 0.90, 0.75, 0.31]);
        result.experience_years = 5;
        result.job_titles = vec![
            "Senior Software Engineer".to_string(),
            "Tech Lead".to_string(),
            "Manager".to_string(),
        ];

        let outcome = engine().evaluate(&fields("Python developer"), &criteria, result);

        assert_eq!(
            outcome.summary,
            vec![
                "Overall match: 60.0%",
                "5 years of experience",
                "Roles: Senior Software Engineer, Tech Lead",
                "Matched: Rust (similarity 0.90)",
                "Matched: Docker (similarity 0.90)",
                "Matched: Kafka (similarity 0.75)",
                "Missing required: Kubernetes (similarity 0.31)",
            ]
        );
        assert!(!outcome.passed);
        assert!(outcome.is_met(CriterionId(0)));
        assert!(!outcome.is_met(CriterionId(4)));
    }

    #[test]
    fn test_single_year_wording() {
        let mut result = analysis(0.0, &[], &[]);
        result.experience_years = 1;
        let outcome = engine().evaluate(&fields(""), &[], result);
        assert_eq!(outcome.summary[1], "1 year of experience");
    }
}
