//! Screening pipeline combining field extraction, semantic analysis and scoring

use crate::config::Config;
use crate::error::Result;
use crate::processing::analyzer::{PreparedJob, SemanticAnalyzer};
use crate::processing::criteria::CriterionSpec;
use crate::processing::extractor::{ExtractedFields, FieldExtractor};
use crate::processing::scoring::{ScoringEngine, ScreeningOutcome};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything produced for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screening {
    pub fields: ExtractedFields,
    pub outcome: ScreeningOutcome,
}

/// Main screening engine; build once and reuse for every candidate
pub struct Screener {
    extractor: FieldExtractor,
    analyzer: SemanticAnalyzer,
    scoring: ScoringEngine,
}

impl Screener {
    pub fn new(analyzer: SemanticAnalyzer, config: &Config) -> Self {
        Self {
            extractor: FieldExtractor::new(&config.extraction),
            analyzer,
            scoring: ScoringEngine::new(config.scoring.clone()),
        }
    }

    /// Load the embedding model named by `model` (or the configured default)
    pub fn from_config(config: &Config, model: Option<&str>) -> Result<Self> {
        let analyzer = SemanticAnalyzer::from_config(config, model)?;
        info!("Screener ready with embedding model {}", analyzer.model_name());
        Ok(Self::new(analyzer, config))
    }

    pub fn analyzer(&self) -> &SemanticAnalyzer {
        &self.analyzer
    }

    pub fn prepare_job(
        &self,
        job_description: &str,
        criteria: &[CriterionSpec],
    ) -> Result<PreparedJob> {
        self.analyzer.prepare_job(job_description, criteria)
    }

    pub fn screen(
        &self,
        resume_text: &str,
        job_description: &str,
        criteria: &[CriterionSpec],
    ) -> Result<Screening> {
        let job = self.prepare_job(job_description, criteria)?;
        self.screen_prepared(resume_text, &job)
    }

    pub fn screen_prepared(&self, resume_text: &str, job: &PreparedJob) -> Result<Screening> {
        let start_time = Instant::now();

        let fields = self.extractor.extract(resume_text);
        let outcome = self.scoring.score_prepared(&self.analyzer, &fields, job)?;

        debug!(
            "Screened '{}' in {:.2?}: {:.1}% ({})",
            fields.name,
            start_time.elapsed(),
            outcome.score,
            if outcome.passed { "passed" } else { "failed" }
        );

        Ok(Screening { fields, outcome })
    }

    /// Screen several resumes against one job.
    ///
    /// Candidates are independent: one failure does not stop the others, and
    /// results come back in input order.
    pub fn screen_batch<S: AsRef<str>>(
        &self,
        resumes: &[S],
        job: &PreparedJob,
    ) -> Vec<Result<Screening>> {
        resumes
            .iter()
            .map(|resume| self.screen_prepared(resume.as_ref(), job))
            .collect()
    }
}
