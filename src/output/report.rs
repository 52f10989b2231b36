//! Persistable screening records and the report wrapping them

use crate::error::Result;
use crate::processing::criteria::{CriterionId, CriterionSpec};
use crate::processing::screener::Screening;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One screened candidate as a flat key/value record.
///
/// Every value is a string, number, boolean or a list of those. The `criteria_*`
/// lists are parallel and follow the job's criteria order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub source: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub score: f32,
    pub passed: bool,
    pub summary: Vec<String>,
    pub overall_similarity: f32,
    pub experience_years: u32,
    pub job_titles: Vec<String>,
    pub skills_matched: Vec<String>,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub dates: Vec<String>,
    pub criteria: Vec<String>,
    pub criteria_weight: Vec<f32>,
    pub criteria_required: Vec<bool>,
    pub criteria_similarity: Vec<f32>,
    pub criteria_met: Vec<bool>,
}

impl CandidateRecord {
    pub fn from_screening(source: &str, criteria: &[CriterionSpec], screening: &Screening) -> Self {
        let fields = &screening.fields;
        let outcome = &screening.outcome;
        let analysis = &outcome.analysis;

        let ids = (0..criteria.len()).map(CriterionId);

        Self {
            source: source.to_string(),
            name: fields.name.clone(),
            email: fields.email.clone().unwrap_or_default(),
            phone: fields.phone.clone().unwrap_or_default(),
            score: outcome.score,
            passed: outcome.passed,
            summary: outcome.summary.clone(),
            overall_similarity: analysis.overall_similarity,
            experience_years: analysis.experience_years,
            job_titles: analysis.job_titles.clone(),
            skills_matched: analysis.skills_matched.iter().cloned().collect(),
            skills: fields.skill_list.clone(),
            education: analysis.education.clone(),
            dates: fields.dates.clone(),
            criteria: criteria.iter().map(|c| c.text.clone()).collect(),
            criteria_weight: criteria.iter().map(|c| c.weight).collect(),
            criteria_required: criteria.iter().map(|c| c.required).collect(),
            criteria_similarity: ids.clone().map(|id| analysis.similarity_for(id)).collect(),
            criteria_met: ids.map(|id| outcome.is_met(id)).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Verdict label used by the formatters
    pub fn verdict(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub job_file: String,
    pub embedding_model: String,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub metadata: ReportMetadata,
    pub candidates: Vec<CandidateRecord>,
}

impl ScreeningReport {
    pub fn new(
        job_file: &str,
        embedding_model: &str,
        processing_time_ms: u64,
        candidates: Vec<CandidateRecord>,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                job_file: job_file.to_string(),
                embedding_model: embedding_model.to_string(),
                processing_time_ms,
            },
            candidates,
        }
    }

    /// Order candidates by descending score; equal scores keep their order
    pub fn ranked(mut self) -> Self {
        self.candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    pub fn passed_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.passed).count()
    }
}
