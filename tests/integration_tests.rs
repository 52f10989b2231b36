//! Integration tests for the candidate screener

use candidate_screener::config::Config;
use candidate_screener::error::Result;
use candidate_screener::input::manager::InputManager;
use candidate_screener::output::{CandidateRecord, ReportGenerator, ScreeningReport};
use candidate_screener::processing::analyzer::SemanticAnalyzer;
use candidate_screener::processing::criteria::{extract_criteria, load_criteria};
use candidate_screener::processing::embeddings::Embedder;
use candidate_screener::{CriterionId, CriterionSpec, Screener};
use std::path::Path;
use tempfile::TempDir;

const KEYWORDS: &[&str] = &["python", "kubernetes", "backend", "engineer", "sql"];

/// Keyword counts; stands in for the embedding model
struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                KEYWORDS
                    .iter()
                    .map(|k| text.split_whitespace().filter(|w| w == k).count() as f32)
                    .collect()
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "keywords"
    }
}

fn screener(config: &Config) -> Screener {
    let analyzer = SemanticAnalyzer::new(Box::new(KeywordEmbedder), &config.analysis);
    Screener::new(analyzer, config)
}

fn scenario_criteria() -> Vec<CriterionSpec> {
    vec![
        CriterionSpec::required("Python", 2.0),
        CriterionSpec::optional("Kubernetes", 1.0),
    ]
}

const JOB: &str = "Looking for a backend engineer with Python experience";

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Senior Software Engineer"));
    assert!(text.contains("Skills: Python, SQL"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.md"))
        .await
        .unwrap();

    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Senior Software Engineer at Acme Corp"));
    assert!(text.contains("- Managing teams of 10"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let first = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.extract_text(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_and_missing_files() {
    let dir = TempDir::new().unwrap();
    let unsupported = dir.path().join("resume.docx");
    std::fs::write(&unsupported, "binary").unwrap();

    let mut manager = InputManager::new();
    assert!(manager.extract_text(&unsupported).await.is_err());
    assert!(manager
        .extract_text(Path::new("tests/fixtures/nonexistent.txt"))
        .await
        .is_err());

    // lossy extraction degrades to empty text
    assert_eq!(manager.extract_text_lossy(&unsupported).await, "");
}

#[tokio::test]
async fn test_criteria_from_job_description_and_file() {
    let mut manager = InputManager::new();
    let job = manager
        .extract_text(Path::new("tests/fixtures/job_description.md"))
        .await
        .unwrap();

    assert_eq!(
        extract_criteria(&job),
        vec![
            CriterionSpec::optional("Python", 1.0),
            CriterionSpec::optional("Kubernetes", 1.0),
        ]
    );
    assert_eq!(
        load_criteria(Path::new("tests/fixtures/criteria.toml")).unwrap(),
        scenario_criteria()
    );
}

#[tokio::test]
async fn test_end_to_end_screening() {
    let resume = InputManager::new()
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let screening = screener(&Config::default())
        .screen(&resume, JOB, &scenario_criteria())
        .unwrap();
    let outcome = &screening.outcome;

    assert_eq!(screening.fields.name, "Jane Doe");
    assert_eq!(screening.fields.email.as_deref(), Some("jane.doe@example.com"));
    assert!(screening.fields.dates.contains(&"2019-03".to_string()));

    assert_eq!(outcome.passed_criteria, vec![CriterionId(0)]);
    assert!(outcome.failed_required.is_empty());
    assert_eq!(outcome.passed, outcome.score >= 50.0);
    assert!(outcome.passed);

    assert!(outcome.summary[0].starts_with("Overall match: "));
    assert_eq!(outcome.summary[1], "5 years of experience");
    assert_eq!(outcome.summary[2], "Roles: Senior Software Engineer");
    assert!(outcome.summary[3].starts_with("Matched: Python (similarity "));
    assert_eq!(outcome.summary.len(), 4);

    assert!(outcome.analysis.skills_matched.contains("Python"));
    assert!(!outcome.analysis.skills_matched.contains("Kubernetes"));
    assert!(outcome
        .analysis
        .education
        .iter()
        .any(|e| e.contains("BSc Computer Science")));
}

#[test]
fn test_screening_is_idempotent() {
    let resume = std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap();
    let screener = screener(&Config::default());

    let first = screener.screen(&resume, JOB, &scenario_criteria()).unwrap();
    let second = screener.screen(&resume, JOB, &scenario_criteria()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.outcome.score.to_bits(), second.outcome.score.to_bits());
}

#[test]
fn test_unmet_required_criterion_fails_candidate() {
    let resume = std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap();
    let criteria = vec![
        CriterionSpec::optional("Python", 10.0),
        CriterionSpec::required("Kubernetes", 1.0),
    ];

    let outcome = screener(&Config::default())
        .screen(&resume, JOB, &criteria)
        .unwrap()
        .outcome;

    assert!(outcome.score > 80.0);
    assert!(!outcome.passed);
    assert_eq!(
        outcome.summary.last().unwrap(),
        "Missing required: Kubernetes (similarity 0.00)"
    );
}

#[test]
fn test_configured_skill_matches_inflected_form() {
    let mut config = Config::default();
    config.analysis.extra_skills = vec!["manage".to_string()];

    let screening = screener(&config)
        .screen("Experienced in managing teams of 10", JOB, &[])
        .unwrap();

    assert!(screening.outcome.analysis.skills_matched.contains("manage"));
}

#[test]
fn test_batch_report_ranks_candidates() {
    let config = Config::default();
    let screener = screener(&config);
    let criteria = scenario_criteria();
    let job = screener.prepare_job(JOB, &criteria).unwrap();

    let resumes = vec![
        "Sam Lee\nGraphic designer".to_string(),
        std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap(),
    ];
    let records: Vec<CandidateRecord> = screener
        .screen_batch(&resumes, &job)
        .into_iter()
        .zip(["sam.txt", "jane.txt"])
        .map(|(result, source)| CandidateRecord::from_screening(source, &criteria, &result.unwrap()))
        .collect();

    let report = ScreeningReport::new("job.md", "keywords", 0, records).ranked();
    assert_eq!(report.candidates[0].source, "jane.txt");
    assert_eq!(report.passed_count(), 1);

    let markdown = ReportGenerator::with_options(false, false, true, false)
        .generate_report(&report, &candidate_screener::config::OutputFormat::Markdown)
        .unwrap();
    assert!(markdown.contains("| 1 | Jane Doe |"));
    assert!(markdown.contains("| 2 | Sam Lee |"));
}
