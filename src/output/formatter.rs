//! Output formatters for screening reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{CandidateRecord, ScreeningReport};
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting screening reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for storage and integration
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_verdict(&self, record: &CandidateRecord) -> String {
        let color = if record.passed { Color::Green } else { Color::Red };
        if self.use_colors {
            format!("[{}]", record.verdict().color(color).bold())
        } else {
            format!("[{}]", record.verdict())
        }
    }

    fn format_candidate(&self, rank: usize, record: &CandidateRecord) -> String {
        let title = if record.name.is_empty() {
            format!("{}. {}", rank, record.source)
        } else {
            format!("{}. {} ({})", rank, record.name, record.source)
        };

        let mut output = self.format_header(&title, 2);
        output.push_str(&format!(
            "Score: {:.1}% {}\n",
            record.score,
            self.format_verdict(record)
        ));

        for line in &record.summary {
            let color = if line.starts_with("Missing required") {
                Color::Red
            } else if line.starts_with("Matched") {
                Color::Green
            } else {
                Color::White
            };
            output.push_str(&format!("  • {}\n", self.colorize(line, color)));
        }

        if self.detailed {
            if !record.email.is_empty() || !record.phone.is_empty() {
                output.push_str(&format!("Contact: {} {}\n", record.email, record.phone));
            }
            if !record.skills_matched.is_empty() {
                output.push_str(&format!(
                    "Skills matched: {}\n",
                    self.colorize(&record.skills_matched.join(", "), Color::Cyan)
                ));
            }
            for entry in &record.education {
                output.push_str(&format!("Education: {}\n", entry));
            }

            output.push_str(&self.format_header("Criteria", 3));
            for i in 0..record.criteria.len() {
                let mark = if record.criteria_met[i] {
                    self.colorize("✓", Color::Green)
                } else if record.criteria_required[i] {
                    self.colorize("✗", Color::Red)
                } else {
                    self.colorize("·", Color::Yellow)
                };
                let required = if record.criteria_required[i] { " (required)" } else { "" };
                output.push_str(&format!(
                    "  {} {}{} weight {} similarity {:.2}\n",
                    mark,
                    record.criteria[i],
                    required,
                    record.criteria_weight[i],
                    record.criteria_similarity[i]
                ));
            }
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("CANDIDATE SCREENING", 1));
        output.push_str(&format!(
            "Job: {} | Model: {} | Generated: {} | Processing time: {}ms\n",
            report.metadata.job_file,
            report.metadata.embedding_model,
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!(
            "Candidates: {} | Passed: {}\n",
            report.candidates.len(),
            self.colorize(&report.passed_count().to_string(), Color::Green)
        ));

        for (i, record) in report.candidates.iter().enumerate() {
            output.push_str(&self.format_candidate(i + 1, record));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::from("# Candidate Screening Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Job:** `{}` | **Model:** `{}`\n\n",
                report.metadata.job_file, report.metadata.embedding_model
            ));
        }

        output.push_str("| Rank | Candidate | Score | Verdict |\n");
        output.push_str("|------|-----------|-------|---------|\n");
        for (i, record) in report.candidates.iter().enumerate() {
            let candidate = if record.name.is_empty() { &record.source } else { &record.name };
            output.push_str(&format!(
                "| {} | {} | {:.1}% | {} |\n",
                i + 1,
                Self::escape_cell(candidate),
                record.score,
                record.verdict()
            ));
        }

        for record in &report.candidates {
            let candidate = if record.name.is_empty() { &record.source } else { &record.name };
            output.push_str(&format!("\n## {}\n\n", candidate));
            for line in &record.summary {
                output.push_str(&format!("- {}\n", line));
            }

            if !record.criteria.is_empty() {
                output.push_str("\n| Criterion | Weight | Required | Similarity | Met |\n");
                output.push_str("|-----------|--------|----------|------------|-----|\n");
                for i in 0..record.criteria.len() {
                    output.push_str(&format!(
                        "| {} | {} | {} | {:.2} | {} |\n",
                        Self::escape_cell(&record.criteria[i]),
                        record.criteria_weight[i],
                        if record.criteria_required[i] { "yes" } else { "no" },
                        record.criteria_similarity[i],
                        if record.criteria_met[i] { "✅" } else { "❌" }
                    ));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &ScreeningReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ScreeningReport {
        let record = CandidateRecord {
            source: "jane.txt".to_string(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: String::new(),
            score: 61.5,
            passed: false,
            summary: vec![
                "Overall match: 61.5%".to_string(),
                "Missing required: Kubernetes (similarity 0.31)".to_string(),
            ],
            overall_similarity: 0.5,
            experience_years: 5,
            job_titles: Vec::new(),
            skills_matched: vec!["python".to_string()],
            skills: Vec::new(),
            education: Vec::new(),
            dates: Vec::new(),
            criteria: vec!["Python".to_string(), "Kubernetes".to_string()],
            criteria_weight: vec![2.0, 1.0],
            criteria_required: vec![false, true],
            criteria_similarity: vec![0.82, 0.31],
            criteria_met: vec![true, false],
        };
        ScreeningReport::new("job.md", "stub", 12, vec![record])
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true)
            .format_report(&report())
            .unwrap();

        assert!(output.contains("1. Jane Doe (jane.txt)"));
        assert!(output.contains("Score: 61.5% [FAIL]"));
        assert!(output.contains("  • Missing required: Kubernetes (similarity 0.31)"));
        assert!(output.contains("✗ Kubernetes (required) weight 1 similarity 0.31"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_markdown_tables() {
        let output = MarkdownFormatter::new(false).format_report(&report()).unwrap();

        assert!(output.starts_with("# Candidate Screening Report\n\n| Rank"));
        assert!(output.contains("| 1 | Jane Doe | 61.5% | FAIL |"));
        assert!(output.contains("| Python | 2 | no | 0.82 | ✅ |"));
        assert!(output.contains("- Overall match: 61.5%"));
    }

    #[test]
    fn test_json_round_trip() {
        let json = JsonFormatter::new(false).format_report(&report()).unwrap();
        let parsed: ScreeningReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.candidates, report().candidates);
    }
}
