//! Contact details and section extraction from raw resume text

use crate::config::ExtractionConfig;
use crate::processing::normalizer::{find_dates, normalize_dates, normalize_skill};
use regex::Regex;
use serde::{Deserialize, Serialize};

const EDUCATION_KEYWORDS: &[&str] = &["education", "academic", "qualifications"];
const EXPERIENCE_KEYWORDS: &[&str] = &[
    "experience",
    "employment",
    "work history",
    "career history",
];
const SKILLS_KEYWORDS: &[&str] = &["skills", "competencies", "technologies", "expertise", "tech stack"];

/// Only the top of the document is searched for the candidate name
const NAME_SEARCH_LINES: usize = 5;
const MIN_PHONE_DIGITS: usize = 10;

/// Structured fields pulled out of a resume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    pub skills: Vec<String>,
    /// Entries of the skills section, canonicalized
    pub skill_list: Vec<String>,
    /// Every recognizable date, as `YYYY-MM`
    pub dates: Vec<String>,
    pub raw_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Education,
    Experience,
    Skills,
}

impl SectionKind {
    const ALL: [SectionKind; 3] = [
        SectionKind::Education,
        SectionKind::Experience,
        SectionKind::Skills,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            SectionKind::Education => EDUCATION_KEYWORDS,
            SectionKind::Experience => EXPERIENCE_KEYWORDS,
            SectionKind::Skills => SKILLS_KEYWORDS,
        }
    }

    fn marks(self, line_lower: &str) -> bool {
        self.keywords().iter().any(|k| line_lower.contains(k))
    }
}

pub struct FieldExtractor {
    email_regex: Regex,
    phone_regex: Regex,
    not_a_name_regex: Regex,
    skill_delimiters: Regex,
    name_max_length: usize,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl FieldExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        let email_regex = Regex::new(r"[a-zA-Z0-9+._%-]+@[a-zA-Z0-9._%-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        let phone_regex = Regex::new(r"\+?\d[\d \-().]{7,}\d").expect("Invalid phone regex");

        let not_a_name_regex = Regex::new(r"(?i)\b(?:resume|résumé|cv|curriculum)\b")
            .expect("Invalid document heading regex");

        let skill_delimiters = Regex::new(r"[,;|•]").expect("Invalid skill delimiter regex");

        Self {
            email_regex,
            phone_regex,
            not_a_name_regex,
            skill_delimiters,
            name_max_length: config.name_max_length,
        }
    }

    /// Extract every field from `text`; missing fields come back empty
    pub fn extract(&self, text: &str) -> ExtractedFields {
        let lines: Vec<&str> = text.lines().collect();
        let skills = self.section(&lines, SectionKind::Skills);
        let skill_list = self.split_skills(&skills);

        ExtractedFields {
            name: self.name(&lines),
            email: self.email_regex.find(text).map(|m| m.as_str().to_string()),
            phone: self.phone(text),
            education: self.dated_section(&lines, SectionKind::Education),
            experience: self.dated_section(&lines, SectionKind::Experience),
            skills,
            skill_list,
            dates: find_dates(text),
            raw_text: text.to_string(),
        }
    }

    fn name(&self, lines: &[&str]) -> String {
        lines
            .iter()
            .take(NAME_SEARCH_LINES)
            .map(|line| line.trim())
            .find(|line| {
                !line.is_empty()
                    && line.chars().count() < self.name_max_length
                    && !self.email_regex.is_match(line)
                    && !self.phone_regex.is_match(line)
                    && !self.not_a_name_regex.is_match(line)
            })
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// First phone-shaped run with enough digits that is not a date or a year range
    fn phone(&self, text: &str) -> Option<String> {
        self.phone_regex
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .find(|candidate| {
                candidate.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
                    && find_dates(candidate).is_empty()
            })
            .map(str::to_string)
    }

    /// Lines from the first marker of `kind` up to the next marker of any section
    pub fn section(&self, lines: &[&str], kind: SectionKind) -> Vec<String> {
        let lowered: Vec<String> = lines.iter().map(|l| l.to_lowercase()).collect();

        let Some(start) = lowered.iter().position(|l| kind.marks(l)) else {
            return Vec::new();
        };

        let end = lowered[start + 1..]
            .iter()
            .position(|l| SectionKind::ALL.iter().any(|k| k.marks(l)))
            .map(|offset| start + 1 + offset)
            .unwrap_or(lines.len());

        lines[start..end]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Section lines with their dates rewritten as `YYYY-MM`
    fn dated_section(&self, lines: &[&str], kind: SectionKind) -> Vec<String> {
        self.section(lines, kind)
            .iter()
            .map(|line| normalize_dates(line))
            .collect()
    }

    fn split_skills(&self, section: &[String]) -> Vec<String> {
        let mut skills: Vec<String> = Vec::new();

        for (i, line) in section.iter().enumerate() {
            let body = match line.split_once(':') {
                Some((_, rest)) => rest,
                // a bare heading line carries no skills
                None if i == 0 => continue,
                None => line.as_str(),
            };

            for part in self.skill_delimiters.split(body) {
                let part = part.trim().trim_start_matches(['-', '*']).trim();
                if part.is_empty() {
                    continue;
                }
                let skill = normalize_skill(part);
                if !skills.contains(&skill) {
                    skills.push(skill);
                }
            }
        }

        skills
    }
}
