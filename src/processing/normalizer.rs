//! Date and skill-name canonicalization

use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

const MONTHS: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// One alternation so a single left-to-right pass resolves overlaps first-match-wins.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i)\b(?:(?P<ymd_y>\d{{4}})-(?P<ymd_m>\d{{1,2}})-(?P<ymd_d>\d{{1,2}})|(?P<dmy_a>\d{{1,2}})[/.-](?P<dmy_b>\d{{1,2}})[/.-](?P<dmy_y>\d{{4}})|(?P<my_m>\d{{1,2}})/(?P<my_y>\d{{4}})|(?P<dm_d>\d{{1,2}})(?:st|nd|rd|th)?\s+(?P<dm_mon>{m})\.?,?\s+(?P<dm_y>\d{{4}})|(?P<mn_mon>{m})\.?(?:\s+(?P<mn_d>\d{{1,2}})(?:st|nd|rd|th)?)?,?\s+(?P<mn_y>\d{{4}}))\b",
        m = MONTHS
    );
    Regex::new(&pattern).expect("Invalid date regex")
});

static SKILL_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let table: &[(&str, &[&str])] = &[
        ("Microsoft Office", &["ms office", "msoffice", "office 365", "microsoft office"]),
        ("Microsoft Excel", &["excel", "ms excel", "microsoft excel"]),
        ("Microsoft Word", &["ms word", "microsoft word"]),
        ("JavaScript", &["js", "javascript", "java script", "ecmascript"]),
        ("TypeScript", &["ts", "typescript"]),
        ("Node.js", &["node", "nodejs", "node.js", "node js"]),
        ("React", &["react", "reactjs", "react.js"]),
        ("PostgreSQL", &["postgres", "postgresql", "psql"]),
        ("Kubernetes", &["k8s", "kubernetes"]),
        ("Go", &["golang", "go"]),
        ("C#", &["c#", "csharp", "c sharp"]),
        ("C++", &["c++", "cpp"]),
        ("Machine Learning", &["ml", "machine learning"]),
        ("Amazon Web Services", &["aws", "amazon web services"]),
        ("Google Cloud Platform", &["gcp", "google cloud", "google cloud platform"]),
        ("CI/CD", &["ci/cd", "cicd", "ci cd"]),
    ];

    table
        .iter()
        .flat_map(|(canonical, aliases)| aliases.iter().map(move |alias| (*alias, *canonical)))
        .collect()
});

/// Rewrite every recognizable date in `text` as `YYYY-MM`.
///
/// Month-name forms, numeric `D/M/Y` (read as `M/D/Y` only when the day/month
/// reading is not a real date), `M/Y` and `Y-M-D` are understood. Substrings that
/// look like dates but do not name a real calendar date are left untouched.
pub fn normalize_dates(text: &str) -> String {
    DATE_RE
        .replace_all(text, |caps: &Captures| {
            parse_date(caps).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Every date found in `text`, normalized, in encounter order.
pub fn find_dates(text: &str) -> Vec<String> {
    DATE_RE
        .captures_iter(text)
        .filter_map(|caps| parse_date(&caps))
        .collect()
}

/// Map a skill spelling to its canonical name; unknown skills come back trimmed.
pub fn normalize_skill(skill: &str) -> String {
    let trimmed = skill.trim();
    let key = trimmed.to_lowercase();
    SKILL_SYNONYMS
        .get(key.as_str())
        .map(|canonical| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

fn parse_date(caps: &Captures) -> Option<String> {
    let num = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());

    let date = if let Some(year) = num("ymd_y") {
        ymd(year, num("ymd_m")?, num("ymd_d")?)
    } else if let Some(year) = num("dmy_y") {
        let (a, b) = (num("dmy_a")?, num("dmy_b")?);
        ymd(year, b, a).or_else(|| ymd(year, a, b))
    } else if let Some(year) = num("my_y") {
        ymd(year, num("my_m")?, 1)
    } else if let Some(year) = num("dm_y") {
        ymd(year, month_number(caps.name("dm_mon")?.as_str())?, num("dm_d")?)
    } else if let Some(year) = num("mn_y") {
        let month = month_number(caps.name("mn_mon")?.as_str())?;
        ymd(year, month, num("mn_d").unwrap_or(1))
    } else {
        None
    }?;

    Some(date.format("%Y-%m").to_string())
}

fn ymd(year: u32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
