//! Text cleaning, segmentation and lemmatization

use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    url_regex: Regex,
    email_regex: Regex,
    phone_regex: Regex,
    non_word_regex: Regex,
    whitespace_regex: Regex,
    irregular: HashMap<&'static str, &'static str>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let url_regex = Regex::new(r"https?://\S+|www\.\S+").expect("Invalid URL regex");

        let email_regex = Regex::new(r"\S+@\S+").expect("Invalid email regex");

        let phone_regex = Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
            .expect("Invalid phone regex");

        let non_word_regex = Regex::new(r"[^\w\s]").expect("Invalid non-word regex");

        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        Self {
            url_regex,
            email_regex,
            phone_regex,
            non_word_regex,
            whitespace_regex,
            irregular: Self::irregular_forms(),
        }
    }

    /// Normalize text before it is embedded.
    ///
    /// Lowercases, drops URLs, email addresses and phone numbers, turns every
    /// non-word character into a space and collapses runs of whitespace.
    pub fn preprocess(&self, text: &str) -> String {
        let mut cleaned = text.to_lowercase();
        cleaned = self.url_regex.replace_all(&cleaned, "").into_owned();
        cleaned = self.email_regex.replace_all(&cleaned, "").into_owned();
        cleaned = self.phone_regex.replace_all(&cleaned, "").into_owned();
        cleaned = self.non_word_regex.replace_all(&cleaned, " ").into_owned();
        self.whitespace_regex
            .replace_all(&cleaned, " ")
            .trim()
            .to_string()
    }

    /// Sentences of `text`, never spanning a line break.
    ///
    /// Resumes are mostly line-oriented, so each line is segmented on its own.
    pub fn sentences(&self, text: &str) -> Vec<String> {
        text.lines()
            .flat_map(|line| line.unicode_sentences())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Set of lemmas for every word in `text`
    pub fn lemmas(&self, text: &str) -> HashSet<String> {
        text.unicode_words().map(|w| self.lemma(w)).collect()
    }

    /// Reduce a word to the base form used for inflection-tolerant matching.
    ///
    /// The result is not always a dictionary word ("manage" and "managing" both
    /// become "manag"); only equality between lemmas is meaningful.
    pub fn lemma(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        let word = self
            .irregular
            .get(lower.as_str())
            .map(|base| base.to_string())
            .unwrap_or(lower);

        if word.chars().count() <= 3 {
            return word;
        }

        let stem = if let Some(stem) = word.strip_suffix("ies").filter(|s| s.len() >= 2) {
            format!("{}y", stem)
        } else if let Some(stem) = word.strip_suffix("ing").filter(|s| s.len() >= 3) {
            Self::undouble(stem)
        } else if let Some(stem) = word.strip_suffix("ed").filter(|s| s.len() >= 3) {
            Self::undouble(stem)
        } else if let Some(stem) = word
            .strip_suffix("es")
            .filter(|s| ["s", "x", "z", "ch", "sh"].iter().any(|end| s.ends_with(end)))
        {
            stem.to_string()
        } else if word.ends_with('s') && !["ss", "us", "is"].iter().any(|end| word.ends_with(end)) {
            word[..word.len() - 1].to_string()
        } else {
            word
        };

        match stem.strip_suffix('e') {
            Some(base) if base.chars().count() >= 3 => base.to_string(),
            _ => stem,
        }
    }

    fn undouble(stem: &str) -> String {
        let chars: Vec<char> = stem.chars().collect();
        match chars.as_slice() {
            [.., a, b] if a == b && !matches!(*a, 'l' | 's' | 'z') && !"aeiou".contains(*a) => {
                chars[..chars.len() - 1].iter().collect()
            }
            _ => stem.to_string(),
        }
    }

    fn irregular_forms() -> HashMap<&'static str, &'static str> {
        [
            ("led", "lead"),
            ("built", "build"),
            ("wrote", "write"),
            ("written", "write"),
            ("taught", "teach"),
            ("ran", "run"),
            ("made", "make"),
            ("won", "win"),
            ("grew", "grow"),
            ("grown", "grow"),
            ("drove", "drive"),
            ("driven", "drive"),
            ("began", "begin"),
            ("begun", "begin"),
            ("sold", "sell"),
            ("brought", "bring"),
            ("thought", "think"),
            ("was", "be"),
            ("were", "be"),
            ("been", "be"),
            ("people", "person"),
            ("children", "child"),
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_strips_contact_details() {
        let processor = TextProcessor::new();
        let text = "Contact: Jane.Doe@example.com, (555) 123-4567 or https://jane.dev!\n\nRust   & Go";

        let cleaned = processor.preprocess(text);

        assert_eq!(cleaned, "contact or rust go");
    }

    #[test]
    fn test_sentences_do_not_cross_lines() {
        let processor = TextProcessor::new();
        let text = "Senior Engineer\nBuilt APIs. Led a team of 4.";

        let sentences = processor.sentences(text);

        assert_eq!(sentences, vec!["Senior Engineer", "Built APIs.", "Led a team of 4."]);
    }

    #[test]
    fn test_inflections_share_a_lemma() {
        let processor = TextProcessor::new();

        assert_eq!(processor.lemma("managing"), processor.lemma("manage"));
        assert_eq!(processor.lemma("managed"), processor.lemma("manage"));
        assert_eq!(processor.lemma("Manages"), processor.lemma("manage"));
        assert_eq!(processor.lemma("running"), processor.lemma("run"));
        assert_eq!(processor.lemma("studies"), processor.lemma("study"));
        assert_eq!(processor.lemma("led"), processor.lemma("lead"));
        assert_eq!(processor.lemma("installing"), "install");
    }

    #[test]
    fn test_short_words_are_untouched() {
        let processor = TextProcessor::new();

        assert_eq!(processor.lemma("SQL"), "sql");
        assert_eq!(processor.lemma("aws"), "aws");
        assert_eq!(processor.lemma("class"), "class");
    }

    #[test]
    fn test_lemma_set() {
        let processor = TextProcessor::new();
        let lemmas = processor.lemmas("Managing teams of 10");

        assert!(lemmas.contains(&processor.lemma("manage")));
        assert!(lemmas.contains("team"));
        assert!(lemmas.contains("10"));
    }
}
