use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::vocabulary::RemarkVocabulary;
use crate::errors::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    ReceiptId,
    Student,
    Month,
    Group,
    Unclassified,
}

/// One display chip extracted from a remark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemarkTag {
    pub label: String,
    pub value: String,
    pub category: TagCategory,
}

impl fmt::Display for RemarkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

static DEFAULT_TAGGER: Lazy<RemarkTagger> = Lazy::new(|| {
    RemarkTagger::new(RemarkVocabulary::default()).expect("built-in remark vocabulary compiles")
});

/// Extracts tags using the built-in vocabulary.
pub fn extract_tags(remark: &str) -> Vec<RemarkTag> {
    DEFAULT_TAGGER.extract(remark)
}

/// Best-effort classifier for payment remarks.
///
/// A remark written as `<receipt>: <id> - <student>: <name> - <rest>` yields
/// receipt and student tags followed by month and group tags scraped from
/// the ` - ` separated fragments of `<rest>`. A fragment may carry both a
/// month and a group. Anything else, blank input included, comes back as a
/// single unclassified tag holding the remark exactly as given.
#[derive(Debug, Clone)]
pub struct RemarkTagger {
    vocabulary: RemarkVocabulary,
    structured: Regex,
    month: Regex,
    group: Regex,
    teacher: Option<Regex>,
    noise: Option<Regex>,
}

impl RemarkTagger {
    pub fn new(vocabulary: RemarkVocabulary) -> Result<Self> {
        vocabulary.validate()?;
        let delimiter = regex::escape(&vocabulary.delimiter);
        let structured = Regex::new(&format!(
            r"(?s)^{receipt}\s*:\s*(?P<receipt>.+?){delimiter}{student}\s*:\s*(?P<student>.+?)(?:{delimiter}(?P<rest>.*))?$",
            receipt = regex::escape(vocabulary.receipt_marker.trim()),
            student = regex::escape(vocabulary.student_marker.trim()),
        ))?;
        let month = Regex::new(&format!(
            r"(?P<month>{})\s*/\s*(?P<year>\d{{4}})",
            alternation(&vocabulary.months)
        ))?;
        let group = Regex::new(&format!(
            r"^{}\s*:?\s*(?P<name>.+)$",
            regex::escape(vocabulary.group_marker.trim())
        ))?;
        let teacher = optional_regex(&vocabulary.teacher_markers, |words| {
            format!(r"(?:{words})\s*:?.*$")
        })?;
        let noise_words: Vec<String> = vocabulary
            .months
            .iter()
            .chain(vocabulary.subjects.iter())
            .cloned()
            .collect();
        let noise = optional_regex(&noise_words, |words| format!(r"\b(?:{words})\b"))?;
        Ok(Self {
            vocabulary,
            structured,
            month,
            group,
            teacher,
            noise,
        })
    }

    pub fn vocabulary(&self) -> &RemarkVocabulary {
        &self.vocabulary
    }

    pub fn extract(&self, remark: &str) -> Vec<RemarkTag> {
        let Some(captures) = self.structured.captures(remark.trim()) else {
            return vec![self.tag(TagCategory::Unclassified, remark)];
        };

        let mut tags = vec![
            self.tag(TagCategory::ReceiptId, captures["receipt"].trim()),
            self.tag(TagCategory::Student, captures["student"].trim()),
        ];
        let Some(rest) = captures.name("rest") else {
            return tags;
        };

        for fragment in rest.as_str().split(self.vocabulary.delimiter.as_str()) {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }
            for month in self.month_values(fragment) {
                let seen = tags
                    .iter()
                    .any(|tag| tag.category == TagCategory::Month && tag.value == month);
                if !seen {
                    tags.push(self.tag(TagCategory::Month, &month));
                }
            }
            let without_months = self.month.replace_all(fragment, " ");
            if let Some(group) = self.group_value(without_months.trim()) {
                tags.push(self.tag(TagCategory::Group, &group));
            }
        }
        tags
    }

    fn month_values<'a>(&'a self, fragment: &'a str) -> impl Iterator<Item = String> + 'a {
        self.month
            .captures_iter(fragment)
            .map(|captures| format!("{} / {}", &captures["month"], &captures["year"]))
    }

    fn group_value(&self, fragment: &str) -> Option<String> {
        if fragment.is_empty() {
            return None;
        }
        if let Some(captures) = self.group.captures(fragment) {
            let name = captures["name"].trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }

        let mut residual = fragment.to_string();
        if let Some(teacher) = &self.teacher {
            residual = teacher.replace_all(&residual, "").into_owned();
        }
        if let Some(noise) = &self.noise {
            residual = noise.replace_all(&residual, " ").into_owned();
        }
        let cleaned = residual
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .trim_matches(|ch: char| {
                ch.is_whitespace() || matches!(ch, ':' | '/' | '-' | '،' | ',' | '|')
            })
            .to_string();
        (!cleaned.is_empty()).then_some(cleaned)
    }

    fn tag(&self, category: TagCategory, value: &str) -> RemarkTag {
        let labels = &self.vocabulary.labels;
        let label = match category {
            TagCategory::ReceiptId => &labels.receipt_id,
            TagCategory::Student => &labels.student,
            TagCategory::Month => &labels.month,
            TagCategory::Group => &labels.group,
            TagCategory::Unclassified => &labels.unclassified,
        };
        RemarkTag {
            label: label.clone(),
            value: value.to_string(),
            category,
        }
    }
}

/// Escaped `a|b|c` alternation, longest word first so longer names win.
fn alternation(words: &[String]) -> String {
    let mut words: Vec<&str> = words
        .iter()
        .map(|word| word.trim())
        .filter(|word| !word.is_empty())
        .collect();
    words.sort_by_key(|word| std::cmp::Reverse(word.chars().count()));
    words
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

fn optional_regex(words: &[String], pattern: impl Fn(&str) -> String) -> Result<Option<Regex>> {
    let words = alternation(words);
    if words.is_empty() {
        return Ok(None);
    }
    Ok(Some(Regex::new(&pattern(&words))?))
}
