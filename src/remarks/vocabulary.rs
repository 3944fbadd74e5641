use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

const DEFAULT_MONTHS: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

const DEFAULT_SUBJECTS: &[&str] = &[
    "الرياضيات",
    "رياضيات",
    "الفيزياء",
    "فيزياء",
    "الكيمياء",
    "كيمياء",
    "العلوم الطبيعية",
    "علوم طبيعية",
    "العلوم",
    "علوم",
    "اللغة العربية",
    "لغة عربية",
    "اللغة الإنجليزية",
    "لغة إنجليزية",
    "اللغة الفرنسية",
    "لغة فرنسية",
    "الفلسفة",
    "فلسفة",
    "التاريخ والجغرافيا",
    "التاريخ",
    "تاريخ",
    "الجغرافيا",
    "جغرافيا",
    "التربية الإسلامية",
    "العلوم الإسلامية",
    "المحاسبة",
    "الإعلام الآلي",
];

const DEFAULT_TEACHER_MARKERS: &[&str] = &["الأستاذة", "الأستاذ", "المعلمة", "المعلم"];

/// Display labels attached to each tag category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TagLabels {
    pub receipt_id: String,
    pub student: String,
    pub month: String,
    pub group: String,
    pub unclassified: String,
}

impl Default for TagLabels {
    fn default() -> Self {
        Self {
            receipt_id: "رقم الإيصال".into(),
            student: "الطالب".into(),
            month: "الشهر".into(),
            group: "المجموعة".into(),
            unclassified: "ملاحظة".into(),
        }
    }
}

/// Markers and word lists describing the human-readable remark format
/// written for payments. Defaults follow the Arabic format used by the
/// payment screens; tenants may override any field through the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RemarkVocabulary {
    pub receipt_marker: String,
    pub student_marker: String,
    pub group_marker: String,
    pub delimiter: String,
    pub teacher_markers: Vec<String>,
    pub months: Vec<String>,
    pub subjects: Vec<String>,
    pub labels: TagLabels,
}

impl Default for RemarkVocabulary {
    fn default() -> Self {
        Self {
            receipt_marker: "إيصال دفع رقم".into(),
            student_marker: "الطالب".into(),
            group_marker: "مجموعة".into(),
            delimiter: " - ".into(),
            teacher_markers: to_owned(DEFAULT_TEACHER_MARKERS),
            months: to_owned(&DEFAULT_MONTHS),
            subjects: to_owned(DEFAULT_SUBJECTS),
            labels: TagLabels::default(),
        }
    }
}

impl RemarkVocabulary {
    pub fn validate(&self) -> Result<()> {
        if self.months.len() != 12 {
            return Err(LedgerError::Config(format!(
                "remark vocabulary needs 12 month names, found {}",
                self.months.len()
            )));
        }
        if let Some(blank) = self.months.iter().position(|name| name.trim().is_empty()) {
            return Err(LedgerError::Config(format!(
                "month name #{} is empty",
                blank + 1
            )));
        }
        let markers = [
            ("receipt_marker", &self.receipt_marker),
            ("student_marker", &self.student_marker),
            ("group_marker", &self.group_marker),
            ("delimiter", &self.delimiter),
        ];
        for (field, value) in markers {
            if value.trim().is_empty() {
                return Err(LedgerError::Config(format!("`{field}` must not be empty")));
            }
        }
        Ok(())
    }

    /// Name of `month` (1-based), if in range.
    pub fn month_name(&self, month: u32) -> Option<&str> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.months.get(index).map(String::as_str)
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_is_valid() {
        let vocabulary = RemarkVocabulary::default();
        vocabulary.validate().unwrap();
        assert_eq!(vocabulary.month_name(8), Some("أغسطس"));
        assert_eq!(vocabulary.month_name(0), None);
        assert_eq!(vocabulary.month_name(13), None);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let vocabulary: RemarkVocabulary =
            serde_json::from_str(r#"{ "group_marker": "فوج" }"#).unwrap();
        assert_eq!(vocabulary.group_marker, "فوج");
        assert_eq!(vocabulary.student_marker, "الطالب");
        assert_eq!(vocabulary.months.len(), 12);
    }

    #[test]
    fn wrong_month_count_is_rejected() {
        let vocabulary = RemarkVocabulary {
            months: vec!["January".into()],
            ..RemarkVocabulary::default()
        };
        assert!(matches!(vocabulary.validate(), Err(LedgerError::Config(_))));
    }
}
