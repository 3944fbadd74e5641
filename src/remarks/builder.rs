use serde::{Deserialize, Serialize};

use super::vocabulary::RemarkVocabulary;
use crate::errors::{LedgerError, Result};

/// Billing month attached to a payment remark.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingMonth {
    pub month: u32,
    pub year: i32,
}

/// Parts of the remark written when a student payment is recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentRemark {
    pub receipt_id: String,
    pub student: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub months: Vec<BillingMonth>,
}

impl PaymentRemark {
    pub fn new(receipt_id: impl Into<String>, student: impl Into<String>) -> Self {
        Self {
            receipt_id: receipt_id.into(),
            student: student.into(),
            groups: Vec::new(),
            months: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    pub fn with_month(mut self, month: u32, year: i32) -> Self {
        self.months.push(BillingMonth { month, year });
        self
    }

    /// Renders the remark in the layout the tagger recognises.
    pub fn render(&self, vocabulary: &RemarkVocabulary) -> Result<String> {
        let receipt = self.receipt_id.trim();
        let student = self.student.trim();
        if receipt.is_empty() || student.is_empty() {
            return Err(LedgerError::InvalidEntry(
                "payment remarks need a receipt id and a student name".into(),
            ));
        }

        let mut fragments = vec![
            format!("{}: {}", vocabulary.receipt_marker, receipt),
            format!("{}: {}", vocabulary.student_marker, student),
        ];
        for group in self.groups.iter().map(|group| group.trim()) {
            if !group.is_empty() {
                fragments.push(format!("{} {}", vocabulary.group_marker, group));
            }
        }
        for billing in &self.months {
            let name = vocabulary.month_name(billing.month).ok_or_else(|| {
                LedgerError::InvalidEntry(format!("month {} is out of range", billing.month))
            })?;
            fragments.push(format!("{} / {}", name, billing.year));
        }
        Ok(fragments.join(&vocabulary.delimiter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remarks::{extract_tags, TagCategory};

    #[test]
    fn renders_the_payment_layout() {
        let remark = PaymentRemark::new("REC-1", "Ali")
            .with_group("رياضيات")
            .with_month(8, 2025)
            .render(&RemarkVocabulary::default())
            .unwrap();
        assert_eq!(
            remark,
            "إيصال دفع رقم: REC-1 - الطالب: Ali - مجموعة رياضيات - أغسطس / 2025"
        );
    }

    #[test]
    fn rendered_remarks_are_recognised_by_the_tagger() {
        let remark = PaymentRemark::new("REC-40", "Yasmine")
            .with_group("فيزياء ب")
            .with_month(1, 2026)
            .with_month(2, 2026)
            .render(&RemarkVocabulary::default())
            .unwrap();
        let tags = extract_tags(&remark);
        let months = tags
            .iter()
            .filter(|tag| tag.category == TagCategory::Month)
            .count();
        assert_eq!(months, 2);
        assert!(tags
            .iter()
            .any(|tag| tag.category == TagCategory::Group && tag.value == "فيزياء ب"));
    }

    #[test]
    fn invalid_month_is_rejected() {
        let result = PaymentRemark::new("R", "S")
            .with_month(13, 2025)
            .render(&RemarkVocabulary::default());
        assert!(matches!(result, Err(LedgerError::InvalidEntry(_))));
    }
}
