//! Heuristic classification of free-text ledger remarks into display tags.

pub mod builder;
pub mod tagger;
pub mod vocabulary;

pub use builder::{BillingMonth, PaymentRemark};
pub use tagger::{extract_tags, RemarkTag, RemarkTagger, TagCategory};
pub use vocabulary::{RemarkVocabulary, TagLabels};
