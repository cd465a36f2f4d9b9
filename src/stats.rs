use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{grouping::TranslationGroup, language::LangPair};

/// Summary of one built language pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LangPairStats {
    pub lang_pair: LangPair,
    /// Number of translation groups.
    pub translations: u64,
    /// Number of word forms of the source language.
    pub forms: u64,
    /// Sum of all group scores, rounded.
    pub score: i64,
    pub built_at: DateTime<Utc>,
}

impl LangPairStats {
    pub fn new(lang_pair: LangPair, groups: &[TranslationGroup], forms: usize) -> Self {
        Self {
            lang_pair,
            translations: groups.len() as u64,
            forms: forms as u64,
            score: groups.iter().map(|g| g.score).sum::<f64>().round() as i64,
            built_at: Utc::now(),
        }
    }
}
