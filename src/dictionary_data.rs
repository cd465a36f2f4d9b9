//! Rows of the raw relations written by the graph collector.
//!
//! Every bank file is a json array of one of these row types.
//! Optional text columns accept both `null` and `""` as "absent".

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};

/// One row of `entry_bank_*.json`.
///
/// The collector joins entries with their parts of speech, genders and
/// pronunciations, so the same `lexentry` can appear on many rows.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct RawEntry {
    pub lexentry: String,
    /// Knowledge graph id of the page, ie: `deu/gehen`.
    pub vocable: String,
    pub written_rep: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub gender: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub pronun: Option<String>,
}

/// One row of `form_bank_*.json`.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct RawForm {
    pub lexentry: String,
    pub other_written: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub pos: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub number: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub mood: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub person: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub tense: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub voice: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub case: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub definiteness: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub inflection: Option<String>,
}

/// One row of `importance_bank_*.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct RawImportance {
    pub vocable: String,
    pub score: f64,
}

/// One row of `translation_bank_*.json` of a language pair.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct RawTranslation {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub lexentry: Option<String>,
    #[serde(default)]
    pub sense_num: Option<String>,
    #[serde(default)]
    pub sense: Option<String>,
    #[serde(default)]
    pub trans: String,
}

/// All raw relations of a single language.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RawLanguage {
    pub entries: Vec<RawEntry>,
    pub forms: Vec<RawForm>,
    pub importance: Vec<RawImportance>,
}
