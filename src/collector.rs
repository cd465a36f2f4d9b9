use std::collections::BTreeMap;

use tracing::{debug, error, info, instrument};
use unicode_normalization::UnicodeNormalization;

use crate::{
    dictionary_data::RawTranslation,
    errors::PipelineError,
    importance::ImportanceTable,
    language::LangPair,
    language_data::LanguageData,
    regex_util::clean_wiki_syntax,
    sense::{parse_sense, SenseNum},
};

/// One deduplicated `written_rep -> trans` candidate of a language pair.
///
/// `lexentry` is `None` for candidates that only exist because other
/// language pairs point at them.
#[derive(Clone, Debug, PartialEq)]
pub struct TranslationCandidate {
    pub lexentry: Option<String>,
    pub sense_num: SenseNum,
    pub sense: Option<String>,
    pub written_rep: String,
    pub trans: String,
    pub from_importance: f64,
    pub to_importance: f64,
    /// Every source lexentry that produced this candidate, sorted.
    pub all_lexentries: Vec<String>,
}

type CandidateKey = (SenseNum, Option<String>, String, String);

#[derive(Debug, Default)]
struct Skipped {
    no_lexentry: usize,
    unknown_lexentry: usize,
    no_importance: usize,
    empty_trans: usize,
}

/// Joins the raw translations of `lang_pair` with the source entries and
/// the importance of both sides.
///
/// Rows without a known lexentry, or whose vocable has no importance, are
/// left out. A malformed sense number fails the whole pair.
#[instrument(skip_all, fields(%lang_pair))]
pub fn collect_translations(
    lang_pair: LangPair,
    source: &LanguageData,
    target_importance: &ImportanceTable,
    raw: &[RawTranslation],
    importance_floor: f64,
) -> Result<Vec<TranslationCandidate>, PipelineError> {
    let mut skipped = Skipped::default();
    let mut merged: BTreeMap<CandidateKey, TranslationCandidate> = BTreeMap::new();

    for row in raw {
        let Some(lexentry) = row.lexentry.as_deref() else {
            skipped.no_lexentry += 1;
            continue;
        };
        let Some(entry) = source.entries.get(lexentry) else {
            skipped.unknown_lexentry += 1;
            continue;
        };
        let Some(from_importance) = source.importance.by_vocable(&entry.vocable) else {
            skipped.no_importance += 1;
            continue;
        };

        let sense_num = SenseNum::parse_opt(row.sense_num.as_deref()).map_err(|e| {
            error!(lexentry, input = %e.input, "malformed sense number, aborting pair");
            PipelineError::MalformedSenseNumber {
                lang_pair,
                lexentry: lexentry.to_string(),
                input: e.input,
            }
        })?;

        let trans: String = clean_wiki_syntax(&row.trans).nfc().collect();
        let trans = trans.trim();
        if trans.is_empty() {
            skipped.empty_trans += 1;
            continue;
        }
        let sense = parse_sense(row.sense.as_deref(), lang_pair.from);
        let to_importance = target_importance.rel_score_or(trans, importance_floor);

        let key = (
            sense_num,
            sense.clone(),
            entry.written_rep.clone(),
            trans.to_string(),
        );
        match merged.get_mut(&key) {
            Some(existing) => {
                if existing.lexentry.as_deref().is_some_and(|l| lexentry < l) {
                    existing.lexentry = Some(lexentry.to_string());
                }
                existing.from_importance = existing.from_importance.max(from_importance.rel_score);
                existing.to_importance = existing.to_importance.max(to_importance);
                existing.all_lexentries.push(lexentry.to_string());
            }
            None => {
                merged.insert(
                    key,
                    TranslationCandidate {
                        lexentry: Some(lexentry.to_string()),
                        sense_num,
                        sense,
                        written_rep: entry.written_rep.clone(),
                        trans: trans.to_string(),
                        from_importance: from_importance.rel_score,
                        to_importance,
                        all_lexentries: vec![lexentry.to_string()],
                    },
                );
            }
        }
    }

    let candidates: Vec<TranslationCandidate> = merged
        .into_values()
        .map(|mut c| {
            c.all_lexentries.sort();
            c.all_lexentries.dedup();
            c
        })
        .collect();

    debug!(?skipped, "skipped raw translations");
    info!(rows = raw.len(), candidates = candidates.len(), "collected translations");
    Ok(candidates)
}
