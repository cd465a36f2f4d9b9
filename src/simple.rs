use indexmap::IndexMap;
use tracing::info;

use crate::{
    aggregate::aggregate_by_score, importance::ImportanceTable, infer::ScoredCandidate,
    settings::AggregationPolicy,
};

/// Single line translation of a headword, ignoring senses.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleTranslation {
    pub written_rep: String,
    pub trans_list: String,
    pub max_score: f64,
    pub rel_importance: f64,
}

impl SimpleTranslation {
    pub fn rank(&self) -> f64 {
        self.max_score * self.rel_importance
    }
}

/// Case folded key used to look up simple translations.
pub fn lookup_key(written_rep: &str) -> String {
    written_rep.to_lowercase()
}

/// Builds one [`SimpleTranslation`] per headword from all of its scored
/// candidates, regardless of sense.
///
/// Each target form counts with its best score. Ordered by
/// `max_score * rel_importance` descending, then headword.
pub fn simple_translations(
    scored: &[ScoredCandidate],
    source_importance: &ImportanceTable,
    policy: AggregationPolicy,
    importance_floor: f64,
) -> Vec<SimpleTranslation> {
    let mut per_headword: IndexMap<&str, IndexMap<&str, f64>> = IndexMap::new();
    for s in scored {
        let best = per_headword
            .entry(s.candidate.written_rep.as_str())
            .or_default()
            .entry(s.candidate.trans.as_str())
            .or_insert(f64::NEG_INFINITY);
        *best = best.max(s.score);
    }

    let mut out: Vec<SimpleTranslation> = per_headword
        .into_iter()
        .filter_map(|(written_rep, targets)| {
            let pairs: Vec<(&str, f64)> = targets.into_iter().collect();
            let trans_list = aggregate_by_score(&pairs, policy);
            if trans_list.is_empty() {
                return None;
            }
            Some(SimpleTranslation {
                written_rep: written_rep.to_string(),
                trans_list,
                max_score: pairs.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max),
                rel_importance: source_importance.rel_score_or(written_rep, importance_floor),
            })
        })
        .collect();
    out.sort_by(|a, b| {
        b.rank()
            .total_cmp(&a.rank())
            .then_with(|| a.written_rep.cmp(&b.written_rep))
    });
    info!(headwords = out.len(), "built simple translations");
    out
}

#[cfg(test)]
mod simple {
    use super::*;
    use crate::{
        collector::TranslationCandidate, dictionary_data::RawImportance, language::Language,
        sense::SenseNum,
    };
    use pretty_assertions::assert_eq;

    fn scored(written_rep: &str, sense_num: u32, trans: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            candidate: TranslationCandidate {
                lexentry: Some(format!("{written_rep}__1")),
                sense_num: SenseNum::Numbered {
                    number: sense_num,
                    letter: None,
                },
                sense: None,
                written_rep: written_rep.into(),
                trans: trans.into(),
                from_importance: 1.0,
                to_importance: 1.0,
                all_lexentries: vec![],
            },
            score,
        }
    }

    #[test]
    fn one_line_per_headword() {
        let importance = ImportanceTable::build(
            Language::De,
            vec![
                RawImportance {
                    vocable: "deu/gehen".into(),
                    score: 10.0,
                },
                RawImportance {
                    vocable: "deu/Haus".into(),
                    score: 10.0,
                },
            ],
            10,
        );
        let rows = simple_translations(
            &[
                scored("gehen", 1, "gå", 35.0),
                scored("gehen", 2, "gå", 10.0),
                scored("gehen", 2, "åka", 10.0),
                scored("Haus", 1, "hus", 35.0),
                scored("Zeug", 1, "grejer", 35.0),
            ],
            &importance,
            AggregationPolicy::default(),
            0.001,
        );

        assert_eq!(
            rows.iter()
                .map(|r| (r.written_rep.as_str(), r.trans_list.as_str()))
                .collect::<Vec<_>>(),
            vec![("Haus", "hus"), ("gehen", "gå | åka"), ("Zeug", "grejer")]
        );
        assert_eq!(rows[2].rel_importance, 0.001);
        assert_eq!(lookup_key("Haus"), "haus");
    }
}
