use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use derive_more::Deref;
use indexmap::IndexMap;
use tracing::{debug, info, instrument};

use crate::{
    collector::TranslationCandidate,
    errors::PipelineError,
    language::{LangPair, Language},
    sense::SenseNum,
    settings::ScoringWeights,
};

/// Collected candidates of every language pair in the run.
///
/// Scoring a pair looks at its reverse pair and at every pair through a
/// third language, so all of them have to be collected before any pair
/// is scored.
#[derive(Clone, Debug, Default, Deref)]
pub struct CandidateStore {
    #[deref]
    pairs: IndexMap<LangPair, Vec<TranslationCandidate>>,
    failed: IndexMap<LangPair, PipelineError>,
}

impl CandidateStore {
    pub fn record(
        &mut self,
        lang_pair: LangPair,
        collected: Result<Vec<TranslationCandidate>, PipelineError>,
    ) {
        match collected {
            Ok(candidates) => {
                self.failed.shift_remove(&lang_pair);
                self.pairs.insert(lang_pair, candidates);
            }
            Err(e) => {
                self.pairs.shift_remove(&lang_pair);
                self.failed.insert(lang_pair, e);
            }
        }
    }

    pub fn failure(&self, lang_pair: &LangPair) -> Option<&PipelineError> {
        self.failed.get(lang_pair)
    }

    /// Every pair whose candidates feed into the score of `lang_pair`.
    pub fn dependencies(&self, lang_pair: LangPair) -> Vec<LangPair> {
        let mut deps = vec![lang_pair, lang_pair.reversed()];
        for third in self.third_languages(lang_pair) {
            deps.extend([
                LangPair {
                    from: lang_pair.from,
                    to: third,
                },
                LangPair {
                    from: third,
                    to: lang_pair.to,
                },
            ]);
        }
        deps
    }

    /// Fails if `lang_pair` or anything it is scored from could not be collected.
    pub fn check_dependencies(&self, lang_pair: LangPair) -> Result<(), PipelineError> {
        if let Some(e) = self.failure(&lang_pair) {
            return Err(e.clone());
        }
        for dep in self.dependencies(lang_pair) {
            if let Some(e) = self.failure(&dep) {
                return Err(PipelineError::UpstreamFailed {
                    lang_pair,
                    upstream: dep,
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Languages `C` for which both `from -> C` and `C -> to` were attempted.
    fn third_languages(&self, lang_pair: LangPair) -> BTreeSet<Language> {
        let attempted = || self.pairs.keys().chain(self.failed.keys());
        attempted()
            .filter(|p| p.from == lang_pair.from && p.to != lang_pair.to)
            .map(|p| p.to)
            .filter(|third| {
                attempted().any(|p| p.from == *third && p.to == lang_pair.to)
            })
            .collect()
    }
}

/// A candidate together with its confidence score.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: TranslationCandidate,
    pub score: f64,
}

type Link<'a> = (&'a str, &'a str);

fn links(candidates: &[TranslationCandidate]) -> HashMap<&str, BTreeSet<&str>> {
    let mut out: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for c in candidates {
        out.entry(c.written_rep.as_str())
            .or_default()
            .insert(c.trans.as_str());
    }
    out
}

/// Which third languages link `x` to `y`.
fn triangulate(store: &CandidateStore, lang_pair: LangPair) -> BTreeMap<Link<'_>, usize> {
    let mut paths: BTreeMap<Link<'_>, BTreeSet<Language>> = BTreeMap::new();
    for third in store.third_languages(lang_pair) {
        let (Some(first), Some(second)) = (
            store.get(&LangPair {
                from: lang_pair.from,
                to: third,
            }),
            store.get(&LangPair {
                from: third,
                to: lang_pair.to,
            }),
        ) else {
            continue;
        };
        let second = links(second);
        for (x, middles) in links(first) {
            for z in middles {
                for y in second.get(z).into_iter().flatten() {
                    paths.entry((x, *y)).or_default().insert(third);
                }
            }
        }
    }
    paths
        .into_iter()
        .map(|(link, via)| (link, via.len()))
        .collect()
}

/// Score of a link on top of the direct weight.
fn link_score<'a>(
    link: Link<'a>,
    reverse: &HashSet<Link<'a>>,
    paths: &BTreeMap<Link<'a>, usize>,
    weights: ScoringWeights,
) -> f64 {
    let confirmed = if reverse.contains(&link) {
        weights.reverse
    } else {
        0.0
    };
    let via = paths.get(&link).copied().unwrap_or(0);
    confirmed + weights.triangulation * via as f64
}

/// Scores every candidate of `lang_pair` and adds inferred candidates.
///
/// A direct candidate `x -> y` scores `direct`, plus `reverse` when the
/// reverse pair translates `y` back to `x`, plus `triangulation` for each
/// third language linking `x` to `y`. Links that only exist through third
/// languages become candidates without a lexentry once they are backed by
/// at least `min_inferred_paths` languages.
#[instrument(skip_all, fields(%lang_pair))]
pub fn score_candidates(
    lang_pair: LangPair,
    store: &CandidateStore,
    weights: ScoringWeights,
) -> Vec<ScoredCandidate> {
    let empty = Vec::new();
    let direct = store.get(&lang_pair).unwrap_or(&empty);
    let reverse: HashSet<Link<'_>> = store
        .get(&lang_pair.reversed())
        .into_iter()
        .flatten()
        .map(|c| (c.trans.as_str(), c.written_rep.as_str()))
        .collect();
    let paths = triangulate(store, lang_pair);

    let mut scored: Vec<ScoredCandidate> = direct
        .iter()
        .map(|c| ScoredCandidate {
            score: weights.direct
                + link_score(
                    (c.written_rep.as_str(), c.trans.as_str()),
                    &reverse,
                    &paths,
                    weights,
                ),
            candidate: c.clone(),
        })
        .collect();

    let known: HashSet<Link<'_>> = direct
        .iter()
        .map(|c| (c.written_rep.as_str(), c.trans.as_str()))
        .collect();
    let importance = ThirdPartyImportance::collect(lang_pair, store);
    let inferred: Vec<ScoredCandidate> = paths
        .iter()
        .filter(|(link, via)| !known.contains(*link) && **via >= weights.min_inferred_paths)
        .map(|(&(x, y), _)| ScoredCandidate {
            candidate: importance.candidate(x, y),
            score: link_score((x, y), &reverse, &paths, weights),
        })
        .collect();

    debug!(
        direct = scored.len(),
        confirmed = scored.iter().filter(|s| s.score > weights.direct).count(),
        "scored direct candidates"
    );
    info!(inferred = inferred.len(), "inferred candidates");
    scored.extend(inferred);
    scored
}

/// Highest importances seen for headwords and targets in pairs through
/// third languages.
#[derive(Default)]
struct ThirdPartyImportance<'a> {
    from: HashMap<&'a str, f64>,
    to: HashMap<&'a str, f64>,
}

impl<'a> ThirdPartyImportance<'a> {
    fn collect(lang_pair: LangPair, store: &'a CandidateStore) -> Self {
        let mut out = Self::default();
        for (pair, candidates) in store.iter() {
            let from_side = pair.from == lang_pair.from && pair.to != lang_pair.to;
            let to_side = pair.to == lang_pair.to && pair.from != lang_pair.from;
            if !(from_side || to_side) {
                continue;
            }
            for c in candidates {
                if from_side {
                    let max = out.from.entry(c.written_rep.as_str()).or_insert(0.0);
                    *max = max.max(c.from_importance);
                }
                if to_side {
                    let max = out.to.entry(c.trans.as_str()).or_insert(0.0);
                    *max = max.max(c.to_importance);
                }
            }
        }
        out
    }

    fn candidate(&self, written_rep: &str, trans: &str) -> TranslationCandidate {
        TranslationCandidate {
            lexentry: None,
            sense_num: SenseNum::Unnumbered,
            sense: None,
            written_rep: written_rep.to_string(),
            trans: trans.to_string(),
            from_importance: self.from.get(written_rep).copied().unwrap_or(0.0),
            to_importance: self.to.get(trans).copied().unwrap_or(0.0),
            all_lexentries: Vec::new(),
        }
    }
}
