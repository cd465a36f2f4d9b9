use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::{
    aggregate::aggregate_senses,
    collector::{collect_translations, TranslationCandidate},
    errors::PipelineError,
    form::{form_matches, FormMatch},
    grouping::{group_translations, TranslationGroup},
    infer::{score_candidates, CandidateStore},
    language::{LangPair, Language},
    language_data::Workspace,
    resolve::resolve_translations,
    settings::PipelineOptions,
    simple::{simple_translations, SimpleTranslation},
    stats::LangPairStats,
};

/// Everything produced for one language pair, fully built in memory
/// before it is written anywhere.
#[derive(Clone, Debug)]
pub struct LangPairBuild {
    pub lang_pair: LangPair,
    pub groups: Vec<TranslationGroup>,
    pub simple: Vec<SimpleTranslation>,
    /// Spellings searchable in the pair, see [form_matches].
    pub forms: Vec<FormMatch>,
    pub stats: LangPairStats,
}

pub struct Pipeline<'a> {
    workspace: &'a Workspace,
    options: &'a PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(workspace: &'a Workspace, options: &'a PipelineOptions) -> Self {
        Self { workspace, options }
    }

    /// Collects the candidates of every pair that has raw translations and
    /// whose languages are both loaded.
    ///
    /// Pairs that fail are recorded in the store, so pairs depending on
    /// them fail as well instead of being scored from partial data.
    pub fn collect_all(&self) -> CandidateStore {
        let collected: Vec<(LangPair, Result<Vec<TranslationCandidate>, PipelineError>)> = self
            .workspace
            .translations
            .par_iter()
            .map(|(pair, _)| (*pair, self.collect_pair(*pair)))
            .collect();

        let mut store = CandidateStore::default();
        for (pair, result) in collected {
            store.record(pair, result);
        }
        store
    }

    fn collect_pair(&self, lang_pair: LangPair) -> Result<Vec<TranslationCandidate>, PipelineError> {
        let missing = |language: Language| PipelineError::MissingLanguage {
            lang_pair,
            language: language.to_string(),
        };
        let source = self
            .workspace
            .language(lang_pair.from)
            .ok_or_else(|| missing(lang_pair.from))?;
        let target = self
            .workspace
            .language(lang_pair.to)
            .ok_or_else(|| missing(lang_pair.to))?;
        let raw = self
            .workspace
            .translations
            .get(&lang_pair)
            .map(Vec::as_slice)
            .unwrap_or_default();
        collect_translations(
            lang_pair,
            source,
            &target.importance,
            raw,
            self.options.importance_floor(),
        )
    }

    /// Runs score, aggregate, resolve and group for `lang_pair`.
    #[instrument(skip_all, fields(%lang_pair))]
    pub fn build_pair(
        &self,
        lang_pair: LangPair,
        store: &CandidateStore,
    ) -> Result<LangPairBuild, PipelineError> {
        store.check_dependencies(lang_pair)?;
        let source = self
            .workspace
            .language(lang_pair.from)
            .ok_or_else(|| PipelineError::MissingLanguage {
                lang_pair,
                language: lang_pair.from.to_string(),
            })?;
        if !store.contains_key(&lang_pair) {
            warn!("no raw translations for pair, building an empty table");
        }

        let scored = score_candidates(lang_pair, store, self.options.scoring());
        let simple = simple_translations(
            &scored,
            &source.importance,
            self.options.aggregation(),
            self.options.importance_floor(),
        );
        let senses = aggregate_senses(scored, self.options.aggregation());
        let resolved = resolve_translations(senses, self.options.good_score());
        let mut groups = group_translations(resolved);
        for group in &mut groups {
            group.part_of_speech = group
                .lexentry
                .as_ref()
                .and_then(|l| source.entries.get(l))
                .and_then(|e| e.part_of_speech.clone());
        }

        let forms = form_matches(&groups, &source.forms);
        let stats = LangPairStats::new(lang_pair, &groups, source.forms.len());
        info!(
            translations = stats.translations,
            score = stats.score,
            "built language pair"
        );
        Ok(LangPairBuild {
            lang_pair,
            groups,
            simple,
            forms,
            stats,
        })
    }
}
