use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::info;

use crate::{
    database::raw_importer::RawWorkspace,
    dictionary_data::{RawLanguage, RawTranslation},
    entry::{normalize_entries, LexicalEntry},
    form::{make_forms, Form},
    importance::ImportanceTable,
    language::{LangPair, Language, LanguageError},
    settings::PipelineOptions,
};

/// The normalized relations of one language.
#[derive(Clone, Debug)]
pub struct LanguageData {
    pub language: Language,
    pub entries: IndexMap<String, LexicalEntry>,
    pub forms: Vec<Form>,
    pub importance: ImportanceTable,
}

impl LanguageData {
    pub fn build(
        language: Language,
        raw: RawLanguage,
        options: &PipelineOptions,
    ) -> Result<Self, LanguageError> {
        let RawLanguage {
            entries,
            forms,
            importance,
        } = raw;
        let entries = normalize_entries(entries, options.gender_policy(), options.pos_policy());
        let forms = make_forms(language, forms)?;
        let importance =
            ImportanceTable::build(language, importance, options.importance_top_n());
        info!(
            %language,
            entries = entries.len(),
            forms = forms.len(),
            importance = importance.len(),
            "normalized language"
        );
        Ok(Self {
            language,
            entries,
            forms,
            importance,
        })
    }
}

/// Everything the pipeline reads: normalized languages and raw translations per pair.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    pub languages: IndexMap<Language, LanguageData>,
    pub translations: IndexMap<LangPair, Vec<RawTranslation>>,
}

impl Workspace {
    /// Normalizes every language of `raw`, in parallel.
    pub fn build(raw: RawWorkspace, options: &PipelineOptions) -> Result<Self, LanguageError> {
        let RawWorkspace {
            languages,
            translations,
        } = raw;
        let languages = languages
            .into_par_iter()
            .map(|(language, raw)| {
                LanguageData::build(language, raw, options).map(|data| (language, data))
            })
            .collect::<Result<Vec<(Language, LanguageData)>, LanguageError>>()?
            .into_iter()
            .collect();
        Ok(Self {
            languages,
            translations,
        })
    }

    pub fn language(&self, language: Language) -> Option<&LanguageData> {
        self.languages.get(&language)
    }
}
