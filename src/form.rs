use std::collections::BTreeMap;

use crate::{
    dictionary_data::RawForm,
    grouping::TranslationGroup,
    language::{inflection::inflection_table, inflection::InflectionRow, Language, LanguageError},
    markup::clean_html,
    regex_util::{clean_inflection, clean_wiki_syntax},
};

/// An inflected form of a lexical entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Form {
    pub lexentry: String,
    /// The cleaned form without pronouns or articles (`geht`).
    pub other_written: String,
    /// The cleaned form as written on the page (`er/sie/es geht`).
    pub other_written_full: String,
    pub pos: Option<String>,
    /// Display rank taken from the language's inflection table.
    pub rank: Option<u8>,
    pub inflection: Option<String>,
}

fn matches(row: &InflectionRow, form: &RawForm) -> bool {
    let same = |a: Option<&'static str>, b: &Option<String>| a == b.as_deref();
    form.pos.as_deref() == Some(row.pos)
        && same(row.number, &form.number)
        && same(row.mood, &form.mood)
        && same(row.person, &form.person)
        && same(row.tense, &form.tense)
        && same(row.voice, &form.voice)
        && same(row.case, &form.case)
        && same(row.definiteness, &form.definiteness)
}

/// Cleans raw forms and ranks them with the inflection table of `lang`.
pub fn make_forms(
    lang: Language,
    raw: impl IntoIterator<Item = RawForm>,
) -> Result<Vec<Form>, LanguageError> {
    let table = inflection_table(lang)?;
    let forms = raw
        .into_iter()
        .map(|form| {
            let rank = table
                .iter()
                .filter(|row| matches(row, &form))
                .map(|row| row.rank)
                .min();
            let other_written_full = clean_wiki_syntax(&clean_html(&form.other_written));
            Form {
                other_written: clean_inflection(&other_written_full, lang),
                other_written_full,
                lexentry: form.lexentry,
                pos: form.pos,
                rank,
                inflection: form.inflection,
            }
        })
        .collect();
    Ok(forms)
}

/// Weight of a match on the headword itself.
pub const HEADWORD_IMPORTANCE: f64 = 1.0;
/// Weight of a match on an inflected form.
pub const INFLECTED_IMPORTANCE: f64 = 0.5;

/// A spelling that leads to a headword of a built language pair.
#[derive(Clone, Debug, PartialEq)]
pub struct FormMatch {
    pub form: String,
    pub written_rep: String,
    pub form_importance: f64,
    pub rank: Option<u8>,
    pub inflection: Option<String>,
}

/// Every headword of `groups` plus the inflected forms of their lexentries.
///
/// A spelling reachable in several ways keeps its best importance and rank.
/// Matches are ordered by form, then headword.
pub fn form_matches(groups: &[TranslationGroup], forms: &[Form]) -> Vec<FormMatch> {
    let mut headwords: BTreeMap<&str, &str> = BTreeMap::new();
    let mut matches: BTreeMap<(String, String), FormMatch> = BTreeMap::new();
    let mut add = |m: FormMatch| {
        if m.form.is_empty() {
            return;
        }
        matches
            .entry((m.form.clone(), m.written_rep.clone()))
            .and_modify(|existing| {
                if m.form_importance > existing.form_importance {
                    *existing = m.clone();
                } else if m.form_importance == existing.form_importance
                    && m.rank.is_some()
                    && (existing.rank.is_none() || m.rank < existing.rank)
                {
                    existing.rank = m.rank;
                    existing.inflection = m.inflection.clone();
                }
            })
            .or_insert(m);
    };

    for group in groups {
        if let Some(lexentry) = &group.lexentry {
            headwords.insert(lexentry, &group.written_rep);
        }
        add(FormMatch {
            form: group.written_rep.clone(),
            written_rep: group.written_rep.clone(),
            form_importance: HEADWORD_IMPORTANCE,
            rank: None,
            inflection: None,
        });
    }
    for form in forms {
        let Some(written_rep) = headwords.get(form.lexentry.as_str()) else {
            continue;
        };
        add(FormMatch {
            form: form.other_written.clone(),
            written_rep: written_rep.to_string(),
            form_importance: INFLECTED_IMPORTANCE,
            rank: form.rank,
            inflection: form.inflection.clone(),
        });
    }
    matches.into_values().collect()
}
