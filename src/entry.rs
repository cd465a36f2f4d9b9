use indexmap::{IndexMap, IndexSet};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::{dictionary_data::RawEntry, settings::AttributeConflictPolicy};

/// One lexical entry after normalization; exactly one per `lexentry`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexicalEntry {
    pub lexentry: String,
    pub vocable: String,
    pub written_rep: String,
    pub part_of_speech: Option<String>,
    pub gender: Option<String>,
    pub pronunciations: Vec<String>,
}

#[derive(Default)]
struct EntryRows {
    vocable: String,
    written_rep: String,
    part_of_speech: IndexSet<String>,
    gender: IndexSet<String>,
    pronunciations: IndexSet<String>,
}

fn choose(values: IndexSet<String>, policy: AttributeConflictPolicy) -> Option<String> {
    match policy {
        AttributeConflictPolicy::NullOnConflict if values.len() == 1 => values.into_iter().next(),
        AttributeConflictPolicy::NullOnConflict => None,
        AttributeConflictPolicy::FirstDistinct => values.into_iter().next(),
        AttributeConflictPolicy::Smallest => values.into_iter().min(),
    }
}

/// Groups raw entry rows into one [LexicalEntry] per `lexentry`.
///
/// The first row decides vocable and headword. Part of speech and gender go
/// through their conflict policies, pronunciations keep first-seen order.
/// Rows without a headword are skipped.
pub fn normalize_entries(
    rows: impl IntoIterator<Item = RawEntry>,
    gender_policy: AttributeConflictPolicy,
    pos_policy: AttributeConflictPolicy,
) -> IndexMap<String, LexicalEntry> {
    let mut grouped: IndexMap<String, EntryRows> = IndexMap::new();
    for row in rows {
        if row.written_rep.trim().is_empty() {
            debug!(lexentry = %row.lexentry, "skipping entry row without written_rep");
            continue;
        }
        let entry = grouped.entry(row.lexentry).or_insert_with(|| EntryRows {
            vocable: row.vocable,
            written_rep: row.written_rep.nfc().collect(),
            ..Default::default()
        });
        entry.part_of_speech.extend(row.part_of_speech);
        entry.gender.extend(row.gender);
        entry.pronunciations.extend(row.pronun);
    }

    grouped
        .into_iter()
        .map(|(lexentry, rows)| {
            let entry = LexicalEntry {
                lexentry: lexentry.clone(),
                vocable: rows.vocable,
                written_rep: rows.written_rep,
                part_of_speech: choose(rows.part_of_speech, pos_policy),
                gender: choose(rows.gender, gender_policy),
                pronunciations: rows.pronunciations.into_iter().collect(),
            };
            (lexentry, entry)
        })
        .collect()
}

#[cfg(test)]
mod entry {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(lexentry: &str, pos: Option<&str>, gender: Option<&str>, pronun: Option<&str>) -> RawEntry {
        RawEntry {
            lexentry: lexentry.into(),
            vocable: "deu/See".into(),
            written_rep: "See".into(),
            part_of_speech: pos.map(Into::into),
            gender: gender.map(Into::into),
            pronun: pronun.map(Into::into),
        }
    }

    #[test]
    fn one_entry_per_lexentry() {
        let rows = vec![
            row("See__Noun__1", Some("noun"), Some("masculine"), Some("zeː")),
            row("See__Noun__1", Some("noun"), Some("feminine"), Some("zeː")),
            row("See__Noun__1", Some("noun"), Some("masculine"), Some("ze")),
            row("See__Noun__2", Some("noun"), Some("feminine"), None),
        ];
        let entries = normalize_entries(
            rows,
            AttributeConflictPolicy::NullOnConflict,
            AttributeConflictPolicy::Smallest,
        );
        assert_eq!(entries.len(), 2);

        let first = &entries["See__Noun__1"];
        assert_eq!(first.gender, None);
        assert_eq!(first.part_of_speech.as_deref(), Some("noun"));
        assert_eq!(first.pronunciations, ["zeː", "ze"]);

        let second = &entries["See__Noun__2"];
        assert_eq!(second.gender.as_deref(), Some("feminine"));
        assert!(second.pronunciations.is_empty());
    }

    #[test]
    fn conflict_policies() {
        let rows = || {
            vec![
                row("x", Some("verb"), Some("neuter"), None),
                row("x", Some("noun"), Some("masculine"), None),
            ]
        };
        let first = normalize_entries(
            rows(),
            AttributeConflictPolicy::FirstDistinct,
            AttributeConflictPolicy::FirstDistinct,
        );
        assert_eq!(first["x"].gender.as_deref(), Some("neuter"));
        assert_eq!(first["x"].part_of_speech.as_deref(), Some("verb"));

        let smallest = normalize_entries(
            rows(),
            AttributeConflictPolicy::Smallest,
            AttributeConflictPolicy::Smallest,
        );
        assert_eq!(smallest["x"].gender.as_deref(), Some("masculine"));
        assert_eq!(smallest["x"].part_of_speech.as_deref(), Some("noun"));
    }

    #[test]
    fn rows_without_headword_are_skipped() {
        let mut empty = row("y", None, None, None);
        empty.written_rep = " ".into();
        let entries = normalize_entries(
            vec![empty],
            AttributeConflictPolicy::default(),
            AttributeConflictPolicy::default(),
        );
        assert!(entries.is_empty());
    }
}
