use super::languages::{Language, LanguageError};

/// One row of a language's inflection table.
///
/// A word form whose grammatical attributes are all equal to a row's
/// attributes (absent equals absent) gets that row's `rank`,
/// lower ranks are shown first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct InflectionRow {
    pub pos: &'static str,
    pub rank: u8,
    pub number: Option<&'static str>,
    pub mood: Option<&'static str>,
    pub person: Option<&'static str>,
    pub tense: Option<&'static str>,
    pub voice: Option<&'static str>,
    pub case: Option<&'static str>,
    pub definiteness: Option<&'static str>,
    pub tense_name: Option<&'static str>,
}

const fn verb(rank: u8) -> InflectionRow {
    InflectionRow {
        pos: "verb",
        rank,
        number: None,
        mood: None,
        person: None,
        tense: None,
        voice: None,
        case: None,
        definiteness: None,
        tense_name: None,
    }
}

const fn noun(rank: u8, number: &'static str, case: &'static str) -> InflectionRow {
    InflectionRow {
        pos: "noun",
        number: Some(number),
        case: Some(case),
        ..verb(rank)
    }
}

const DE: &[InflectionRow] = &[
    InflectionRow {
        mood: Some("IndicativeMood"),
        number: Some("Singular"),
        person: Some("First"),
        tense: Some("Present"),
        voice: Some("ActiveVoice"),
        ..verb(1)
    },
    InflectionRow {
        mood: Some("IndicativeMood"),
        number: Some("Singular"),
        person: Some("First"),
        tense: Some("Past"),
        voice: Some("ActiveVoice"),
        ..verb(4)
    },
    InflectionRow {
        mood: Some("IndicativeMood"),
        number: Some("Singular"),
        person: Some("First"),
        tense: Some("Perfect"),
        voice: Some("ActiveVoice"),
        ..verb(8)
    },
    noun(1, "Singular", "Nominative"),
    noun(2, "Plural", "Nominative"),
];

const EN: &[InflectionRow] = &[
    InflectionRow {
        tense: Some("Past"),
        ..verb(3)
    },
    InflectionRow {
        mood: Some("Participle"),
        tense: Some("Past"),
        ..verb(4)
    },
];

const SV: &[InflectionRow] = &[
    InflectionRow {
        mood: Some("IndicativeMood"),
        tense: Some("Present"),
        voice: Some("ActiveVoice"),
        tense_name: Some("Presens"),
        ..verb(1)
    },
    InflectionRow {
        mood: Some("IndicativeMood"),
        tense: Some("Past"),
        voice: Some("ActiveVoice"),
        tense_name: Some("Preteritum"),
        ..verb(2)
    },
    // the supine shows up both with and without a mood
    InflectionRow {
        mood: Some("PastParticiple"),
        tense: Some("Supine"),
        voice: Some("ActiveVoice"),
        tense_name: Some("Supinum"),
        ..verb(3)
    },
    InflectionRow {
        tense: Some("Supine"),
        voice: Some("ActiveVoice"),
        tense_name: Some("Supinum"),
        ..verb(3)
    },
    InflectionRow {
        definiteness: Some("Definite"),
        ..noun(1, "Singular", "Nominative")
    },
    InflectionRow {
        definiteness: Some("Definite"),
        ..noun(2, "Plural", "Nominative")
    },
];

/// Returns the validated inflection table of `lang`.
///
/// Languages without a table get an empty slice; their forms stay unranked.
pub fn inflection_table(lang: Language) -> Result<&'static [InflectionRow], LanguageError> {
    let rows: &'static [InflectionRow] = match lang {
        Language::De => DE,
        Language::En => EN,
        Language::Sv => SV,
        _ => &[],
    };
    validate_rows(lang, rows)?;
    Ok(rows)
}

fn validate_rows(lang: Language, rows: &[InflectionRow]) -> Result<(), LanguageError> {
    for row in rows {
        if row.pos.is_empty() {
            return Err(LanguageError::InvalidInflectionRow {
                language: lang,
                reason: format!("empty part of speech in {row:?}"),
            });
        }
        if row.rank == 0 {
            return Err(LanguageError::InvalidInflectionRow {
                language: lang,
                reason: format!("rank must start at 1 in {row:?}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod inflection {
    use super::*;

    #[test]
    fn builtin_tables_validate() {
        for lang in crate::language::SUPPORTED_LANGUAGES {
            inflection_table(lang).unwrap();
        }
        assert_eq!(inflection_table(Language::De).unwrap().len(), 5);
        assert!(inflection_table(Language::Fr).unwrap().is_empty());
    }

    #[test]
    fn rank_zero_is_rejected() {
        let err = validate_rows(Language::De, &[verb(0)]).unwrap_err();
        assert!(matches!(err, LanguageError::InvalidInflectionRow { .. }));
    }
}
