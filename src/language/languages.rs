use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LanguageError {
    #[error("unsupported language: {0}")]
    Unsupported(String),
    #[error("invalid language pair: {0:?}, expected `<from>-<to>` (ie: `de-sv`)")]
    InvalidPair(String),
    #[error("a language pair needs two different languages, got `{0}` twice")]
    SameLanguage(Language),
    #[error("need at least two languages to build pairs, got {0}")]
    NotEnoughLanguages(usize),
    #[error("invalid inflection table row for `{language}`: {reason}")]
    InvalidInflectionRow { language: Language, reason: String },
}

/// Languages the pipeline knows how to build dictionaries for.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
    Fr,
    Pl,
    Sv,
    Es,
    Pt,
    Fi,
    El,
    Ru,
    Tr,
    Bg,
    It,
    Ja,
    Id,
    Nl,
    Lt,
    La,
    Mg,
    No,
}

pub const SUPPORTED_LANGUAGES: [Language; 20] = [
    Language::De,
    Language::En,
    Language::Fr,
    Language::Pl,
    Language::Sv,
    Language::Es,
    Language::Pt,
    Language::Fi,
    Language::El,
    Language::Ru,
    Language::Tr,
    Language::Bg,
    Language::It,
    Language::Ja,
    Language::Id,
    Language::Nl,
    Language::Lt,
    Language::La,
    Language::Mg,
    Language::No,
];

impl Language {
    /// ISO-639-1 code.
    pub fn iso(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
            Language::Fr => "fr",
            Language::Pl => "pl",
            Language::Sv => "sv",
            Language::Es => "es",
            Language::Pt => "pt",
            Language::Fi => "fi",
            Language::El => "el",
            Language::Ru => "ru",
            Language::Tr => "tr",
            Language::Bg => "bg",
            Language::It => "it",
            Language::Ja => "ja",
            Language::Id => "id",
            Language::Nl => "nl",
            Language::Lt => "lt",
            Language::La => "la",
            Language::Mg => "mg",
            Language::No => "no",
        }
    }

    /// ISO-639-3 code, which is also the prefix of the knowledge graph's vocable ids.
    pub fn iso639_3(&self) -> &'static str {
        match self {
            Language::De => "deu",
            Language::En => "eng",
            Language::Fr => "fra",
            Language::Pl => "pol",
            Language::Sv => "swe",
            Language::Es => "spa",
            Language::Pt => "por",
            Language::Fi => "fin",
            Language::El => "ell",
            Language::Ru => "rus",
            Language::Tr => "tur",
            Language::Bg => "bul",
            Language::It => "ita",
            Language::Ja => "jpn",
            Language::Id => "ind",
            Language::Nl => "nld",
            Language::Lt => "lit",
            Language::La => "lat",
            Language::Mg => "mlg",
            Language::No => "nor",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.iso())
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_LANGUAGES
            .iter()
            .find(|lang| lang.iso() == s || lang.iso639_3() == s)
            .copied()
            .ok_or_else(|| LanguageError::Unsupported(s.to_string()))
    }
}

/// An ordered (source, target) language pair, written as `de-sv`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct LangPair {
    pub from: Language,
    pub to: Language,
}

impl LangPair {
    pub fn new(from: Language, to: Language) -> Result<Self, LanguageError> {
        if from == to {
            return Err(LanguageError::SameLanguage(from));
        }
        Ok(Self { from, to })
    }

    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    /// Key prefix under which all stored rows of this pair live.
    pub fn key_prefix(&self) -> String {
        format!("{self}/")
    }
}

impl Display for LangPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl FromStr for LangPair {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((from, to)) = s.split_once('-') else {
            return Err(LanguageError::InvalidPair(s.to_string()));
        };
        LangPair::new(from.parse()?, to.parse()?)
    }
}

/// All ordered pairs of distinct languages out of `langs`.
///
/// Duplicates in `langs` are ignored; the order of the result follows `langs`.
pub fn lang_pair_permutations(langs: &[Language]) -> Result<Vec<LangPair>, LanguageError> {
    let mut unique: Vec<Language> = Vec::with_capacity(langs.len());
    for lang in langs {
        if !unique.contains(lang) {
            unique.push(*lang);
        }
    }
    if unique.len() < 2 {
        return Err(LanguageError::NotEnoughLanguages(unique.len()));
    }
    let pairs = unique
        .iter()
        .flat_map(|from| {
            unique
                .iter()
                .filter(move |to| *to != from)
                .map(move |to| LangPair {
                    from: *from,
                    to: *to,
                })
        })
        .collect();
    Ok(pairs)
}

#[cfg(test)]
mod languages {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_pair() {
        let pair: LangPair = "de-sv".parse().unwrap();
        assert_eq!(pair.from, Language::De);
        assert_eq!(pair.to, Language::Sv);
        assert_eq!(pair.to_string(), "de-sv");
        assert_eq!(pair.reversed().to_string(), "sv-de");
    }

    #[test]
    fn parse_pair_errors() {
        assert_eq!(
            "desv".parse::<LangPair>(),
            Err(LanguageError::InvalidPair("desv".into()))
        );
        assert_eq!(
            "de-xx".parse::<LangPair>(),
            Err(LanguageError::Unsupported("xx".into()))
        );
        assert_eq!(
            "de-de".parse::<LangPair>(),
            Err(LanguageError::SameLanguage(Language::De))
        );
    }

    #[test]
    fn iso639_3_round_trip() {
        for lang in SUPPORTED_LANGUAGES {
            assert_eq!(lang.iso639_3().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn permutations() {
        let pairs = lang_pair_permutations(&[Language::De, Language::Sv, Language::En]).unwrap();
        let pairs: Vec<String> = pairs.iter().map(|p| p.to_string()).collect();
        assert_eq!(pairs, ["de-sv", "de-en", "sv-de", "sv-en", "en-de", "en-sv"]);
        assert_eq!(
            lang_pair_permutations(&[Language::De, Language::De]),
            Err(LanguageError::NotEnoughLanguages(1))
        );
    }
}
