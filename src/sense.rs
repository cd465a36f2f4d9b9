use std::{fmt::Display, str::FromStr, sync::LazyLock};

use fancy_regex::Regex;
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    language::Language,
    markup::clean_html,
    regex_util::{clean_wiki_syntax, is_dummy_sense},
};

static SENSE_NUM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)(\w)?").expect("Invalid sense_num pattern"));

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("sense number {input:?} does not match `<digits>[<letter>]`")]
pub struct SenseNumError {
    pub input: String,
}

/// A normalized sense number.
///
/// Orders by number, then by letter (`03 < 03b < 04`).
/// [`SenseNum::Unnumbered`] sorts after every numbered sense.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub enum SenseNum {
    Numbered {
        number: u32,
        letter: Option<char>,
    },
    #[default]
    Unnumbered,
}

impl SenseNum {
    /// Normalizes a raw sense number like `"3"`, `"12b"` or `""`.
    ///
    /// Anything after the first letter is ignored (`"1.2"` is sense `01`).
    /// Input that does not start with a digit is rejected.
    pub fn parse(raw: &str) -> Result<Self, SenseNumError> {
        if raw.is_empty() {
            return Ok(SenseNum::Unnumbered);
        }
        let err = || SenseNumError {
            input: raw.to_string(),
        };
        let caps = SENSE_NUM_REGEX
            .captures(raw)
            .map_err(|_| err())?
            .ok_or_else(err)?;
        let number = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(err)?;
        let letter = caps.get(2).and_then(|m| m.as_str().chars().next());
        Ok(SenseNum::Numbered { number, letter })
    }

    /// Normalizes an optional raw sense number; `None` is the same as `""`.
    pub fn parse_opt(raw: Option<&str>) -> Result<Self, SenseNumError> {
        SenseNum::parse(raw.unwrap_or_default())
    }

    pub fn is_numbered(&self) -> bool {
        matches!(self, SenseNum::Numbered { .. })
    }
}

impl Display for SenseNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SenseNum::Numbered { number, letter } => {
                write!(f, "{number:02}")?;
                if let Some(letter) = letter {
                    write!(f, "{letter}")?;
                }
                Ok(())
            }
            SenseNum::Unnumbered => Ok(()),
        }
    }
}

impl FromStr for SenseNum {
    type Err = SenseNumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SenseNum::parse(s)
    }
}

/// Cleans a free text sense definition.
///
/// Returns `None` for missing, blank and placeholder senses.
pub fn parse_sense(sense: Option<&str>, lang: Language) -> Option<String> {
    let sense = sense?.trim();
    if sense.is_empty() {
        return None;
    }
    let sense = clean_wiki_syntax(sense);
    let sense = clean_html(&sense);

    // after the syntax cleanup, so the placeholders are easier to match
    if is_dummy_sense(&sense, lang) {
        return None;
    }
    Some(sense)
}
