use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::{dictionary_data::RawImportance, language::Language};

/// Popularity of one vocable, relative to the most popular words of its language.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportanceRow {
    pub vocable: String,
    pub score: f64,
    /// `score` divided by the average score of the top-N vocables.
    pub rel_score: f64,
    /// Best effort headword for the vocable (`deu/gehen_los` -> `gehen los`).
    pub written_rep_guess: String,
}

/// Relative importance of the words of one language.
#[derive(Clone, Debug, Default)]
pub struct ImportanceTable {
    rows: IndexMap<String, ImportanceRow>,
    by_written_rep: HashMap<String, usize>,
}

/// Headwords are NFC, so guesses are too.
fn written_rep_guess(vocable: &str) -> String {
    vocable.chars().skip(4).nfc().collect::<String>().replace('_', " ")
}

impl ImportanceTable {
    /// Builds the table from raw scores.
    ///
    /// Only vocables of `lang` are kept; duplicate rows are averaged.
    /// The more popular a language, the higher its raw scores, so scores are
    /// normalized against the average of the `top_n` best scored vocables
    /// to make them comparable across languages.
    pub fn build(
        lang: Language,
        raw: impl IntoIterator<Item = RawImportance>,
        top_n: usize,
    ) -> Self {
        let prefix = lang.iso639_3();
        let mut sums: IndexMap<String, (f64, usize)> = IndexMap::new();
        for row in raw {
            if !row.vocable.starts_with(prefix) || !row.score.is_finite() {
                continue;
            }
            let (sum, count) = sums.entry(row.vocable).or_insert((0.0, 0));
            *sum += row.score;
            *count += 1;
        }

        let averaged: Vec<(String, f64)> = sums
            .into_iter()
            .map(|(vocable, (sum, count))| (vocable, sum / count as f64))
            .collect();

        let mut top: Vec<f64> = averaged.iter().map(|(_, score)| *score).collect();
        top.sort_by(|a, b| b.total_cmp(a));
        top.truncate(top_n.max(1));
        let high_score = if top.is_empty() {
            0.0
        } else {
            top.iter().sum::<f64>() / top.len() as f64
        };

        let mut table = ImportanceTable::default();
        for (vocable, score) in averaged {
            let rel_score = if high_score > 0.0 {
                score / high_score
            } else {
                0.0
            };
            let row = ImportanceRow {
                written_rep_guess: written_rep_guess(&vocable),
                vocable: vocable.clone(),
                score,
                rel_score,
            };
            let (idx, _) = table.rows.insert_full(vocable, row);
            let guess = table.rows[idx].written_rep_guess.clone();
            match table.by_written_rep.get(&guess) {
                Some(&existing) if table.rows[existing].score >= score => {
                    debug!(%guess, "ambiguous written_rep_guess, keeping the higher score");
                }
                _ => {
                    table.by_written_rep.insert(guess, idx);
                }
            }
        }
        table
    }

    pub fn by_vocable(&self, vocable: &str) -> Option<&ImportanceRow> {
        self.rows.get(vocable)
    }

    pub fn by_written_rep(&self, written_rep: &str) -> Option<&ImportanceRow> {
        self.by_written_rep
            .get(written_rep)
            .and_then(|idx| self.rows.get_index(*idx))
            .map(|(_, row)| row)
    }

    /// Relative importance of a written form, `floor` if it is unknown.
    pub fn rel_score_or(&self, written_rep: &str, floor: f64) -> f64 {
        self.by_written_rep(written_rep)
            .map_or(floor, |row| row.rel_score)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod importance {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(vocable: &str, score: f64) -> RawImportance {
        RawImportance {
            vocable: vocable.into(),
            score,
        }
    }

    #[test]
    fn normalizes_against_top_n() {
        let table = ImportanceTable::build(
            Language::De,
            vec![
                raw("deu/gehen", 100.0),
                raw("deu/gehen", 60.0),
                raw("deu/Haus", 40.0),
                raw("deu/Hütte", 2.0),
                raw("swe/gå", 500.0),
            ],
            2,
        );
        assert_eq!(table.len(), 3);
        // top 2: avg(80, 40) = 60
        let gehen = table.by_vocable("deu/gehen").unwrap();
        assert_eq!(gehen.score, 80.0);
        assert_eq!(gehen.rel_score, 80.0 / 60.0);
        assert_eq!(table.by_written_rep("Hütte").unwrap().rel_score, 2.0 / 60.0);
        assert!(table.by_vocable("swe/gå").is_none());
    }

    #[test]
    fn written_rep_guess_and_floor() {
        let table = ImportanceTable::build(Language::Sv, vec![raw("swe/gå_ut", 10.0)], 10);
        assert_eq!(table.by_written_rep("gå ut").unwrap().vocable, "swe/gå_ut");
        assert_eq!(table.rel_score_or("gå ut", 0.001), 1.0);
        assert_eq!(table.rel_score_or("åka", 0.001), 0.001);
    }

    #[test]
    fn empty_table() {
        let table = ImportanceTable::build(Language::Fr, Vec::new(), 10);
        assert!(table.is_empty());
        assert_eq!(table.rel_score_or("maison", 0.5), 0.5);
    }

    #[test]
    fn decomposed_vocable_found_by_composed_form() {
        let table = ImportanceTable::build(
            Language::Sv,
            vec![raw("swe/ga\u{30a}", 30.0), raw("swe/hus", 30.0)],
            10,
        );
        assert_eq!(table.by_written_rep("g\u{e5}").unwrap().vocable, "swe/ga\u{30a}");
        assert_eq!(table.rel_score_or("gå", 0.001), 1.0);
    }
}
