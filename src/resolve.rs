use std::collections::HashSet;

use tracing::debug;

use crate::aggregate::SenseTranslations;

pub trait HasHeadword {
    fn headword(&self) -> &str;
}

impl HasHeadword for SenseTranslations {
    fn headword(&self) -> &str {
        &self.written_rep
    }
}

/// Keeps only the good rows of headwords that have at least one good row.
///
/// Headwords without any good row keep all of their rows, so every
/// headword stays reachable. The input order is preserved.
pub fn good_or_fallback<T: HasHeadword>(rows: Vec<T>, is_good: impl Fn(&T) -> bool) -> Vec<T> {
    let with_good: HashSet<String> = rows
        .iter()
        .filter(|r| is_good(*r))
        .map(|r| r.headword().to_string())
        .collect();
    rows.into_iter()
        .filter(|r| is_good(r) || !with_good.contains(r.headword()))
        .collect()
}

/// Drops weak translations of headwords that also have strong ones.
///
/// A row is good when it has a lexentry and scores at least `good_score`.
/// Inferred rows are never good, they only survive as fallback.
pub fn resolve_translations(rows: Vec<SenseTranslations>, good_score: f64) -> Vec<SenseTranslations> {
    let before = rows.len();
    let resolved = good_or_fallback(rows, |r| r.lexentry.is_some() && r.score >= good_score);
    debug!(before, after = resolved.len(), "resolved translations");
    resolved
}
