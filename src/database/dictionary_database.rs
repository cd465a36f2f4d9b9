use crate::errors::DBError;
use crate::form::FormMatch;
use crate::grouping::TranslationGroup;
use crate::language::{LangPair, Language};
use crate::pipeline::LangPairBuild;
use crate::sense::SenseNum;
use crate::simple::{lookup_key, SimpleTranslation};
use crate::stats::LangPairStats;

use chrono::{DateTime, Utc};
use native_db::{Builder as DBBuilder, *};
use native_model::{native_model, Model as NativeModelTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use std::path::Path;
use std::sync::LazyLock;

pub static DB_MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<DatabaseTranslationGroup>().unwrap();
    models.define::<DatabaseSimpleTranslation>().unwrap();
    models.define::<DatabaseLangPairStats>().unwrap();
    models.define::<DatabaseFormMatch>().unwrap();
    models
});

/// Secondary key of a headword inside a language pair: `de-sv/gehen`.
fn headword_key(lang_pair: LangPair, headword: &str) -> String {
    format!("{}{headword}", lang_pair.key_prefix())
}

/// Maps `x` to a value whose big endian bytes sort in descending order of `x`.
fn descending(x: f64) -> u64 {
    let bits = x.to_bits();
    let ascending = if x.is_sign_negative() {
        !bits
    } else {
        bits | (1 << 63)
    };
    !ascending
}

/// Secondary key ordering the groups of a pair by headword, part of speech,
/// sense number and `score * importance` descending. Ties fall back to the
/// build ordinal.
fn sort_key(lang_pair: LangPair, ordinal: usize, group: &TranslationGroup) -> String {
    // a missing part of speech sorts first
    let pos = match &group.part_of_speech {
        None => "0".to_string(),
        Some(pos) => format!("1{pos}"),
    };
    let sense = match group.min_sense_num {
        SenseNum::Numbered { number, letter } => {
            format!("{number:010}{}", letter.map(String::from).unwrap_or_default())
        }
        SenseNum::Unnumbered => "~".to_string(),
    };
    format!(
        "{}{}\0{pos}\0{sense}\0{:016x}\0{ordinal:09}",
        lang_pair.key_prefix(),
        group.written_rep,
        descending(group.score * group.importance),
    )
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct DatabaseTranslationGroup {
    /// `de-sv/000000042`, the ordinal keeps the build order.
    #[primary_key]
    pub id: String,
    #[secondary_key]
    pub headword_key: String,
    /// See [sort_key].
    #[secondary_key]
    pub sort_key: String,
    pub lexentry: Option<String>,
    pub written_rep: String,
    pub part_of_speech: Option<String>,
    pub trans_list: String,
    pub min_sense_num: SenseNum,
    pub sense_list: Option<String>,
    pub score: f64,
    pub importance: f64,
}

impl DatabaseTranslationGroup {
    fn new(lang_pair: LangPair, ordinal: usize, group: &TranslationGroup) -> Self {
        Self {
            id: format!("{}{ordinal:09}", lang_pair.key_prefix()),
            headword_key: headword_key(lang_pair, &group.written_rep),
            sort_key: sort_key(lang_pair, ordinal, group),
            lexentry: group.lexentry.clone(),
            written_rep: group.written_rep.clone(),
            part_of_speech: group.part_of_speech.clone(),
            trans_list: group.trans_list.clone(),
            min_sense_num: group.min_sense_num,
            sense_list: group.sense_list.clone(),
            score: group.score,
            importance: group.importance,
        }
    }
}

impl From<DatabaseTranslationGroup> for TranslationGroup {
    fn from(row: DatabaseTranslationGroup) -> Self {
        Self {
            lexentry: row.lexentry,
            written_rep: row.written_rep,
            part_of_speech: row.part_of_speech,
            trans_list: row.trans_list,
            min_sense_num: row.min_sense_num,
            sense_list: row.sense_list,
            score: row.score,
            importance: row.importance,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct DatabaseSimpleTranslation {
    #[primary_key]
    pub id: String,
    /// Case folded headword, see [lookup_key].
    #[secondary_key]
    pub lookup_key: String,
    pub written_rep: String,
    pub trans_list: String,
    pub max_score: f64,
    pub rel_importance: f64,
}

impl DatabaseSimpleTranslation {
    fn new(lang_pair: LangPair, ordinal: usize, simple: &SimpleTranslation) -> Self {
        Self {
            id: format!("{}{ordinal:09}", lang_pair.key_prefix()),
            lookup_key: headword_key(lang_pair, &lookup_key(&simple.written_rep)),
            written_rep: simple.written_rep.clone(),
            trans_list: simple.trans_list.clone(),
            max_score: simple.max_score,
            rel_importance: simple.rel_importance,
        }
    }
}

impl From<DatabaseSimpleTranslation> for SimpleTranslation {
    fn from(row: DatabaseSimpleTranslation) -> Self {
        Self {
            written_rep: row.written_rep,
            trans_list: row.trans_list,
            max_score: row.max_score,
            rel_importance: row.rel_importance,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct DatabaseLangPairStats {
    /// `de-sv`
    #[primary_key]
    pub lang_pair: String,
    pub from_lang: Language,
    pub to_lang: Language,
    pub translations: u64,
    pub forms: u64,
    pub score: i64,
    pub built_at: DateTime<Utc>,
}

impl From<&LangPairStats> for DatabaseLangPairStats {
    fn from(stats: &LangPairStats) -> Self {
        Self {
            lang_pair: stats.lang_pair.to_string(),
            from_lang: stats.lang_pair.from,
            to_lang: stats.lang_pair.to,
            translations: stats.translations,
            forms: stats.forms,
            score: stats.score,
            built_at: stats.built_at,
        }
    }
}

impl From<DatabaseLangPairStats> for LangPairStats {
    fn from(row: DatabaseLangPairStats) -> Self {
        Self {
            lang_pair: LangPair {
                from: row.from_lang,
                to: row.to_lang,
            },
            translations: row.translations,
            forms: row.forms,
            score: row.score,
            built_at: row.built_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct DatabaseFormMatch {
    #[primary_key]
    pub id: String,
    /// Case folded form, see [lookup_key].
    #[secondary_key]
    pub form_key: String,
    pub form: String,
    pub written_rep: String,
    pub form_importance: f64,
    pub rank: Option<u8>,
    pub inflection: Option<String>,
}

impl DatabaseFormMatch {
    fn new(lang_pair: LangPair, ordinal: usize, m: &FormMatch) -> Self {
        Self {
            id: format!("{}{ordinal:09}", lang_pair.key_prefix()),
            form_key: headword_key(lang_pair, &lookup_key(&m.form)),
            form: m.form.clone(),
            written_rep: m.written_rep.clone(),
            form_importance: m.form_importance,
            rank: m.rank,
            inflection: m.inflection.clone(),
        }
    }
}

impl From<DatabaseFormMatch> for FormMatch {
    fn from(row: DatabaseFormMatch) -> Self {
        Self {
            form: row.form,
            written_rep: row.written_rep,
            form_importance: row.form_importance,
            rank: row.rank,
            inflection: row.inflection,
        }
    }
}

/// The serving store of built language pairs.
pub struct DictionaryDatabase {
    db: Database<'static>,
}

impl DictionaryDatabase {
    /// Opens the database at `path`, creating it if needed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DBError> {
        Ok(Self {
            db: DBBuilder::new().create(&DB_MODELS, path)?,
        })
    }

    pub fn in_memory() -> Result<Self, DBError> {
        Ok(Self {
            db: DBBuilder::new().create_in_memory(&DB_MODELS)?,
        })
    }

    /// Replaces everything stored for `build.lang_pair` with `build`.
    ///
    /// Old rows are removed, new rows inserted and the statistics upserted
    /// in a single transaction: readers see either the previous tables of
    /// the pair or the new ones.
    pub fn replace_lang_pair(&self, build: &LangPairBuild) -> Result<(), DBError> {
        let lang_pair = build.lang_pair;
        let prefix = lang_pair.key_prefix();
        let rwtx = self.db.rw_transaction()?;

        let old_groups: Vec<DatabaseTranslationGroup> = {
            let scan = rwtx.scan().primary::<DatabaseTranslationGroup>()?;
            let rows = scan
                .start_with(prefix.clone())?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        let old_simple: Vec<DatabaseSimpleTranslation> = {
            let scan = rwtx.scan().primary::<DatabaseSimpleTranslation>()?;
            let rows = scan
                .start_with(prefix.clone())?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        let old_forms: Vec<DatabaseFormMatch> = {
            let scan = rwtx.scan().primary::<DatabaseFormMatch>()?;
            let rows = scan
                .start_with(prefix.clone())?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        debug!(
            %lang_pair,
            groups = old_groups.len(),
            simple = old_simple.len(),
            forms = old_forms.len(),
            "removing previous build"
        );
        for row in old_groups {
            rwtx.remove(row)?;
        }
        for row in old_simple {
            rwtx.remove(row)?;
        }
        for row in old_forms {
            rwtx.remove(row)?;
        }

        for (ordinal, group) in build.groups.iter().enumerate() {
            rwtx.insert(DatabaseTranslationGroup::new(lang_pair, ordinal, group))?;
        }
        for (ordinal, simple) in build.simple.iter().enumerate() {
            rwtx.insert(DatabaseSimpleTranslation::new(lang_pair, ordinal, simple))?;
        }
        for (ordinal, m) in build.forms.iter().enumerate() {
            rwtx.insert(DatabaseFormMatch::new(lang_pair, ordinal, m))?;
        }
        rwtx.upsert(DatabaseLangPairStats::from(&build.stats))?;
        rwtx.commit()?;

        info!(
            %lang_pair,
            groups = build.groups.len(),
            simple = build.simple.len(),
            forms = build.forms.len(),
            "stored language pair"
        );
        Ok(())
    }

    /// All groups of `lang_pair`, in build order.
    pub fn translations(&self, lang_pair: LangPair) -> Result<Vec<TranslationGroup>, DBError> {
        let r_txn = self.db.r_transaction()?;
        let scan = r_txn.scan().primary::<DatabaseTranslationGroup>()?;
        let rows = scan
            .start_with(lang_pair.key_prefix())?
            .collect::<Result<Vec<DatabaseTranslationGroup>, _>>()?;
        Ok(rows.into_iter().map(TranslationGroup::from).collect())
    }

    /// Point lookup of every group of `headword`.
    pub fn find_translations(
        &self,
        lang_pair: LangPair,
        headword: &str,
    ) -> Result<Vec<TranslationGroup>, DBError> {
        let key = headword_key(lang_pair, headword);
        let r_txn = self.db.r_transaction()?;
        let scan = r_txn
            .scan()
            .secondary::<DatabaseTranslationGroup>(DatabaseTranslationGroupKey::headword_key)?;
        let mut rows = scan
            .range(key.clone()..=key)?
            .collect::<Result<Vec<DatabaseTranslationGroup>, _>>()?;
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows.into_iter().map(TranslationGroup::from).collect())
    }

    /// A page of groups ordered by headword, part of speech, sense number
    /// and `score * importance` descending.
    pub fn translations_sorted(
        &self,
        lang_pair: LangPair,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<TranslationGroup>, DBError> {
        let r_txn = self.db.r_transaction()?;
        let scan = r_txn
            .scan()
            .secondary::<DatabaseTranslationGroup>(DatabaseTranslationGroupKey::sort_key)?;
        let rows = scan
            .start_with(lang_pair.key_prefix())?
            .skip(offset)
            .take(limit)
            .collect::<Result<Vec<DatabaseTranslationGroup>, _>>()?;
        Ok(rows.into_iter().map(TranslationGroup::from).collect())
    }

    /// Case insensitive lookup of a headword or inflected form.
    ///
    /// Ordered by form importance (headwords first), then inflection rank.
    pub fn find_by_form(&self, lang_pair: LangPair, form: &str) -> Result<Vec<FormMatch>, DBError> {
        let key = headword_key(lang_pair, &lookup_key(form));
        let r_txn = self.db.r_transaction()?;
        let scan = r_txn
            .scan()
            .secondary::<DatabaseFormMatch>(DatabaseFormMatchKey::form_key)?;
        let mut rows = scan
            .range(key.clone()..=key)?
            .collect::<Result<Vec<DatabaseFormMatch>, _>>()?;
        rows.sort_by(|a, b| {
            b.form_importance
                .total_cmp(&a.form_importance)
                .then_with(|| match (a.rank, b.rank) {
                    (Some(a), Some(b)) => a.cmp(&b),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows.into_iter().map(FormMatch::from).collect())
    }

    /// Case insensitive lookup of the simple translation of `headword`.
    pub fn find_simple_translation(
        &self,
        lang_pair: LangPair,
        headword: &str,
    ) -> Result<Vec<SimpleTranslation>, DBError> {
        let key = headword_key(lang_pair, &lookup_key(headword));
        let r_txn = self.db.r_transaction()?;
        let scan = r_txn
            .scan()
            .secondary::<DatabaseSimpleTranslation>(DatabaseSimpleTranslationKey::lookup_key)?;
        let mut rows = scan
            .range(key.clone()..=key)?
            .collect::<Result<Vec<DatabaseSimpleTranslation>, _>>()?;
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows.into_iter().map(SimpleTranslation::from).collect())
    }

    pub fn lang_pair_stats(&self) -> Result<Vec<LangPairStats>, DBError> {
        let r_txn = self.db.r_transaction()?;
        let rows = r_txn
            .scan()
            .primary::<DatabaseLangPairStats>()?
            .all()?
            .collect::<Result<Vec<DatabaseLangPairStats>, _>>()?;
        Ok(rows.into_iter().map(LangPairStats::from).collect())
    }

    pub fn lang_pair_stats_for(&self, lang_pair: LangPair) -> Result<Option<LangPairStats>, DBError> {
        let r_txn = self.db.r_transaction()?;
        let row: Option<DatabaseLangPairStats> =
            r_txn.get().primary(lang_pair.to_string())?;
        Ok(row.map(LangPairStats::from))
    }
}
