pub mod aggregate;
pub mod collector;
pub mod database;
pub mod dictionary_data;
pub mod entry;
pub mod errors;
pub mod form;
pub mod grouping;
pub mod importance;
pub mod infer;
pub mod language;
pub mod language_data;
mod markup;
pub mod pipeline;
mod regex_util;
pub mod resolve;
pub mod sense;
pub mod settings;
pub mod simple;
pub mod stats;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests {
    mod importer_tests;
    mod pipeline_tests;
}

use database::dictionary_database::DictionaryDatabase;
use database::raw_importer::RawWorkspace;
use errors::{DBError, DictGenError};
use grouping::TranslationGroup;
use language::{lang_pair_permutations, LangPair, Language};
use language_data::Workspace;
use pipeline::Pipeline;
use settings::PipelineOptions;
use simple::SimpleTranslation;
use stats::LangPairStats;

use native_db::db_type;
use rayon::prelude::*;
use tracing::{error, info};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A translation dictionary generator backed by its serving database.
pub struct DictGen {
    db: DictionaryDatabase,
    options: PipelineOptions,
}

impl DictGen {
    /// Initializes _(or if one already exists, opens)_ a DictGen database.
    ///
    /// # Arguments
    /// * `path` - a `.dgdb` file, or the directory where `dictgen_rs/db.dgdb` will be created/opened.
    ///
    /// # Examples
    /// ```no_run
    /// use dictgen_rs::DictGen;
    ///
    /// // creates a database at `/home/one/dicts/dictgen_rs/db.dgdb`
    /// let dg = DictGen::new("/home/one/dicts").unwrap();
    /// ```
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DictGenError> {
        let db_path = fmt_dbpath(path.as_ref().to_path_buf())?;
        let db = DictionaryDatabase::new(&db_path).map_err(InitError::from)?;
        info!(path = %db_path.display(), "opened dictgen database");
        Ok(Self {
            db,
            options: PipelineOptions::default(),
        })
    }

    /// A DictGen whose database lives only in memory.
    pub fn in_memory() -> Result<Self, DictGenError> {
        Ok(Self {
            db: DictionaryDatabase::in_memory().map_err(InitError::from)?,
            options: PipelineOptions::default(),
        })
    }

    /// Replaces the pipeline options; invalid options are rejected.
    pub fn with_options(mut self, options: PipelineOptions) -> Result<Self, DictGenError> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn db(&self) -> &DictionaryDatabase {
        &self.db
    }

    /// Builds `pairs` from `raw` and swaps each result into the database.
    ///
    /// Every language pair with raw translations is collected first, as
    /// scores of one pair depend on the others. Pairs are then built in
    /// parallel and stored one transaction each. A failing pair keeps its
    /// previously stored tables; the first failure is returned after all
    /// pairs were attempted.
    pub fn build_lang_pairs(
        &self,
        raw: RawWorkspace,
        pairs: &[LangPair],
    ) -> Result<Vec<LangPairStats>, DictGenError> {
        let workspace =
            Workspace::build(raw, &self.options).map_err(errors::PipelineError::from)?;
        let pipeline = Pipeline::new(&workspace, &self.options);
        let store = pipeline.collect_all();

        let results: Vec<Result<LangPairStats, DictGenError>> = pairs
            .par_iter()
            .map(|pair| {
                let build = pipeline.build_pair(*pair, &store)?;
                self.db.replace_lang_pair(&build)?;
                Ok(build.stats)
            })
            .collect();
        for (pair, result) in pairs.iter().zip(&results) {
            if let Err(e) = result {
                error!(lang_pair = %pair, "build failed, keeping stored tables: {e}");
            }
        }
        results.into_iter().collect()
    }

    /// Builds every ordered pair of `languages`.
    pub fn build_all_pairs(
        &self,
        raw: RawWorkspace,
        languages: &[Language],
    ) -> Result<Vec<LangPairStats>, DictGenError> {
        let pairs = lang_pair_permutations(languages).map_err(errors::PipelineError::from)?;
        self.build_lang_pairs(raw, &pairs)
    }

    /// Loads the raw data below `root` and builds `pairs`.
    pub fn build_from_dir(
        &self,
        root: impl AsRef<Path>,
        pairs: &[LangPair],
    ) -> Result<Vec<LangPairStats>, DictGenError> {
        let raw = RawWorkspace::load_dir(root)?;
        self.build_lang_pairs(raw, pairs)
    }

    pub fn find_translations(
        &self,
        lang_pair: LangPair,
        headword: &str,
    ) -> Result<Vec<TranslationGroup>, DBError> {
        self.db.find_translations(lang_pair, headword)
    }

    /// Translations of every headword `form` leads to, headwords matched
    /// directly coming before those reached through an inflected form.
    pub fn search_by_form(
        &self,
        lang_pair: LangPair,
        form: &str,
    ) -> Result<Vec<TranslationGroup>, DBError> {
        let mut seen = HashSet::new();
        let mut groups = Vec::new();
        for m in self.db.find_by_form(lang_pair, form)? {
            if seen.insert(m.written_rep.clone()) {
                groups.extend(self.db.find_translations(lang_pair, &m.written_rep)?);
            }
        }
        Ok(groups)
    }

    pub fn find_simple_translation(
        &self,
        lang_pair: LangPair,
        headword: &str,
    ) -> Result<Vec<SimpleTranslation>, DBError> {
        self.db.find_simple_translation(lang_pair, headword)
    }

    pub fn lang_pair_stats(&self) -> Result<Vec<LangPairStats>, DBError> {
        self.db.lang_pair_stats()
    }
}

/// # Returns
/// A valid PathBuf ending in `.dgdb` if:
/// - current dir is empty (assumes user wants db here)
/// - contains dictgen_rs folder (joins path)
/// - contains a .dgdb file
fn find_dgdb_file(p: &Path) -> Result<Option<PathBuf>, std::io::Error> {
    let rdir: HashSet<PathBuf> = std::fs::read_dir(p)?
        .flatten()
        .map(|e| e.path())
        .collect();
    // if empty db.dgdb will b created directly
    if rdir.is_empty() {
        return Ok(Some(p.join("db.dgdb")));
    }
    if let Some(p) = rdir.get(&p.join("dictgen_rs")) {
        return Ok(Some(p.join("db.dgdb")));
    }
    Ok(rdir
        .into_iter()
        .find(|p| p.extension().is_some_and(|ext| ext == "dgdb")))
}

/// # Returns
/// A valid PathBuf ending in `.dgdb`
/// ...can be opened or created with [`native_db::Builder::create`]
fn fmt_dbpath(p: PathBuf) -> Result<PathBuf, InitError> {
    if p.extension().is_some_and(|ext| ext == "dgdb") {
        if p.exists() {
            return Ok(p);
        }
        return match p.parent() {
            Some(parent) if parent.as_os_str().is_empty() || parent.exists() => Ok(p),
            _ => Err(InitError::MissingParent { p }),
        };
    };
    if p.is_dir() {
        if let Some(p) = find_dgdb_file(&p)? {
            return Ok(p);
        }
        let p = p.join("dictgen_rs");
        std::fs::create_dir_all(&p)?;
        return Ok(p.join("db.dgdb"));
    }
    Err(InitError::InvalidPath { p })
}

/// Could not create or open the dictgen_rs database.
#[derive(thiserror::Error)]
pub enum InitError {
    #[error(
        "\ninvalid path: {p} .. help:
  1. \"~/.home/db.dgdb\" - opens a dgdb instance
  2. \"~/.home/test\"    - creates a new (blank) .dgdb file"
    )]
    InvalidPath { p: PathBuf },
    #[error("path does not have a parent: {p}")]
    MissingParent { p: PathBuf },
    #[error("db conn err: {0}")]
    DatabaseConnectionFailed(#[from] DBError),
    #[error("io err: {0}")]
    Io(#[from] std::io::Error),
}

impl From<db_type::Error> for InitError {
    fn from(e: db_type::Error) -> Self {
        InitError::DatabaseConnectionFailed(DBError::from(e))
    }
}

impl std::fmt::Debug for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod dictgen {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn dbpath_in_empty_dir() {
        let dir = tempdir().unwrap();
        let p = fmt_dbpath(dir.path().to_path_buf()).unwrap();
        assert_eq!(p, dir.path().join("db.dgdb"));
    }

    #[test]
    fn dbpath_reuses_existing_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        let existing = dir.path().join("mine.dgdb");
        std::fs::write(&existing, "").unwrap();
        assert_eq!(fmt_dbpath(dir.path().to_path_buf()).unwrap(), existing);
    }

    #[test]
    fn dbpath_creates_subdir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        let p = fmt_dbpath(dir.path().to_path_buf()).unwrap();
        assert_eq!(p, dir.path().join("dictgen_rs").join("db.dgdb"));
        assert!(dir.path().join("dictgen_rs").is_dir());
    }

    #[test]
    fn dbpath_rejects_missing_parent() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("nope").join("db.dgdb");
        assert!(matches!(
            fmt_dbpath(p),
            Err(InitError::MissingParent { .. })
        ));
    }

    #[test]
    fn invalid_options_rejected() {
        let mut options = PipelineOptions::default();
        options.set_importance_floor(0.0);
        assert!(matches!(
            DictGen::in_memory().unwrap().with_options(options),
            Err(DictGenError::Settings(_))
        ));
    }

    #[test]
    fn unusable_path_is_an_init_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "").unwrap();
        assert!(matches!(
            DictGen::new(&file),
            Err(DictGenError::Init(InitError::InvalidPath { .. }))
        ));
    }
}
