use crate::{
    language::{LangPair, LanguageError},
    settings::SettingsError,
    InitError,
};
use native_db::db_type;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// All possible `dictgen_rs` [Error](std::error::Error) paths
#[derive(Error, Debug)]
pub enum DictGenError {
    #[error("(-)[<dg_error::import>] -> 
{0}")]
    Import(#[from] ImportError),
    #[error("(-)[<dg_error::pipeline>] -> 
{0}")]
    Pipeline(#[from] PipelineError),
    #[error("(-)[<dg_error::db>] -> 
{0}")]
    Database(#[from] DBError),
    #[error("(-)[<dg_error::settings>] -> 
{0}")]
    Settings(#[from] SettingsError),
    #[error("(-)[<dg_error::init>] -> 
{0}")]
    Init(#[from] InitError),
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("the raw data path: `{0}` does not exist")]
    DoesNotExist(PathBuf),
    #[error("failed to deserialize file: {file}\n         reason: {reason}")]
    InvalidJson { file: PathBuf, reason: String },
    #[error("no data in bank stream, is the file empty?\n         file: {0}")]
    Empty(PathBuf),
    #[error("io err: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Language(#[from] LanguageError),
}

impl ImportError {
    pub fn check_raw_paths(paths: &[impl AsRef<Path>]) -> Result<(), Self> {
        for rp in paths {
            let rp = rp.as_ref();
            if !rp.exists() {
                return Err(Self::DoesNotExist(rp.to_path_buf()));
            }
        }
        Ok(())
    }
}

/// Failures that abort the build of a single language pair.
///
/// A pair that fails never reaches the serving database,
/// whatever was stored for it before stays in place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("[{lang_pair}] malformed sense number {input:?} on lexentry `{lexentry}`")]
    MalformedSenseNumber {
        lang_pair: LangPair,
        lexentry: String,
        input: String,
    },
    #[error("[{lang_pair}] no raw data loaded for language `{language}`")]
    MissingLanguage { lang_pair: LangPair, language: String },
    #[error("[{lang_pair}] depends on `{upstream}` which failed: {reason}")]
    UpstreamFailed {
        lang_pair: LangPair,
        upstream: LangPair,
        reason: String,
    },
    #[error("{0}")]
    Language(#[from] LanguageError),
}

#[derive(Error, Debug)]
pub enum DBError {
    #[error("db err: {0}")]
    Database(#[from] Box<db_type::Error>),
}

impl From<native_db::db_type::Error> for DBError {
    fn from(err: native_db::db_type::Error) -> Self {
        DBError::Database(Box::new(err))
    }
}
