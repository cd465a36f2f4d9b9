use crate::dictionary_data::{RawEntry, RawForm, RawImportance, RawLanguage, RawTranslation};
use crate::errors::ImportError;
use crate::language::{LangPair, Language};

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Deserializer as JsonDeserializer;
use tracing::{info, warn};

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Raw relations of every language and language pair, as written by the
/// graph collector.
#[derive(Clone, Debug, Default)]
pub struct RawWorkspace {
    pub languages: IndexMap<Language, RawLanguage>,
    pub translations: IndexMap<LangPair, Vec<RawTranslation>>,
}

#[derive(Default)]
struct LanguagePaths {
    entry_banks: Vec<PathBuf>,
    form_banks: Vec<PathBuf>,
    importance_banks: Vec<PathBuf>,
}

impl RawWorkspace {
    /// Loads every language and language pair found below `root`.
    ///
    /// Expects:
    /// ```text
    /// <root>/de/entry_bank_1.json
    /// <root>/de/form_bank_1.json
    /// <root>/de/importance_bank_1.json
    /// <root>/de-sv/translation_bank_1.json
    /// ```
    /// Bank files are decoded in parallel.
    pub fn load_dir(root: impl AsRef<Path>) -> Result<Self, ImportError> {
        let root = root.as_ref();
        ImportError::check_raw_paths(&[root])?;

        let mut language_dirs: Vec<(Language, PathBuf)> = Vec::new();
        let mut pair_dirs: Vec<(LangPair, PathBuf)> = Vec::new();
        for dir in sorted_entries(root)? {
            if !dir.is_dir() {
                continue;
            }
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.contains('-') {
                pair_dirs.push((name.parse()?, dir));
            } else {
                language_dirs.push((name.parse()?, dir));
            }
        }

        let languages = language_dirs
            .into_par_iter()
            .map(|(language, dir)| load_language(&dir).map(|raw| (language, raw)))
            .collect::<Result<Vec<(Language, RawLanguage)>, ImportError>>()?
            .into_iter()
            .collect();
        let translations = pair_dirs
            .into_par_iter()
            .map(|(pair, dir)| {
                let paths = bank_paths(&dir, "translation_bank")?;
                convert_bank_files::<RawTranslation>(paths).map(|rows| (pair, rows))
            })
            .collect::<Result<Vec<(LangPair, Vec<RawTranslation>)>, ImportError>>()?
            .into_iter()
            .collect();

        let workspace = Self {
            languages,
            translations,
        };
        info!(
            languages = workspace.languages.len(),
            pairs = workspace.translations.len(),
            "loaded raw data"
        );
        Ok(workspace)
    }

    pub fn insert_language(&mut self, language: Language, raw: RawLanguage) {
        self.languages.insert(language, raw);
    }

    pub fn insert_translations(&mut self, lang_pair: LangPair, rows: Vec<RawTranslation>) {
        self.translations.insert(lang_pair, rows);
    }
}

fn load_language(dir: &Path) -> Result<RawLanguage, ImportError> {
    let mut paths = LanguagePaths::default();
    for path in sorted_entries(dir)? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".json") {
            continue;
        }
        if name.starts_with("entry_bank") {
            paths.entry_banks.push(path);
        } else if name.starts_with("form_bank") {
            paths.form_banks.push(path);
        } else if name.starts_with("importance_bank") {
            paths.importance_banks.push(path);
        } else {
            warn!(file = %path.display(), "ignoring unknown bank file");
        }
    }

    Ok(RawLanguage {
        entries: convert_bank_files::<RawEntry>(paths.entry_banks)?,
        forms: convert_bank_files::<RawForm>(paths.form_banks)?,
        importance: convert_bank_files::<RawImportance>(paths.importance_banks)?,
    })
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    let mut paths = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, std::io::Error>>()?;
    paths.sort();
    Ok(paths)
}

fn bank_paths(dir: &Path, bank: &str) -> Result<Vec<PathBuf>, ImportError> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(bank) && n.ends_with(".json"))
        })
        .collect())
}

fn convert_bank_files<T: DeserializeOwned + Send>(
    paths: Vec<PathBuf>,
) -> Result<Vec<T>, ImportError> {
    let banks = paths
        .into_par_iter()
        .map(convert_bank_file::<T>)
        .collect::<Result<Vec<Vec<T>>, ImportError>>()?;
    Ok(banks.into_iter().flatten().collect())
}

fn convert_bank_file<T: DeserializeOwned>(outpath: PathBuf) -> Result<Vec<T>, ImportError> {
    let file = fs::File::open(&outpath)?;
    let reader = BufReader::new(file);

    let mut stream = JsonDeserializer::from_reader(reader).into_iter::<Vec<T>>();
    match stream.next() {
        Some(Ok(rows)) => Ok(rows),
        Some(Err(e)) => Err(ImportError::InvalidJson {
            file: outpath,
            reason: e.to_string(),
        }),
        None => Err(ImportError::Empty(outpath)),
    }
}
