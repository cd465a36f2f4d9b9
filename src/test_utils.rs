use std::{
    fs,
    io::Write,
    path::Path,
    sync::{Arc, Mutex},
};

use serde::Serialize;
use tracing_subscriber::fmt::MakeWriter;

use crate::{
    database::raw_importer::RawWorkspace,
    dictionary_data::{RawEntry, RawForm, RawImportance, RawLanguage, RawTranslation},
    language::{LangPair, Language},
    DictGen,
};

pub(crate) fn pair(from: Language, to: Language) -> LangPair {
    LangPair::new(from, to).unwrap()
}

pub(crate) fn entry(lexentry: &str, written_rep: &str, vocable: &str, pos: &str) -> RawEntry {
    RawEntry {
        lexentry: lexentry.into(),
        vocable: vocable.into(),
        written_rep: written_rep.into(),
        part_of_speech: Some(pos.into()),
        ..Default::default()
    }
}

pub(crate) fn importance(vocable: &str, score: f64) -> RawImportance {
    RawImportance {
        vocable: vocable.into(),
        score,
    }
}

pub(crate) fn trans(lexentry: &str, sense_num: &str, sense: &str, trans: &str) -> RawTranslation {
    RawTranslation {
        lexentry: Some(lexentry.into()),
        sense_num: Some(sense_num.into()),
        sense: Some(sense.into()),
        trans: trans.into(),
    }
}

fn german() -> RawLanguage {
    RawLanguage {
        entries: vec![
            entry("gehen__Verb__1", "gehen", "deu/gehen", "verb"),
            entry("Haus__Substantiv__1", "Haus", "deu/Haus", "noun"),
            entry("Zeug__Substantiv__1", "Zeug", "deu/Zeug", "noun"),
        ],
        forms: vec![
            RawForm {
                lexentry: "gehen__Verb__1".into(),
                other_written: "ging".into(),
                pos: Some("verb".into()),
                ..Default::default()
            },
            RawForm {
                lexentry: "Haus__Substantiv__1".into(),
                other_written: "Häuser".into(),
                pos: Some("noun".into()),
                number: Some("plural".into()),
                case: Some("nominative".into()),
                ..Default::default()
            },
        ],
        importance: vec![
            importance("deu/gehen", 50.0),
            importance("deu/Haus", 40.0),
            importance("deu/Zeug", 5.0),
        ],
    }
}

fn swedish() -> RawLanguage {
    RawLanguage {
        entries: vec![
            entry("gå__Verb__1", "gå", "swe/gå", "verb"),
            entry("hus__Substantiv__1", "hus", "swe/hus", "noun"),
            entry("åka__Verb__1", "åka", "swe/åka", "verb"),
        ],
        forms: vec![],
        importance: vec![
            importance("swe/gå", 30.0),
            importance("swe/hus", 20.0),
            importance("swe/åka", 10.0),
        ],
    }
}

fn english() -> RawLanguage {
    RawLanguage {
        entries: vec![
            entry("go__Verb__1", "go", "eng/go", "verb"),
            entry("house__Noun__1", "house", "eng/house", "noun"),
        ],
        forms: vec![],
        importance: vec![importance("eng/go", 100.0), importance("eng/house", 80.0)],
    }
}

/// German, Swedish and English with:
/// - `gehen -> gå` confirmed by `sv-de` and through English
/// - `gehen -> åka` only found directly
/// - `Zeug -> grejer` only found directly, the headword's only translation
pub(crate) fn raw_workspace() -> RawWorkspace {
    use Language::*;
    let mut raw = RawWorkspace::default();
    raw.insert_language(De, german());
    raw.insert_language(Sv, swedish());
    raw.insert_language(En, english());

    raw.insert_translations(
        pair(De, Sv),
        vec![
            trans("gehen__Verb__1", "1", "sich zu Fuß fortbewegen", "gå"),
            trans("gehen__Verb__1", "2", "fahren", "åka"),
            trans("gehen__Verb__1", "3", "''[[funktionieren]]''", ""),
            trans("Haus__Substantiv__1", "1", "Gebäude", "[[hus]]"),
            trans("Zeug__Substantiv__1", "", "", "grejer"),
        ],
    );
    raw.insert_translations(
        pair(Sv, De),
        vec![
            trans("gå__Verb__1", "1", "förflytta sig", "gehen"),
            trans("hus__Substantiv__1", "1", "byggnad", "Haus"),
        ],
    );
    raw.insert_translations(
        pair(De, En),
        vec![
            trans("gehen__Verb__1", "1", "sich zu Fuß fortbewegen", "go"),
            trans("Haus__Substantiv__1", "1", "Gebäude", "house"),
        ],
    );
    raw.insert_translations(
        pair(En, Sv),
        vec![
            trans("go__Verb__1", "1", "to walk", "gå"),
            trans("house__Noun__1", "1", "a building", "hus"),
        ],
    );
    raw
}

pub(crate) fn in_memory_dictgen() -> DictGen {
    DictGen::in_memory().unwrap()
}

pub(crate) fn write_bank<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_string(rows).unwrap()).unwrap();
}

/// Writes `raw` below `root` in the layout read by [RawWorkspace::load_dir].
pub(crate) fn write_raw_dir(root: &Path, raw: &RawWorkspace) {
    for (language, data) in &raw.languages {
        let dir = root.join(language.iso());
        write_bank(dir.join("entry_bank_1.json"), &data.entries);
        write_bank(dir.join("form_bank_1.json"), &data.forms);
        write_bank(dir.join("importance_bank_1.json"), &data.importance);
    }
    for (lang_pair, rows) in &raw.translations {
        write_bank(
            root.join(lang_pair.to_string()).join("translation_bank_1.json"),
            rows,
        );
    }
}

/// Collects formatted log lines written by a test subscriber.
#[derive(Clone, Default)]
pub(crate) struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a subscriber installed on the current thread and returns
/// what it logged.
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}
