pub mod inflection;
pub mod languages;

pub use languages::{lang_pair_permutations, LangPair, Language, LanguageError, SUPPORTED_LANGUAGES};
