pub mod dictionary_database;
pub mod raw_importer;
