//! Runtime settings - resolver location and reference table path

use std::path::PathBuf;

use anyhow::Result;

use crate::api::ResolverClient;
use crate::table::ExerciseTable;

pub const DEFAULT_TABLE: &str = "data/qmatrix.csv";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub table_path: PathBuf,
}

impl Settings {
    pub fn new(api_url: impl Into<String>, table_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: api_url.into(),
            table_path: table_path.into(),
        }
    }

    pub fn client(&self) -> ResolverClient {
        ResolverClient::new(self.api_url.clone())
    }

    pub fn load_table(&self) -> Result<ExerciseTable> {
        ExerciseTable::load(&self.table_path)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(crate::api::DEFAULT_API_URL, DEFAULT_TABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.client().base_url(), "http://localhost:5000");
        assert_eq!(settings.table_path, PathBuf::from("data/qmatrix.csv"));
    }

    #[test]
    fn test_bundled_table_loads() {
        let settings = Settings::new(
            "http://localhost:5000",
            concat!(env!("CARGO_MANIFEST_DIR"), "/data/qmatrix.csv"),
        );
        let table = settings.load_table().unwrap();
        assert_eq!(table.muscle_columns().len(), crate::muscles::MUSCLE_COUNT);
        assert!(!table.is_empty());
    }
}
