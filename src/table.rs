//! Exercise reference table - exercise names and per-muscle coefficients

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use ndarray::Array2;
use tracing::{debug, warn};

/// Reference table loaded from CSV.
///
/// The header names the exercise column followed by one column per muscle.
/// Each following row is one exercise.
#[derive(Debug, Clone)]
pub struct ExerciseTable {
    headers: Vec<String>,
    names: Vec<String>,
    coefficients: Array2<f64>,
}

impl Default for ExerciseTable {
    fn default() -> Self {
        Self {
            headers: vec!["Exercise".to_string()],
            names: Vec::new(),
            coefficients: Array2::zeros((0, 0)),
        }
    }
}

impl ExerciseTable {
    /// Load table from a CSV file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read exercise table {}", path.display()))?;
        let table = Self::parse(&text)
            .with_context(|| format!("failed to parse exercise table {}", path.display()))?;
        debug!(
            "Loaded {} exercises x {} muscles from {}",
            table.len(),
            table.muscle_columns().len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse table text. Rows without a name are dropped and
    /// non-numeric coefficients read as 0.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            bail!("exercise table has no header row");
        }
        let width = headers.len() - 1;

        let mut names = Vec::new();
        let mut data = Vec::new();

        for (line, record) in reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    warn!("Skipping unreadable table row {}: {}", line + 2, e);
                    continue;
                }
            };

            let name = record.get(0).unwrap_or_default();
            if name.is_empty() {
                continue;
            }

            names.push(name.to_string());
            data.extend((1..=width).map(|col| {
                record
                    .get(col)
                    .and_then(|v| v.parse::<f64>().ok())
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0)
            }));
        }

        let coefficients = Array2::from_shape_vec((names.len(), width), data)?;
        Ok(Self { headers, names, coefficients })
    }

    /// Header row, including the exercise-name column
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Muscle column names
    pub fn muscle_columns(&self) -> &[String] {
        &self.headers[1..]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Coefficient row of an exercise
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.coefficients.nrows() {
            return None;
        }
        self.coefficients.row(index).to_slice()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Exercise name, or a numbered placeholder for rows the table lacks
    pub fn name_or_placeholder(&self, index: usize) -> String {
        match self.name(index) {
            Some(name) => name.to_string(),
            None => format!("Exercise {}", index + 1),
        }
    }
}
