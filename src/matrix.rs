//! Selection matrix (T_matrix) - exercises x muscles assignment matrix

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Exercise-by-muscle matrix as produced by the resolver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix(pub Vec<Vec<f64>>);

impl Matrix {
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.0
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.0.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices of rows with at least one non-zero entry
    pub fn nonzero_rows(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|v| *v != 0.0))
            .map(|(i, _)| i)
            .collect()
    }

    /// Copy of the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix(
            indices
                .iter()
                .filter_map(|i| self.0.get(*i).cloned())
                .collect(),
        )
    }
}

/// Serializes whole numbers as JSON integers; the resolver applies
/// integer bit operations to matrix cells.
struct Cell(f64);

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
        if self.0.fract() == 0.0 && self.0.abs() <= MAX_EXACT {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.0
                .iter()
                .map(|row| row.iter().map(|v| Cell(*v)).collect::<Vec<_>>()),
        )
    }
}

/// `null` cells (unsolved variables) read as 0
impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<Vec<Option<f64>>>::deserialize(deserializer)?;
        Ok(Matrix(
            raw.into_iter()
                .map(|row| row.into_iter().map(|v| v.unwrap_or(0.0)).collect())
                .collect(),
        ))
    }
}
