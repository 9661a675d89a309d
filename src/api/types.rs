//! Request and response bodies of the resolver service

use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;
use crate::scaler::ScaledVector;

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    #[serde(rename = "L")]
    pub demand: &'a ScaledVector,
    pub amount: u32,
}

/// `/api/gmra` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    /// (exercise row, muscle column) assignments
    #[serde(rename = "T_pairs", default)]
    pub pairs: Option<Vec<(usize, usize)>>,
    #[serde(rename = "T_matrix", default)]
    pub matrix: Matrix,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub objective_value: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ShuffleRequest<'a> {
    pub muscle_index: usize,
    #[serde(rename = "T_matrix")]
    pub matrix: &'a Matrix,
    /// Name of the exercise being replaced
    pub muscle_name: &'a str,
}

/// `/api/shuffle` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShuffleResponse {
    #[serde(rename = "T_matrix", default)]
    pub matrix: Option<Matrix>,
    #[serde(alias = "new_exercise_index", default)]
    pub most_similar_index: Option<usize>,
    #[serde(default)]
    pub new_exercise_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpaceOutRequest<'a> {
    #[serde(rename = "parsedTMatrix")]
    pub matrix: &'a Matrix,
    #[serde(rename = "uniqueRowIndices")]
    pub rows: &'a [usize],
}

/// `/api/spaceout` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceOutResponse {
    #[serde(rename = "balancedTmatrix", default)]
    pub matrix: Matrix,
    #[serde(rename = "reorderedIndices", default)]
    pub rows: Vec<usize>,
}
