//! Workout plan - resolved exercise list and in-place shuffling

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::api::{ApiError, GenerateResponse, ShuffleResponse};
use crate::matrix::Matrix;
use crate::table::ExerciseTable;

pub const MISSING_PAIRS: &str = "API response did not contain T_pairs.";
pub const GENERATE_FAILED: &str = "Failed to call API. Please try again later.";
pub const NO_SIMILAR_EXERCISE: &str = "No similar exercise found or name not returned.";
pub const SHUFFLE_FAILED: &str =
    "An error occurred while shuffling the exercise. Please try again later.";

/// Distinct exercise rows of the assignment pairs, in first-seen order
pub fn unique_rows(pairs: &[(usize, usize)]) -> Vec<usize> {
    let mut rows = Vec::new();
    for &(row, _) in pairs {
        if !rows.contains(&row) {
            rows.push(row);
        }
    }
    rows
}

/// Exercises picked by the resolver for one request
#[derive(Debug, Clone, Default)]
pub struct WorkoutPlan {
    matrix: Matrix,
    pairs: Vec<(usize, usize)>,
    rows: Vec<usize>,
    names: Vec<String>,
    error: Option<String>,
    generated: bool,
}

impl WorkoutPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the resolver's answer. Without assignment pairs the plan keeps
    /// its previous exercises and records an error.
    pub fn apply_generated(&mut self, response: GenerateResponse, table: &ExerciseTable) {
        self.generated = true;

        let Some(pairs) = response.pairs else {
            warn!("Resolver response had no T_pairs (status: {:?})", response.status);
            self.error = Some(MISSING_PAIRS.to_string());
            return;
        };

        self.rows = unique_rows(&pairs);
        self.names = self
            .rows
            .iter()
            .map(|row| table.name_or_placeholder(*row))
            .collect();
        self.pairs = pairs;
        self.matrix = response.matrix;
        self.error = None;

        info!(
            "Plan resolved: {} exercises from {} assignments",
            self.rows.len(),
            self.pairs.len()
        );
    }

    /// Record a failed generate request; the plan counts as generated
    pub fn generate_failed(&mut self, err: &ApiError) {
        warn!("Generate failed: {}", err);
        self.generated = true;
        self.error = Some(GENERATE_FAILED.to_string());
    }

    /// Check a shuffle target and return the exercise name to send
    pub fn shuffle_target(&self, index: usize) -> Result<&str> {
        match self.names.get(index) {
            Some(name) => Ok(name.as_str()),
            None => bail!("no exercise at position {}", index),
        }
    }

    /// Replace the exercise at `index` with the resolver's suggestion.
    ///
    /// The matrix is replaced whenever the response carries one.
    /// A response without a new name leaves the exercise list untouched.
    pub fn apply_shuffle(&mut self, index: usize, response: ShuffleResponse) {
        if let Some(matrix) = response.matrix {
            self.matrix = matrix;
        }

        let Some(name) = response.new_exercise_name else {
            warn!("Shuffle at {} returned no exercise name", index);
            self.error = Some(NO_SIMILAR_EXERCISE.to_string());
            return;
        };

        if index >= self.names.len() {
            warn!("Shuffle result for position {} outside plan", index);
            self.error = Some(SHUFFLE_FAILED.to_string());
            return;
        }

        debug!("Position {}: {} -> {}", index, self.names[index], name);
        self.names[index] = name;
        if let Some(row) = response.most_similar_index {
            self.rows[index] = row;
        }
        self.error = None;
    }

    pub fn shuffle_failed(&mut self, err: &ApiError) {
        warn!("Shuffle failed: {}", err);
        self.error = Some(SHUFFLE_FAILED.to_string());
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Table rows of the planned exercises
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }
}
