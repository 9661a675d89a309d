//! Workout session - steps through the ordered exercises one card at a time

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{cancellable, ApiError, ResolverClient};
use crate::classify::{classify, icon_index, strongest_column, MuscleSplit};
use crate::matrix::Matrix;
use crate::table::ExerciseTable;

/// Result of advancing the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Cursor moved to this position
    Moved(usize),
    /// Already on the last exercise; the workout is over
    Finished,
}

/// What the presenter shows for one exercise
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseCard {
    pub name: String,
    pub muscles: MuscleSplit,
    /// Muscle with the highest coefficient
    pub focus: Option<String>,
    pub icon: Option<usize>,
}

/// Cursor over a fixed sequence of exercise rows
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    rows: Vec<usize>,
    cursor: usize,
}

impl WorkoutSession {
    pub fn new(rows: Vec<usize>) -> Self {
        info!("Workout session started with {} exercises", rows.len());
        Self { rows, cursor: 0 }
    }

    pub fn next(&mut self) -> Step {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
            debug!("Next exercise: {}", self.cursor);
            Step::Moved(self.cursor)
        } else {
            info!("Workout finished");
            Step::Finished
        }
    }

    /// Step back; returns false at the first exercise
    pub fn previous(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            debug!("Previous exercise: {}", self.cursor);
            true
        } else {
            false
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Position counter shown on the card, e.g. `2/5`
    pub fn progress(&self) -> String {
        if self.rows.is_empty() {
            return "0/0".to_string();
        }
        format!("{}/{}", self.cursor + 1, self.rows.len())
    }

    /// Table row of the current exercise
    pub fn current(&self) -> Option<usize> {
        self.rows.get(self.cursor).copied()
    }

    pub fn peek_previous(&self) -> Option<usize> {
        self.cursor.checked_sub(1).and_then(|i| self.rows.get(i).copied())
    }

    pub fn peek_next(&self) -> Option<usize> {
        self.rows.get(self.cursor + 1).copied()
    }

    /// Card for the exercise at `position` in the session
    pub fn card(&self, table: &ExerciseTable, position: usize) -> Option<ExerciseCard> {
        let row = *self.rows.get(position)?;
        Some(exercise_card(table, row))
    }
}

/// Card for a table row; rows missing from the table get no muscles
pub fn exercise_card(table: &ExerciseTable, row: usize) -> ExerciseCard {
    let coefficients = table.row(row).unwrap_or_default();
    ExerciseCard {
        name: table.name_or_placeholder(row),
        muscles: classify(coefficients, table.headers()),
        focus: strongest_column(coefficients)
            .and_then(|i| table.muscle_columns().get(i))
            .cloned(),
        icon: icon_index(coefficients),
    }
}

/// Build the session order for a selection matrix.
///
/// Non-zero rows are sent to the resolver to be spaced out. If that call
/// fails the rows are used in table order. Only cancellation is an error.
pub async fn arrange(
    client: &ResolverClient,
    matrix: &Matrix,
    token: &CancellationToken,
) -> Result<WorkoutSession, ApiError> {
    let rows = matrix.nonzero_rows();
    let filtered = matrix.select_rows(&rows);

    match cancellable(token, client.space_out(&filtered, &rows)).await {
        Ok(response) if !response.rows.is_empty() || rows.is_empty() => {
            Ok(WorkoutSession::new(response.rows))
        }
        Ok(_) => {
            warn!("Spaceout returned no rows, keeping table order");
            Ok(WorkoutSession::new(rows))
        }
        Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
        Err(e) => {
            warn!("Spaceout failed, keeping table order: {}", e);
            Ok(WorkoutSession::new(rows))
        }
    }
}
