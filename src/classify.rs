//! Exercise classification - primary/secondary muscles from a coefficient row

/// Coefficients at or above this mark a primary muscle
pub const PRIMARY_THRESHOLD: f64 = 0.4;

/// Muscles an exercise works, in table column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MuscleSplit {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
}

/// Split an exercise's coefficients into primary (>= 0.4) and
/// secondary (> 0) muscles. Zero coefficients are excluded.
///
/// `headers` is the full table header: column 0 names the exercise column,
/// so coefficient `i` belongs to `headers[i + 1]`.
pub fn classify(row: &[f64], headers: &[String]) -> MuscleSplit {
    let mut split = MuscleSplit::default();

    for (i, &value) in row.iter().enumerate() {
        let Some(name) = headers.get(i + 1) else {
            break;
        };
        if value >= PRIMARY_THRESHOLD {
            split.primary.push(name.clone());
        } else if value > 0.0 {
            split.secondary.push(name.clone());
        }
    }

    split
}

/// Column of the highest coefficient; the first maximum wins
pub fn strongest_column(row: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in row.iter().enumerate() {
        if best.is_none_or(|(_, max)| value > max) {
            best = Some((i, value));
        }
    }
    best.map(|(i, _)| i)
}

/// Icon slot for an exercise: its strongest column, except that
/// column 5 shares the icon of column 3. Not a muscle index.
pub fn icon_index(row: &[f64]) -> Option<usize> {
    match strongest_column(row)? {
        5 => Some(3),
        i => Some(i),
    }
}
