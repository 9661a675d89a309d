//! Intensity scaling - muscle intensities to per-muscle exercise counts

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::muscles::MUSCLE_COUNT;
use crate::selector::{MuscleVector, MAX_INTENSITY};

/// Exercises requested per muscle group, in `MuscleGroup::all()` order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaledVector(pub [u32; MUSCLE_COUNT]);

impl ScaledVector {
    pub fn values(&self) -> &[u32; MUSCLE_COUNT] {
        &self.0
    }
}

/// Scale each intensity to `round(v / 5 * amount)`.
///
/// Untouched groups stay 0; a selected group never drops below 1.
pub fn scale(vector: &MuscleVector, amount: u32) -> ScaledVector {
    let mut scaled = [0u32; MUSCLE_COUNT];
    for (out, &value) in scaled.iter_mut().zip(vector.values()) {
        if value == 0 {
            continue;
        }
        let raw = (value as f64 / MAX_INTENSITY as f64 * amount as f64).round() as u32;
        *out = raw.max(1);
    }
    ScaledVector(scaled)
}

/// Parse the requested number of exercises (must be at least 1)
pub fn parse_amount(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let amount: u32 = trimmed
        .parse()
        .with_context(|| format!("not a whole number: {:?}", trimmed))?;
    if amount == 0 {
        bail!("amount must be at least 1");
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(values: &[u32]) -> MuscleVector {
        let mut v = [0; MUSCLE_COUNT];
        v[..values.len()].copy_from_slice(values);
        MuscleVector(v)
    }

    #[test]
    fn test_full_intensity_gets_full_amount() {
        let scaled = scale(&vector(&[0, 5]), 3);
        assert_eq!(scaled.0, [0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_rounding_to_zero_clamps_to_one() {
        // 1/5 * 1 = 0.2 rounds to 0
        let scaled = scale(&vector(&[0, 1]), 1);
        assert_eq!(scaled.0[1], 1);
    }

    #[test]
    fn test_rounds_to_nearest() {
        let scaled = scale(&vector(&[5, 3, 1, 3]), 5);
        assert_eq!(&scaled.0[..4], &[5, 3, 1, 3]);
        let scaled = scale(&vector(&[1, 3, 4]), 10);
        assert_eq!(&scaled.0[..3], &[2, 6, 8]);
        // 1.6, 3.2, 4.0
        let scaled = scale(&vector(&[2, 4, 5]), 4);
        assert_eq!(&scaled.0[..3], &[2, 3, 4]);
        // 1.4, 4.2
        let scaled = scale(&vector(&[1, 3]), 7);
        assert_eq!(&scaled.0[..2], &[1, 4]);
    }

    #[test]
    fn test_zero_iff_unselected() {
        for amount in 1..=20 {
            for value in 0..=MAX_INTENSITY {
                let scaled = scale(&vector(&[value]), amount);
                assert_eq!(scaled.0[0] == 0, value == 0, "value {} amount {}", value, amount);
                if value > 0 {
                    assert!(scaled.0[0] >= 1);
                }
            }
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 4 ").unwrap(), 4);
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
    }
}
