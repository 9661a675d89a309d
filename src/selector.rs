//! Muscle selection - per-muscle click counters and the derived muscle vector

use serde::Serialize;
use tracing::{debug, warn};

use crate::muscles::{resolve_object, MeshObject, MuscleGroup, MUSCLE_COUNT};

/// Highest intensity a muscle can be picked to before wrapping to 0
pub const MAX_INTENSITY: u32 = 5;

/// Click counts wrap after this many states (0..=5)
const CLICK_STATES: u32 = MAX_INTENSITY + 1;

/// Intensity per muscle group, in `MuscleGroup::all()` order.
///
/// Only built from clicks or `parse_lenient`, so every entry is 0..=5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MuscleVector(pub [u32; MUSCLE_COUNT]);

impl MuscleVector {
    pub fn values(&self) -> &[u32; MUSCLE_COUNT] {
        &self.0
    }

    pub fn get(&self, group: MuscleGroup) -> u32 {
        self.0[group.index()]
    }

    /// True if no muscle group was picked
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|v| *v == 0)
    }

    /// Parse a vector passed around as text, e.g. `"[0,5,0,...]"`.
    ///
    /// Never fails: brackets and whitespace are stripped, invalid or negative
    /// entries become 0, values above 5 are clamped and missing entries are 0.
    pub fn parse_lenient(text: &str) -> MuscleVector {
        let cleaned: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '[' && *c != ']')
            .collect();

        let mut values = [0u32; MUSCLE_COUNT];
        if cleaned.is_empty() {
            return MuscleVector(values);
        }

        let fields: Vec<&str> = cleaned.split(',').collect();
        if fields.len() > MUSCLE_COUNT {
            warn!(
                "Muscle vector has {} entries, ignoring everything after {}",
                fields.len(),
                MUSCLE_COUNT
            );
        }

        for (slot, field) in values.iter_mut().zip(fields) {
            *slot = match field.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => {
                    (v.round() as u32).min(MAX_INTENSITY)
                }
                _ => {
                    warn!("Invalid muscle value {:?}, replacing with 0", field);
                    0
                }
            };
        }

        MuscleVector(values)
    }
}

/// Click state of one selection session
#[derive(Debug, Clone, Default)]
pub struct MuscleSelector {
    clicks: [u32; MUSCLE_COUNT],
}

impl MuscleSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a pick on a mesh object.
    ///
    /// Returns the updated vector, or `None` when the pick hit the figure
    /// itself or an unknown object.
    pub fn pick(&mut self, object_id: &str) -> Option<MuscleVector> {
        match resolve_object(object_id) {
            Some(MeshObject::Muscle(group)) => Some(self.pick_group(group)),
            Some(MeshObject::Figure) => None,
            None => {
                debug!("Pick on unmapped object {:?} ignored", object_id);
                None
            }
        }
    }

    /// Advance a muscle group one intensity step (wrapping 5 -> 0)
    pub fn pick_group(&mut self, group: MuscleGroup) -> MuscleVector {
        let count = &mut self.clicks[group.index()];
        *count = (*count + 1) % CLICK_STATES;
        debug!("{} intensity -> {}", group.name(), count);
        self.vector()
    }

    pub fn clicks(&self, group: MuscleGroup) -> u32 {
        self.clicks[group.index()]
    }

    pub fn vector(&self) -> MuscleVector {
        MuscleVector(self.clicks)
    }

    pub fn reset(&mut self) {
        self.clicks = [0; MUSCLE_COUNT];
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const IDLE_COLOR: Rgb = Rgb(0xa9, 0xa9, 0xa9);
const LOW_COLOR: Rgb = Rgb(0xff, 0xcc, 0x00);
const HIGH_COLOR: Rgb = Rgb(0xff, 0x00, 0x00);

/// Colour of a muscle with the given click count: gray when idle,
/// yellow (1) through red (5) otherwise.
pub fn intensity_color(clicks: u32) -> Rgb {
    if clicks == 0 || clicks > MAX_INTENSITY {
        return IDLE_COLOR;
    }
    let t = (clicks - 1) as f32 / (MAX_INTENSITY - 1) as f32;
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgb(
        lerp(LOW_COLOR.0, HIGH_COLOR.0),
        lerp(LOW_COLOR.1, HIGH_COLOR.1),
        lerp(LOW_COLOR.2, HIGH_COLOR.2),
    )
}
