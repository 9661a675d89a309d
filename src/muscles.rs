//! Muscle groups and the body model's mesh object table

use serde::{Deserialize, Serialize};

/// Number of tracked muscle groups (length of every muscle vector)
pub const MUSCLE_COUNT: usize = 12;

/// Muscle groups in the column order the resolver expects
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MuscleGroup {
    Chest,
    Abs,
    Quads,
    Hamstrings,
    Calfs,
    Glutes,
    Lats,
    Traps,
    FrontDelts,
    RearDelts,
    Triceps,
    Biceps,
}

impl MuscleGroup {
    pub fn name(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Abs => "Abs",
            MuscleGroup::Quads => "Quads",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Calfs => "Calfs",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Lats => "Lats",
            MuscleGroup::Traps => "Traps",
            MuscleGroup::FrontDelts => "FrontDelts",
            MuscleGroup::RearDelts => "RearDelts",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Biceps => "Biceps",
        }
    }

    /// All muscle groups, in vector order
    pub fn all() -> &'static [MuscleGroup; MUSCLE_COUNT] {
        &[
            MuscleGroup::Chest,
            MuscleGroup::Abs,
            MuscleGroup::Quads,
            MuscleGroup::Hamstrings,
            MuscleGroup::Calfs,
            MuscleGroup::Glutes,
            MuscleGroup::Lats,
            MuscleGroup::Traps,
            MuscleGroup::FrontDelts,
            MuscleGroup::RearDelts,
            MuscleGroup::Triceps,
            MuscleGroup::Biceps,
        ]
    }

    /// Position of this group inside a muscle vector
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<MuscleGroup> {
        Self::all().get(index).copied()
    }
}

/// What a pick on the body model landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshObject {
    /// The whole figure; never counted as a selection
    Figure,
    Muscle(MuscleGroup),
}

/// Mesh object ids exported with the body model
const MESH_OBJECTS: &[(&str, MeshObject)] = &[
    ("male_1", MeshObject::Figure),
    ("male_2", MeshObject::Muscle(MuscleGroup::Chest)),
    ("male_3", MeshObject::Muscle(MuscleGroup::Abs)),
    ("male_4", MeshObject::Muscle(MuscleGroup::Quads)),
    ("male_5", MeshObject::Muscle(MuscleGroup::Hamstrings)),
    ("male_6", MeshObject::Muscle(MuscleGroup::Calfs)),
    ("male_7", MeshObject::Muscle(MuscleGroup::Glutes)),
    ("male_8", MeshObject::Muscle(MuscleGroup::Lats)),
    ("male_9", MeshObject::Muscle(MuscleGroup::Traps)),
    ("male_10", MeshObject::Muscle(MuscleGroup::FrontDelts)),
    ("male_11", MeshObject::Muscle(MuscleGroup::RearDelts)),
    ("male_12", MeshObject::Muscle(MuscleGroup::Triceps)),
    ("male_13", MeshObject::Muscle(MuscleGroup::Biceps)),
];

/// Resolve a mesh object id to what it represents
pub fn resolve_object(object_id: &str) -> Option<MeshObject> {
    MESH_OBJECTS
        .iter()
        .find(|(id, _)| *id == object_id)
        .map(|(_, object)| *object)
}
