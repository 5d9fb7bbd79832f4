//! Collective variables: lifecycle contract and implementations

pub mod alpha_rmsd;

use crate::io::IoError;
use crate::snapshot::Snapshot;
use nalgebra::Vector3;
use thiserror::Error;

/// Errors that can occur when constructing or evaluating a collective variable
#[derive(Error, Debug)]
pub enum CvError {
    #[error("Residue range must contain exactly 2 entries, got {0}")]
    RangeSize(usize),

    #[error("Residue range must list the lower index first: {first} >= {last}")]
    InvertedRange { first: i32, last: i32 },

    #[error("Residue range [{first}, {last}] must span at least 6 residues")]
    RangeTooShort { first: i32, last: i32 },

    #[error("Collective variable evaluated before initialization")]
    NotInitialized,

    #[error("Resolved atom index {atom} exceeds snapshot atom count {num_atoms}")]
    AtomIndexOutOfRange { atom: usize, num_atoms: usize },

    #[error(
        "Coincident atoms {atom_j} and {atom_k} in window {window}: \
         pairwise distance is zero, gradient is undefined"
    )]
    CoincidentAtoms {
        window: usize,
        atom_j: usize,
        atom_k: usize,
    },

    #[error("Backbone resolution failed: {0}")]
    Backbone(#[from] IoError),

    #[error("Malformed CV record: {0}")]
    Record(String),
}

/// Lifecycle contract of a collective variable.
///
/// A host engine calls [`initialize`](CollectiveVariable::initialize) exactly
/// once before any evaluation, [`evaluate`](CollectiveVariable::evaluate) once
/// per simulation step, and [`serialize`](CollectiveVariable::serialize) on
/// checkpoint. `evaluate` updates the internally held value and gradient,
/// which the host reads back through the accessors.
pub trait CollectiveVariable {
    /// Resolve whatever static indices the CV needs; single-shot
    fn initialize(&mut self, snapshot: &dyn Snapshot) -> Result<(), CvError>;

    /// Recompute value and gradient from the current atom positions
    fn evaluate(&mut self, snapshot: &dyn Snapshot) -> Result<(), CvError>;

    /// Value computed by the most recent evaluation
    fn value(&self) -> f64;

    /// Per-atom gradient computed by the most recent evaluation, sized to the
    /// snapshot's atom count
    fn gradient(&self) -> &[Vector3<f64>];

    /// Checkpoint record sufficient to reconstruct the CV's static
    /// configuration (not its runtime value)
    fn serialize(&self) -> serde_json::Value;
}
