//! Read-only view of the simulation state shared with collective variables

use nalgebra::Vector3;

/// Read-only interface a host simulation engine exposes to collective
/// variables for one frame.
///
/// Positions are indexed by global atom index and expressed in angstroms.
/// Image flags record how many times each atom has been wrapped across a
/// periodic boundary; they are part of the contract but current CVs compute
/// distances from raw coordinates.
pub trait Snapshot {
    /// Per-atom positions, indexed by global atom index
    fn positions(&self) -> &[Vector3<f64>];

    /// Per-atom periodic image flags, indexed by global atom index
    fn image_flags(&self) -> &[Vector3<i32>];

    /// Total number of atoms in the simulated system
    fn num_atoms(&self) -> usize;
}

/// Owned snapshot of a simulation frame
///
/// Hosts that keep positions in their own layout can implement [`Snapshot`]
/// directly; this concrete type covers standalone use and tests.
#[derive(Debug, Clone)]
pub struct SystemSnapshot {
    positions: Vec<Vector3<f64>>,
    image_flags: Vec<Vector3<i32>>,
}

impl SystemSnapshot {
    /// Create a snapshot from positions and per-atom image flags
    pub fn new(positions: Vec<Vector3<f64>>, image_flags: Vec<Vector3<i32>>) -> Self {
        Self {
            positions,
            image_flags,
        }
    }

    /// Create a snapshot with all image flags zeroed (unwrapped coordinates)
    pub fn from_positions(positions: Vec<Vector3<f64>>) -> Self {
        let image_flags = vec![Vector3::zeros(); positions.len()];
        Self {
            positions,
            image_flags,
        }
    }
}

impl Snapshot for SystemSnapshot {
    fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    fn image_flags(&self) -> &[Vector3<i32>] {
        &self.image_flags
    }

    fn num_atoms(&self) -> usize {
        self.positions.len()
    }
}
