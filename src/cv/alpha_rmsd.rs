//! Alpha-helix character of a backbone segment via pairwise-distance RMSD
//!
//! Following the treatment in Pietrucci and Laio, "A Collective Variable for
//! the Efficient Exploration of Protein Beta-Sheet Structures: Application to
//! SH3 and GB1", JCTC, 2009, 5(9): 2197-2201: blocks of six consecutive
//! residues are scored for RMSD from a reference "ideal" alpha helix.

use crate::cv::{CollectiveVariable, CvError};
use crate::io;
use crate::snapshot::Snapshot;
use crate::switching::RationalSwitch;
use log::info;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Residues per scoring window
const WINDOW_RESIDUES: usize = 6;

/// Backbone atoms resolved per residue (N, CA, CB, C, O)
const ATOMS_PER_RESIDUE: usize = 5;

/// Backbone atoms per scoring window
const WINDOW_ATOMS: usize = WINDOW_RESIDUES * ATOMS_PER_RESIDUE;

/// Pair-count normalization of the accumulated squared distance differences:
/// twice the reciprocal of the 30-choose-2 pair count
const PAIR_NORM: f64 = 2.0 / ((WINDOW_ATOMS * (WINDOW_ATOMS - 1)) as f64);

/// Backbone coordinates of one ideal alpha-helix window, in angstroms.
///
/// Six residues, five backbone atoms each, ordered N/CA/CB/C/O within each
/// residue. PDB-derived coordinates are always in angstroms, so live windows
/// compare against this table without unit conversion.
pub const IDEAL_ALPHA: [[f64; 3]; WINDOW_ATOMS] = [
    [0.733, 0.519, 5.298],   // N
    [1.763, 0.810, 4.301],   // CA
    [3.166, 0.543, 4.881],   // CB
    [1.527, -0.045, 3.053],  // C
    [1.646, 0.436, 1.928],   // O
    [1.180, -1.312, 3.254],  // N
    [0.924, -2.203, 2.126],  // CA
    [0.650, -3.626, 2.626],  // CB
    [-0.239, -1.711, 1.261], // C
    [-0.190, -1.815, 0.032], // O
    [-1.280, -1.172, 1.891], // N
    [-2.416, -0.661, 1.127], // CA
    [-3.548, -0.217, 2.056], // CB
    [-1.964, 0.529, 0.276],  // C
    [-2.364, 0.659, -0.880], // O
    [-1.130, 1.391, 0.856],  // N
    [-0.620, 2.565, 0.148],  // CA
    [0.228, 3.439, 1.077],   // CB
    [0.231, 2.129, -1.032],  // C
    [0.179, 2.733, -2.099],  // O
    [1.028, 1.084, -0.833],  // N
    [1.872, 0.593, -1.919],  // CA
    [2.850, -0.462, -1.397], // CB
    [1.020, 0.020, -3.049],  // C
    [1.317, 0.227, -4.224],  // O
    [-0.051, -0.684, -2.696], // N
    [-0.927, -1.261, -3.713], // CA
    [-1.933, -2.219, -3.074], // CB
    [-1.663, -0.171, -4.475], // C
    [-1.916, -0.296, -5.673], // O
];

/// Checkpoint record emitted and consumed on restart
#[derive(Debug, Serialize, Deserialize)]
struct AlphaRmsdRecord {
    #[serde(rename = "type")]
    kind: String,
    reference: String,
    residue_ids: Vec<i32>,
}

/// Collective variable measuring alpha-helix secondary structure.
///
/// A 6-residue window slides along the configured residue range; each
/// window's 30 backbone atoms are scored against [`IDEAL_ALPHA`] by
/// pairwise-distance RMSD, passed through a [`RationalSwitch`], and the
/// per-window contributions are summed. The total is not normalized by the
/// window count, so longer helical ranges yield larger values.
#[derive(Debug, Clone)]
pub struct AlphaRmsdCV {
    /// Inclusive residue sequence covered by the calculation
    res_ids: Vec<i32>,

    /// Global backbone atom indices, 5 per residue, resolved at initialization
    atom_ids: Vec<usize>,

    /// PDB reference file used for backbone atom resolution
    ref_pdb: PathBuf,

    /// Reference window coordinates, loaded at initialization
    ref_alpha: Vec<Vector3<f64>>,

    /// Switching function applied to each window's RMSD
    switch: RationalSwitch,

    /// Value from the most recent evaluation
    value: f64,

    /// Per-atom gradient from the most recent evaluation
    gradient: Vec<Vector3<f64>>,
}

impl AlphaRmsdCV {
    /// Create a CV over an inclusive residue range.
    ///
    /// `res_range` must hold exactly two residue sequence numbers, lower
    /// first, spanning at least 6 residues; `ref_pdb` names the reference
    /// structure used to resolve backbone atom indices at initialization.
    pub fn new<P: Into<PathBuf>>(res_range: &[i32], ref_pdb: P) -> Result<Self, CvError> {
        if res_range.len() != 2 {
            return Err(CvError::RangeSize(res_range.len()));
        }

        let (first, last) = (res_range[0], res_range[1]);
        if first >= last {
            return Err(CvError::InvertedRange { first, last });
        }
        if last - first < 6 {
            return Err(CvError::RangeTooShort { first, last });
        }

        info!(
            "Calculating alpha helix character from residue {} to {}",
            first, last
        );

        Ok(Self {
            res_ids: (first..=last).collect(),
            atom_ids: Vec::new(),
            ref_pdb: ref_pdb.into(),
            ref_alpha: Vec::new(),
            switch: RationalSwitch::default(),
            value: 0.0,
            gradient: Vec::new(),
        })
    }

    /// Reconstruct a CV from a checkpoint record produced by
    /// [`serialize`](CollectiveVariable::serialize).
    ///
    /// Only the reference path and the residue range survive a checkpoint;
    /// atom indices and the reference geometry are re-resolved on the next
    /// initialization.
    pub fn from_record(record: &serde_json::Value) -> Result<Self, CvError> {
        let record: AlphaRmsdRecord = serde_json::from_value(record.clone())
            .map_err(|e| CvError::Record(e.to_string()))?;

        if record.kind != "AlphaRMSD" {
            return Err(CvError::Record(format!(
                "Expected type tag AlphaRMSD, got {}",
                record.kind
            )));
        }
        let (first, last) = match (record.residue_ids.first(), record.residue_ids.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Err(CvError::Record("Empty residue_ids list".to_string())),
        };

        Self::new(&[first, last], record.reference)
    }

    /// Residue sequence covered by the calculation
    pub fn res_ids(&self) -> &[i32] {
        &self.res_ids
    }

    /// Resolved global backbone atom indices (empty before initialization)
    pub fn atom_ids(&self) -> &[usize] {
        &self.atom_ids
    }

    /// Reference structure path
    pub fn reference_path(&self) -> &Path {
        &self.ref_pdb
    }

    /// Number of overlapping 6-residue windows scored per evaluation
    pub fn num_windows(&self) -> usize {
        self.res_ids.len() - (WINDOW_RESIDUES - 1)
    }
}

impl CollectiveVariable for AlphaRmsdCV {
    /// Resolve the backbone atom indices from the reference PDB and load the
    /// ideal alpha-helix window. Must run exactly once, before any evaluation.
    fn initialize(&mut self, _snapshot: &dyn Snapshot) -> Result<(), CvError> {
        self.atom_ids = io::pdb_backbone(&self.ref_pdb, &self.res_ids)?;
        self.ref_alpha = IDEAL_ALPHA
            .iter()
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();
        Ok(())
    }

    fn evaluate(&mut self, snapshot: &dyn Snapshot) -> Result<(), CvError> {
        if self.atom_ids.is_empty() {
            return Err(CvError::NotInitialized);
        }

        let positions = snapshot.positions();
        let num_atoms = snapshot.num_atoms();
        if let Some(&atom) = self.atom_ids.iter().find(|&&a| a >= num_atoms) {
            return Err(CvError::AtomIndexOutOfRange { atom, num_atoms });
        }

        // Image flags are part of the snapshot contract but periodic
        // correction of distances is not applied; coordinates are used raw.
        let _ = snapshot.image_flags();

        self.value = 0.0;
        self.gradient.clear();
        self.gradient.resize(num_atoms, Vector3::zeros());

        let mut window = [Vector3::zeros(); WINDOW_ATOMS];
        let mut deriv = [[0.0f64; WINDOW_ATOMS]; WINDOW_ATOMS];

        // One window per residue offset; window w covers residues w..w+5
        for w in 0..self.num_windows() {
            for (j, slot) in window.iter_mut().enumerate() {
                *slot = positions[self.atom_ids[ATOMS_PER_RESIDUE * w + j]];
            }

            let mut sum_sq = 0.0;
            for j in 0..WINDOW_ATOMS {
                for k in (j + 1)..WINDOW_ATOMS {
                    let d = (window[j] - window[k]).norm();
                    if d == 0.0 {
                        return Err(CvError::CoincidentAtoms {
                            window: w,
                            atom_j: self.atom_ids[ATOMS_PER_RESIDUE * w + j],
                            atom_k: self.atom_ids[ATOMS_PER_RESIDUE * w + k],
                        });
                    }

                    let d_ref = (self.ref_alpha[j] - self.ref_alpha[k]).norm();
                    let diff = d - d_ref;
                    sum_sq += diff * diff;
                    deriv[j][k] = diff / d;
                }
            }

            let r = sum_sq * PAIR_NORM;
            self.value += self.switch.value(r);

            // Chain rule: d(value)/d(d_jk) = switch'(r) * 2 * PAIR_NORM * diff,
            // and the recorded diff/d factor is applied uniformly to all three
            // components of each atom's gradient entry (no projection along
            // the pair displacement).
            let scale = self.switch.derivative(r) * 2.0 * PAIR_NORM;
            for j in 0..WINDOW_ATOMS {
                for k in (j + 1)..WINDOW_ATOMS {
                    let g = Vector3::repeat(scale * deriv[j][k]);
                    self.gradient[self.atom_ids[ATOMS_PER_RESIDUE * w + j]] += g;
                    self.gradient[self.atom_ids[ATOMS_PER_RESIDUE * w + k]] -= g;
                }
            }
        }

        Ok(())
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn gradient(&self) -> &[Vector3<f64>] {
        &self.gradient
    }

    fn serialize(&self) -> serde_json::Value {
        json!({
            "type": "AlphaRMSD",
            "reference": self.ref_pdb.to_string_lossy(),
            "residue_ids": self.res_ids,
        })
    }
}
