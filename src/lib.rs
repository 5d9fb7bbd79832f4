//! Helix-CV: a differentiable alpha-helix collective variable for enhanced sampling
//!
//! This library computes the "alpha-helix character" of a protein backbone
//! segment as a smooth scalar function of atomic positions, together with its
//! analytic gradient, for use as a collective variable (CV) in force-biased
//! sampling methods (metadynamics, adaptive biasing force, ...).

pub mod cv;
pub mod io;
pub mod snapshot;
pub mod switching;

// Re-export commonly used types and functions
pub use cv::alpha_rmsd::AlphaRmsdCV;
pub use cv::{CollectiveVariable, CvError};
pub use snapshot::{Snapshot, SystemSnapshot};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
