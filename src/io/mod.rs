//! Input/output functionality: PDB parsing and backbone atom resolution

use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Backbone atom names resolved for each residue, in resolution order
pub const BACKBONE_ATOM_NAMES: [&str; 5] = ["N", "CA", "CB", "C", "O"];

/// Errors that can occur during file I/O operations
#[derive(Error, Debug)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Residue {res_seq} not found in reference structure")]
    MissingResidue { res_seq: i32 },

    #[error("Backbone atom {name} not found for residue {res_seq}")]
    MissingBackboneAtom { res_seq: i32, name: &'static str },
}

/// A single ATOM/HETATM record from a PDB file
#[derive(Debug, Clone)]
pub struct PdbAtom {
    /// Atom serial number from the file
    pub serial: u32,

    /// Atom name (e.g., "CA", "N", "O")
    pub name: String,

    /// Residue name this atom belongs to
    pub residue_name: String,

    /// Chain identifier
    pub chain_id: char,

    /// Residue sequence number
    pub res_seq: i32,

    /// 3D coordinates (in Angstroms)
    pub coordinates: Vector3<f64>,
}

fn field(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_pdb_atom(line: &str, line_number: usize) -> Result<PdbAtom, IoError> {
    let serial: u32 = field(line, 6, 11).parse().map_err(|_| IoError::Parse {
        line: line_number,
        message: format!("Invalid atom serial: {}", field(line, 6, 11)),
    })?;

    let name = field(line, 12, 16).to_string();
    if name.is_empty() {
        return Err(IoError::Parse {
            line: line_number,
            message: "Missing atom name".to_string(),
        });
    }

    let residue_name = field(line, 17, 20).to_string();
    let chain_id = line.chars().nth(21).unwrap_or(' ');

    let res_seq: i32 = field(line, 22, 26).parse().map_err(|_| IoError::Parse {
        line: line_number,
        message: format!("Invalid residue sequence number: {}", field(line, 22, 26)),
    })?;

    let mut coords = [0.0; 3];
    for (i, range) in [(30, 38), (38, 46), (46, 54)].iter().enumerate() {
        coords[i] = field(line, range.0, range.1)
            .parse()
            .map_err(|_| IoError::Parse {
                line: line_number,
                message: format!("Invalid coordinate: {}", field(line, range.0, range.1)),
            })?;
    }

    Ok(PdbAtom {
        serial,
        name,
        residue_name,
        chain_id,
        res_seq,
        coordinates: Vector3::new(coords[0], coords[1], coords[2]),
    })
}

/// Parse all ATOM/HETATM records of a PDB file, in file order
pub fn parse_pdb<P: AsRef<Path>>(path: P) -> Result<Vec<PdbAtom>, IoError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut atoms = Vec::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with("ATOM") || line.starts_with("HETATM") {
            atoms.push(parse_pdb_atom(&line, line_number + 1)?);
        } else if line.starts_with("ENDMDL") {
            // Only use the first model of multi-model files
            break;
        }
    }

    Ok(atoms)
}

/// Resolve the backbone atoms of a residue range in a reference PDB file.
///
/// For each residue sequence number in `res_seqs` (in the given order) this
/// returns the global indices of its five backbone atoms, ordered
/// N, CA, CB, C, O. Global indices are zero-based positions in the file's
/// ATOM record order, matching how the host snapshot indexes positions.
///
/// Fails if a residue is absent or lacks one of the five backbone atoms
/// (e.g., glycine has no CB and cannot take part in the calculation).
pub fn pdb_backbone<P: AsRef<Path>>(path: P, res_seqs: &[i32]) -> Result<Vec<usize>, IoError> {
    let atoms = parse_pdb(path)?;

    let mut indices = Vec::with_capacity(res_seqs.len() * BACKBONE_ATOM_NAMES.len());
    for &res_seq in res_seqs {
        if !atoms.iter().any(|a| a.res_seq == res_seq) {
            return Err(IoError::MissingResidue { res_seq });
        }

        for name in BACKBONE_ATOM_NAMES {
            let index = atoms
                .iter()
                .position(|a| a.res_seq == res_seq && a.name == name)
                .ok_or(IoError::MissingBackboneAtom { res_seq, name })?;
            indices.push(index);
        }
    }

    Ok(indices)
}

/// Read the coordinates of every ATOM record of a PDB file, in file order.
///
/// Used to build a [`SystemSnapshot`](crate::snapshot::SystemSnapshot) when
/// scoring a structure outside a running simulation.
pub fn read_pdb_positions<P: AsRef<Path>>(path: P) -> Result<Vec<Vector3<f64>>, IoError> {
    let atoms = parse_pdb(path)?;
    Ok(atoms.into_iter().map(|a| a.coordinates).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_pdb(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write temp PDB");
        file
    }

    const TWO_RESIDUES: &str = "\
ATOM      1  N   ALA A   7       0.733   0.519   5.298  1.00  0.00           N
ATOM      2  CA  ALA A   7       1.763   0.810   4.301  1.00  0.00           C
ATOM      3  CB  ALA A   7       3.166   0.543   4.881  1.00  0.00           C
ATOM      4  C   ALA A   7       1.527  -0.045   3.053  1.00  0.00           C
ATOM      5  O   ALA A   7       1.646   0.436   1.928  1.00  0.00           O
ATOM      6  N   ALA A   8       1.180  -1.312   3.254  1.00  0.00           N
ATOM      7  CA  ALA A   8       0.924  -2.203   2.126  1.00  0.00           C
ATOM      8  CB  ALA A   8       0.650  -3.626   2.626  1.00  0.00           C
ATOM      9  C   ALA A   8      -0.239  -1.711   1.261  1.00  0.00           C
ATOM     10  O   ALA A   8      -0.190  -1.815   0.032  1.00  0.00           O
";

    #[test]
    fn test_parse_pdb_atoms() {
        let file = write_pdb(TWO_RESIDUES);
        let atoms = parse_pdb(file.path()).expect("Failed to parse PDB");

        assert_eq!(atoms.len(), 10);
        assert_eq!(atoms[0].name, "N");
        assert_eq!(atoms[0].res_seq, 7);
        assert_eq!(atoms[0].residue_name, "ALA");
        assert_eq!(atoms[0].chain_id, 'A');
        assert!((atoms[0].coordinates.x - 0.733).abs() < 1e-12);
        assert_eq!(atoms[9].name, "O");
        assert_eq!(atoms[9].res_seq, 8);
    }

    #[test]
    fn test_backbone_resolution_order() {
        let file = write_pdb(TWO_RESIDUES);
        let indices = pdb_backbone(file.path(), &[7, 8]).expect("Failed to resolve backbone");

        // 5 atoms per residue, residue order, N/CA/CB/C/O order
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_backbone_resolution_missing_residue() {
        let file = write_pdb(TWO_RESIDUES);
        let result = pdb_backbone(file.path(), &[7, 9]);

        assert!(matches!(
            result,
            Err(IoError::MissingResidue { res_seq: 9 })
        ));
    }

    #[test]
    fn test_backbone_resolution_missing_atom() {
        // Residue 8 without its CB (glycine-like)
        let truncated: String = TWO_RESIDUES
            .lines()
            .filter(|l| !(l.contains("CB  ALA A   8")))
            .map(|l| format!("{}\n", l))
            .collect();
        let file = write_pdb(&truncated);
        let result = pdb_backbone(file.path(), &[7, 8]);

        assert!(matches!(
            result,
            Err(IoError::MissingBackboneAtom {
                res_seq: 8,
                name: "CB"
            })
        ));
    }

    #[test]
    fn test_read_pdb_positions() {
        let file = write_pdb(TWO_RESIDUES);
        let positions = read_pdb_positions(file.path()).expect("Failed to read positions");

        assert_eq!(positions.len(), 10);
        assert!((positions[1] - Vector3::new(1.763, 0.810, 4.301)).norm() < 1e-12);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let file = write_pdb("ATOM      x  N   ALA A   7       0.733   0.519   5.298\n");
        let result = parse_pdb(file.path());

        assert!(matches!(result, Err(IoError::Parse { line: 1, .. })));
    }
}
