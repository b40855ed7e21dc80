use crate::chemistry::elements::normalize_symbol;
use crate::core::structure::{Atom, Molecule};
use nalgebra::Vector3;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ParseError {
    /// A coordinate token on a data line failed to parse as a float.
    /// Fatal for the molecule, never for the batch.
    #[error("line {line}: cannot parse coordinate '{token}'")]
    BadCoordinate { line: usize, token: String },
    #[error("cannot read XYZ file: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// PARSING
// ============================================================================

/// Parses XYZ-format text into ordered atom records.
///
/// Convention: line 1 is the declared atom count, line 2 a free-form
/// comment; both are skipped unconditionally, malformed or not. Each
/// remaining line needs at least four whitespace tokens
/// (`symbol x y z`); shorter lines are skipped silently. The declared
/// count is deliberately NOT validated against the parsed lines —
/// truncated tails should not abort a batch.
pub fn parse_str(content: &str) -> Result<Vec<Atom>, ParseError> {
    let mut atoms = Vec::new();

    for (offset, line) in content.lines().skip(2).enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            continue;
        }

        // 1-based line number in the file, past the two header lines.
        let line_no = offset + 3;
        let x = parse_coord(parts[1], line_no)?;
        let y = parse_coord(parts[2], line_no)?;
        let z = parse_coord(parts[3], line_no)?;

        atoms.push(Atom::new(normalize_symbol(parts[0]), Vector3::new(x, y, z)));
    }

    Ok(atoms)
}

fn parse_coord(token: &str, line: usize) -> Result<f64, ParseError> {
    token.parse::<f64>().map_err(|_| ParseError::BadCoordinate {
        line,
        token: token.to_string(),
    })
}

// ============================================================================
// WRITING
// ============================================================================

/// Serializes a molecule back into XYZ text (count, comment, atom rows).
pub fn to_string(mol: &Molecule, comment: &str) -> String {
    let mut out = String::new();
    // writeln! to a String cannot fail.
    let _ = writeln!(out, "{}", mol.num_atoms());
    let _ = writeln!(out, "{}", comment.replace(['\n', '\r'], " "));
    for atom in &mol.atoms {
        let _ = writeln!(
            out,
            "{:<3} {:15.9} {:15.9} {:15.9}",
            atom.element, atom.position.x, atom.position.y, atom.position.z
        );
    }
    out
}

pub fn write_file(path: &Path, mol: &Molecule, comment: &str) -> io::Result<()> {
    fs::write(path, to_string(mol, comment))
}
