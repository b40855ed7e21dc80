use nalgebra::Vector3;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum StructureError {
    /// The atom sequence was empty; a molecule must own at least one atom.
    #[error("cannot build structure '{0}': no atoms")]
    EmptyAtoms(String),
    /// A bond referenced an atom index outside the structure.
    #[error("bond ({0}, {1}) references an atom outside the structure ({2} atoms)")]
    BondOutOfRange(usize, usize, usize),
    /// A bond connected an atom to itself.
    #[error("self-bond on atom {0}")]
    SelfBond(usize),
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single parsed atom record: element symbol plus Cartesian position in
/// Angstroms. Order in the source file is significant — the position of a
/// record in the owning vector IS its atom index.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: String,
    pub position: Vector3<f64>,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: Vector3<f64>) -> Self {
        Self {
            element: element.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
}

impl BondOrder {
    /// Number of parallel strokes the depiction draws for this order.
    pub fn strokes(self) -> usize {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// An undirected bond between two atom indices of the owning molecule.
/// Invariant: `a < b` and both index valid atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

/// A molecular structure: a named, ordered atom sequence plus inferred
/// bonds. The atom vector doubles as the single conformation, so the
/// "conformation position i belongs to atom i" invariant holds by
/// construction.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub name: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    /// Materializes a structure from parsed atom records, in sequence
    /// order. Bonds start empty; connectivity inference is a separate
    /// pass (`BondInference`).
    pub fn from_atoms(name: impl Into<String>, atoms: Vec<Atom>) -> Result<Self, StructureError> {
        let name = name.into();
        if atoms.is_empty() {
            return Err(StructureError::EmptyAtoms(name));
        }
        Ok(Self {
            name,
            atoms,
            bonds: Vec::new(),
        })
    }

    /// Attaches a bond list, validating the index invariants.
    pub fn with_bonds(mut self, bonds: Vec<Bond>) -> Result<Self, StructureError> {
        for bond in &bonds {
            if bond.a == bond.b {
                return Err(StructureError::SelfBond(bond.a));
            }
            if bond.a >= self.atoms.len() || bond.b >= self.atoms.len() {
                return Err(StructureError::BondOutOfRange(
                    bond.a,
                    bond.b,
                    self.atoms.len(),
                ));
            }
        }
        self.bonds = bonds;
        Ok(self)
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Euclidean distance between two atoms.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        (self.atoms[i].position - self.atoms[j].position).norm()
    }
}
