use crate::chemistry::elements::covalent_radius;
use crate::core::structure::Molecule;
use nalgebra::Vector3;

// ============================================================================
// REFINEMENT OUTCOME
// ============================================================================

/// Result of a best-effort relaxation. Never an error: the refiner's
/// contract is that failures stay inside its boundary and the caller
/// always gets a usable structure back.
#[derive(Debug, Clone, PartialEq)]
pub enum RefinementOutcome {
    Converged { iterations: usize, energy_drop: f64 },
    Unconverged { iterations: usize },
    /// Refinement was not attempted (or was abandoned); the input
    /// geometry was returned unchanged.
    Skipped(String),
}

impl RefinementOutcome {
    pub fn is_warning(&self) -> bool {
        !matches!(self, RefinementOutcome::Converged { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            RefinementOutcome::Converged {
                iterations,
                energy_drop,
            } => format!("converged in {} steps (ΔE {:.4})", iterations, energy_drop),
            RefinementOutcome::Unconverged { iterations } => {
                format!("did not converge within {} steps; using last geometry", iterations)
            }
            RefinementOutcome::Skipped(reason) => {
                format!("skipped ({}); using original coordinates", reason)
            }
        }
    }
}

// ============================================================================
// GEOMETRY REFINER
// ============================================================================

/// Steepest-descent relaxation against a minimal generic force field:
/// harmonic stretches over the inferred bonds (equilibrium length = sum of
/// covalent radii) plus a short-range repulsion between nonbonded pairs.
///
/// Input geometries are heterogeneous and some never satisfy force-field
/// preconditions, so every failure path downgrades to a warning and hands
/// the original structure back untouched.
pub struct GeometryRefiner {
    max_iterations: usize,
    step: f64,
    gradient_tolerance: f64,
    stretch_k: f64,
    repulsion_k: f64,
}

impl Default for GeometryRefiner {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            step: 0.02,
            gradient_tolerance: 1e-3,
            stretch_k: 1.0,
            repulsion_k: 0.5,
        }
    }
}

impl GeometryRefiner {
    /// Relaxes the conformation toward a local minimum. The returned
    /// molecule keeps the input's name and bonds; only positions move.
    pub fn relax(&self, mol: &Molecule) -> (Molecule, RefinementOutcome) {
        if mol.bonds.is_empty() {
            // Every force-field term is defined over bonded topology.
            return (
                mol.clone(),
                RefinementOutcome::Skipped("no bonded topology".to_string()),
            );
        }

        let n = mol.num_atoms();
        let mut positions: Vec<Vector3<f64>> = mol.atoms.iter().map(|a| a.position).collect();
        let radii: Vec<f64> = mol
            .atoms
            .iter()
            .map(|a| covalent_radius(&a.element))
            .collect();

        let initial_energy = self.energy(mol, &positions, &radii);
        if !initial_energy.is_finite() {
            return (
                mol.clone(),
                RefinementOutcome::Skipped("non-finite initial energy".to_string()),
            );
        }

        let mut step = self.step;
        let mut energy = initial_energy;
        let tolerance = self.gradient_tolerance * n as f64;

        for iteration in 0..self.max_iterations {
            let gradient = self.gradient(mol, &positions, &radii);
            let grad_norm: f64 = gradient.iter().map(|g| g.norm_squared()).sum::<f64>().sqrt();

            if !grad_norm.is_finite() {
                return (
                    mol.clone(),
                    RefinementOutcome::Skipped("non-finite gradient".to_string()),
                );
            }
            if grad_norm < tolerance {
                let refined = rebuild(mol, positions);
                return (
                    refined,
                    RefinementOutcome::Converged {
                        iterations: iteration,
                        energy_drop: initial_energy - energy,
                    },
                );
            }

            // Trial step with simple backtracking on energy increase.
            let trial: Vec<Vector3<f64>> = positions
                .iter()
                .zip(&gradient)
                .map(|(p, g)| p - g * step)
                .collect();
            let trial_energy = self.energy(mol, &trial, &radii);

            if trial_energy.is_finite() && trial_energy <= energy {
                positions = trial;
                energy = trial_energy;
            } else {
                step *= 0.5;
                if step < 1e-8 {
                    break;
                }
            }
        }

        let refined = rebuild(mol, positions);
        (
            refined,
            RefinementOutcome::Unconverged {
                iterations: self.max_iterations,
            },
        )
    }

    fn energy(&self, mol: &Molecule, positions: &[Vector3<f64>], radii: &[f64]) -> f64 {
        let mut total = 0.0;

        for bond in &mol.bonds {
            let r0 = radii[bond.a] + radii[bond.b];
            let d = (positions[bond.a] - positions[bond.b]).norm();
            total += self.stretch_k * (d - r0).powi(2);
        }

        for (i, j) in nonbonded_pairs(mol) {
            let r_min = 0.9 * (radii[i] + radii[j]);
            let d = (positions[i] - positions[j]).norm();
            if d < r_min {
                total += self.repulsion_k * (r_min - d).powi(2);
            }
        }
        total
    }

    fn gradient(
        &self,
        mol: &Molecule,
        positions: &[Vector3<f64>],
        radii: &[f64],
    ) -> Vec<Vector3<f64>> {
        let mut grad = vec![Vector3::zeros(); positions.len()];

        for bond in &mol.bonds {
            let r0 = radii[bond.a] + radii[bond.b];
            let delta = positions[bond.a] - positions[bond.b];
            let d = delta.norm();
            if d < 1e-9 {
                continue;
            }
            let g = delta * (2.0 * self.stretch_k * (d - r0) / d);
            grad[bond.a] += g;
            grad[bond.b] -= g;
        }

        for (i, j) in nonbonded_pairs(mol) {
            let r_min = 0.9 * (radii[i] + radii[j]);
            let delta = positions[i] - positions[j];
            let d = delta.norm();
            if d < 1e-9 || d >= r_min {
                continue;
            }
            let g = delta * (-2.0 * self.repulsion_k * (r_min - d) / d);
            grad[i] += g;
            grad[j] -= g;
        }
        grad
    }
}

/// All (i, j) pairs, i < j, not connected by a bond.
fn nonbonded_pairs(mol: &Molecule) -> Vec<(usize, usize)> {
    let n = mol.num_atoms();
    let mut bonded = std::collections::HashSet::new();
    for bond in &mol.bonds {
        bonded.insert((bond.a, bond.b));
    }

    let mut pairs = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if !bonded.contains(&(i, j)) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

fn rebuild(mol: &Molecule, positions: Vec<Vector3<f64>>) -> Molecule {
    let mut refined = mol.clone();
    for (atom, pos) in refined.atoms.iter_mut().zip(positions) {
        atom.position = pos;
    }
    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::connectivity::BondInference;
    use crate::core::structure::{Atom, Molecule};
    use nalgebra::Vector3;

    fn stretched_diatomic() -> Molecule {
        // H-H at 0.95 A; equilibrium is 0.74 A (2 x 0.37).
        let mol = Molecule::from_atoms(
            "h2",
            vec![
                Atom::new("H", Vector3::new(0.0, 0.0, 0.0)),
                Atom::new("H", Vector3::new(0.95, 0.0, 0.0)),
            ],
        )
        .unwrap();
        let bonds = BondInference::default().infer(&mol);
        mol.with_bonds(bonds).unwrap()
    }

    #[test]
    fn bondless_structures_are_skipped_unchanged() {
        let mol = Molecule::from_atoms(
            "cloud",
            vec![
                Atom::new("He", Vector3::new(0.0, 0.0, 0.0)),
                Atom::new("He", Vector3::new(9.0, 0.0, 0.0)),
            ],
        )
        .unwrap();
        let (out, outcome) = GeometryRefiner::default().relax(&mol);
        assert!(matches!(outcome, RefinementOutcome::Skipped(_)));
        assert!(outcome.is_warning());
        for (a, b) in mol.atoms.iter().zip(&out.atoms) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn relaxation_moves_bond_toward_equilibrium() {
        let mol = stretched_diatomic();
        assert_eq!(mol.bonds.len(), 1, "fixture must infer its bond");
        let before = mol.distance(0, 1);
        let (out, outcome) = GeometryRefiner::default().relax(&mol);
        let after = out.distance(0, 1);

        assert!(!matches!(outcome, RefinementOutcome::Skipped(_)));
        let r0 = 0.74;
        assert!(
            (after - r0).abs() < (before - r0).abs(),
            "distance {after} not closer to {r0} than {before}"
        );
    }

    #[test]
    fn refinement_preserves_atom_count_and_bonds() {
        let mol = stretched_diatomic();
        let (out, _) = GeometryRefiner::default().relax(&mol);
        assert_eq!(out.num_atoms(), mol.num_atoms());
        assert_eq!(out.bonds, mol.bonds);
        assert_eq!(out.name, mol.name);
    }

    #[test]
    fn coincident_atoms_do_not_panic() {
        let mol = Molecule::from_atoms(
            "degenerate",
            vec![
                Atom::new("C", Vector3::new(0.0, 0.0, 0.0)),
                Atom::new("C", Vector3::new(0.0, 0.0, 0.0)),
            ],
        )
        .unwrap();
        let bonds = BondInference::default().infer(&mol);
        let mol = mol.with_bonds(bonds).unwrap();
        // Must return a structure regardless of the degenerate input.
        let (_out, _outcome) = GeometryRefiner::default().relax(&mol);
    }
}
