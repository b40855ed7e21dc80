use crate::chemistry::elements::covalent_radius;
use crate::core::structure::{Bond, BondOrder, Molecule};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;

// ============================================================================
// BOND INFERENCE
// ============================================================================

/// Engine for deriving bonded topology from raw geometry.
///
/// Two atoms are considered bonded when their distance is below
/// `tolerance × (r_cov(A) + r_cov(B))`. The default tolerance of 1.3
/// accommodates the stretched bonds common in unoptimized geometries.
pub struct BondInference {
    tolerance: f64,
}

impl Default for BondInference {
    fn default() -> Self {
        Self { tolerance: 1.3 }
    }
}

impl BondInference {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Infers the bond list for a molecule.
    ///
    /// # Complexity
    /// O(N^2) pairwise. Fine for ligand-sized inputs; a cell list would be
    /// needed for systems beyond a few thousand atoms.
    pub fn infer(&self, mol: &Molecule) -> Vec<Bond> {
        let n = mol.num_atoms();
        let mut bonds = Vec::new();

        for i in 0..n {
            let r_i = covalent_radius(&mol.atoms[i].element);
            for j in (i + 1)..n {
                let r_j = covalent_radius(&mol.atoms[j].element);
                let reference = r_i + r_j;
                let dist = mol.distance(i, j);

                if dist < self.tolerance * reference {
                    let heavy = mol.atoms[i].element != "H" && mol.atoms[j].element != "H";
                    bonds.push(Bond {
                        a: i,
                        b: j,
                        order: order_from_ratio(dist / reference, heavy),
                    });
                }
            }
        }
        // Pairwise iteration already emits (i < j) in lexicographic order;
        // the sort keeps that guarantee explicit.
        bonds.sort_by_key(|b| (b.a, b.b));
        bonds
    }
}

/// Geometric bond-order heuristic from the distance / radius-sum ratio.
/// Multiple bonds are measurably shorter than the covalent reference;
/// the thresholds cover typical C/N/O multiple-bond shortening. Bonds to
/// hydrogen are always single, whatever their ratio.
fn order_from_ratio(ratio: f64, heavy_pair: bool) -> BondOrder {
    if !heavy_pair {
        BondOrder::Single
    } else if ratio < 0.79 {
        BondOrder::Triple
    } else if ratio < 0.88 {
        BondOrder::Double
    } else {
        BondOrder::Single
    }
}

// ============================================================================
// GRAPH QUERIES
// ============================================================================

/// Builds an undirected petgraph view of the molecule's bonds, nodes
/// carrying the atom index as payload.
pub fn bond_graph(mol: &Molecule) -> UnGraph<usize, ()> {
    let mut graph = UnGraph::<usize, ()>::with_capacity(mol.num_atoms(), mol.bonds.len());
    let nodes: Vec<NodeIndex> = (0..mol.num_atoms()).map(|i| graph.add_node(i)).collect();
    for bond in &mol.bonds {
        graph.add_edge(nodes[bond.a], nodes[bond.b], ());
    }
    graph
}

/// Counts connected components of the bond graph. Isolated atoms count as
/// their own component; a fully bonded molecule reports 1. The refiner
/// uses this to diagnose disconnected topologies.
pub fn connected_components(mol: &Molecule) -> usize {
    let graph = bond_graph(mol);
    let mut visited = vec![false; graph.node_count()];
    let mut components = 0;

    for i in 0..graph.node_count() {
        if !visited[i] {
            components += 1;
            let mut bfs = Bfs::new(&graph, NodeIndex::new(i));
            while let Some(nx) = bfs.next(&graph) {
                visited[graph[nx]] = true;
            }
        }
    }
    components
}
