use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;

/// Ring perception result: a set of smallest rings spanning the cycle space.
///
/// For every edge the shortest cycle through it is taken as a candidate;
/// candidates are admitted in ascending size order while they are linearly
/// independent over GF(2), up to the expected `E + C - V` ring count.
#[derive(Debug, Clone)]
pub struct RingInfo {
    rings: Vec<Vec<NodeIndex>>,
}

impl RingInfo {
    pub fn sssr<A, B>(mol: &Mol<A, B>) -> Self {
        let num_expected = Self::expected_ring_count(mol);
        if num_expected == 0 {
            return Self { rings: vec![] };
        }

        let num_edges = mol.bond_count();
        let adjacency = edge_adjacency(mol);

        let mut candidates: Vec<Vec<NodeIndex>> = mol
            .bonds()
            .filter_map(|edge| shortest_cycle_through(mol, &adjacency, edge))
            .map(|ring| normalize_ring(&ring))
            .collect();
        candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        candidates.dedup();

        let mut basis: Vec<Vec<u64>> = Vec::with_capacity(num_expected);
        let mut rings: Vec<Vec<NodeIndex>> = Vec::with_capacity(num_expected);
        for ring in &candidates {
            if rings.len() >= num_expected {
                break;
            }
            let bv = ring_to_edge_bits(ring, num_edges, mol);
            if try_add_to_basis(&mut basis, bv) {
                rings.push(ring.clone());
            }
        }

        Self { rings }
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn rings(&self) -> &[Vec<NodeIndex>] {
        &self.rings
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.rings.iter().any(|ring| ring.contains(&atom))
    }

    pub fn expected_ring_count<A, B>(mol: &Mol<A, B>) -> usize {
        let v = mol.atom_count();
        let e = mol.bond_count();
        let c = connected_components(mol.graph());
        (e + c).saturating_sub(v)
    }
}

fn edge_adjacency<A, B>(mol: &Mol<A, B>) -> Vec<Vec<(NodeIndex, EdgeIndex)>> {
    let n = mol.atom_count();
    let mut adjacency: Vec<Vec<(NodeIndex, EdgeIndex)>> = vec![vec![]; n];
    for edge in mol.bonds() {
        if let Some((a, b)) = mol.bond_endpoints(edge) {
            adjacency[a.index()].push((b, edge));
            adjacency[b.index()].push((a, edge));
        }
    }
    for list in &mut adjacency {
        list.sort();
    }
    adjacency
}

/// Shortest cycle containing `edge`: BFS between its endpoints with the
/// edge itself removed. Returns the cycle as a node list, or `None` when
/// the edge is a bridge.
fn shortest_cycle_through<A, B>(
    mol: &Mol<A, B>,
    adjacency: &[Vec<(NodeIndex, EdgeIndex)>],
    edge: EdgeIndex,
) -> Option<Vec<NodeIndex>> {
    let (from, to) = mol.bond_endpoints(edge)?;
    let n = mol.atom_count();
    let mut pred: Vec<Option<NodeIndex>> = vec![None; n];
    let mut visited = vec![false; n];
    visited[from.index()] = true;
    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for &(neighbor, via) in &adjacency[current.index()] {
            if via == edge || visited[neighbor.index()] {
                continue;
            }
            visited[neighbor.index()] = true;
            pred[neighbor.index()] = Some(current);
            if neighbor == to {
                let mut path = vec![to];
                let mut node = to;
                while let Some(p) = pred[node.index()] {
                    path.push(p);
                    node = p;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(neighbor);
        }
    }
    None
}

fn ring_to_edge_bits<A, B>(ring: &[NodeIndex], num_edges: usize, mol: &Mol<A, B>) -> Vec<u64> {
    let mut bits = vec![0u64; num_edges.div_ceil(64)];
    let len = ring.len();
    for i in 0..len {
        let a = ring[i];
        let b = ring[(i + 1) % len];
        if let Some(edge) = mol.bond_between(a, b) {
            bits[edge.index() / 64] |= 1u64 << (edge.index() % 64);
        }
    }
    bits
}

fn try_add_to_basis(basis: &mut Vec<Vec<u64>>, mut bv: Vec<u64>) -> bool {
    for row in basis.iter() {
        let lead = leading_bit(row);
        if let Some(bit) = lead {
            if bv[bit / 64] & (1u64 << (bit % 64)) != 0 {
                for (w, r) in bv.iter_mut().zip(row.iter()) {
                    *w ^= r;
                }
            }
        }
    }
    if bv.iter().all(|&w| w == 0) {
        return false;
    }
    basis.push(bv);
    true
}

fn leading_bit(bv: &[u64]) -> Option<usize> {
    bv.iter()
        .enumerate()
        .find(|(_, &w)| w != 0)
        .map(|(i, &w)| i * 64 + w.trailing_zeros() as usize)
}

/// Rotate and orient a ring so the smallest atom index comes first and its
/// smaller neighbour second. Makes equal rings compare equal.
fn normalize_ring(ring: &[NodeIndex]) -> Vec<NodeIndex> {
    let len = ring.len();
    if len == 0 {
        return vec![];
    }
    let min_pos = ring
        .iter()
        .enumerate()
        .min_by_key(|(_, node)| **node)
        .map(|(i, _)| i)
        .unwrap_or(0);

    let forward: Vec<NodeIndex> = (0..len).map(|i| ring[(min_pos + i) % len]).collect();
    let backward: Vec<NodeIndex> = (0..len)
        .map(|i| ring[(min_pos + len - i) % len])
        .collect();
    if forward <= backward {
        forward
    } else {
        backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn ring_count(smiles: &str) -> usize {
        let mol = parse_smiles(smiles).unwrap();
        RingInfo::sssr(&mol).num_rings()
    }

    #[test]
    fn acyclic_has_no_rings() {
        assert_eq!(ring_count("CCO"), 0);
        assert_eq!(ring_count("CC(C)C"), 0);
    }

    #[test]
    fn benzene_single_ring() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        let info = RingInfo::sssr(&mol);
        assert_eq!(info.num_rings(), 1);
        assert_eq!(info.rings()[0].len(), 6);
        for atom in mol.atoms() {
            assert!(info.is_ring_atom(atom));
        }
    }

    #[test]
    fn naphthalene_two_rings() {
        let mol = parse_smiles("c1ccc2ccccc2c1").unwrap();
        let info = RingInfo::sssr(&mol);
        assert_eq!(info.num_rings(), 2);
        assert!(info.rings().iter().all(|r| r.len() == 6));
    }

    #[test]
    fn bicyclohexane() {
        let mol = parse_smiles("C1CC2C1CC2").unwrap();
        let info = RingInfo::sssr(&mol);
        assert_eq!(info.num_rings(), 2);
    }

    #[test]
    fn disconnected_rings() {
        assert_eq!(ring_count("C1CC1.C1CCC1"), 2);
    }

    #[test]
    fn ring_atoms_vs_chain_atoms() {
        let mol = parse_smiles("Cc1ccccc1").unwrap();
        let info = RingInfo::sssr(&mol);
        assert!(!info.is_ring_atom(NodeIndex::new(0)));
        assert!(info.is_ring_atom(NodeIndex::new(1)));
    }
}
