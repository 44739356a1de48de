use std::collections::VecDeque;
use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::mol::Mol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KekulizeError {
    Unkekulizable(Vec<NodeIndex>),
}

impl fmt::Display for KekulizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unkekulizable(atoms) => {
                write!(f, "cannot kekulize aromatic system: unmatched atoms [")?;
                for (i, idx) in atoms.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", idx.index())?;
                }
                write!(f, "]")
            }
        }
    }
}

impl std::error::Error for KekulizeError {}

/// Resolve aromatic bond orders to alternating single/double bonds, in
/// place. On failure the molecule is left untouched, still in its aromatic
/// form, so the error can be swallowed and processing continued.
pub fn kekulize(mol: &mut Mol<Atom, Bond>) -> Result<(), KekulizeError> {
    let aromatic_edges: Vec<EdgeIndex> = mol
        .bonds()
        .filter(|&e| mol.bond(e).order == BondOrder::Aromatic)
        .collect();
    if aromatic_edges.is_empty() {
        return Ok(());
    }

    let n = mol.atom_count();

    let mut aromatic_adj: Vec<Vec<(NodeIndex, EdgeIndex)>> = vec![vec![]; n];
    for &e in &aromatic_edges {
        if let Some((a, b)) = mol.bond_endpoints(e) {
            aromatic_adj[a.index()].push((b, e));
            aromatic_adj[b.index()].push((a, e));
        }
    }

    // An atom needs one double bond iff its preferred valence exceeds its
    // current bond-order sum (aromatic counted as single) by exactly one.
    let mut needs_double = vec![false; n];
    for node in mol.atoms() {
        if aromatic_adj[node.index()].is_empty() {
            continue;
        }
        let atom = mol.atom(node);
        let elem = match Element::from_atomic_num(atom.atomic_num) {
            Some(e) => e,
            None => continue,
        };

        let bond_order_sum: u8 = mol
            .bonds_of(node)
            .map(|e| mol.bond(e).order.valence_contribution())
            .sum();
        let total_used = bond_order_sum + atom.hydrogen_count;

        if let Some(target) = target_valence(elem, total_used) {
            if target > total_used && target - total_used == 1 {
                needs_double[node.index()] = true;
            }
        }
    }

    let mut matched_edge: Vec<Option<EdgeIndex>> = vec![None; n];
    let candidates: Vec<NodeIndex> = mol
        .atoms()
        .filter(|&v| needs_double[v.index()])
        .collect();

    for &start in &candidates {
        if matched_edge[start.index()].is_some() {
            continue;
        }
        augment(mol, &aromatic_adj, &needs_double, &mut matched_edge, start);
    }

    let unmatched: Vec<NodeIndex> = candidates
        .iter()
        .copied()
        .filter(|&v| matched_edge[v.index()].is_none())
        .collect();
    if !unmatched.is_empty() {
        return Err(KekulizeError::Unkekulizable(unmatched));
    }

    let matched: std::collections::HashSet<EdgeIndex> =
        matched_edge.iter().filter_map(|e| *e).collect();
    for e in aromatic_edges {
        mol.bond_mut(e).order = if matched.contains(&e) {
            BondOrder::Double
        } else {
            BondOrder::Single
        };
    }

    Ok(())
}

fn target_valence(elem: Element, current_used: u8) -> Option<u8> {
    let valences = elem.default_valences();
    if valences.is_empty() {
        return None;
    }
    valences.iter().copied().find(|&v| v >= current_used)
}

fn augment(
    mol: &Mol<Atom, Bond>,
    aromatic_adj: &[Vec<(NodeIndex, EdgeIndex)>],
    needs_double: &[bool],
    matched_edge: &mut [Option<EdgeIndex>],
    start: NodeIndex,
) -> bool {
    let n = mol.atom_count();
    let mut prev: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();

    visited[start.index()] = true;
    queue.push_back(start);

    while let Some(u) = queue.pop_front() {
        for &(v, e) in &aromatic_adj[u.index()] {
            if !needs_double[v.index()] || visited[v.index()] {
                continue;
            }
            if Some(e) == matched_edge[u.index()] {
                continue;
            }
            visited[v.index()] = true;
            prev[v.index()] = Some((u, e));

            if matched_edge[v.index()].is_none() {
                flip_path(matched_edge, &prev, start, v);
                return true;
            }

            let matched_e = matched_edge[v.index()].expect("checked above");
            let (ea, eb) = mol.bond_endpoints(matched_e).expect("valid edge");
            let w = if ea == v { eb } else { ea };

            if !visited[w.index()] {
                visited[w.index()] = true;
                prev[w.index()] = Some((v, matched_e));
                queue.push_back(w);
            }
        }
    }
    false
}

fn flip_path(
    matched_edge: &mut [Option<EdgeIndex>],
    prev: &[Option<(NodeIndex, EdgeIndex)>],
    start: NodeIndex,
    end: NodeIndex,
) {
    let mut cur = end;
    let mut is_new_match = true;
    while cur != start {
        let (p, e) = prev[cur.index()].expect("path exists");
        if is_new_match {
            matched_edge[cur.index()] = Some(e);
            matched_edge[p.index()] = Some(e);
        }
        is_new_match = !is_new_match;
        cur = p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn kekulized(smiles: &str) -> Mol<Atom, Bond> {
        let mut mol = parse_smiles(smiles).unwrap();
        kekulize(&mut mol).unwrap();
        mol
    }

    fn count_double_bonds(mol: &Mol<Atom, Bond>) -> usize {
        mol.bonds()
            .filter(|&e| mol.bond(e).order == BondOrder::Double)
            .count()
    }

    fn no_adjacent_doubles(mol: &Mol<Atom, Bond>) -> bool {
        mol.atoms().all(|node| {
            let doubles = mol
                .bonds_of(node)
                .filter(|&e| mol.bond(e).order == BondOrder::Double)
                .count();
            doubles <= 1 || !mol.atom(node).is_aromatic
        })
    }

    #[test]
    fn benzene() {
        let mol = kekulized("c1ccccc1");
        assert_eq!(count_double_bonds(&mol), 3);
        assert!(no_adjacent_doubles(&mol));
        for node in mol.atoms() {
            assert!(mol.atom(node).is_aromatic, "aromatic flags survive");
        }
        assert!(mol
            .bonds()
            .all(|e| mol.bond(e).order != BondOrder::Aromatic));
    }

    #[test]
    fn naphthalene() {
        let mol = kekulized("c1ccc2ccccc2c1");
        assert_eq!(count_double_bonds(&mol), 5);
        assert!(no_adjacent_doubles(&mol));
    }

    #[test]
    fn pyridine() {
        let mol = kekulized("c1ccncc1");
        assert_eq!(count_double_bonds(&mol), 3);
        assert_eq!(mol.atom(n(3)).atomic_num, 7);
    }

    #[test]
    fn pyrrole() {
        let mol = kekulized("[nH]1cccc1");
        assert_eq!(count_double_bonds(&mol), 2);
        assert_eq!(mol.atom(n(0)).hydrogen_count, 1);
    }

    #[test]
    fn furan() {
        let mol = kekulized("o1cccc1");
        assert_eq!(count_double_bonds(&mol), 2);
    }

    #[test]
    fn thiophene() {
        let mol = kekulized("s1cccc1");
        assert_eq!(count_double_bonds(&mol), 2);
    }

    #[test]
    fn imidazole() {
        let mol = kekulized("c1c[nH]cn1");
        assert_eq!(count_double_bonds(&mol), 2);
        assert!(no_adjacent_doubles(&mol));
    }

    #[test]
    fn non_aromatic_untouched() {
        let mol = kekulized("C=CC");
        assert_eq!(count_double_bonds(&mol), 1);
        let e01 = mol.bond_between(n(0), n(1)).unwrap();
        assert_eq!(mol.bond(e01).order, BondOrder::Double);
    }

    #[test]
    fn failure_leaves_aromatic_form() {
        // Cyclopentadienyl without the charge cannot be kekulized.
        let mut mol = parse_smiles("c1cccc1").unwrap();
        let result = kekulize(&mut mol);
        assert!(result.is_err());
        let aromatic = mol
            .bonds()
            .filter(|&e| mol.bond(e).order == BondOrder::Aromatic)
            .count();
        assert_eq!(aromatic, 5, "failed kekulization must not alter bonds");
    }

    #[test]
    fn error_display() {
        let err = KekulizeError::Unkekulizable(vec![n(0), n(2)]);
        let msg = format!("{}", err);
        assert!(msg.contains('0'));
        assert!(msg.contains('2'));
    }
}
