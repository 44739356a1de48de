use petgraph::graph::NodeIndex;

use crate::atom::{Atom, Chirality};
use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::graph_ops::connected_components;
use crate::mol::Mol;

/// Write a molecule back to SMILES.
///
/// The output is deterministic for a given graph (atoms visited in index
/// order) but not graph-canonical: two different atom numberings of the
/// same molecule may serialise differently.
pub fn to_smiles(mol: &Mol<Atom, Bond>) -> String {
    let components = connected_components(mol);
    let mut parts = Vec::with_capacity(components.len());
    for component in &components {
        parts.push(write_fragment(mol, component));
    }
    parts.join(".")
}

fn write_fragment(mol: &Mol<Atom, Bond>, component: &[NodeIndex]) -> String {
    let n = mol.atom_count();
    let start = component[0];

    let mut visited = vec![false; n];
    let mut parent = vec![None::<NodeIndex>; n];
    let mut children: Vec<Vec<NodeIndex>> = (0..n).map(|_| Vec::new()).collect();
    let mut ring_opens: Vec<Vec<(usize, NodeIndex)>> = (0..n).map(|_| Vec::new()).collect();
    let mut ring_closes: Vec<Vec<(usize, NodeIndex)>> = (0..n).map(|_| Vec::new()).collect();
    let mut next_ring_id: usize = 1;

    let neighbor_lists: Vec<Vec<NodeIndex>> = (0..n)
        .map(|i| {
            let mut list: Vec<NodeIndex> = mol.neighbors(NodeIndex::new(i)).collect();
            list.sort();
            list
        })
        .collect();

    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();
    visited[start.index()] = true;
    stack.push((start, 0));

    loop {
        let Some(&mut (node, ref mut ni)) = stack.last_mut() else {
            break;
        };
        let neighbors = &neighbor_lists[node.index()];
        if *ni >= neighbors.len() {
            stack.pop();
            continue;
        }
        let neighbor = neighbors[*ni];
        *ni += 1;

        if !visited[neighbor.index()] {
            visited[neighbor.index()] = true;
            parent[neighbor.index()] = Some(node);
            children[node.index()].push(neighbor);
            stack.push((neighbor, 0));
        } else if parent[node.index()] != Some(neighbor) {
            let already = ring_opens[neighbor.index()]
                .iter()
                .any(|(rid, _)| ring_closes[node.index()].iter().any(|(rid2, _)| rid2 == rid))
                || ring_opens[node.index()]
                    .iter()
                    .any(|(rid, _)| ring_closes[neighbor.index()].iter().any(|(rid2, _)| rid2 == rid));
            if !already {
                let ring_id = next_ring_id;
                next_ring_id += 1;
                ring_opens[neighbor.index()].push((ring_id, node));
                ring_closes[node.index()].push((ring_id, neighbor));
            }
        }
    }

    let mut out = String::new();
    write_node(mol, start, &children, &ring_opens, &ring_closes, &mut out);
    out
}

fn write_node(
    mol: &Mol<Atom, Bond>,
    node: NodeIndex,
    children: &[Vec<NodeIndex>],
    ring_opens: &[Vec<(usize, NodeIndex)>],
    ring_closes: &[Vec<(usize, NodeIndex)>],
    out: &mut String,
) {
    write_atom(mol, node, out);

    for &(ring_id, other) in &ring_opens[node.index()] {
        out.push_str(bond_symbol(mol, node, other));
        write_ring_digit(ring_id, out);
    }
    for &(ring_id, other) in &ring_closes[node.index()] {
        out.push_str(bond_symbol(mol, node, other));
        write_ring_digit(ring_id, out);
    }

    let kids = &children[node.index()];
    if kids.is_empty() {
        return;
    }

    let last = kids.len() - 1;
    for (i, &child) in kids.iter().enumerate() {
        let is_branch = i < last;
        if is_branch {
            out.push('(');
        }
        out.push_str(bond_symbol(mol, node, child));
        write_node(mol, child, children, ring_opens, ring_closes, out);
        if is_branch {
            out.push(')');
        }
    }
}

fn bond_symbol(mol: &Mol<Atom, Bond>, a: NodeIndex, b: NodeIndex) -> &'static str {
    let Some(edge) = mol.bond_between(a, b) else {
        return "";
    };
    let both_aromatic = mol.atom(a).is_aromatic && mol.atom(b).is_aromatic;
    match mol.bond(edge).order {
        BondOrder::Single => {
            if both_aromatic {
                "-"
            } else {
                ""
            }
        }
        BondOrder::Double => "=",
        BondOrder::Triple => "#",
        BondOrder::Aromatic => {
            if both_aromatic {
                ""
            } else {
                ":"
            }
        }
    }
}

fn write_ring_digit(id: usize, out: &mut String) {
    if id <= 9 {
        out.push(char::from(b'0' + id as u8));
    } else {
        out.push('%');
        out.push(char::from(b'0' + (id / 10 % 10) as u8));
        out.push(char::from(b'0' + (id % 10) as u8));
    }
}

fn write_atom(mol: &Mol<Atom, Bond>, node: NodeIndex, out: &mut String) {
    let atom = mol.atom(node);
    let elem = Element::from_atomic_num(atom.atomic_num);

    let Some(elem) = elem else {
        out.push('*');
        return;
    };

    if can_write_bare(mol, node, atom, elem) {
        push_symbol(elem, atom.is_aromatic, out);
        return;
    }

    out.push('[');
    if atom.isotope > 0 {
        out.push_str(&atom.isotope.to_string());
    }
    push_symbol(elem, atom.is_aromatic, out);
    match atom.chirality {
        Chirality::None => {}
        Chirality::Ccw => out.push('@'),
        Chirality::Cw => out.push_str("@@"),
    }
    match atom.hydrogen_count {
        0 => {}
        1 => out.push('H'),
        h => {
            out.push('H');
            out.push_str(&h.to_string());
        }
    }
    match atom.formal_charge {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        c if c > 0 => {
            out.push('+');
            out.push_str(&c.to_string());
        }
        c => {
            out.push('-');
            out.push_str(&c.unsigned_abs().to_string());
        }
    }
    if atom.map_num > 0 {
        out.push(':');
        out.push_str(&atom.map_num.to_string());
    }
    out.push(']');
}

fn push_symbol(elem: Element, aromatic: bool, out: &mut String) {
    if aromatic {
        for c in elem.symbol().chars() {
            out.push(c.to_ascii_lowercase());
        }
    } else {
        out.push_str(elem.symbol());
    }
}

fn can_write_bare(mol: &Mol<Atom, Bond>, node: NodeIndex, atom: &Atom, elem: Element) -> bool {
    if atom.formal_charge != 0
        || atom.isotope != 0
        || atom.map_num != 0
        || atom.chirality != Chirality::None
    {
        return false;
    }
    if !elem.is_organic_subset() {
        return false;
    }
    if atom.is_aromatic && !matches!(atom.atomic_num, 5 | 6 | 7 | 8 | 15 | 16) {
        return false;
    }
    atom.hydrogen_count == implied_h_count(mol, node, atom, elem)
}

// Mirrors the implicit-hydrogen rule applied when parsing, so a bare atom
// re-reads with the same H count.
fn implied_h_count(mol: &Mol<Atom, Bond>, node: NodeIndex, atom: &Atom, elem: Element) -> u8 {
    let valences = elem.default_valences();
    if valences.is_empty() {
        return 0;
    }
    let bond_order_sum: u8 = mol
        .bonds_of(node)
        .map(|e| mol.bond(e).order.valence_contribution())
        .fold(0, u8::saturating_add);
    let target = valences
        .iter()
        .find(|&&v| v >= bond_order_sum)
        .copied()
        .unwrap_or(0);
    if target < bond_order_sum {
        return 0;
    }
    let mut h = target - bond_order_sum;
    if atom.is_aromatic && h > 0 {
        h -= 1;
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn roundtrip(smiles: &str) -> String {
        to_smiles(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn simple_chains() {
        assert_eq!(roundtrip("C"), "C");
        assert_eq!(roundtrip("CCO"), "CCO");
        assert_eq!(roundtrip("C=C"), "C=C");
        assert_eq!(roundtrip("C#N"), "C#N");
    }

    #[test]
    fn branches() {
        assert_eq!(roundtrip("CC(C)C"), "CC(C)C");
    }

    #[test]
    fn rings() {
        assert_eq!(roundtrip("C1CCCCC1"), "C1CCCCC1");
        assert_eq!(roundtrip("c1ccccc1"), "c1ccccc1");
    }

    #[test]
    fn charges_and_isotopes() {
        assert_eq!(roundtrip("[NH4+]"), "[NH4+]");
        assert_eq!(roundtrip("[O-]"), "[O-]");
        assert_eq!(roundtrip("[13C]"), "[13C]");
    }

    #[test]
    fn disconnected_components() {
        assert_eq!(roundtrip("[Na+].[Cl-]"), "[Na+].[Cl-]");
    }

    #[test]
    fn atom_map_survives() {
        assert_eq!(roundtrip("[CH3:2]C"), "[CH3:2]C");
    }

    #[test]
    fn reparse_gives_same_graph_shape() {
        for smiles in ["CC(=O)O", "c1ccncc1", "C1CC2C1CC2", "Oc1ccccc1"] {
            let mol = parse_smiles(smiles).unwrap();
            let written = to_smiles(&mol);
            let reparsed = parse_smiles(&written).unwrap();
            assert_eq!(mol.atom_count(), reparsed.atom_count(), "{smiles}");
            assert_eq!(mol.bond_count(), reparsed.bond_count(), "{smiles}");
        }
    }

    #[test]
    fn idempotent() {
        for smiles in ["CCO", "c1ccccc1", "CC(C)(C)C", "[NH4+]"] {
            let once = roundtrip(smiles);
            let twice = to_smiles(&parse_smiles(&once).unwrap());
            assert_eq!(once, twice);
        }
    }
}
