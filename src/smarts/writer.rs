use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::{Atom, Chirality};
use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::mol::Mol;

use super::error::FragmentError;

/// Serialise the fragment induced by `atoms` and `bonds` to SMARTS.
///
/// `atoms` must be sorted ascending and non-empty; `bonds` of `None` means
/// a bond-less fragment (the radius-0 case). The traversal roots at the
/// atom carrying map number 1 when present, so environments that are equal
/// up to atom renumbering around their marked center serialise to the same
/// string. Bond primitives are always written explicitly; atoms are always
/// bracketed.
pub fn fragment_to_smarts(
    mol: &Mol<Atom, Bond>,
    atoms: &[NodeIndex],
    bonds: Option<&[EdgeIndex]>,
    isomeric: bool,
) -> Result<String, FragmentError> {
    if atoms.is_empty() {
        return Err(FragmentError::EmptyFragment);
    }

    let n = mol.atom_count();
    let mut in_fragment = vec![false; n];
    for &a in atoms {
        in_fragment[a.index()] = true;
    }

    let mut adjacency: Vec<Vec<NodeIndex>> = vec![vec![]; n];
    if let Some(bonds) = bonds {
        for &e in bonds {
            if let Some((a, b)) = mol.bond_endpoints(e) {
                if in_fragment[a.index()] && in_fragment[b.index()] {
                    adjacency[a.index()].push(b);
                    adjacency[b.index()].push(a);
                }
            }
        }
    }
    for list in &mut adjacency {
        list.sort();
        list.dedup();
    }

    let root = atoms
        .iter()
        .copied()
        .find(|&a| mol.atom(a).map_num == 1)
        .unwrap_or(atoms[0]);

    let mut visited = vec![false; n];
    let mut next_ring_id: usize = 1;
    let mut parts: Vec<String> = Vec::new();

    // The root's component is written first; remaining components (only
    // possible for degenerate inputs) follow in ascending start order.
    let mut starts: Vec<NodeIndex> = vec![root];
    starts.extend(atoms.iter().copied().filter(|&a| a != root));

    for start in starts {
        if visited[start.index()] {
            continue;
        }
        parts.push(write_component(
            mol,
            start,
            &adjacency,
            &mut visited,
            &mut next_ring_id,
            isomeric,
        )?);
    }

    Ok(parts.join("."))
}

fn write_component(
    mol: &Mol<Atom, Bond>,
    start: NodeIndex,
    adjacency: &[Vec<NodeIndex>],
    visited: &mut [bool],
    next_ring_id: &mut usize,
    isomeric: bool,
) -> Result<String, FragmentError> {
    let n = mol.atom_count();
    let mut parent = vec![None::<NodeIndex>; n];
    let mut children: Vec<Vec<NodeIndex>> = (0..n).map(|_| Vec::new()).collect();
    let mut ring_opens: Vec<Vec<(usize, NodeIndex)>> = (0..n).map(|_| Vec::new()).collect();
    let mut ring_closes: Vec<Vec<(usize, NodeIndex)>> = (0..n).map(|_| Vec::new()).collect();

    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();
    visited[start.index()] = true;
    stack.push((start, 0));

    loop {
        let Some(&mut (node, ref mut ni)) = stack.last_mut() else {
            break;
        };
        let neighbors = &adjacency[node.index()];
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
                if *next_ring_id > 99 {
                    return Err(FragmentError::RingIndexOverflow);
                }
                let ring_id = *next_ring_id;
                *next_ring_id += 1;
                ring_opens[neighbor.index()].push((ring_id, node));
                ring_closes[node.index()].push((ring_id, neighbor));
            }
        }
    }

    let mut out = String::new();
    write_node(
        mol,
        start,
        &children,
        &ring_opens,
        &ring_closes,
        isomeric,
        &mut out,
    );
    Ok(out)
}

fn write_node(
    mol: &Mol<Atom, Bond>,
    node: NodeIndex,
    children: &[Vec<NodeIndex>],
    ring_opens: &[Vec<(usize, NodeIndex)>],
    ring_closes: &[Vec<(usize, NodeIndex)>],
    isomeric: bool,
    out: &mut String,
) {
    write_atom_pattern(mol.atom(node), isomeric, out);

    for &(ring_id, other) in &ring_opens[node.index()] {
        if let Some(edge) = mol.bond_between(node, other) {
            out.push(bond_char(mol.bond(edge).order));
        }
        write_ring_digit(ring_id, out);
    }
    for &(ring_id, other) in &ring_closes[node.index()] {
        if let Some(edge) = mol.bond_between(node, other) {
            out.push(bond_char(mol.bond(edge).order));
        }
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
        if let Some(edge) = mol.bond_between(node, child) {
            out.push(bond_char(mol.bond(edge).order));
        }
        write_node(mol, child, children, ring_opens, ring_closes, isomeric, out);
        if is_branch {
            out.push(')');
        }
    }
}

fn bond_char(order: BondOrder) -> char {
    match order {
        BondOrder::Single => '-',
        BondOrder::Double => '=',
        BondOrder::Triple => '#',
        BondOrder::Aromatic => ':',
    }
}

fn write_ring_digit(id: usize, out: &mut String) {
    if id <= 9 {
        out.push(char::from(b'0' + id as u8));
    } else {
        out.push('%');
        out.push(char::from(b'0' + (id / 10) as u8));
        out.push(char::from(b'0' + (id % 10) as u8));
    }
}

fn write_atom_pattern(atom: &Atom, isomeric: bool, out: &mut String) {
    out.push('[');
    if atom.isotope > 0 {
        out.push_str(&atom.isotope.to_string());
    }
    if atom.is_aromatic {
        if let Some(elem) = Element::from_atomic_num(atom.atomic_num) {
            for c in elem.symbol().chars() {
                out.push(c.to_ascii_lowercase());
            }
        } else {
            out.push('*');
        }
    } else {
        out.push('#');
        out.push_str(&atom.atomic_num.to_string());
    }
    if isomeric {
        match atom.chirality {
            Chirality::None => {}
            Chirality::Ccw => out.push('@'),
            Chirality::Cw => out.push_str("@@"),
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
