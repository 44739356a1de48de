use std::collections::{BTreeMap, HashSet};

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::{Atom, Chirality};
use crate::bond::{Bond, BondOrder};
use crate::graph_ops::bfs_distances;
use crate::mol::Mol;
use crate::rings::RingInfo;

/// Morgan bit info: environment identifier to its `(center, layer)`
/// occurrences. Two symmetric environments hash to the same identifier and
/// land in the same entry.
pub type BitInfo = BTreeMap<u64, Vec<(usize, u32)>>;

/// Bond set of the circular environment of `center` at the given layer:
/// every bond reachable along a path of at most `layer` bonds from the
/// center. Empty for layer 0.
pub fn atom_environment_of_radius<A, B>(
    mol: &Mol<A, B>,
    layer: u32,
    center: NodeIndex,
) -> Vec<EdgeIndex> {
    if layer == 0 {
        return vec![];
    }
    let dist = bfs_distances(mol, center);
    let mut edges: Vec<EdgeIndex> = mol
        .bonds()
        .filter(|&e| {
            let Some((a, b)) = mol.bond_endpoints(e) else {
                return false;
            };
            let da = dist[a.index()];
            let db = dist[b.index()];
            da != u32::MAX && db != u32::MAX && da.min(db) + 1 <= layer && da.max(db) <= layer
        })
        .collect();
    edges.sort();
    edges
}

/// Morgan environment scan shared by the fingerprint and the bit info.
///
/// Layer 0 emits an environment for every atom. From layer 1 on, an atom
/// stops producing environments once its environment stops growing, or
/// once its exact bond set was already claimed by an earlier environment
/// (lower layer first, then lower center index). Identifiers for all atoms
/// keep iterating regardless, since live neighbours hash them in.
fn environment_identifiers(
    mol: &Mol<Atom, Bond>,
    radius: u32,
    include_chirality: bool,
) -> Vec<(u64, usize, u32)> {
    let n = mol.atom_count();
    if n == 0 {
        return vec![];
    }

    let ring_info = RingInfo::sssr(mol);
    let mut ids: Vec<u64> = (0..n)
        .map(|i| initial_invariant(mol, NodeIndex::new(i), &ring_info, include_chirality))
        .collect();

    let mut out: Vec<(u64, usize, u32)> = Vec::with_capacity(n);
    for (i, &id) in ids.iter().enumerate() {
        out.push((id, i, 0));
    }

    let mut dead = vec![false; n];
    let mut prev_env: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut seen: HashSet<Vec<usize>> = HashSet::new();

    for layer in 1..=radius {
        let mut next_ids = vec![0u64; n];
        for i in 0..n {
            let node = NodeIndex::new(i);
            let mut neighbor_ids: Vec<(u8, u64)> = mol
                .bonds_of(node)
                .filter_map(|e| {
                    let (a, b) = mol.bond_endpoints(e)?;
                    let other = if a == node { b } else { a };
                    Some((bond_code(mol.bond(e).order), ids[other.index()]))
                })
                .collect();
            neighbor_ids.sort_unstable();

            let mut h = fnv1a_init();
            h = fnv1a_update(h, layer as u64);
            h = fnv1a_update(h, ids[i]);
            for &(code, nid) in &neighbor_ids {
                h = fnv1a_update(h, code as u64);
                h = fnv1a_update(h, nid);
            }
            next_ids[i] = h;
        }

        for i in 0..n {
            if dead[i] {
                continue;
            }
            let env: Vec<usize> = atom_environment_of_radius(mol, layer, NodeIndex::new(i))
                .iter()
                .map(|e| e.index())
                .collect();
            if env == prev_env[i] {
                dead[i] = true;
                continue;
            }
            if seen.contains(&env) {
                dead[i] = true;
                continue;
            }
            seen.insert(env.clone());
            prev_env[i] = env;
            out.push((next_ids[i], i, layer));
        }

        ids = next_ids;
    }

    out
}

fn initial_invariant(
    mol: &Mol<Atom, Bond>,
    node: NodeIndex,
    ring_info: &RingInfo,
    include_chirality: bool,
) -> u64 {
    let atom = mol.atom(node);
    let mut h = fnv1a_init();
    h = fnv1a_update(h, atom.atomic_num as u64);
    h = fnv1a_update(h, mol.neighbors(node).count() as u64);
    h = fnv1a_update(h, atom.hydrogen_count as u64);
    h = fnv1a_update(h, atom.formal_charge as i64 as u64);
    h = fnv1a_update(h, atom.isotope as u64);
    h = fnv1a_update(h, atom.is_aromatic as u64);
    h = fnv1a_update(h, ring_info.is_ring_atom(node) as u64);
    if include_chirality && atom.chirality != Chirality::None {
        let code = match atom.chirality {
            Chirality::Ccw => 1u64,
            Chirality::Cw => 2,
            Chirality::None => 0,
        };
        h = fnv1a_update(h, code);
    }
    h
}

fn bond_code(order: BondOrder) -> u8 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic => 4,
    }
}

/// Morgan bit info for every environment up to `radius`.
pub fn morgan_bit_info(mol: &Mol<Atom, Bond>, radius: u32, include_chirality: bool) -> BitInfo {
    let mut info: BitInfo = BTreeMap::new();
    for (id, atom, layer) in environment_identifiers(mol, radius, include_chirality) {
        info.entry(id).or_default().push((atom, layer));
    }
    info
}

/// Dense Morgan fingerprint: `nbits` bytes, each 0 or 1.
pub fn morgan_fingerprint_bits(
    mol: &Mol<Atom, Bond>,
    radius: u32,
    nbits: usize,
    include_chirality: bool,
) -> Vec<u8> {
    let mut bits = vec![0u8; nbits];
    if nbits == 0 {
        return bits;
    }
    for (id, _, _) in environment_identifiers(mol, radius, include_chirality) {
        bits[(id % nbits as u64) as usize] = 1;
    }
    bits
}

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a_init() -> u64 {
    FNV_OFFSET
}

fn fnv1a_update(hash: u64, value: u64) -> u64 {
    let mut h = hash;
    for &b in &value.to_le_bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}
