use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::kekulize::kekulize;
use crate::mol::Mol;
use crate::morgan::{atom_environment_of_radius, morgan_bit_info};
use crate::smarts::{fragment_to_smarts, FragmentError};

/// Options for the environment enumerator.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Maximum environment layer to enumerate.
    pub radius: u32,
    /// Include chirality in tokens and in the Morgan scan.
    pub isomeric: bool,
    /// Attempt kekulisation of the working copy first; failure is
    /// non-fatal and leaves the aromatic form in place.
    pub kekulize: bool,
    /// Prefix tokens with `r{layer}:`.
    pub include_radius_tag: bool,
    /// Mark the center atom with map number 1 while serialising.
    pub mark_root: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            radius: 2,
            isomeric: true,
            kekulize: false,
            include_radius_tag: true,
            mark_root: true,
        }
    }
}

/// Per-center environment tokens: `center -> layer -> token`, both levels
/// in ascending order.
pub type PerCenter = BTreeMap<usize, BTreeMap<u32, String>>;

/// Enumerate the circular environments of a molecule and serialise each as
/// a SMARTS token.
///
/// The input molecule is never mutated: all atom-map bookkeeping happens
/// on a working copy, and even there the original map numbers are restored
/// after each center, on every exit path.
pub fn environment_tokens(
    source: &Mol<Atom, Bond>,
    cfg: &EnvConfig,
) -> Result<PerCenter, FragmentError> {
    let mut mol = source.clone();
    if cfg.kekulize {
        // Both sanitisation-style failures surface here as one error kind.
        let _ = kekulize(&mut mol);
    }

    let bit_info = morgan_bit_info(&mol, cfg.radius, cfg.isomeric);
    let mut pairs: BTreeSet<(usize, u32)> = BTreeSet::new();
    for occurrences in bit_info.values() {
        for &(center, layer) in occurrences {
            if layer <= cfg.radius {
                pairs.insert((center, layer));
            }
        }
    }

    let snapshot: Vec<u16> = mol.atoms().map(|i| mol.atom(i).map_num).collect();

    let mut per_center: PerCenter = BTreeMap::new();
    for &(center, layer) in &pairs {
        let center_node = NodeIndex::new(center);
        let bond_indices = atom_environment_of_radius(&mol, layer, center_node);

        let mut atom_set: BTreeSet<NodeIndex> = BTreeSet::new();
        atom_set.insert(center_node);
        for &e in &bond_indices {
            if let Some((a, b)) = mol.bond_endpoints(e) {
                atom_set.insert(a);
                atom_set.insert(b);
            }
        }
        let atom_list: Vec<NodeIndex> = atom_set.into_iter().collect();
        let bonds = if bond_indices.is_empty() {
            None
        } else {
            Some(bond_indices.as_slice())
        };

        let smarts = if cfg.mark_root {
            let guard = RootMark::apply(&mut mol, &snapshot, center_node);
            fragment_to_smarts(guard.mol(), &atom_list, bonds, cfg.isomeric)?
        } else {
            fragment_to_smarts(&mol, &atom_list, bonds, cfg.isomeric)?
        };

        let token = if cfg.include_radius_tag {
            format!("r{layer}:{smarts}")
        } else {
            smarts
        };
        per_center.entry(center).or_default().insert(layer, token);
    }

    Ok(per_center)
}

/// Scoped root marking: zeroes every atom-map number, sets the center to
/// map 1, and restores the snapshot on drop, including when serialisation
/// bails out early.
struct RootMark<'a> {
    mol: &'a mut Mol<Atom, Bond>,
    snapshot: &'a [u16],
}

impl<'a> RootMark<'a> {
    fn apply(mol: &'a mut Mol<Atom, Bond>, snapshot: &'a [u16], center: NodeIndex) -> Self {
        for i in 0..mol.atom_count() {
            mol.atom_mut(NodeIndex::new(i)).map_num = 0;
        }
        mol.atom_mut(center).map_num = 1;
        Self { mol, snapshot }
    }

    fn mol(&self) -> &Mol<Atom, Bond> {
        self.mol
    }
}

impl Drop for RootMark<'_> {
    fn drop(&mut self) {
        for (i, &map_num) in self.snapshot.iter().enumerate() {
            self.mol.atom_mut(NodeIndex::new(i)).map_num = map_num;
        }
    }
}
