/// Tetrahedral chirality tag.
///
/// Carried straight from the SMILES `@`/`@@` annotation. It feeds the
/// isomeric form of fragment SMARTS and the chirality-aware fingerprint
/// invariants; the crate does not renormalise it against a canonical
/// neighbour order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chirality {
    /// No chirality annotation.
    #[default]
    None,
    /// Clockwise (@@) arrangement.
    Cw,
    /// Counterclockwise (@) arrangement.
    Ccw,
}

/// Atom of a molecular graph node.
///
/// Everything the trace engine reads off an atom lives in this struct: the
/// element, charge and chirality feed fragment SMARTS and the Morgan
/// invariants, the implicit hydrogen count feeds valence bookkeeping, and
/// the map number is the scratch slot used to mark an environment's
/// center.
///
/// # Examples
///
/// ```
/// use fptrace::Atom;
///
/// let carbon = Atom {
///     atomic_num: 6,
///     hydrogen_count: 3,
///     ..Atom::default()
/// };
/// assert_eq!(carbon.atomic_num, 6);
/// assert_eq!(carbon.map_num, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atom {
    /// Atomic number, 1-based. Parsed molecules only ever hold values that
    /// name a real element.
    pub atomic_num: u8,
    /// Formal charge in signed elementary units. Written back out in both
    /// SMILES and SMARTS bracket atoms, and hashed into the Morgan
    /// invariants.
    pub formal_charge: i8,
    /// Mass number from an isotope-labelled bracket atom such as `[13C]`;
    /// `0` when unlabelled. Labelled and unlabelled atoms hash to distinct
    /// environment identifiers.
    pub isotope: u16,
    /// Implicit hydrogens carried by this atom.
    ///
    /// Fixed once at SMILES parse time, either from an explicit bracket
    /// count or from the element's default valence, and never recomputed.
    /// Kekulisation reads it to decide which aromatic atoms still owe a
    /// double bond.
    pub hydrogen_count: u8,
    /// Whether this atom is in an aromatic ring.
    ///
    /// Survives kekulisation: resolving aromatic bond orders to alternating
    /// single/double bonds does not clear this flag.
    pub is_aromatic: bool,
    /// Tetrahedral chirality tag, if any.
    pub chirality: Chirality,
    /// Atom-map number. `0` means unmapped.
    ///
    /// Parsed from the SMILES atom class (`[C:1]`). The environment
    /// enumerator temporarily rewrites this field to mark a center and
    /// restores the original value before returning.
    pub map_num: u16,
}
