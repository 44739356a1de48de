/// Bond order of a molecular graph edge.
///
/// Aromatic bonds stay aromatic after SMILES parsing; the trace engine
/// kekulises a scratch copy on demand, which resolves `Aromatic` bonds to
/// alternating `Single` and `Double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    /// A single bond (bond order 1).
    #[default]
    Single,
    /// A double bond (bond order 2).
    Double,
    /// A triple bond (bond order 3).
    Triple,
    /// An aromatic bond.
    Aromatic,
}

impl BondOrder {
    /// Contribution to an atom's valence sum. Aromatic counts as 1; the
    /// extra bond of an aromatic system is accounted for separately.
    pub fn valence_contribution(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// Bond type of the standard `Mol<Atom, Bond>` produced by SMILES parsing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bond {
    /// The bond order.
    pub order: BondOrder,
}
