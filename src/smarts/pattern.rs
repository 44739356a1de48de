use crate::atom::Chirality;
use crate::mol::Mol;

/// Atom primitive of the SMARTS dialect emitted for environment tokens.
///
/// The trace engine never writes boolean operators, so a flat pattern
/// struct covers the whole dialect; `atomic_num == None` is the wildcard
/// `*`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtomPattern {
    pub atomic_num: Option<u8>,
    pub aromatic: Option<bool>,
    pub isotope: u16,
    pub charge: Option<i8>,
    pub chirality: Chirality,
    pub hcount: Option<u8>,
    pub map_num: u16,
}

impl AtomPattern {
    /// Heteroatom means anything other than hydrogen or carbon. Wildcards
    /// do not count.
    pub fn is_hetero(&self) -> bool {
        matches!(self.atomic_num, Some(n) if n != 1 && n != 6)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BondPattern {
    Any,
    Single,
    Double,
    Triple,
    Aromatic,
    /// The implicit SMARTS bond.
    #[default]
    SingleOrAromatic,
}

impl BondPattern {
    pub fn is_unsaturated(self) -> bool {
        matches!(
            self,
            BondPattern::Double | BondPattern::Triple | BondPattern::Aromatic
        )
    }
}

/// A parsed SMARTS pattern graph.
pub type Query = Mol<AtomPattern, BondPattern>;
