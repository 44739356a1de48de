mod error;
mod parser;
pub mod pattern;
mod writer;

pub use error::{FragmentError, SmartsError};
pub use pattern::{AtomPattern, BondPattern, Query};
pub use writer::fragment_to_smarts;

/// Parse a SMARTS pattern in the dialect emitted by
/// [`fragment_to_smarts`]: bracket primitives (`#n`, element symbols,
/// isotope, chirality, H count, charge, map number), bare organic-subset
/// atoms, `*`, explicit bond primitives, ring closures and branches.
pub fn parse_smarts(s: &str) -> Result<Query, SmartsError> {
    parser::parse(s)
}
