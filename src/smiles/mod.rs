mod builder;
pub mod error;
mod parse_tree;
mod tokenizer;
mod writer;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;
pub use error::SmilesError;
pub use writer::to_smiles;

/// Parse SMILES into a molecular graph.
///
/// Aromatic bonds are kept aromatic; call [`kekulize`](crate::kekulize) on
/// the result to resolve them to alternating single/double bonds.
pub fn parse_smiles(s: &str) -> Result<Mol<Atom, Bond>, SmilesError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    if tokens.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tree = parse_tree::build_parse_tree(&tokens)?;
    Ok(builder::build_mol(&tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::BondOrder;
    use petgraph::graph::NodeIndex;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn atom(mol: &Mol<Atom, Bond>, i: usize) -> &Atom {
        mol.atom(n(i))
    }

    // ---- Simple molecules ----

    #[test]
    fn methane() {
        let mol = parse_smiles("C").unwrap();
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(atom(&mol, 0).atomic_num, 6);
        assert_eq!(atom(&mol, 0).hydrogen_count, 4);
    }

    #[test]
    fn ethane() {
        let mol = parse_smiles("CC").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 1);
        assert_eq!(atom(&mol, 0).hydrogen_count, 3);
        assert_eq!(atom(&mol, 1).hydrogen_count, 3);
    }

    #[test]
    fn ethyne() {
        let mol = parse_smiles("C#C").unwrap();
        let edge = mol.bond_between(n(0), n(1)).unwrap();
        assert_eq!(mol.bond(edge).order, BondOrder::Triple);
        assert_eq!(atom(&mol, 0).hydrogen_count, 1);
    }

    #[test]
    fn water_bare() {
        let mol = parse_smiles("O").unwrap();
        assert_eq!(atom(&mol, 0).atomic_num, 8);
        assert_eq!(atom(&mol, 0).hydrogen_count, 2);
    }

    #[test]
    fn hydrogen_chloride() {
        let mol = parse_smiles("Cl").unwrap();
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(atom(&mol, 0).atomic_num, 17);
        assert_eq!(atom(&mol, 0).hydrogen_count, 1);
    }

    #[test]
    fn acetic_acid() {
        let mol = parse_smiles("CC(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(atom(&mol, 0).hydrogen_count, 3); // CH3
        assert_eq!(atom(&mol, 1).hydrogen_count, 0); // C(=O)O
        assert_eq!(atom(&mol, 2).hydrogen_count, 0); // =O
        assert_eq!(atom(&mol, 3).hydrogen_count, 1); // OH
    }

    // ---- Branches and rings ----

    #[test]
    fn neopentane() {
        let mol = parse_smiles("CC(C)(C)C").unwrap();
        assert_eq!(mol.atom_count(), 5);
        assert_eq!(mol.bond_count(), 4);
        assert_eq!(atom(&mol, 1).hydrogen_count, 0);
    }

    #[test]
    fn cyclohexane() {
        let mol = parse_smiles("C1CCCCC1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        for i in 0..6 {
            assert_eq!(atom(&mol, i).hydrogen_count, 2);
        }
    }

    #[test]
    fn multi_digit_ring() {
        let mol = parse_smiles("C%10CC%10").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 3);
    }

    #[test]
    fn bicyclo() {
        let mol = parse_smiles("C1CC2C1CC2").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 7);
    }

    // ---- Charges, isotopes, maps ----

    #[test]
    fn ammonium() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(atom(&mol, 0).formal_charge, 1);
        assert_eq!(atom(&mol, 0).hydrogen_count, 4);
    }

    #[test]
    fn carbon_13() {
        let mol = parse_smiles("[13C]").unwrap();
        assert_eq!(atom(&mol, 0).isotope, 13);
    }

    #[test]
    fn mapped_atom() {
        let mol = parse_smiles("[C:1]").unwrap();
        assert_eq!(atom(&mol, 0).map_num, 1);
    }

    // ---- Aromatic systems ----

    #[test]
    fn benzene() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        for i in 0..6 {
            assert!(atom(&mol, i).is_aromatic);
            assert_eq!(atom(&mol, i).hydrogen_count, 1);
        }
        for edge in mol.bonds() {
            assert_eq!(mol.bond(edge).order, BondOrder::Aromatic);
        }
    }

    #[test]
    fn pyridine() {
        let mol = parse_smiles("c1ccncc1").unwrap();
        assert_eq!(atom(&mol, 3).atomic_num, 7);
        assert_eq!(atom(&mol, 3).hydrogen_count, 0);
        for i in [0, 1, 2, 4, 5] {
            assert_eq!(atom(&mol, i).hydrogen_count, 1);
        }
    }

    #[test]
    fn pyrrole() {
        let mol = parse_smiles("[nH]1cccc1").unwrap();
        assert_eq!(atom(&mol, 0).atomic_num, 7);
        assert_eq!(atom(&mol, 0).hydrogen_count, 1);
    }

    #[test]
    fn phenol_exocyclic_bond() {
        let mol = parse_smiles("Oc1ccccc1").unwrap();
        assert_eq!(atom(&mol, 0).hydrogen_count, 1);
        let bond_o_c = mol.bond_between(n(0), n(1)).unwrap();
        assert_eq!(mol.bond(bond_o_c).order, BondOrder::Single);
    }

    #[test]
    fn caffeine_atom_count() {
        let mol = parse_smiles("Cn1cnc2c1c(=O)n(c(=O)n2C)C").unwrap();
        assert_eq!(mol.atom_count(), 14);
    }

    // ---- Disconnected ----

    #[test]
    fn sodium_chloride() {
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(atom(&mol, 0).formal_charge, 1);
        assert_eq!(atom(&mol, 1).formal_charge, -1);
    }

    // ---- Stereo input accepted ----

    #[test]
    fn tetrahedral_tags() {
        let mol = parse_smiles("[C@](F)(Cl)(Br)I").unwrap();
        assert_eq!(atom(&mol, 0).chirality, crate::atom::Chirality::Ccw);
        let mol = parse_smiles("[C@@](F)(Cl)(Br)I").unwrap();
        assert_eq!(atom(&mol, 0).chirality, crate::atom::Chirality::Cw);
    }

    #[test]
    fn directional_bonds_parse() {
        let mol = parse_smiles("F/C=C/F").unwrap();
        assert_eq!(mol.atom_count(), 4);
        let edge = mol.bond_between(n(1), n(2)).unwrap();
        assert_eq!(mol.bond(edge).order, BondOrder::Double);
    }

    // ---- Error cases ----

    #[test]
    fn empty_string() {
        assert!(parse_smiles("").is_err());
        assert!(parse_smiles("   ").is_err());
    }

    #[test]
    fn mismatched_parens() {
        assert!(parse_smiles("C(C").is_err());
        assert!(parse_smiles("C)C").is_err());
    }

    #[test]
    fn unclosed_ring() {
        assert!(parse_smiles("C1CC").is_err());
    }

    #[test]
    fn invalid_atom() {
        assert!(parse_smiles("X").is_err());
        assert!(parse_smiles("not_a_molecule").is_err());
    }

    #[test]
    fn unclosed_bracket() {
        assert!(parse_smiles("[C").is_err());
    }
}
