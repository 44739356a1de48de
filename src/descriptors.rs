use crate::atom::Atom;
use crate::bond::Bond;
use crate::element::Element;
use crate::mol::Mol;
use crate::morgan::morgan_fingerprint_bits;
use crate::smiles::{parse_smiles, to_smiles};

/// Average molecular weight, implicit hydrogens included.
pub fn average_mol_weight(mol: &Mol<Atom, Bond>) -> f64 {
    let h_weight = Element::H.atomic_weight();
    mol.atoms().fold(0.0, |acc, idx| {
        let atom = mol.atom(idx);
        let elem_weight = Element::from_atomic_num(atom.atomic_num)
            .map_or(0.0, |e| e.atomic_weight());
        acc + elem_weight + atom.hydrogen_count as f64 * h_weight
    })
}

/// Molecular weight per record; NaN for records that fail to parse.
pub fn molecular_weights<S: AsRef<str>>(smiles_list: &[S]) -> Vec<f64> {
    smiles_list
        .iter()
        .map(|s| match parse_smiles(s.as_ref()) {
            Ok(mol) => average_mol_weight(&mol),
            Err(_) => f64::NAN,
        })
        .collect()
}

/// Whether each record parses as a molecule.
pub fn validate_smiles<S: AsRef<str>>(smiles_list: &[S]) -> Vec<bool> {
    smiles_list
        .iter()
        .map(|s| parse_smiles(s.as_ref()).is_ok())
        .collect()
}

/// Rewrite each record through the SMILES writer; empty string for records
/// that fail to parse.
pub fn canonicalize_smiles<S: AsRef<str>>(smiles_list: &[S]) -> Vec<String> {
    smiles_list
        .iter()
        .map(|s| match parse_smiles(s.as_ref()) {
            Ok(mol) => to_smiles(&mol),
            Err(_) => String::new(),
        })
        .collect()
}

/// Morgan fingerprints as a row-major `len × nbits` byte matrix. Rows for
/// unparseable records are all zero.
pub fn morgan_fingerprint_matrix<S: AsRef<str>>(
    smiles_list: &[S],
    radius: u32,
    nbits: usize,
) -> Vec<u8> {
    let mut matrix = Vec::with_capacity(smiles_list.len() * nbits);
    for s in smiles_list {
        match parse_smiles(s.as_ref()) {
            Ok(mol) => matrix.extend(morgan_fingerprint_bits(&mol, radius, nbits, false)),
            Err(_) => matrix.extend(std::iter::repeat(0u8).take(nbits)),
        }
    }
    matrix
}
