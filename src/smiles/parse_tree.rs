use std::collections::HashMap;

use crate::element::Element;
use crate::smiles::error::SmilesError;
use crate::smiles::tokenizer::{AtomToken, BondToken, ChiralityToken, Token};

#[derive(Debug, Clone)]
pub struct ParseAtom {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: u16,
    pub chirality: ChiralityToken,
    pub hcount: Option<u8>,
    pub charge: i8,
    pub map_num: u16,
    pub is_bracket: bool,
    pub neighbors: Vec<Neighbor>,
}

impl ParseAtom {
    fn from_token(tok: &AtomToken) -> Self {
        Self {
            element: tok.element,
            is_aromatic: tok.is_aromatic,
            isotope: tok.isotope,
            chirality: tok.chirality,
            hcount: tok.hcount,
            charge: tok.charge,
            map_num: tok.map_num,
            is_bracket: tok.is_bracket,
            neighbors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Neighbor {
    pub bond: Option<BondToken>,
    pub atom_idx: usize,
}

#[derive(Debug, Clone)]
pub struct ParseTree {
    pub atoms: Vec<ParseAtom>,
}

/// Resolve branches and ring closures into an adjacency structure, keeping
/// atoms in the order they appear in the input.
pub fn build_parse_tree(tokens: &[Token]) -> Result<ParseTree, SmilesError> {
    let mut atoms: Vec<ParseAtom> = Vec::new();
    let mut branch_stack: Vec<usize> = Vec::new();
    let mut last_atom: Option<usize> = None;
    let mut pending_bond: Option<BondToken> = None;
    let mut open_rings: HashMap<u16, (usize, Option<BondToken>)> = HashMap::new();

    for token in tokens {
        match token {
            Token::Atom(tok) => {
                let idx = atoms.len();
                atoms.push(ParseAtom::from_token(tok));
                if let Some(prev) = last_atom {
                    link(&mut atoms, prev, idx, pending_bond.take());
                }
                pending_bond = None;
                last_atom = Some(idx);
            }
            Token::Bond(bond) => pending_bond = Some(*bond),
            Token::RingClosure { bond, digit, pos } => {
                let cur = last_atom.ok_or(SmilesError::InvalidRingBond {
                    digit: *digit,
                    pos: *pos,
                })?;
                let closure_bond = bond.or(pending_bond.take());
                match open_rings.remove(digit) {
                    Some((open_idx, open_bond)) => {
                        let bond = merge_ring_bonds(closure_bond, open_bond, *digit)?;
                        link(&mut atoms, open_idx, cur, bond);
                    }
                    None => {
                        open_rings.insert(*digit, (cur, closure_bond));
                    }
                }
            }
            Token::OpenParen(pos) => {
                branch_stack.push(last_atom.ok_or(SmilesError::UnmatchedParen { pos: *pos })?);
            }
            Token::CloseParen(pos) => {
                last_atom =
                    Some(branch_stack.pop().ok_or(SmilesError::UnmatchedParen { pos: *pos })?);
                pending_bond = None;
            }
            Token::Dot(_) => {
                last_atom = None;
                pending_bond = None;
            }
        }
    }

    if !branch_stack.is_empty() {
        return Err(SmilesError::UnmatchedParen { pos: 0 });
    }
    if let Some(&digit) = open_rings.keys().min() {
        return Err(SmilesError::UnclosedRing { digit });
    }

    Ok(ParseTree { atoms })
}

fn link(atoms: &mut [ParseAtom], a: usize, b: usize, bond: Option<BondToken>) {
    atoms[a].neighbors.push(Neighbor { bond, atom_idx: b });
    atoms[b].neighbors.push(Neighbor { bond, atom_idx: a });
}

/// A ring bond may be spelled at the opening digit, the closing digit, or
/// both; spelling it differently at the two ends is an error.
fn merge_ring_bonds(
    close: Option<BondToken>,
    open: Option<BondToken>,
    digit: u16,
) -> Result<Option<BondToken>, SmilesError> {
    match (close, open) {
        (Some(a), Some(b)) if a != b => Err(SmilesError::RingBondConflict { digit }),
        _ => Ok(close.or(open)),
    }
}
