use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::atom::Chirality;
use crate::element::Element;
use crate::mol::Mol;

use super::error::SmartsError;
use super::pattern::{AtomPattern, BondPattern, Query};

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

pub fn parse(input: &str) -> Result<Query, SmartsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SmartsError::EmptyInput);
    }
    Parser {
        chars: trimmed.chars().collect(),
        pos: 0,
    }
    .parse_smarts()
}

impl Parser {
    fn parse_smarts(&mut self) -> Result<Query, SmartsError> {
        let mut mol = Mol::new();
        let mut stack: Vec<(NodeIndex, Option<BondPattern>)> = Vec::new();
        let mut current: Option<NodeIndex> = None;
        let mut pending_bond: Option<BondPattern> = None;
        let mut ring_map: HashMap<u16, (NodeIndex, Option<BondPattern>)> = HashMap::new();

        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];
            match ch {
                '[' => {
                    let atom = self.parse_bracket_atom()?;
                    let idx = mol.add_atom(atom);
                    if let Some(prev) = current {
                        let bond = pending_bond.take().unwrap_or_default();
                        mol.add_bond(prev, idx, bond);
                    }
                    current = Some(idx);
                }
                '(' => {
                    self.pos += 1;
                    match current {
                        Some(cur) => stack.push((cur, pending_bond.take())),
                        None => return Err(SmartsError::UnmatchedParen { pos: self.pos - 1 }),
                    }
                }
                ')' => {
                    self.pos += 1;
                    match stack.pop() {
                        Some((prev, saved_bond)) => {
                            current = Some(prev);
                            pending_bond = saved_bond;
                        }
                        None => return Err(SmartsError::UnmatchedParen { pos: self.pos - 1 }),
                    }
                }
                '.' => {
                    self.pos += 1;
                    current = None;
                    pending_bond = None;
                }
                '-' | '=' | '#' | '~' | ':' | '/' | '\\' => {
                    self.pos += 1;
                    pending_bond = Some(match ch {
                        '-' | '/' | '\\' => BondPattern::Single,
                        '=' => BondPattern::Double,
                        '#' => BondPattern::Triple,
                        '~' => BondPattern::Any,
                        _ => BondPattern::Aromatic,
                    });
                }
                '0'..='9' | '%' => {
                    let digit = self.parse_ring_digit()?;
                    let Some(cur) = current else {
                        return Err(SmartsError::UnexpectedChar { pos: self.pos, ch });
                    };
                    if let Some((other, saved_bond)) = ring_map.remove(&digit) {
                        let bond = pending_bond
                            .take()
                            .or(saved_bond)
                            .unwrap_or_default();
                        mol.add_bond(cur, other, bond);
                    } else {
                        ring_map.insert(digit, (cur, pending_bond.take()));
                    }
                }
                _ => {
                    let atom = self.parse_bare_atom()?;
                    let idx = mol.add_atom(atom);
                    if let Some(prev) = current {
                        let bond = pending_bond.take().unwrap_or_default();
                        mol.add_bond(prev, idx, bond);
                    }
                    current = Some(idx);
                }
            }
        }

        if !stack.is_empty() {
            return Err(SmartsError::UnmatchedParen { pos: self.pos });
        }
        if let Some((&digit, _)) = ring_map.iter().next() {
            return Err(SmartsError::UnclosedRing { digit });
        }

        Ok(mol)
    }

    fn parse_ring_digit(&mut self) -> Result<u16, SmartsError> {
        if self.chars[self.pos] == '%' {
            let start = self.pos;
            self.pos += 1;
            if self.pos + 1 < self.chars.len()
                && self.chars[self.pos].is_ascii_digit()
                && self.chars[self.pos + 1].is_ascii_digit()
            {
                let d1 = self.chars[self.pos].to_digit(10).unwrap() as u16;
                let d2 = self.chars[self.pos + 1].to_digit(10).unwrap() as u16;
                self.pos += 2;
                Ok(d1 * 10 + d2)
            } else {
                Err(SmartsError::UnexpectedChar {
                    pos: start,
                    ch: '%',
                })
            }
        } else {
            let d = self.chars[self.pos].to_digit(10).unwrap() as u16;
            self.pos += 1;
            Ok(d)
        }
    }

    fn parse_bare_atom(&mut self) -> Result<AtomPattern, SmartsError> {
        let start = self.pos;
        let ch = self.chars[self.pos];

        if ch == '*' {
            self.pos += 1;
            return Ok(AtomPattern::default());
        }

        for &(sym, num) in &[('b', 5u8), ('c', 6), ('n', 7), ('o', 8), ('p', 15), ('s', 16)] {
            if ch == sym {
                self.pos += 1;
                return Ok(AtomPattern {
                    atomic_num: Some(num),
                    aromatic: Some(true),
                    ..AtomPattern::default()
                });
            }
        }

        if ch.is_ascii_uppercase() {
            // Two-char organic-subset symbols first (Cl, Br).
            if self.pos + 1 < self.chars.len() && self.chars[self.pos + 1].is_ascii_lowercase() {
                let sym: String = self.chars[self.pos..=self.pos + 1].iter().collect();
                if let Some(elem) = Element::from_symbol(&sym) {
                    if elem.is_organic_subset() {
                        self.pos += 2;
                        return Ok(element_pattern(elem));
                    }
                }
            }
            let sym: String = self.chars[self.pos..=self.pos].iter().collect();
            if let Some(elem) = Element::from_symbol(&sym) {
                if elem.is_organic_subset() {
                    self.pos += 1;
                    return Ok(element_pattern(elem));
                }
            }
        }

        Err(SmartsError::UnexpectedChar { pos: start, ch })
    }

    fn parse_bracket_atom(&mut self) -> Result<AtomPattern, SmartsError> {
        let bracket_start = self.pos;
        self.pos += 1; // skip '['

        let mut pattern = AtomPattern {
            isotope: self.parse_number().unwrap_or(0) as u16,
            ..AtomPattern::default()
        };

        if self.pos >= self.chars.len() {
            return Err(SmartsError::UnclosedBracket { pos: bracket_start });
        }

        match self.chars[self.pos] {
            '*' => {
                self.pos += 1;
            }
            '#' => {
                self.pos += 1;
                let num = self
                    .parse_number()
                    .ok_or(SmartsError::InvalidAtomicNum { pos: self.pos })?;
                if num == 0 || num > 118 {
                    return Err(SmartsError::InvalidAtomicNum { pos: self.pos });
                }
                pattern.atomic_num = Some(num as u8);
            }
            _ => {
                let (elem, aromatic) = self.parse_bracket_element(bracket_start)?;
                pattern.atomic_num = Some(elem.atomic_num());
                pattern.aromatic = Some(aromatic);
            }
        }

        if self.pos < self.chars.len() && self.chars[self.pos] == '@' {
            self.pos += 1;
            if self.pos < self.chars.len() && self.chars[self.pos] == '@' {
                self.pos += 1;
                pattern.chirality = Chirality::Cw;
            } else {
                pattern.chirality = Chirality::Ccw;
            }
        }

        if self.pos < self.chars.len() && self.chars[self.pos] == 'H' {
            self.pos += 1;
            pattern.hcount = Some(self.parse_number().unwrap_or(1) as u8);
        }

        if self.pos < self.chars.len() {
            match self.chars[self.pos] {
                '+' => {
                    self.pos += 1;
                    pattern.charge = Some(self.parse_number().unwrap_or(1) as i8);
                }
                '-' => {
                    self.pos += 1;
                    pattern.charge = Some(-(self.parse_number().unwrap_or(1) as i8));
                }
                _ => {}
            }
        }

        if self.pos < self.chars.len() && self.chars[self.pos] == ':' {
            self.pos += 1;
            pattern.map_num = self.parse_number().unwrap_or(0) as u16;
        }

        if self.pos >= self.chars.len() || self.chars[self.pos] != ']' {
            return Err(SmartsError::UnclosedBracket { pos: bracket_start });
        }
        self.pos += 1;

        Ok(pattern)
    }

    fn parse_bracket_element(
        &mut self,
        bracket_start: usize,
    ) -> Result<(Element, bool), SmartsError> {
        if self.pos >= self.chars.len() {
            return Err(SmartsError::UnclosedBracket { pos: bracket_start });
        }

        let aromatic_map: &[(&str, Element)] = &[
            ("se", Element::Se),
            ("te", Element::Te),
            ("b", Element::B),
            ("c", Element::C),
            ("n", Element::N),
            ("o", Element::O),
            ("p", Element::P),
            ("s", Element::S),
        ];
        for &(pat, elem) in aromatic_map {
            if self.pos + pat.len() <= self.chars.len() {
                let slice: String = self.chars[self.pos..self.pos + pat.len()].iter().collect();
                if slice == pat {
                    let after = self.pos + pat.len();
                    let next_is_lower =
                        after < self.chars.len() && self.chars[after].is_ascii_lowercase();
                    if !next_is_lower || pat.len() == 2 {
                        self.pos += pat.len();
                        return Ok((elem, true));
                    }
                }
            }
        }

        if self.pos + 1 < self.chars.len()
            && self.chars[self.pos].is_ascii_uppercase()
            && self.chars[self.pos + 1].is_ascii_lowercase()
        {
            let sym: String = self.chars[self.pos..=self.pos + 1].iter().collect();
            if let Some(e) = Element::from_symbol(&sym) {
                self.pos += 2;
                return Ok((e, false));
            }
        }

        if self.chars[self.pos].is_ascii_uppercase() {
            let sym: String = self.chars[self.pos..=self.pos].iter().collect();
            if let Some(e) = Element::from_symbol(&sym) {
                self.pos += 1;
                return Ok((e, false));
            }
        }

        Err(SmartsError::UnexpectedChar {
            pos: self.pos,
            ch: self.chars[self.pos],
        })
    }

    fn parse_number(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.pos < self.chars.len() && self.chars[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos > start {
            let s: String = self.chars[start..self.pos].iter().collect();
            s.parse().ok()
        } else {
            None
        }
    }
}

fn element_pattern(elem: Element) -> AtomPattern {
    AtomPattern {
        atomic_num: Some(elem.atomic_num()),
        aromatic: Some(false),
        ..AtomPattern::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_mapped_atom() {
        let query = parse("[#6:1]").unwrap();
        assert_eq!(query.atom_count(), 1);
        assert_eq!(query.bond_count(), 0);
        let atom = query.atom(NodeIndex::new(0));
        assert_eq!(atom.atomic_num, Some(6));
        assert_eq!(atom.map_num, 1);
    }

    #[test]
    fn chain_with_bonds() {
        let query = parse("[#6:1]-[#6]=[#8]").unwrap();
        assert_eq!(query.atom_count(), 3);
        assert_eq!(query.bond_count(), 2);
    }

    #[test]
    fn aromatic_ring() {
        let query = parse("[c:1]1:[c]:[c]:[c]:[c]:[c]:1").unwrap();
        assert_eq!(query.atom_count(), 6);
        assert_eq!(query.bond_count(), 6);
    }

    #[test]
    fn bare_atoms() {
        let query = parse("CCO").unwrap();
        assert_eq!(query.atom_count(), 3);
        let o = query.atom(NodeIndex::new(2));
        assert_eq!(o.atomic_num, Some(8));
        assert_eq!(o.aromatic, Some(false));
    }

    #[test]
    fn two_char_bare_elements() {
        let query = parse("ClCBr").unwrap();
        assert_eq!(query.atom_count(), 3);
        assert_eq!(query.atom(NodeIndex::new(0)).atomic_num, Some(17));
        assert_eq!(query.atom(NodeIndex::new(2)).atomic_num, Some(35));
    }

    #[test]
    fn wildcard_atom() {
        let query = parse("[#6]~*").unwrap();
        assert_eq!(query.atom_count(), 2);
        assert_eq!(query.atom(NodeIndex::new(1)).atomic_num, None);
        assert!(!query.atom(NodeIndex::new(1)).is_hetero());
    }

    #[test]
    fn charge_and_chirality() {
        let query = parse("[#8-:0]").unwrap();
        assert_eq!(query.atom(NodeIndex::new(0)).charge, Some(-1));

        let query = parse("[#6@@:1]").unwrap();
        assert_eq!(query.atom(NodeIndex::new(0)).chirality, Chirality::Cw);
    }

    #[test]
    fn hetero_classification() {
        let query = parse("[#6]-[#8]-[#1]").unwrap();
        let hetero: usize = query
            .atoms()
            .filter(|&i| query.atom(i).is_hetero())
            .count();
        assert_eq!(hetero, 1);
    }

    #[test]
    fn branches() {
        let query = parse("[#6:1](-[#6])-[#8]").unwrap();
        assert_eq!(query.atom_count(), 3);
        assert_eq!(query.bond_count(), 2);
    }

    #[test]
    fn errors() {
        assert!(parse("").is_err());
        assert!(parse("[#6").is_err());
        assert!(parse("[#999]").is_err());
        assert!(parse("[#6](").is_err());
        assert!(parse("[#6]1[#6]").is_err());
        assert!(parse("Qq").is_err());
    }
}
