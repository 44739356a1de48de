use crate::element::Element;
use crate::smiles::error::SmilesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond(BondToken),
    RingClosure {
        bond: Option<BondToken>,
        digit: u16,
        pos: usize,
    },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: u16,
    pub chirality: ChiralityToken,
    pub hcount: Option<u8>,
    pub charge: i8,
    pub map_num: u16,
    pub is_bracket: bool,
    pub pos: usize,
}

impl AtomToken {
    fn bare(element: Element, is_aromatic: bool, pos: usize) -> Self {
        Self {
            element,
            is_aromatic,
            isotope: 0,
            chirality: ChiralityToken::None,
            hcount: None,
            charge: 0,
            map_num: 0,
            is_bracket: false,
            pos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChiralityToken {
    None,
    CounterClockwise,
    Clockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Aromatic,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let mut scanner = Scanner {
        chars: input.chars().collect(),
        pos: 0,
    };
    let mut tokens = Vec::new();

    while let Some(ch) = scanner.peek() {
        let pos = scanner.pos;
        match ch {
            ch if ch.is_ascii_whitespace() => {
                scanner.pos += 1;
            }
            '[' => tokens.push(Token::Atom(scanner.bracket_atom()?)),
            '(' => {
                scanner.pos += 1;
                tokens.push(Token::OpenParen(pos));
            }
            ')' => {
                scanner.pos += 1;
                tokens.push(Token::CloseParen(pos));
            }
            '.' => {
                scanner.pos += 1;
                tokens.push(Token::Dot(pos));
            }
            '=' => {
                scanner.pos += 1;
                tokens.push(Token::Bond(BondToken::Double));
            }
            '#' => {
                scanner.pos += 1;
                tokens.push(Token::Bond(BondToken::Triple));
            }
            ':' => {
                scanner.pos += 1;
                tokens.push(Token::Bond(BondToken::Aromatic));
            }
            // Directional bonds are accepted but carry no stereo here.
            '/' | '\\' => {
                scanner.pos += 1;
                tokens.push(Token::Bond(BondToken::Single));
            }
            '-' => {
                // Only meaningful as a bond, so something bondable must
                // precede it.
                let bondable = matches!(
                    tokens.last(),
                    Some(Token::Atom(_) | Token::RingClosure { .. } | Token::CloseParen(_))
                );
                if !bondable {
                    return Err(SmilesError::UnexpectedChar { pos, ch: '-' });
                }
                scanner.pos += 1;
                tokens.push(Token::Bond(BondToken::Single));
            }
            '0'..='9' | '%' => {
                let bond = take_pending_bond(&mut tokens);
                let digit = scanner.ring_digit()?;
                tokens.push(Token::RingClosure { bond, digit, pos });
            }
            _ => tokens.push(Token::Atom(scanner.organic_atom()?)),
        }
    }

    Ok(tokens)
}

/// A bond symbol directly before a ring digit belongs to the ring closure,
/// not to the next atom.
fn take_pending_bond(tokens: &mut Vec<Token>) -> Option<BondToken> {
    if let Some(&Token::Bond(bond)) = tokens.last() {
        tokens.pop();
        return Some(bond);
    }
    None
}

fn aromatic_organic(ch: char) -> Option<Element> {
    match ch {
        'b' => Some(Element::B),
        'c' => Some(Element::C),
        'n' => Some(Element::N),
        'o' => Some(Element::O),
        'p' => Some(Element::P),
        's' => Some(Element::S),
        _ => None,
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn digits(&mut self) -> Option<u32> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse().ok()
    }

    /// Bare (unbracketed) atom: an organic-subset element, lowercase when
    /// aromatic. Two-letter symbols take priority so `Cl` never reads as
    /// carbon.
    fn organic_atom(&mut self) -> Result<AtomToken, SmilesError> {
        let pos = self.pos;
        let ch = self.chars[self.pos];

        if let Some(elem) = aromatic_organic(ch) {
            self.pos += 1;
            return Ok(AtomToken::bare(elem, true, pos));
        }

        if ch.is_ascii_uppercase() {
            if let Some(next) = self.peek_ahead(1) {
                if next.is_ascii_lowercase() {
                    let sym: String = [ch, next].into_iter().collect();
                    if let Some(elem) = Element::from_symbol(&sym) {
                        if elem.is_organic_subset() {
                            self.pos += 2;
                            return Ok(AtomToken::bare(elem, false, pos));
                        }
                    }
                }
            }
            if let Some(elem) = Element::from_symbol(&ch.to_string()) {
                if elem.is_organic_subset() {
                    self.pos += 1;
                    return Ok(AtomToken::bare(elem, false, pos));
                }
            }
        }

        Err(SmilesError::UnexpectedChar { pos, ch })
    }

    /// Ring digit: a single digit, or `%` followed by exactly two.
    fn ring_digit(&mut self) -> Result<u16, SmilesError> {
        let pos = self.pos;
        if self.eat('%') {
            match (self.peek(), self.peek_ahead(1)) {
                (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                    self.pos += 2;
                    Ok((a as u16 - '0' as u16) * 10 + (b as u16 - '0' as u16))
                }
                _ => Err(SmilesError::UnexpectedChar { pos, ch: '%' }),
            }
        } else {
            let digit = self.chars[self.pos] as u16 - '0' as u16;
            self.pos += 1;
            Ok(digit)
        }
    }

    fn bracket_atom(&mut self) -> Result<AtomToken, SmilesError> {
        let start = self.pos;
        self.pos += 1; // '['

        let isotope = self.digits().unwrap_or(0) as u16;
        let (element, is_aromatic) = self.bracket_element(start)?;
        let chirality = self.bracket_chirality();
        let hcount = self.bracket_hcount();
        let charge = self.bracket_charge(start)?;
        let map_num = if self.eat(':') {
            self.digits().unwrap_or(0) as u16
        } else {
            0
        };

        if !self.eat(']') {
            return Err(SmilesError::UnclosedBracket { pos: start });
        }

        Ok(AtomToken {
            element,
            is_aromatic,
            isotope,
            chirality,
            hcount: Some(hcount),
            charge,
            map_num,
            is_bracket: true,
            pos: start,
        })
    }

    fn bracket_element(&mut self, bracket_start: usize) -> Result<(Element, bool), SmilesError> {
        let Some(ch) = self.peek() else {
            return Err(SmilesError::UnclosedBracket { pos: bracket_start });
        };

        if ch.is_ascii_lowercase() {
            // Aromatic symbols are lowercase; se and te are the two-letter
            // ones.
            if let Some(next) = self.peek_ahead(1) {
                if next.is_ascii_lowercase() {
                    let pair: String = [ch, next].into_iter().collect();
                    let elem = match pair.as_str() {
                        "se" => Some(Element::Se),
                        "te" => Some(Element::Te),
                        _ => None,
                    };
                    return match elem {
                        Some(elem) => {
                            self.pos += 2;
                            Ok((elem, true))
                        }
                        None => Err(SmilesError::InvalidElement {
                            pos: self.pos,
                            text: pair,
                        }),
                    };
                }
            }
            return match aromatic_organic(ch) {
                Some(elem) => {
                    self.pos += 1;
                    Ok((elem, true))
                }
                None => Err(SmilesError::InvalidElement {
                    pos: self.pos,
                    text: ch.to_string(),
                }),
            };
        }

        if ch.is_ascii_uppercase() {
            // The longest symbol that names an element wins.
            if let Some(next) = self.peek_ahead(1) {
                if next.is_ascii_lowercase() {
                    let sym: String = [ch, next].into_iter().collect();
                    if let Some(elem) = Element::from_symbol(&sym) {
                        self.pos += 2;
                        return Ok((elem, false));
                    }
                }
            }
            if let Some(elem) = Element::from_symbol(&ch.to_string()) {
                self.pos += 1;
                return Ok((elem, false));
            }
        }

        Err(SmilesError::InvalidElement {
            pos: self.pos,
            text: ch.to_string(),
        })
    }

    fn bracket_chirality(&mut self) -> ChiralityToken {
        if !self.eat('@') {
            return ChiralityToken::None;
        }
        if self.eat('@') {
            ChiralityToken::Clockwise
        } else {
            ChiralityToken::CounterClockwise
        }
    }

    fn bracket_hcount(&mut self) -> u8 {
        if !self.eat('H') {
            return 0;
        }
        self.digits().map_or(1, |n| n as u8)
    }

    fn bracket_charge(&mut self, bracket_start: usize) -> Result<i8, SmilesError> {
        let sign_char = match self.peek() {
            Some(ch @ ('+' | '-')) => ch,
            _ => return Ok(0),
        };
        self.pos += 1;
        let sign: i8 = if sign_char == '+' { 1 } else { -1 };

        // Either repeated signs ([O--]) or one explicit count ([O-2]).
        let mut magnitude: i8 = 1;
        if self.peek() == Some(sign_char) {
            while self.eat(sign_char) {
                magnitude = magnitude
                    .checked_add(1)
                    .ok_or(SmilesError::InvalidCharge { pos: bracket_start })?;
            }
        } else if let Some(value) = self.digits() {
            magnitude = i8::try_from(value)
                .map_err(|_| SmilesError::InvalidCharge { pos: bracket_start })?;
        }

        sign.checked_mul(magnitude)
            .ok_or(SmilesError::InvalidCharge { pos: bracket_start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_methane() {
        let tokens = tokenize("C").unwrap();
        assert_eq!(tokens.len(), 1);
        match &tokens[0] {
            Token::Atom(a) => {
                assert_eq!(a.element, Element::C);
                assert!(!a.is_bracket);
                assert!(!a.is_aromatic);
            }
            _ => panic!("expected atom"),
        }
    }

    #[test]
    fn tokenize_ethene() {
        let tokens = tokenize("C=C").unwrap();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn two_letter_bare_elements() {
        let tokens = tokenize("ClCBr").unwrap();
        assert_eq!(tokens.len(), 3);
        match (&tokens[0], &tokens[2]) {
            (Token::Atom(a), Token::Atom(b)) => {
                assert_eq!(a.element, Element::Cl);
                assert_eq!(b.element, Element::Br);
            }
            _ => panic!("expected atoms"),
        }
    }

    #[test]
    fn tokenize_bracket_atom() {
        let tokens = tokenize("[NH4+]").unwrap();
        assert_eq!(tokens.len(), 1);
        match &tokens[0] {
            Token::Atom(a) => {
                assert_eq!(a.element, Element::N);
                assert!(a.is_bracket);
                assert_eq!(a.hcount, Some(4));
                assert_eq!(a.charge, 1);
            }
            _ => panic!("expected atom"),
        }
    }

    #[test]
    fn tokenize_isotope() {
        let tokens = tokenize("[13C]").unwrap();
        match &tokens[0] {
            Token::Atom(a) => {
                assert_eq!(a.isotope, 13);
                assert_eq!(a.element, Element::C);
            }
            _ => panic!("expected atom"),
        }
    }

    #[test]
    fn tokenize_ring_closure() {
        let tokens = tokenize("C1CC1").unwrap();
        assert_eq!(tokens.len(), 5);
        assert!(matches!(&tokens[1], Token::RingClosure { digit: 1, .. }));
    }

    #[test]
    fn tokenize_percent_ring() {
        let tokens = tokenize("C%10CC%10").unwrap();
        assert!(matches!(&tokens[1], Token::RingClosure { digit: 10, .. }));
    }

    #[test]
    fn ring_closure_takes_preceding_bond() {
        let tokens = tokenize("C=1CCCCC1").unwrap();
        assert!(matches!(
            &tokens[1],
            Token::RingClosure {
                bond: Some(BondToken::Double),
                ..
            }
        ));
    }

    #[test]
    fn tokenize_chirality() {
        let tokens = tokenize("[C@@H](F)(Cl)Br").unwrap();
        match &tokens[0] {
            Token::Atom(a) => {
                assert_eq!(a.chirality, ChiralityToken::Clockwise);
                assert_eq!(a.hcount, Some(1));
            }
            _ => panic!("expected atom"),
        }
    }

    #[test]
    fn tokenize_aromatic() {
        let tokens = tokenize("c1ccccc1").unwrap();
        assert_eq!(tokens.len(), 8);
        match &tokens[0] {
            Token::Atom(a) => {
                assert!(a.is_aromatic);
                assert_eq!(a.element, Element::C);
            }
            _ => panic!("expected atom"),
        }
    }

    #[test]
    fn bracket_aromatic_se() {
        let tokens = tokenize("[se]").unwrap();
        match &tokens[0] {
            Token::Atom(a) => {
                assert!(a.is_aromatic);
                assert_eq!(a.element, Element::Se);
            }
            _ => panic!("expected atom"),
        }
    }

    #[test]
    fn negative_charge_variants() {
        let tokens = tokenize("[O-]").unwrap();
        match &tokens[0] {
            Token::Atom(a) => assert_eq!(a.charge, -1),
            _ => panic!("expected atom"),
        }

        let tokens = tokenize("[O-2]").unwrap();
        match &tokens[0] {
            Token::Atom(a) => assert_eq!(a.charge, -2),
            _ => panic!("expected atom"),
        }

        let tokens = tokenize("[O--]").unwrap();
        match &tokens[0] {
            Token::Atom(a) => assert_eq!(a.charge, -2),
            _ => panic!("expected atom"),
        }
    }

    #[test]
    fn atom_map_number() {
        let tokens = tokenize("[C:1]").unwrap();
        match &tokens[0] {
            Token::Atom(a) => assert_eq!(a.map_num, 1),
            _ => panic!("expected atom"),
        }
    }

    #[test]
    fn direction_slashes_become_single_bonds() {
        let tokens = tokenize("F/C=C/F").unwrap();
        assert!(tokens
            .iter()
            .any(|t| matches!(t, Token::Bond(BondToken::Single))));
    }

    #[test]
    fn leading_dash_rejected() {
        assert!(tokenize("-C").is_err());
    }

    #[test]
    fn reject_unknown_char() {
        assert!(tokenize("X").is_err());
        assert!(tokenize("C$C").is_err());
    }
}
