use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Symbol {
    A,
    B,
    C,
    D,
}

impl Symbol {
    pub const ALL: [Symbol; 4] = [Symbol::A, Symbol::B, Symbol::C, Symbol::D];

    pub fn from_index(i: u8) -> Self {
        match i % 4 {
            0 => Symbol::A,
            1 => Symbol::B,
            2 => Symbol::C,
            _ => Symbol::D,
        }
    }

    pub fn to_index(self) -> u8 {
        match self {
            Symbol::A => 0,
            Symbol::B => 1,
            Symbol::C => 2,
            Symbol::D => 3,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Symbol::A => 'A',
            Symbol::B => 'B',
            Symbol::C => 'C',
            Symbol::D => 'D',
        }
    }

    /// Weight from the symbol table. Reel sampling is uniform and no payout
    /// rule reads this yet.
    pub fn weight(self) -> u32 {
        match self {
            Symbol::A => 5,
            Symbol::B => 4,
            Symbol::C => 3,
            Symbol::D => 2,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Glyph to weight mapping, in key order.
pub fn symbol_table() -> [(char, u32); 4] {
    Symbol::ALL.map(|s| (s.glyph(), s.weight()))
}
