//! Token types and live token instances.
//!
//! ## TokenType
//!
//! The six rune kinds. Kinds carry no ordering semantics; only equality
//! matters for matching.
//!
//! ## Token
//!
//! A live piece on the board. Every token has a `TokenId` that stays stable
//! while the token falls or is swapped, so the presentation layer can key its
//! sprites by it.

use serde::{Deserialize, Serialize};

use super::Cell;

/// Rune kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    Blue,
    Red,
    Orange,
    Purple,
    Yellow,
    Green,
}

impl TokenType {
    /// Every kind, in declaration order.
    pub const ALL: [TokenType; 6] = [
        TokenType::Blue,
        TokenType::Red,
        TokenType::Orange,
        TokenType::Purple,
        TokenType::Yellow,
        TokenType::Green,
    ];

    /// One-character symbol used in text layouts.
    ///
    /// ```
    /// use rune_match::core::TokenType;
    ///
    /// assert_eq!(TokenType::Purple.symbol(), 'P');
    /// assert_eq!(TokenType::from_symbol('P'), Some(TokenType::Purple));
    /// assert_eq!(TokenType::from_symbol('x'), None);
    /// ```
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            TokenType::Blue => 'B',
            TokenType::Red => 'R',
            TokenType::Orange => 'O',
            TokenType::Purple => 'P',
            TokenType::Yellow => 'Y',
            TokenType::Green => 'G',
        }
    }

    /// Parse a symbol produced by [`TokenType::symbol`].
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.symbol() == symbol)
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Stable identifier for a live token.
///
/// Allocated monotonically by the grid; never reused within a board's life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl TokenId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

/// A token occupying exactly one grid cell.
///
/// `cell` is a back-reference that the grid keeps in sync on every move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub kind: TokenType,
    pub cell: Cell,
}
