//! Grid storage.
//!
//! The grid is a `size x size` board of optional tokens stored in a flat,
//! row-major `Vec` (`row * size + col`). Row 0 is the bottom row.
//!
//! The grid owns its tokens and keeps each token's `cell` back-reference in
//! sync on every spawn, move and swap. Out-of-bounds access is a caller bug
//! and panics.

use crate::core::{Cell, Token, TokenId, TokenType};

/// Square board of optional tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<Token>>,
    next_id: u32,
}

impl Grid {
    /// Create an empty grid.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
            next_id: 0,
        }
    }

    /// Build a grid from symbol rows.
    ///
    /// Rows are listed top (highest row) first so the layout reads like the
    /// board on screen. `.` marks an empty slot; other characters are
    /// [`TokenType::symbol`]s.
    ///
    /// ```
    /// use rune_match::board::Grid;
    /// use rune_match::core::{Cell, TokenType};
    ///
    /// let grid = Grid::from_layout(&[
    ///     "R..",
    ///     ".G.",
    ///     "BBY",
    /// ]);
    /// assert_eq!(grid.kind_at(Cell::new(0, 0)), Some(TokenType::Blue));
    /// assert_eq!(grid.kind_at(Cell::new(2, 0)), Some(TokenType::Red));
    /// assert_eq!(grid.kind_at(Cell::new(2, 2)), None);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the layout is not square or contains an unknown symbol.
    #[must_use]
    pub fn from_layout(rows: &[&str]) -> Self {
        let size = rows.len();
        let mut grid = Self::new(size);
        for (i, line) in rows.iter().enumerate() {
            let row = size - 1 - i;
            let symbols: Vec<char> = line.chars().collect();
            assert_eq!(symbols.len(), size, "layout row {} is not {} wide", i, size);
            for (col, symbol) in symbols.into_iter().enumerate() {
                if symbol == '.' {
                    continue;
                }
                let kind = TokenType::from_symbol(symbol)
                    .unwrap_or_else(|| panic!("unknown token symbol {:?}", symbol));
                grid.spawn(Cell::new(row, col), kind);
            }
        }
        grid
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        assert!(
            self.in_bounds(cell),
            "cell {} out of bounds for {}x{} grid",
            cell,
            self.size,
            self.size
        );
        cell.row * self.size + cell.col
    }

    /// Side length of the grid.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if a cell lies on the grid.
    #[must_use]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    /// Get the token at a cell.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<&Token> {
        self.cells[self.index(cell)].as_ref()
    }

    /// Get the token type at a cell.
    #[must_use]
    pub fn kind_at(&self, cell: Cell) -> Option<TokenType> {
        self.get(cell).map(|token| token.kind)
    }

    /// Check if a cell holds no token.
    #[must_use]
    pub fn is_vacant(&self, cell: Cell) -> bool {
        self.get(cell).is_none()
    }

    /// Create a new token in an empty cell and return its id.
    pub fn spawn(&mut self, cell: Cell, kind: TokenType) -> TokenId {
        let idx = self.index(cell);
        assert!(self.cells[idx].is_none(), "cell {} already occupied", cell);
        let id = TokenId(self.next_id);
        self.next_id += 1;
        self.cells[idx] = Some(Token { id, kind, cell });
        id
    }

    /// Remove and return the token at a cell.
    pub fn take(&mut self, cell: Cell) -> Option<Token> {
        let idx = self.index(cell);
        self.cells[idx].take()
    }

    /// Move the token at `from` into the empty cell `to`.
    ///
    /// Returns the moved token's id, or `None` if `from` was empty.
    pub fn move_token(&mut self, from: Cell, to: Cell) -> Option<TokenId> {
        let dst = self.index(to);
        assert!(self.cells[dst].is_none(), "cell {} already occupied", to);
        let mut token = self.take(from)?;
        token.cell = to;
        self.cells[dst] = Some(token);
        Some(token.id)
    }

    /// Exchange the contents of two cells. Either may be empty.
    pub fn swap(&mut self, a: Cell, b: Cell) {
        let ia = self.index(a);
        let ib = self.index(b);
        self.cells.swap(ia, ib);
        if let Some(token) = self.cells[ia].as_mut() {
            token.cell = a;
        }
        if let Some(token) = self.cells[ib].as_mut() {
            token.cell = b;
        }
    }

    /// Remove every token, returning them in row-major order.
    pub fn clear(&mut self) -> Vec<Token> {
        self.cells.iter_mut().filter_map(Option::take).collect()
    }

    /// Iterate over every cell coordinate in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Cell::new(row, col)))
    }

    /// Iterate over live tokens in row-major order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.cells.iter().flatten()
    }

    /// Number of live tokens.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens().count()
    }

    /// Token types in row-major order, for comparing board contents.
    #[must_use]
    pub fn kinds(&self) -> Vec<Option<TokenType>> {
        self.cells.iter().map(|slot| slot.map(|token| token.kind)).collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in (0..self.size).rev() {
            for col in 0..self.size {
                let symbol = self.kind_at(Cell::new(row, col)).map_or('.', TokenType::symbol);
                write!(f, "{}", symbol)?;
            }
            if row > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
