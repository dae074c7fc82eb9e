use std::fmt::{Display, Formatter};
use std::ops::Index;

use rand::Rng;
use rand::seq::index;

use crate::error::BingoError;
use crate::rules::BingoRules;
use crate::types::{Ball, Cell, column_label};

/// A square BINGO card. Cells are stored row-major, each one owned independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    size: usize,
    cells: Vec<Cell>,
}

impl Card {
    /// Generate a random card under `rules`.
    ///
    /// Each column samples `card_size` distinct numbers from its own range, so every number on
    /// the card is unique. Cell `(row, col)` gets the `row`-th number sampled for `col`. When the
    /// rules ask for a free centre on an odd-sized card, the centre is overwritten with
    /// [Cell::FREE].
    pub fn new<R: Rng + ?Sized>(rules: &BingoRules, rng: &mut R) -> Result<Card, BingoError> {
        rules.validate()?;
        let size = rules.card_size;

        let mut cells = vec![Cell::default(); size * size];
        for col in 0..size {
            let low = *rules.column_range(col).start();
            let sampled = index::sample(rng, rules.column_pool as usize, size);
            for (row, offset) in sampled.into_iter().enumerate() {
                cells[row * size + col] = Cell::new(low + offset as Ball);
            }
        }

        if let Some((row, col)) = rules.free_cell() {
            cells[row * size + col] = Cell::FREE;
        }

        Ok(Card { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell, BingoError> {
        let idx = self.offset(row, col)?;
        Ok(&self.cells[idx])
    }

    pub fn is_marked(&self, row: usize, col: usize) -> Result<bool, BingoError> {
        Ok(self.cell(row, col)?.marked)
    }

    /// Dab a cell. Marking an already marked cell does nothing.
    pub fn mark(&mut self, row: usize, col: usize) -> Result<(), BingoError> {
        let idx = self.offset(row, col)?;
        self.cells[idx].marked = true;
        Ok(())
    }

    /// Mark every cell showing `ball`. Returns whether anything was marked.
    ///
    /// Column ranges are disjoint so at most one cell should match, but the whole card is scanned
    /// regardless.
    pub fn find_and_mark(&mut self, ball: Ball) -> bool {
        let mut found = false;
        for cell in self.cells.iter_mut().filter(|c| c.value == ball) {
            cell.marked = true;
            found = true;
        }
        found
    }

    /// Numbers printed in one column, top to bottom.
    pub fn values_in_column(&self, col: usize) -> Vec<Ball> {
        (0..self.size).map(|row| self[(row, col)].value).collect()
    }

    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.marked).count()
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize, BingoError> {
        if row >= self.size || col >= self.size {
            return Err(BingoError::Index { row, col, size: self.size });
        }
        Ok(row * self.size + col)
    }
}

impl Index<(usize, usize)> for Card {
    type Output = Cell;

    /// Panics when out of bounds, like slice indexing. Use [Card::cell] for a checked lookup.
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(row < self.size && col < self.size, "cell ({}, {}) outside card", row, col);
        &self.cells[row * self.size + col]
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rule = "-".repeat(self.size * 5);
        writeln!(f, "{}", rule)?;
        for col in 0..self.size {
            write!(f, "|{:^3}|", column_label(col, self.size))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", rule)?;
        for row in 0..self.size {
            for col in 0..self.size {
                let cell = self[(row, col)];
                let mark = if cell.marked { '*' } else { ' ' };
                if cell == Cell::FREE {
                    write!(f, "|FR{}|", mark)?;
                } else {
                    write!(f, "|{:>2}{}|", cell.value, mark)?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", rule)
    }
}
