use std::ops::RangeInclusive;

use crate::error::BingoError;

/// The shape of a BINGO game: how wide the card is, how many numbers each column draws from, and
/// whether the centre square comes pre-marked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BingoRules {
    pub card_size: usize,
    /// Numbers available to each column. Column `c` owns `c*pool+1 ..= (c+1)*pool`.
    pub column_pool: u32,
    /// Only honored when `card_size` is odd.
    pub free_center: bool,
}

pub const STANDARD_RULES: BingoRules = BingoRules {
    card_size: 5,
    column_pool: 15,
    free_center: false,
};

pub const STANDARD_RULES_FREE_CENTER: BingoRules = BingoRules {
    free_center: true,
    ..STANDARD_RULES
};

impl Default for BingoRules {
    fn default() -> Self {
        STANDARD_RULES
    }
}

impl BingoRules {
    pub fn validate(&self) -> Result<(), BingoError> {
        if self.card_size == 0 {
            return Err(BingoError::configuration("card size must be at least 1"));
        }
        if self.column_pool == 0 {
            return Err(BingoError::configuration("column pool must be at least 1"));
        }
        if self.card_size as u64 > self.column_pool as u64 {
            return Err(BingoError::configuration(format!(
                "cannot draw {} unique numbers per column from a pool of {}",
                self.card_size, self.column_pool
            )));
        }
        // card_size <= column_pool, so the product fits in a u64.
        if self.card_size as u64 * self.column_pool as u64 > u32::MAX as u64 {
            return Err(BingoError::configuration("number universe does not fit in a u32"));
        }
        Ok(())
    }

    /// Total number of balls in the cage, `size * pool`.
    pub fn universe_size(&self) -> u32 {
        self.card_size as u32 * self.column_pool
    }

    /// Numbers that may appear in column `col`.
    pub fn column_range(&self, col: usize) -> RangeInclusive<u32> {
        let low = col as u32 * self.column_pool + 1;
        low..=low + self.column_pool - 1
    }

    /// The cell pinned as free, if this card has one.
    pub fn free_cell(&self) -> Option<(usize, usize)> {
        if self.free_center && self.card_size % 2 == 1 {
            let mid = self.card_size / 2;
            Some((mid, mid))
        } else {
            None
        }
    }

    /// Length of every try histogram: one bucket per possible ball count, plus bucket zero.
    pub fn histogram_len(&self) -> usize {
        self.universe_size() as usize + 1
    }
}
