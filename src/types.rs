use std::fmt::{Display, Formatter};

use strum_macros::EnumIter;

/// Number printed on a cell. The free cell carries 0.
pub type Ball = u32;

/// One square on a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub value: Ball,
    pub marked: bool,
}

impl Cell {
    pub const FREE: Cell = Cell { value: 0, marked: true };

    pub fn new(value: Ball) -> Self {
        Cell { value, marked: false }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, EnumIter)]
pub enum Axis {
    Row,
    Column,
}

/// A shape that wins the game once every cell in it is marked.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Pattern {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right.
    Diagonal1,
    /// Top-right to bottom-left.
    Diagonal2,
    Corners,
}

impl Pattern {
    /// Number of cells in this pattern on a card of width `size`.
    pub fn len(self, size: usize) -> usize {
        match self {
            Pattern::Corners => 4,
            _ => size,
        }
    }

    /// The `i`th cell of this pattern on a card of width `size`.
    fn nth_cell(self, i: usize, size: usize) -> (usize, usize) {
        let last = size - 1;
        match self {
            Pattern::Row(row) => (row, i),
            Pattern::Column(col) => (i, col),
            Pattern::Diagonal1 => (i, i),
            Pattern::Diagonal2 => (i, last - i),
            Pattern::Corners => [(0, 0), (last, 0), (0, last), (last, last)][i],
        }
    }

    /// Coordinates covered by this pattern on a card of width `size`.
    pub fn cells(self, size: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..self.len(size)).map(move |i| self.nth_cell(i, size))
    }

    /// Roll-up counters that also get credit when this pattern wins.
    pub fn roll_ups(self) -> &'static [RollUp] {
        match self {
            Pattern::Row(_) => &[RollUp::Rows, RollUp::Lines],
            Pattern::Column(_) => &[RollUp::Columns, RollUp::Lines],
            Pattern::Diagonal1 | Pattern::Diagonal2 => &[RollUp::Diagonals],
            Pattern::Corners => &[],
        }
    }

    /// Short machine-friendly name, used for CSV headers.
    pub fn key(self) -> String {
        match self {
            Pattern::Row(i) => format!("row{}", i),
            Pattern::Column(i) => format!("col{}", i),
            Pattern::Diagonal1 => "diag1".to_string(),
            Pattern::Diagonal2 => "diag2".to_string(),
            Pattern::Corners => "corners".to_string(),
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Row(i) => write!(f, "Row {}", i),
            Pattern::Column(i) => write!(f, "Column {}", i),
            Pattern::Diagonal1 => write!(f, "Diagonal 1"),
            Pattern::Diagonal2 => write!(f, "Diagonal 2"),
            Pattern::Corners => write!(f, "Corners"),
        }
    }
}

/// Aggregate buckets that several patterns feed into.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, enum_map::Enum, EnumIter, strum_macros::Display)]
pub enum RollUp {
    #[strum(serialize = "rows")]
    Rows,
    #[strum(serialize = "cols")]
    Columns,
    #[strum(serialize = "lines")]
    Lines,
    #[strum(serialize = "diagonals")]
    Diagonals,
}

/// Header letter for a column: B, I, N, G, O on a standard card, the column number otherwise.
pub fn column_label(col: usize, size: usize) -> String {
    const LETTERS: [&str; 5] = ["B", "I", "N", "G", "O"];
    if size == LETTERS.len() {
        LETTERS[col].to_string()
    } else {
        col.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_cells() {
        let cells = |p: Pattern, size| p.cells(size).collect::<Vec<_>>();
        assert_eq!(cells(Pattern::Row(1), 3), vec![(1, 0), (1, 1), (1, 2)]);
        assert_eq!(cells(Pattern::Column(2), 3), vec![(0, 2), (1, 2), (2, 2)]);
        assert_eq!(cells(Pattern::Diagonal1, 3), vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(cells(Pattern::Diagonal2, 3), vec![(0, 2), (1, 1), (2, 0)]);
        assert_eq!(cells(Pattern::Corners, 5), vec![(0, 0), (4, 0), (0, 4), (4, 4)]);
        assert_eq!(cells(Pattern::Corners, 1), vec![(0, 0); 4]);
        assert_eq!(Pattern::Corners.len(7), 4);
        assert_eq!(Pattern::Row(0).len(7), 7);
    }

    #[test]
    fn test_roll_ups() {
        assert_eq!(Pattern::Row(3).roll_ups(), &[RollUp::Rows, RollUp::Lines]);
        assert_eq!(Pattern::Column(0).roll_ups(), &[RollUp::Columns, RollUp::Lines]);
        assert_eq!(Pattern::Diagonal2.roll_ups(), &[RollUp::Diagonals]);
        assert!(Pattern::Corners.roll_ups().is_empty());
    }

    #[test]
    fn test_labels() {
        assert_eq!(column_label(0, 5), "B");
        assert_eq!(column_label(4, 5), "O");
        assert_eq!(column_label(4, 7), "4");
        assert_eq!(RollUp::Columns.to_string(), "cols");
        assert_eq!(Pattern::Column(3).key(), "col3");
        assert_eq!(Pattern::Diagonal1.to_string(), "Diagonal 1");
    }
}
