use crate::card::Card;
use crate::error::BingoError;
use crate::statistics::StatsAggregator;
use crate::types::{Axis, Pattern};

/// Check whether every cell of `pattern` is marked on `card`. No side effects.
pub fn check_pattern(card: &Card, pattern: Pattern) -> Result<bool, BingoError> {
    match pattern {
        Pattern::Row(i) => check_line(card, Axis::Row, i),
        Pattern::Column(i) => check_line(card, Axis::Column, i),
        Pattern::Diagonal1 => check_diagonal(card, 1),
        Pattern::Diagonal2 => check_diagonal(card, 2),
        Pattern::Corners => all_marked(card, Pattern::Corners),
    }
}

/// Check one full row or column.
pub fn check_line(card: &Card, axis: Axis, line: usize) -> Result<bool, BingoError> {
    if line >= card.size() {
        return Err(BingoError::invalid_argument(format!(
            "{:?} number must be 0-{}, got {}", axis, card.size() - 1, line
        )));
    }
    let pattern = match axis {
        Axis::Row => Pattern::Row(line),
        Axis::Column => Pattern::Column(line),
    };
    all_marked(card, pattern)
}

/// Check diagonal 1 (top-left to bottom-right) or 2 (top-right to bottom-left).
pub fn check_diagonal(card: &Card, diag_num: u32) -> Result<bool, BingoError> {
    let pattern = match diag_num {
        1 => Pattern::Diagonal1,
        2 => Pattern::Diagonal2,
        other => return Err(BingoError::invalid_argument(format!("diagonal number must be 1 or 2, got {}", other))),
    };
    all_marked(card, pattern)
}

fn all_marked(card: &Card, pattern: Pattern) -> Result<bool, BingoError> {
    for (row, col) in pattern.cells(card.size()) {
        if !card.is_marked(row, col)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Patterns in the order they are tried: corners, then for each index `i` diagonal 1 (at `i == 1`)
/// or diagonal 2 (at `i == 2`), row `i`, column `i`.
pub fn scan_order(size: usize) -> impl Iterator<Item = Pattern> {
    std::iter::once(Pattern::Corners).chain((0..size).flat_map(|i| {
        let diagonal = match i {
            1 => Some(Pattern::Diagonal1),
            2 => Some(Pattern::Diagonal2),
            _ => None,
        };
        diagonal.into_iter().chain([Pattern::Row(i), Pattern::Column(i)])
    }))
}

/// Look for a completed pattern and, if there is one, credit it in `stats`.
///
/// Only the first complete pattern in [scan_order] is recorded, even when several are complete at
/// once. `balls_drawn` is the bucket its try histograms are bumped at, and must fit in them.
pub fn check_and_record(
    card: &Card,
    balls_drawn: u32,
    stats: &mut StatsAggregator,
) -> Result<Option<Pattern>, BingoError> {
    let buckets = stats.total_tries().len();
    if balls_drawn as usize >= buckets {
        return Err(BingoError::invalid_argument(format!(
            "{} balls drawn, but histograms only go up to {}", balls_drawn, buckets - 1
        )));
    }
    for pattern in scan_order(card.size()) {
        if check_pattern(card, pattern)? {
            stats.record_pattern(pattern, balls_drawn);
            return Ok(Some(pattern));
        }
    }
    Ok(None)
}
