use std::fmt::{Display, Formatter};
use std::ops::{AddAssign, Index};

use derive_more::{Add, AddAssign};
use enum_map::EnumMap;
use strum::IntoEnumIterator;

use crate::rules::BingoRules;
use crate::types::{Pattern, RollUp, column_label};

/// Number of games won at each ball count. Bucket `n` counts games won on the `n`th ball.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Histogram(Vec<u64>);

impl Histogram {
    pub fn new(len: usize) -> Self {
        Histogram(vec![0; len])
    }

    pub fn record(&mut self, balls_drawn: u32) {
        self.0[balls_drawn as usize] += 1;
    }

    pub fn buckets(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Average number of balls drawn, or `None` if nothing was recorded.
    pub fn mean(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted: u64 = self.0.iter().enumerate().map(|(balls, &n)| balls as u64 * n).sum();
        Some(weighted as f64 / total as f64)
    }
}

impl Index<usize> for Histogram {
    type Output = u64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl AddAssign for Histogram {
    fn add_assign(&mut self, rhs: Self) {
        if self.0.len() < rhs.0.len() {
            self.0.resize(rhs.0.len(), 0);
        }
        for (bucket, n) in self.0.iter_mut().zip(rhs.0) {
            *bucket += n;
        }
    }
}

impl std::ops::Add for Histogram {
    type Output = Histogram;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

/// Win count and try histogram for one pattern or roll-up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Add, AddAssign)]
pub struct PatternStats {
    pub wins: u64,
    pub tries: Histogram,
}

impl PatternStats {
    fn new(histogram_len: usize) -> Self {
        PatternStats { wins: 0, tries: Histogram::new(histogram_len) }
    }

    fn record(&mut self, balls_drawn: u32) {
        self.wins += 1;
        self.tries.record(balls_drawn);
    }
}

/// Counters accumulated over every game of a simulation run.
///
/// Only ever grows: the simulator records one win per game, and per-worker aggregators are folded
/// together with `+=`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsAggregator {
    rules: BingoRules,
    games_played: u64,
    rows: Vec<PatternStats>,
    columns: Vec<PatternStats>,
    diagonal1: PatternStats,
    diagonal2: PatternStats,
    corners: PatternStats,
    roll_ups: EnumMap<RollUp, PatternStats>,
    total_tries: Histogram,
}

impl StatsAggregator {
    pub fn new(rules: &BingoRules) -> Self {
        let len = rules.histogram_len();
        let size = rules.card_size;
        StatsAggregator {
            rules: *rules,
            games_played: 0,
            rows: vec![PatternStats::new(len); size],
            columns: vec![PatternStats::new(len); size],
            diagonal1: PatternStats::new(len),
            diagonal2: PatternStats::new(len),
            corners: PatternStats::new(len),
            roll_ups: EnumMap::from_fn(|_| PatternStats::new(len)),
            total_tries: Histogram::new(len),
        }
    }

    pub fn rules(&self) -> &BingoRules {
        &self.rules
    }

    /// Credit `pattern` and its roll-ups with a win on ball number `balls_drawn`.
    pub fn record_pattern(&mut self, pattern: Pattern, balls_drawn: u32) {
        self.pattern_mut(pattern).record(balls_drawn);
        for &roll_up in pattern.roll_ups() {
            self.roll_ups[roll_up].record(balls_drawn);
        }
    }

    /// Close out one finished game.
    pub fn record_game(&mut self, balls_drawn: u32) {
        self.games_played += 1;
        self.total_tries.record(balls_drawn);
    }

    /// Panics if a row or column index is outside the card.
    pub fn pattern(&self, pattern: Pattern) -> &PatternStats {
        match pattern {
            Pattern::Row(i) => &self.rows[i],
            Pattern::Column(i) => &self.columns[i],
            Pattern::Diagonal1 => &self.diagonal1,
            Pattern::Diagonal2 => &self.diagonal2,
            Pattern::Corners => &self.corners,
        }
    }

    fn pattern_mut(&mut self, pattern: Pattern) -> &mut PatternStats {
        match pattern {
            Pattern::Row(i) => &mut self.rows[i],
            Pattern::Column(i) => &mut self.columns[i],
            Pattern::Diagonal1 => &mut self.diagonal1,
            Pattern::Diagonal2 => &mut self.diagonal2,
            Pattern::Corners => &mut self.corners,
        }
    }

    pub fn roll_up(&self, roll_up: RollUp) -> &PatternStats {
        &self.roll_ups[roll_up]
    }

    pub fn total_tries(&self) -> &Histogram {
        &self.total_tries
    }

    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    /// Every individual pattern on the card, in report order.
    pub fn patterns(&self) -> Vec<Pattern> {
        let size = self.rules.card_size;
        let mut patterns = vec![Pattern::Corners, Pattern::Diagonal1, Pattern::Diagonal2];
        patterns.extend((0..size).map(Pattern::Row));
        patterns.extend((0..size).map(Pattern::Column));
        patterns
    }

    /// Sum of wins over individual patterns. Equals `games_played` since exactly one pattern is
    /// credited per game.
    pub fn total_wins(&self) -> u64 {
        self.patterns().into_iter().map(|p| self.pattern(p).wins).sum()
    }

    /// Share of all games won by `wins`, as a percentage.
    pub fn percentage(&self, wins: u64) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            wins as f64 * 100.0 / self.games_played as f64
        }
    }

    fn write_line(&self, f: &mut Formatter<'_>, label: &str, stats: &PatternStats) -> std::fmt::Result {
        write!(f, "{:<12} bingo: {:>9}, {:>6.2}%", label, stats.wins, self.percentage(stats.wins))?;
        match stats.tries.mean() {
            Some(mean) => writeln!(f, "  (mean {:.2} balls)", mean),
            None => writeln!(f),
        }
    }
}

impl AddAssign for StatsAggregator {
    fn add_assign(&mut self, rhs: Self) {
        assert_eq!(self.rules, rhs.rules, "cannot merge statistics gathered under different rules");
        self.games_played += rhs.games_played;
        for (mine, theirs) in self.rows.iter_mut().zip(rhs.rows) {
            *mine += theirs;
        }
        for (mine, theirs) in self.columns.iter_mut().zip(rhs.columns) {
            *mine += theirs;
        }
        self.diagonal1 += rhs.diagonal1;
        self.diagonal2 += rhs.diagonal2;
        self.corners += rhs.corners;
        for (roll_up, theirs) in rhs.roll_ups {
            self.roll_ups[roll_up] += theirs;
        }
        self.total_tries += rhs.total_tries;
    }
}

impl Display for StatsAggregator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let size = self.rules.card_size;
        writeln!(f, "Summary of {} games:", self.games_played)?;
        writeln!(f)?;
        for i in 0..size {
            self.write_line(f, &format!("Row {}", i), self.pattern(Pattern::Row(i)))?;
            let label = format!("Column {}", column_label(i, size));
            self.write_line(f, &label, self.pattern(Pattern::Column(i)))?;
        }
        self.write_line(f, "Diagonal 1", &self.diagonal1)?;
        self.write_line(f, "Diagonal 2", &self.diagonal2)?;
        self.write_line(f, "Corners", &self.corners)?;
        writeln!(f)?;
        for roll_up in RollUp::iter() {
            let label = match roll_up {
                RollUp::Rows => "Any row",
                RollUp::Columns => "Any column",
                RollUp::Lines => "Any line",
                RollUp::Diagonals => "Any diagonal",
            };
            self.write_line(f, label, &self.roll_ups[roll_up])?;
        }
        if let Some(mean) = self.total_tries.mean() {
            writeln!(f)?;
            writeln!(f, "Balls drawn per bingo: mean {:.2}", mean)?;
        }
        writeln!(f)?;
        writeln!(f, "Tries histogram, bucket n = won on ball n:")?;
        writeln!(f, "{:<12} {:?}", "Total", self.total_tries.buckets())?;
        writeln!(f, "{:<12} {:?}", "Corners", self.corners.tries.buckets())?;
        for (diagonal, label) in [(&self.diagonal1, "Diagonal 1"), (&self.diagonal2, "Diagonal 2")] {
            writeln!(f, "{:<12} {:?}", label, diagonal.tries.buckets())?;
        }
        for i in 0..size {
            writeln!(f, "{:<12} {:?}", format!("Row {}", i), self.rows[i].tries.buckets())?;
            writeln!(f, "{:<12} {:?}", format!("Column {}", column_label(i, size)), self.columns[i].tries.buckets())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::STANDARD_RULES;

    use super::*;

    #[test]
    fn test_histogram() {
        let mut h = Histogram::new(6);
        assert_eq!(h.mean(), None);
        h.record(2);
        h.record(4);
        h.record(4);
        assert_eq!(h.buckets(), &[0, 0, 1, 0, 2, 0]);
        assert_eq!(h.total(), 3);
        assert_eq!(h.mean(), Some(10.0 / 3.0));

        let mut other = Histogram::new(6);
        other.record(5);
        h += other;
        assert_eq!(h[5], 1);
        assert_eq!(h.total(), 4);
    }

    #[test]
    fn test_record_rolls_up() {
        let mut stats = StatsAggregator::new(&STANDARD_RULES);
        assert_eq!(stats.total_tries().len(), 76);

        stats.record_pattern(Pattern::Row(3), 12);
        stats.record_game(12);
        stats.record_pattern(Pattern::Column(0), 30);
        stats.record_game(30);
        stats.record_pattern(Pattern::Diagonal2, 40);
        stats.record_game(40);

        assert_eq!(stats.pattern(Pattern::Row(3)).wins, 1);
        assert_eq!(stats.pattern(Pattern::Row(3)).tries[12], 1);
        assert_eq!(stats.pattern(Pattern::Column(0)).wins, 1);
        assert_eq!(stats.roll_up(RollUp::Rows).wins, 1);
        assert_eq!(stats.roll_up(RollUp::Columns).wins, 1);
        assert_eq!(stats.roll_up(RollUp::Lines).wins, 2);
        assert_eq!(stats.roll_up(RollUp::Lines).tries[30], 1);
        assert_eq!(stats.roll_up(RollUp::Diagonals).wins, 1);
        assert_eq!(stats.pattern(Pattern::Corners).wins, 0);
        assert_eq!(stats.total_wins(), 3);
        assert_eq!(stats.games_played(), 3);
        assert_eq!(stats.total_tries().total(), 3);
    }

    #[test]
    fn test_merge() {
        let mut a = StatsAggregator::new(&STANDARD_RULES);
        a.record_pattern(Pattern::Corners, 20);
        a.record_game(20);

        let mut b = StatsAggregator::new(&STANDARD_RULES);
        b.record_pattern(Pattern::Corners, 20);
        b.record_game(20);
        b.record_pattern(Pattern::Row(0), 9);
        b.record_game(9);

        a += b;
        assert_eq!(a.rules(), &STANDARD_RULES);
        assert_eq!(a.games_played(), 3);
        assert_eq!(a.pattern(Pattern::Corners).wins, 2);
        assert_eq!(a.pattern(Pattern::Corners).tries[20], 2);
        assert_eq!(a.roll_up(RollUp::Lines).wins, 1);
        assert_eq!(a.total_tries()[9], 1);
        assert_eq!(a.total_wins(), 3);
    }

    #[test]
    fn test_summary() {
        let mut stats = StatsAggregator::new(&STANDARD_RULES);
        stats.record_pattern(Pattern::Column(4), 10);
        stats.record_game(10);
        stats.record_pattern(Pattern::Corners, 30);
        stats.record_game(30);

        let text = stats.to_string();
        println!("{}", text);
        assert!(text.contains("Summary of 2 games"));
        assert!(text.contains("Column O"));
        assert!(text.contains("50.00%"));
        assert!(text.contains("mean 20.00"));

        let mut expected_total = vec![0u64; 76];
        expected_total[10] = 1;
        expected_total[30] = 1;
        assert!(text.contains(&format!("{:<12} {:?}", "Total", expected_total)));
        let mut expected_corners = vec![0u64; 76];
        expected_corners[30] = 1;
        assert!(text.contains(&format!("{:<12} {:?}", "Corners", expected_corners)));
        assert!(text.contains("Column O"));
    }
}
