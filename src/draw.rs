use rand::Rng;
use rand::seq::SliceRandom;

use crate::rules::BingoRules;
use crate::types::Ball;

/// The balls of one game in the order they come out of the cage: a random permutation of every
/// number from 1 to `size * pool`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawSequence {
    balls: Vec<Ball>,
    next: usize,
}

impl DrawSequence {
    pub fn shuffled<R: Rng + ?Sized>(rules: &BingoRules, rng: &mut R) -> Self {
        let mut balls: Vec<Ball> = (1..=rules.universe_size()).collect();
        balls.shuffle(rng);
        DrawSequence { balls, next: 0 }
    }

    /// Total number of balls in the sequence, drawn or not.
    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn remaining(&self) -> usize {
        self.balls.len() - self.next
    }

    pub fn drawn(&self) -> &[Ball] {
        &self.balls[..self.next]
    }
}

impl Iterator for DrawSequence {
    type Item = Ball;

    fn next(&mut self) -> Option<Self::Item> {
        let ball = self.balls.get(self.next).copied()?;
        self.next += 1;
        Some(ball)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use crate::rules::{BingoRules, STANDARD_RULES};

    use super::*;

    #[test]
    fn test_permutation() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let seq = DrawSequence::shuffled(&STANDARD_RULES, &mut rng);
        assert_eq!(seq.len(), 75);

        let mut balls: Vec<Ball> = seq.collect();
        balls.sort_unstable();
        assert_eq!(balls, (1..=75).collect::<Vec<_>>());
    }

    #[test]
    fn test_draw_until_empty() {
        let rules = BingoRules { card_size: 3, column_pool: 4, free_center: false };
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut seq = DrawSequence::shuffled(&rules, &mut rng);

        let first = seq.next().unwrap();
        assert_eq!(seq.drawn(), &[first]);
        assert_eq!(seq.remaining(), 11);

        assert_eq!(seq.by_ref().count(), 11);
        assert_eq!(seq.next(), None);
        assert_eq!(seq.remaining(), 0);
    }

    #[test]
    fn test_same_seed_same_order() {
        let a: Vec<Ball> = DrawSequence::shuffled(&STANDARD_RULES, &mut ChaCha20Rng::seed_from_u64(5)).collect();
        let b: Vec<Ball> = DrawSequence::shuffled(&STANDARD_RULES, &mut ChaCha20Rng::seed_from_u64(5)).collect();
        assert_eq!(a, b);
    }
}
