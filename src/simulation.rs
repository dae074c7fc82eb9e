use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::card::Card;
use crate::draw::DrawSequence;
use crate::error::BingoError;
use crate::rules::BingoRules;
use crate::statistics::StatsAggregator;
use crate::types::{Ball, Pattern};
use crate::win_detector;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    pub rules: BingoRules,
    /// Base seed. `None` picks one at random; the choice is logged so the run can be repeated.
    pub seed: Option<u64>,
    pub threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig { rules: BingoRules::default(), seed: None, threads: 1 }
    }
}

/// How one game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub pattern: Pattern,
    pub balls_drawn: u32,
}

/// Shared handle for watching and stopping a run from another thread.
#[derive(Clone, Debug, Default)]
pub struct RunControl {
    cancelled: Arc<AtomicBool>,
    games_completed: Arc<AtomicU64>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop. Workers notice before starting their next game.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn games_completed(&self) -> u64 {
        self.games_completed.load(Ordering::Relaxed)
    }

    fn game_finished(&self) {
        self.games_completed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Mark balls from `draws` on `card` until a pattern completes, then record the game in `stats`.
///
/// Running out of balls first is a [BingoError::InvariantViolation]: a full draw sequence marks
/// every cell, so some pattern has to complete by the last ball.
pub fn play_out<I>(card: &mut Card, draws: I, stats: &mut StatsAggregator) -> Result<GameResult, BingoError>
where
    I: IntoIterator<Item = Ball>,
{
    let mut balls_drawn = 0;
    for ball in draws {
        balls_drawn += 1;
        card.find_and_mark(ball);
        if let Some(pattern) = win_detector::check_and_record(card, balls_drawn, stats)? {
            stats.record_game(balls_drawn);
            return Ok(GameResult { pattern, balls_drawn });
        }
    }
    Err(BingoError::InvariantViolation { balls_drawn })
}

pub struct Simulator {
    config: SimulationConfig,
    seed: u64,
}

impl Simulator {
    /// Fails with [BingoError::Configuration] before any game is played if the rules are unusable.
    pub fn new(config: SimulationConfig) -> Result<Simulator, BingoError> {
        config.rules.validate()?;
        if config.threads == 0 {
            return Err(BingoError::configuration("need at least one worker thread"));
        }
        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::thread_rng().gen();
                info!("No seed given, using {}", seed);
                seed
            }
        };
        Ok(Simulator { config, seed })
    }

    pub fn rules(&self) -> &BingoRules {
        &self.config.rules
    }

    /// The base seed actually in use.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random stream for game number `game`. Depends only on the base seed and the game number,
    /// so results do not change with the number of worker threads.
    pub fn game_rng(&self, game: u64) -> ChaCha20Rng {
        let mut rng = ChaCha20Rng::seed_from_u64(self.seed);
        rng.set_stream(game);
        rng
    }

    /// Play one game on a fresh card, recording the winning pattern in `stats`.
    pub fn play_game<R: Rng + ?Sized>(&self, rng: &mut R, stats: &mut StatsAggregator) -> Result<GameResult, BingoError> {
        let rules = &self.config.rules;
        let mut card = Card::new(rules, rng)?;
        let draws = DrawSequence::shuffled(rules, rng);
        play_out(&mut card, draws, stats)
    }

    /// Play `num_games` games and return the combined statistics.
    pub fn run(&self, num_games: u64) -> Result<StatsAggregator, BingoError> {
        self.run_with_control(num_games, &RunControl::new())
    }

    /// Like [Simulator::run], but stoppable and observable through `control`.
    pub fn run_with_control(&self, num_games: u64, control: &RunControl) -> Result<StatsAggregator, BingoError> {
        info!(
            "Simulating {} games on a {}x{} card (pool {}, free center {}) with seed {} on {} thread(s)",
            num_games, self.config.rules.card_size, self.config.rules.card_size,
            self.config.rules.column_pool, self.config.rules.free_center, self.seed, self.config.threads,
        );

        let threads = (self.config.threads as u64).min(num_games.max(1));
        let stats = if threads <= 1 {
            self.play_games(0..num_games, control)?
        } else {
            let chunk = num_games / threads;
            let extra = num_games % threads;
            let ranges: Vec<_> = (0..threads)
                .map(|w| {
                    let start = w * chunk + w.min(extra);
                    let len = chunk + u64::from(w < extra);
                    start..start + len
                })
                .collect();

            let results: Vec<Result<StatsAggregator, BingoError>> = thread::scope(|s| {
                let handles: Vec<_> = ranges
                    .into_iter()
                    .map(|games| s.spawn(move || self.play_games(games, control)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                    .collect()
            });

            let mut merged = StatsAggregator::new(&self.config.rules);
            for worker_stats in results {
                merged += worker_stats?;
            }
            merged
        };

        if stats.games_played() < num_games {
            return Err(BingoError::Cancelled { completed: stats.games_played(), requested: num_games });
        }
        info!("Finished {} games", stats.games_played());
        Ok(stats)
    }

    /// Play the games numbered in `games` into a fresh aggregator. Stops early, returning what it
    /// has, if the run is cancelled.
    fn play_games(&self, games: std::ops::Range<u64>, control: &RunControl) -> Result<StatsAggregator, BingoError> {
        debug!("Worker playing games {:?}", games);
        let mut stats = StatsAggregator::new(&self.config.rules);
        for game in games {
            if control.is_cancelled() {
                debug!("Worker cancelled before game {}", game);
                break;
            }
            let mut rng = self.game_rng(game);
            self.play_game(&mut rng, &mut stats)?;
            control.game_finished();
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::{STANDARD_RULES, STANDARD_RULES_FREE_CENTER};
    use crate::types::RollUp;

    use super::*;

    fn simulator(rules: BingoRules, seed: u64, threads: usize) -> Simulator {
        Simulator::new(SimulationConfig { rules, seed: Some(seed), threads }).unwrap()
    }

    #[test]
    fn test_thousand_games() {
        let stats = simulator(STANDARD_RULES, 2024, 1).run(1000).unwrap();

        assert_eq!(stats.games_played(), 1000);
        assert_eq!(stats.total_wins(), 1000);
        assert_eq!(stats.total_tries().total(), 1000);
        assert_eq!(stats.total_tries().len(), 76);
        assert_eq!(
            stats.roll_up(RollUp::Lines).wins,
            stats.roll_up(RollUp::Rows).wins + stats.roll_up(RollUp::Columns).wins
        );
        assert_eq!(
            stats.roll_up(RollUp::Diagonals).wins,
            stats.pattern(Pattern::Diagonal1).wins + stats.pattern(Pattern::Diagonal2).wins
        );

        // No card can win before four balls (corners) are drawn.
        for balls in 0..4 {
            assert_eq!(stats.total_tries()[balls], 0);
        }
        println!("{}", stats);
    }

    #[test]
    fn test_free_center_wins_sooner() {
        let plain = simulator(STANDARD_RULES, 99, 1).run(2000).unwrap();
        let free = simulator(STANDARD_RULES_FREE_CENTER, 99, 1).run(2000).unwrap();
        assert_eq!(free.total_wins(), 2000);
        assert!(free.total_tries().mean().unwrap() < plain.total_tries().mean().unwrap());
    }

    #[test]
    fn test_deterministic() {
        let a = simulator(STANDARD_RULES, 17, 1).run(300).unwrap();
        let b = simulator(STANDARD_RULES, 17, 1).run(300).unwrap();
        assert_eq!(a, b);

        let c = simulator(STANDARD_RULES, 18, 1).run(300).unwrap();
        assert_ne!(a.total_tries(), c.total_tries());
    }

    #[test]
    fn test_threads_do_not_change_results() {
        let single = simulator(STANDARD_RULES, 5, 1).run(501).unwrap();
        let pooled = simulator(STANDARD_RULES, 5, 4).run(501).unwrap();
        assert_eq!(single, pooled);

        // More workers than games.
        let tiny = simulator(STANDARD_RULES, 5, 8).run(3).unwrap();
        assert_eq!(tiny.games_played(), 3);
    }

    #[test]
    fn test_play_game() {
        let sim = simulator(STANDARD_RULES, 1, 1);
        let mut stats = StatsAggregator::new(sim.rules());
        let mut rng = sim.game_rng(0);
        let result = sim.play_game(&mut rng, &mut stats).unwrap();

        assert!(result.balls_drawn >= 4 && result.balls_drawn <= 75);
        assert_eq!(stats.pattern(result.pattern).wins, 1);
        assert_eq!(stats.pattern(result.pattern).tries[result.balls_drawn as usize], 1);
        assert_eq!(stats.total_tries()[result.balls_drawn as usize], 1);
    }

    #[test]
    fn test_exhausted_draws() {
        let mut card = Card::new(&STANDARD_RULES, &mut ChaCha20Rng::seed_from_u64(4)).unwrap();
        let mut stats = StatsAggregator::new(&STANDARD_RULES);
        let two_balls = vec![card[(0, 0)].value, card[(1, 2)].value];

        match play_out(&mut card, two_balls, &mut stats) {
            Err(BingoError::InvariantViolation { balls_drawn }) => assert_eq!(balls_drawn, 2),
            other => panic!("expected an invariant violation, got {:?}", other),
        }
        assert_eq!(stats.games_played(), 0);
        assert_eq!(stats.total_wins(), 0);
        assert_eq!(card.marked_count(), 2);

        // Nothing drawn at all.
        let mut fresh = Card::new(&STANDARD_RULES, &mut ChaCha20Rng::seed_from_u64(4)).unwrap();
        assert!(matches!(
            play_out(&mut fresh, Vec::new(), &mut stats),
            Err(BingoError::InvariantViolation { balls_drawn: 0 })
        ));
    }

    #[test]
    fn test_play_out_stops_at_first_win() {
        let mut card = Card::new(&STANDARD_RULES, &mut ChaCha20Rng::seed_from_u64(6)).unwrap();
        let mut stats = StatsAggregator::new(&STANDARD_RULES);
        let mut draws: Vec<Ball> = (0..5).map(|col| card[(3, col)].value).collect();
        draws.push(card[(0, 0)].value);

        let result = play_out(&mut card, draws, &mut stats).unwrap();
        assert_eq!(result, GameResult { pattern: Pattern::Row(3), balls_drawn: 5 });
        assert!(!card.is_marked(0, 0).unwrap());
        assert_eq!(stats.games_played(), 1);
        assert_eq!(stats.total_tries()[5], 1);
    }

    #[test]
    fn test_small_cards() {
        for size in 1..=4 {
            let rules = BingoRules { card_size: size, column_pool: 6, free_center: true };
            let stats = simulator(rules, 3, 1).run(100).unwrap();
            assert_eq!(stats.total_wins(), 100);
        }
    }

    #[test]
    fn test_cancelled() {
        let sim = simulator(STANDARD_RULES, 8, 2);
        let control = RunControl::new();
        control.cancel();
        match sim.run_with_control(50, &control) {
            Err(BingoError::Cancelled { completed, requested }) => {
                assert_eq!(completed, 0);
                assert_eq!(requested, 50);
            }
            other => panic!("expected cancellation, got {:?}", other.map(|s| s.games_played())),
        }
    }

    #[test]
    fn test_progress_counter() {
        let sim = simulator(STANDARD_RULES, 8, 3);
        let control = RunControl::new();
        sim.run_with_control(40, &control).unwrap();
        assert_eq!(control.games_completed(), 40);
    }

    #[test]
    fn test_configuration_errors() {
        let bad = BingoRules { card_size: 20, column_pool: 15, free_center: false };
        assert!(matches!(
            Simulator::new(SimulationConfig { rules: bad, seed: Some(1), threads: 1 }),
            Err(BingoError::Configuration { .. })
        ));
        assert!(matches!(
            Simulator::new(SimulationConfig { rules: STANDARD_RULES, seed: Some(1), threads: 0 }),
            Err(BingoError::Configuration { .. })
        ));
    }

    #[test]
    fn test_unseeded_picks_seed() {
        let sim = Simulator::new(SimulationConfig::default()).unwrap();
        let again = simulator(STANDARD_RULES, sim.seed(), 1);
        assert_eq!(sim.run(20).unwrap(), again.run(20).unwrap());
    }
}
