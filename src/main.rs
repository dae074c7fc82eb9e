use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::{thread, time};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use bingo_simulator::{
    export, BingoError, BingoRules, Card, RunControl, SimulationConfig, Simulator, StatsAggregator, STANDARD_RULES,
};

#[derive(Debug, Parser)]
#[command(name = "bingo_simulator", version)]
#[command(about = "Monte-Carlo simulation of BINGO: which pattern wins, and after how many balls")]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value_t = 1000)]
    games: u64,

    /// Width and height of the card
    #[arg(long, default_value_t = STANDARD_RULES.card_size)]
    size: usize,

    /// Numbers available to each column
    #[arg(long, default_value_t = STANDARD_RULES.column_pool)]
    pool: u32,

    /// Start every game with the centre square marked (odd card sizes only)
    #[arg(long)]
    free_center: bool,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Cancel the run if it takes longer than this many seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Print a sample card before simulating
    #[arg(long)]
    show_card: bool,

    /// Write the try histograms to this CSV file
    #[arg(long)]
    tries_csv: Option<PathBuf>,

    /// Write the win counts to this CSV file
    #[arg(long)]
    stats_csv: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let rules = BingoRules { card_size: args.size, column_pool: args.pool, free_center: args.free_center };
    let simulator = Simulator::new(SimulationConfig { rules, seed: args.seed, threads: args.threads })
        .context("Couldn't set up the simulation")?;

    if args.show_card {
        let card = Card::new(&rules, &mut simulator.game_rng(0))?;
        println!("{}", card);
    }

    let stats = run_with_progress(&simulator, args.games, args.time_limit)?;
    println!("{}", stats);

    if let Some(path) = &args.tries_csv {
        write_csv(path, &stats, export::write_tries_csv)?;
    }
    if let Some(path) = &args.stats_csv {
        write_csv(path, &stats, export::write_wins_csv)?;
    }
    Ok(())
}

/// Run the simulation on a background thread, logging progress once a second like a status board.
fn run_with_progress(simulator: &Simulator, games: u64, time_limit: Option<u64>) -> Result<StatsAggregator> {
    let control = RunControl::new();
    let start_time = time::Instant::now();

    let result = thread::scope(|s| {
        let handle = s.spawn(|| simulator.run_with_control(games, &control));
        let mut last_report = start_time;
        while !handle.is_finished() {
            thread::sleep(time::Duration::from_millis(50));
            let elapsed = start_time.elapsed();
            if last_report.elapsed() >= time::Duration::from_secs(1) {
                last_report = time::Instant::now();
                let done = control.games_completed();
                info!("Played {}/{} games, {} games/sec",
                      done, games, (done as f64 / elapsed.as_secs_f64()).round());
            }
            if let Some(limit) = time_limit {
                if elapsed.as_secs() >= limit && !control.is_cancelled() {
                    warn!("Time limit of {}s reached, cancelling", limit);
                    control.cancel();
                }
            }
        }
        handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    });

    Ok(result?)
}

fn write_csv<F>(path: &Path, stats: &StatsAggregator, write: F) -> Result<()>
where
    F: FnOnce(&StatsAggregator, BufWriter<File>) -> Result<(), BingoError>,
{
    let file = File::create(path).with_context(|| format!("Couldn't create {}", path.display()))?;
    write(stats, BufWriter::new(file)).with_context(|| format!("Couldn't write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
