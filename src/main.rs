//! Aeroplane Chess simulator.
//!
//! ## Usage
//!
//! - `aeroplane-chess` - Simulate with default settings
//! - `aeroplane-chess simulate --trials 50000 --red stack-planes-first` - Estimate win rates
//! - `aeroplane-chess trace --seed 7` - Print every roll of a single game

use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use aeroplane_chess::constants::{DEFAULT_SEED, MAX_GAME_TURNS, N_TRIALS, TRACK_CAP};
use aeroplane_chess::piece::Color;
use aeroplane_chess::player::Strategy;
use aeroplane_chess::playout::{Game, GameConfig};
use aeroplane_chess::simulate::{SimConfig, run_trials};

/// Aeroplane Chess: Monte Carlo win-probability simulator
#[derive(Parser)]
#[command(name = "aeroplane-chess")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run many random games and report each color's win rate
    Simulate(SimArgs),
    /// Play a single game and print every roll
    Trace(TraceArgs),
}

#[derive(Args)]
struct RuleArgs {
    /// Strategy for red
    #[arg(long, value_enum, default_value_t = Strategy::Default)]
    red: Strategy,
    /// Strategy for yellow
    #[arg(long, value_enum, default_value_t = Strategy::Default)]
    yellow: Strategy,
    /// Strategy for blue
    #[arg(long, value_enum, default_value_t = Strategy::Default)]
    blue: Strategy,
    /// Strategy for green
    #[arg(long, value_enum, default_value_t = Strategy::Default)]
    green: Strategy,
    /// Pieces control-planes-on-track keeps in play
    #[arg(long, default_value_t = TRACK_CAP)]
    track_cap: usize,
    /// Turns before a game is abandoned
    #[arg(long, default_value_t = MAX_GAME_TURNS)]
    max_turns: usize,
}

impl Default for RuleArgs {
    fn default() -> Self {
        Self {
            red: Strategy::Default,
            yellow: Strategy::Default,
            blue: Strategy::Default,
            green: Strategy::Default,
            track_cap: TRACK_CAP,
            max_turns: MAX_GAME_TURNS,
        }
    }
}

impl RuleArgs {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            strategies: [self.red, self.yellow, self.blue, self.green],
            track_cap: self.track_cap,
            max_turns: self.max_turns,
        }
    }
}

#[derive(Args)]
struct SimArgs {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = N_TRIALS)]
    trials: usize,
    /// Seed of the first game; game i uses seed + i
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Worker threads (defaults to one per core)
    #[arg(short = 'j', long)]
    threads: Option<usize>,
    /// Print progress to stderr
    #[arg(short, long)]
    verbose: bool,
    #[command(flatten)]
    rules: RuleArgs,
}

impl Default for SimArgs {
    fn default() -> Self {
        Self {
            trials: N_TRIALS,
            seed: DEFAULT_SEED,
            threads: None,
            verbose: false,
            rules: RuleArgs::default(),
        }
    }
}

#[derive(Args)]
struct TraceArgs {
    /// Seed for the game
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    #[command(flatten)]
    rules: RuleArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Simulate(args)) => run_simulate(args),
        Some(Commands::Trace(args)) => run_trace(args),
        None => run_simulate(SimArgs::default()),
    }
}

fn print_strategies(config: &GameConfig) {
    for color in Color::ALL {
        println!("{:<8} {}", color, config.strategies[color.index()]);
    }
    println!();
}

fn run_simulate(args: SimArgs) -> Result<()> {
    let config = SimConfig {
        trials: args.trials,
        seed: args.seed,
        game: args.rules.game_config(),
    };

    if args.verbose {
        eprintln!(
            "Running {} games from seed {} on {} threads...",
            config.trials,
            config.seed,
            args.threads.unwrap_or_else(rayon::current_num_threads)
        );
    }
    let start = Instant::now();

    let tally = match args.threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("failed to build thread pool")?
            .install(|| run_trials(&config)),
        None => run_trials(&config),
    }
    .context("simulation aborted")?;

    if args.verbose {
        eprintln!("Finished in {:.2?}", start.elapsed());
    }

    print_strategies(&config.game);
    println!("{tally}");
    Ok(())
}

fn run_trace(args: TraceArgs) -> Result<()> {
    let config = args.rules.game_config();
    print_strategies(&config);

    let mut game = Game::new(config);
    let mut rng = fastrand::Rng::with_seed(args.seed);
    let result = game
        .run(&mut rng, |event| println!("{event}"))
        .with_context(|| format!("game with seed {} aborted", args.seed))?;

    println!();
    print!("{}", game.board);
    match result.winner {
        Some(color) => println!("{color} wins after {} turns", result.turns),
        None => println!("no winner after {} turns", result.turns),
    }
    Ok(())
}
