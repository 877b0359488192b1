//! Monte Carlo estimation of win probabilities.
//!
//! Each trial is an independent [`Game`](crate::playout::Game) with its own
//! board and a generator seeded from `seed + trial`, so the tally for a given
//! configuration does not depend on how many threads run it.

use std::fmt;

use rayon::prelude::*;

use crate::constants::{DEFAULT_SEED, N_TRIALS};
use crate::piece::{Color, MoveError};
use crate::playout::{GameConfig, GameResult, play_game};

/// Settings for a batch of trials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub trials: usize,
    pub seed: u64,
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trials: N_TRIALS,
            seed: DEFAULT_SEED,
            game: GameConfig::default(),
        }
    }
}

/// Aggregated results over many games.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub games: u64,
    /// Wins per color, in `Color::ALL` order.
    pub wins: [u64; 4],
    /// Games that hit the turn limit.
    pub unfinished: u64,
    pub total_turns: u64,
    pub total_captures: u64,
}

impl Tally {
    pub fn record(&mut self, result: &GameResult) {
        self.games += 1;
        match result.winner {
            Some(color) => self.wins[color.index()] += 1,
            None => self.unfinished += 1,
        }
        self.total_turns += result.turns as u64;
        self.total_captures += result.captures as u64;
    }

    pub fn merge(mut self, other: Tally) -> Tally {
        self.games += other.games;
        for (w, o) in self.wins.iter_mut().zip(other.wins) {
            *w += o;
        }
        self.unfinished += other.unfinished;
        self.total_turns += other.total_turns;
        self.total_captures += other.total_captures;
        self
    }

    /// Fraction of games won by `color` (0.0 when no games were played).
    pub fn win_rate(&self, color: Color) -> f64 {
        if self.games > 0 {
            self.wins[color.index()] as f64 / self.games as f64
        } else {
            0.0
        }
    }

    pub fn mean_turns(&self) -> f64 {
        if self.games > 0 {
            self.total_turns as f64 / self.games as f64
        } else {
            0.0
        }
    }
}

impl From<&GameResult> for Tally {
    fn from(result: &GameResult) -> Self {
        let mut tally = Tally::default();
        tally.record(result);
        tally
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<8} {:>8} {:>8}", "color", "wins", "rate")?;
        for color in Color::ALL {
            writeln!(
                f,
                "{:<8} {:>8} {:>7.2}%",
                color,
                self.wins[color.index()],
                self.win_rate(color) * 100.0
            )?;
        }
        writeln!(f, "games: {}, unfinished: {}", self.games, self.unfinished)?;
        write!(
            f,
            "mean turns: {:.1}, captures: {}",
            self.mean_turns(),
            self.total_captures
        )
    }
}

/// Play trial number `index` of a batch.
pub fn run_trial(config: &SimConfig, index: u64) -> Result<GameResult, MoveError> {
    let mut rng = fastrand::Rng::with_seed(config.seed.wrapping_add(index));
    play_game(&config.game, &mut rng)
}

/// Play every trial on the current rayon pool and tally the results.
pub fn run_trials(config: &SimConfig) -> Result<Tally, MoveError> {
    (0..config.trials as u64)
        .into_par_iter()
        .map(|i| run_trial(config, i).map(|result| Tally::from(&result)))
        .try_reduce(Tally::default, |a, b| Ok(a.merge(b)))
}

/// Sequential version of [`run_trials`].
pub fn run_trials_serial(config: &SimConfig) -> Result<Tally, MoveError> {
    let mut tally = Tally::default();
    for i in 0..config.trials as u64 {
        tally.record(&run_trial(config, i)?);
    }
    Ok(tally)
}
