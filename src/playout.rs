//! Random game simulation (the turn driver).
//!
//! A playout sets up a fresh board with four players and plays rolls in
//! turn order until one player has settled every piece or the turn limit
//! is reached.

use std::fmt;

use crate::board::{Board, MoveOutcome};
use crate::constants::{DIE_FACES, MAX_GAME_TURNS, TAKEOFF_ROLL, TRACK_CAP};
use crate::piece::{Color, MoveError, PieceId};
use crate::player::{Player, Strategy};

/// Source of die rolls and tie-break choices.
pub trait Randomness {
    /// A die roll in `1..=6`.
    fn roll_die(&mut self) -> u8;
    /// A uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl Randomness for fastrand::Rng {
    #[inline]
    fn roll_die(&mut self) -> u8 {
        self.u8(1..=DIE_FACES)
    }

    #[inline]
    fn pick(&mut self, len: usize) -> usize {
        self.usize(..len)
    }
}

/// Rules and strategies for one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Strategy per color, in `Color::ALL` order.
    pub strategies: [Strategy; 4],
    /// Pieces `control-planes-on-track` keeps in play before it stops taking off.
    pub track_cap: usize,
    /// Turns after which the game is abandoned.
    pub max_turns: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            strategies: [Strategy::Default; 4],
            track_cap: TRACK_CAP,
            max_turns: MAX_GAME_TURNS,
        }
    }
}

/// What a single roll did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// No piece could use the roll.
    Pass,
    /// A hangar piece went to standby.
    TakeOff(PieceId),
    /// A piece moved.
    Move(PieceId, MoveOutcome),
}

/// One roll of one turn, reported to playout observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnEvent {
    pub turn: usize,
    pub color: Color,
    pub roll: u8,
    pub action: Action,
}

impl fmt::Display for TurnEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn {:>4} {:<6} rolls {}: ", self.turn, self.color, self.roll)?;
        match &self.action {
            Action::Pass => write!(f, "no move"),
            Action::TakeOff(id) => write!(f, "#{} takes off", id.0),
            Action::Move(id, outcome) => {
                write!(f, "#{} -> ", id.0)?;
                match outcome.position {
                    Some(pos) => write!(f, "{pos}")?,
                    None => write!(f, "?")?,
                }
                if outcome.shortcut {
                    write!(f, " [shortcut]")?;
                }
                if outcome.self_jump {
                    write!(f, " [jump]")?;
                }
                if !outcome.carried.is_empty() {
                    write!(f, " [stack of {}]", outcome.carried.len() + 1)?;
                }
                for victim in &outcome.captured {
                    write!(f, " [captures #{}]", victim.0)?;
                }
                Ok(())
            }
        }
    }
}

/// Result of one playout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    /// `None` if the turn limit was hit first.
    pub winner: Option<Color>,
    pub turns: usize,
    pub captures: usize,
}

/// One game session: a board and the four players on it.
pub struct Game {
    pub board: Board,
    pub players: Vec<Player>,
    config: GameConfig,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let mut board = Board::new();
        let players = Color::ALL
            .iter()
            .map(|&color| Player::new(color, config.strategies[color.index()], &mut board))
            .collect();
        Self {
            board,
            players,
            config,
        }
    }

    /// Play one roll for the player at `seat`. Returns the roll and what it did.
    pub fn play_roll<R: Randomness + ?Sized>(
        &mut self,
        seat: usize,
        rng: &mut R,
    ) -> Result<(u8, Action), MoveError> {
        let roll = rng.roll_die();
        let player = &mut self.players[seat];
        let Some(id) = player.select_plane(&self.board, roll, self.config.track_cap, rng) else {
            return Ok((roll, Action::Pass));
        };

        let action = if self.board.piece(id).is_some_and(|p| !p.is_in_play()) {
            self.board.standby(id)?;
            Action::TakeOff(id)
        } else {
            let outcome = self.board.move_piece(id, roll, true)?;
            player.collect_settled(&self.board);
            Action::Move(id, outcome)
        };
        Ok((roll, action))
    }

    /// Play until someone wins or the turn limit is reached.
    pub fn run<R, F>(&mut self, rng: &mut R, mut observe: F) -> Result<GameResult, MoveError>
    where
        R: Randomness + ?Sized,
        F: FnMut(&TurnEvent),
    {
        let mut captures = 0;
        for turn in 0..self.config.max_turns {
            for seat in 0..self.players.len() {
                loop {
                    let (roll, action) = self.play_roll(seat, rng)?;
                    if let Action::Move(_, outcome) = &action {
                        captures += outcome.captured.len();
                    }
                    observe(&TurnEvent {
                        turn,
                        color: self.players[seat].color,
                        roll,
                        action,
                    });
                    if self.players[seat].has_won() {
                        return Ok(GameResult {
                            winner: Some(self.players[seat].color),
                            turns: turn + 1,
                            captures,
                        });
                    }
                    if roll != TAKEOFF_ROLL {
                        break;
                    }
                }
            }
        }
        Ok(GameResult {
            winner: None,
            turns: self.config.max_turns,
            captures,
        })
    }
}

/// Play one complete game.
pub fn play_game<R: Randomness + ?Sized>(
    config: &GameConfig,
    rng: &mut R,
) -> Result<GameResult, MoveError> {
    Game::new(config.clone()).run(rng, |_| {})
}
