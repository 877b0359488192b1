//! Players and the move-selection strategies they play with.

use std::fmt;

use clap::ValueEnum;

use crate::board::Board;
use crate::constants::{PIECES_PER_PLAYER, TAKEOFF_ROLL};
use crate::piece::{Color, PieceId, Position};
use crate::playout::Randomness;

/// How a player picks which piece to move for a roll.
///
/// Every strategy is a pure choice over the eligible pieces: it reads the
/// board and draws randomness but never changes state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Uniform random choice.
    #[default]
    Default,
    /// Take pieces off on a six until `track_cap` pieces are in play.
    ControlPlanesOnTrack,
    /// Prefer a move that lands on a same-color piece and forms a stack.
    StackPlanesFirst,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Default => "default",
            Strategy::ControlPlanesOnTrack => "control-planes-on-track",
            Strategy::StackPlanesFirst => "stack-planes-first",
        };
        f.pad(name)
    }
}

fn pick<R: Randomness + ?Sized>(candidates: &[PieceId], rng: &mut R) -> Option<PieceId> {
    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        n => Some(candidates[rng.pick(n)]),
    }
}

impl Strategy {
    /// Choose one of `eligible` for `roll`. `None` only if `eligible` is empty.
    pub fn select<R: Randomness + ?Sized>(
        self,
        board: &Board,
        eligible: &[PieceId],
        roll: u8,
        track_cap: usize,
        rng: &mut R,
    ) -> Option<PieceId> {
        match self {
            Strategy::Default => pick(eligible, rng),
            Strategy::ControlPlanesOnTrack => {
                let (grounded, flying): (Vec<PieceId>, Vec<PieceId>) =
                    eligible.iter().partition(|&&id| {
                        board
                            .piece(id)
                            .is_some_and(|p| p.position() == Position::Hangar)
                    });
                let color = eligible.first().and_then(|&id| board.piece(id)).map(|p| p.color());
                let in_play = board
                    .pieces()
                    .filter(|(_, p)| Some(p.color()) == color && p.is_in_play())
                    .count();

                if roll == TAKEOFF_ROLL && in_play < track_cap && !grounded.is_empty() {
                    pick(&grounded, rng)
                } else if !flying.is_empty() {
                    pick(&flying, rng)
                } else {
                    pick(eligible, rng)
                }
            }
            Strategy::StackPlanesFirst => {
                let stacking: Vec<PieceId> = eligible
                    .iter()
                    .copied()
                    .filter(|&id| forms_stack(board, id, roll))
                    .collect();
                if stacking.is_empty() {
                    pick(eligible, rng)
                } else {
                    pick(&stacking, rng)
                }
            }
        }
    }
}

/// Whether moving `id` by `roll` lands it on another same-color piece.
///
/// The projected distance is always past the mover's own, so current stack
/// partners never count.
fn forms_stack(board: &Board, id: PieceId, roll: u8) -> bool {
    let Some(piece) = board.piece(id) else {
        return false;
    };
    let Some(target) = piece.projected_distance(roll) else {
        return false;
    };
    board.pieces().any(|(other_id, other)| {
        other_id != id
            && other.color() == piece.color()
            && other.is_stackable()
            && other.distance_travelled() == Some(target)
    })
}

/// One of the four players of a game.
#[derive(Clone, Debug)]
pub struct Player {
    pub color: Color,
    pub strategy: Strategy,
    /// Pieces not yet settled, including those waiting in the hangar.
    pub moving: Vec<PieceId>,
    /// Settled pieces, in the order they arrived.
    pub settled: Vec<PieceId>,
}

impl Player {
    /// Create a player and register its pieces on `board`.
    pub fn new(color: Color, strategy: Strategy, board: &mut Board) -> Self {
        let moving = (0..PIECES_PER_PLAYER)
            .map(|i| board.add_piece(color, i as u8))
            .collect();
        Self {
            color,
            strategy,
            moving,
            settled: Vec::new(),
        }
    }

    /// Moving pieces that can use `roll`. Hangar pieces need the take-off roll.
    pub fn eligible(&self, board: &Board, roll: u8) -> Vec<PieceId> {
        self.moving
            .iter()
            .copied()
            .filter(|&id| match board.piece(id).map(|p| p.position()) {
                Some(Position::Hangar) => roll == TAKEOFF_ROLL,
                Some(Position::Settled) | None => false,
                Some(_) => true,
            })
            .collect()
    }

    /// Pick the piece to play for `roll` with this player's strategy.
    pub fn select_plane<R: Randomness + ?Sized>(
        &self,
        board: &Board,
        roll: u8,
        track_cap: usize,
        rng: &mut R,
    ) -> Option<PieceId> {
        let eligible = self.eligible(board, roll);
        self.strategy.select(board, &eligible, roll, track_cap, rng)
    }

    /// Move newly settled pieces from `moving` to `settled`. Returns how many moved.
    pub fn collect_settled(&mut self, board: &Board) -> usize {
        let before = self.settled.len();
        let (done, still): (Vec<PieceId>, Vec<PieceId>) = self
            .moving
            .iter()
            .partition(|&&id| board.piece(id).is_some_and(|p| p.is_settled()));
        self.moving = still;
        self.settled.extend(done);
        self.settled.len() - before
    }

    pub fn has_won(&self) -> bool {
        self.moving.is_empty() && self.settled.len() == PIECES_PER_PLAYER
    }
}
