//! Aeroplane Chess: a Monte Carlo win-probability simulator.
//!
//! Four colors race their pieces around a shared 52-slot track into their
//! home zones. Pieces take a shortcut, hop on slots of their own color,
//! capture by landing, and stack with same-color pieces. Repeated random
//! games estimate how likely each color is to win under a given set of
//! move-selection strategies.
//!
//! ## Modules
//!
//! - [`constants`] - Track geometry, rule constants, and simulation defaults
//! - [`piece`] - Piece state machine (position derived from distance travelled)
//! - [`board`] - Per-game piece registry, movement, captures, and stacks
//! - [`player`] - Players and move-selection strategies
//! - [`playout`] - Turn driver for one complete game
//! - [`simulate`] - Parallel trials and win tallies
//!
//! ## Example
//!
//! ```
//! use aeroplane_chess::board::Board;
//! use aeroplane_chess::piece::{Color, Position};
//!
//! let mut board = Board::new();
//! let red = board.add_piece(Color::Red, 0);
//! board.standby(red).unwrap();
//! board.move_piece(red, 6, true).unwrap();
//!
//! // distance 6 is a red slot, so the piece hops on to 10
//! let piece = board.piece(red).unwrap();
//! assert_eq!(piece.distance_travelled(), Some(10));
//! assert_eq!(piece.position(), Position::OnTrack(49));
//! ```

pub mod board;
pub mod constants;
pub mod piece;
pub mod player;
pub mod playout;
pub mod simulate;
