//! Per-game piece registry and the movement engine built on it.
//!
//! The [`Board`] owns every piece of one game session. Movement needs to
//! look at other pieces (captures and stacks), so the full move algorithm
//! lives here while [`Piece`] keeps the single-step state machine.

use std::fmt;

use crate::constants::{SELF_JUMP_LENGTH, SHORTCUT_ENTRANCE, SHORTCUT_LENGTH};
use crate::piece::{Color, MoveError, Piece, PieceId, Position};

/// Everything that happened during one [`Board::move_piece`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Opposing pieces sent back to their hangars, in capture order.
    pub captured: Vec<PieceId>,
    /// The shortcut from distance 18 was taken.
    pub shortcut: bool,
    /// A self-color bonus hop was taken.
    pub self_jump: bool,
    /// Stack peers that were carried along with the moved piece.
    pub carried: Vec<PieceId>,
    /// Final position of the moved piece.
    pub position: Option<Position>,
}

/// All live pieces of one game session.
#[derive(Clone, Debug, Default)]
pub struct Board {
    pieces: Vec<Piece>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new hangar piece.
    pub fn add_piece(&mut self, color: Color, identifier: u8) -> PieceId {
        self.pieces.push(Piece::new(color, identifier));
        PieceId(self.pieces.len() - 1)
    }

    /// Remove every piece, ending the session.
    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    fn piece_mut(&mut self, id: PieceId) -> Result<&mut Piece, MoveError> {
        self.pieces.get_mut(id.0).ok_or(MoveError::UnknownPiece(id.0))
    }

    /// Iterate over `(id, piece)` pairs in registration order.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.pieces.iter().enumerate().map(|(i, p)| (PieceId(i), p))
    }

    /// Pieces of any other color currently on `slot`.
    pub fn find_opposing(&self, slot: u8, excluding_color: Color) -> Vec<PieceId> {
        self.pieces()
            .filter(|(_, p)| {
                p.color() != excluding_color && p.position() == Position::OnTrack(slot)
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Stackable pieces of `color` with exactly `distance` travelled, other than `excluding`.
    pub fn find_same_distance(
        &self,
        distance: u8,
        color: Color,
        excluding: PieceId,
    ) -> Vec<PieceId> {
        self.pieces()
            .filter(|&(id, p)| {
                id != excluding
                    && p.color() == color
                    && p.is_stackable()
                    && p.distance_travelled() == Some(distance)
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Other members of the stack `id` belongs to (empty if it is alone).
    pub fn stack_of(&self, id: PieceId) -> Vec<PieceId> {
        match self.piece(id) {
            Some(p) if p.is_stackable() => match p.distance_travelled() {
                Some(d) => self.find_same_distance(d, p.color(), id),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Send a hangar piece to standby.
    ///
    /// # Errors
    /// `InvalidTransition` if the piece is not in its hangar.
    pub fn standby(&mut self, id: PieceId) -> Result<(), MoveError> {
        self.piece_mut(id)?.standby()
    }

    /// Move a piece `distance` steps and resolve every rule that follows.
    ///
    /// Pieces stacked with the mover before the move end up in exactly the
    /// mover's final state.
    ///
    /// # Errors
    /// `InvalidTransition` if the piece is in its hangar or settled.
    pub fn move_piece(
        &mut self,
        id: PieceId,
        distance: u8,
        enable_jump: bool,
    ) -> Result<MoveOutcome, MoveError> {
        let stack = self.stack_of(id);
        let mut outcome = MoveOutcome::default();
        self.advance(id, distance, enable_jump, &mut outcome)?;

        let leader = self.pieces[id.0].clone();
        for &peer in &stack {
            self.pieces[peer.0].follow(&leader);
        }
        outcome.carried = stack;
        outcome.position = Some(leader.position());
        Ok(outcome)
    }

    /// One landing: step, capture, then at most one follow-up hop.
    fn advance(
        &mut self,
        id: PieceId,
        distance: u8,
        enable_jump: bool,
        outcome: &mut MoveOutcome,
    ) -> Result<(), MoveError> {
        let piece = self.piece_mut(id)?;
        piece.travel(distance)?;
        let color = piece.color();
        let position = piece.position();
        let travelled = piece.distance_travelled();
        let own_color = piece.on_own_color();

        if let Position::OnTrack(slot) = position {
            for victim in self.find_opposing(slot, color) {
                self.pieces[victim.0].send_back();
                outcome.captured.push(victim);
            }
        }

        // Both follow-up hops run with jumps disabled, so recursion is at most two deep.
        if travelled == Some(SHORTCUT_ENTRANCE) {
            outcome.shortcut = true;
            self.advance(id, SHORTCUT_LENGTH, false, outcome)
        } else if enable_jump && own_color {
            outcome.self_jump = true;
            self.advance(id, SELF_JUMP_LENGTH, false, outcome)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, p) in self.pieces() {
            let travelled = match p.distance_travelled() {
                Some(d) => d.to_string(),
                None => "-".to_string(),
            };
            writeln!(
                f,
                "#{:<2} {:<6} {} {:<10} ({}) travelled {}",
                id.0,
                p.color(),
                p.identifier(),
                p.position().to_string(),
                p.position_color(),
                travelled
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Put a fresh piece of `color` in play at `distance` without triggering hops.
    fn place(board: &mut Board, color: Color, distance: u8) -> PieceId {
        let id = board.add_piece(color, board.len() as u8);
        board.standby(id).unwrap();
        if distance > 0 {
            board.pieces[id.0].travel(distance).unwrap();
        }
        id
    }

    #[test]
    fn test_plain_move() {
        let mut board = Board::new();
        let id = place(&mut board, Color::Yellow, 0);
        let outcome = board.move_piece(id, 3, true).unwrap();
        assert_eq!(outcome.position, Some(Position::OnTrack(3)));
        assert!(!outcome.shortcut && !outcome.self_jump);
        assert_eq!(board.piece(id).unwrap().distance_travelled(), Some(3));
    }

    #[test]
    fn test_shortcut_end_to_end() {
        let mut board = Board::new();
        let id = place(&mut board, Color::Red, 14);
        let outcome = board.move_piece(id, 4, true).unwrap();
        assert!(outcome.shortcut);
        // distance 30 is red-colored, but the inner hop has jumps disabled
        assert!(!outcome.self_jump);
        assert_eq!(board.piece(id).unwrap().distance_travelled(), Some(30));
        assert_eq!(outcome.position, Some(Position::OnTrack(17)));
    }

    #[test]
    fn test_shortcut_ignores_enable_jump() {
        let mut board = Board::new();
        let id = place(&mut board, Color::Blue, 15);
        let outcome = board.move_piece(id, 3, false).unwrap();
        assert!(outcome.shortcut);
        assert_eq!(board.piece(id).unwrap().distance_travelled(), Some(30));
    }

    #[test]
    fn test_self_jump_single_hop() {
        let mut board = Board::new();
        let id = place(&mut board, Color::Green, 0);
        let outcome = board.move_piece(id, 6, true).unwrap();
        assert!(outcome.self_jump);
        // 10 is green as well, but hops do not chain
        assert_eq!(board.piece(id).unwrap().distance_travelled(), Some(10));
        assert_eq!(board.piece(id).unwrap().position_color(), Color::Green);
    }

    #[test]
    fn test_self_jump_disabled() {
        let mut board = Board::new();
        let id = place(&mut board, Color::Green, 0);
        let outcome = board.move_piece(id, 6, false).unwrap();
        assert!(!outcome.self_jump);
        assert_eq!(board.piece(id).unwrap().distance_travelled(), Some(6));
    }

    #[test]
    fn test_self_jump_into_shortcut() {
        let mut board = Board::new();
        let id = place(&mut board, Color::Yellow, 10);
        let outcome = board.move_piece(id, 4, true).unwrap();
        assert!(outcome.self_jump);
        assert!(outcome.shortcut);
        assert_eq!(board.piece(id).unwrap().distance_travelled(), Some(30));
    }

    #[test]
    fn test_no_self_jump_in_home_zone() {
        let mut board = Board::new();
        // 54 reports the own color but is not a track slot
        let id = place(&mut board, Color::Red, 48);
        let outcome = board.move_piece(id, 6, true).unwrap();
        assert!(!outcome.self_jump);
        assert_eq!(outcome.position, Some(Position::HomeZone));
        assert_eq!(board.piece(id).unwrap().distance_travelled(), Some(54));
    }

    #[test]
    fn test_capture_sends_back() {
        let mut board = Board::new();
        let victim = place(&mut board, Color::Yellow, 6);
        let mover = place(&mut board, Color::Red, 16);
        assert_eq!(slot_of(&board, victim), Some(6));
        let outcome = board.move_piece(mover, 3, true).unwrap();
        assert!(!outcome.self_jump && !outcome.shortcut);
        assert_eq!(outcome.captured, vec![victim]);
        assert_eq!(slot_of(&board, mover), Some(6));
        let v = board.piece(victim).unwrap();
        assert_eq!(v.position(), Position::Hangar);
        assert_eq!(v.distance_travelled(), Some(0));
        assert_eq!(v.position_color(), Color::Yellow);
    }

    #[test]
    fn test_capture_multiple() {
        let mut board = Board::new();
        let y = place(&mut board, Color::Yellow, 7);
        let g = place(&mut board, Color::Green, 33);
        assert_eq!(slot_of(&board, y), Some(7));
        assert_eq!(slot_of(&board, g), Some(7));
        let mover = place(&mut board, Color::Blue, 44);
        assert_eq!(slot_of(&board, mover), Some(5));
        let outcome = board.move_piece(mover, 2, true).unwrap();
        assert_eq!(outcome.captured, vec![y, g]);
    }

    #[test]
    fn test_capture_on_every_landing() {
        let mut board = Board::new();
        // green lands on slot 32 at distance 6, then hops to slot 36
        let first = place(&mut board, Color::Red, 45);
        let second = place(&mut board, Color::Blue, 23);
        assert_eq!(slot_of(&board, first), Some(32));
        assert_eq!(slot_of(&board, second), Some(36));
        let mover = place(&mut board, Color::Green, 0);
        let outcome = board.move_piece(mover, 6, true).unwrap();
        assert_eq!(outcome.captured, vec![first, second]);
    }

    #[test]
    fn test_same_color_not_captured() {
        let mut board = Board::new();
        let a = place(&mut board, Color::Red, 5);
        let b = place(&mut board, Color::Red, 1);
        board.move_piece(b, 4, true).unwrap();
        assert_eq!(board.piece(a).unwrap().distance_travelled(), Some(5));
        assert_eq!(board.stack_of(a), vec![b]);
    }

    #[test]
    fn test_stack_moves_together() {
        let mut board = Board::new();
        let a = place(&mut board, Color::Blue, 20);
        let b = place(&mut board, Color::Blue, 20);
        let lone = place(&mut board, Color::Blue, 21);
        let outcome = board.move_piece(a, 2, true).unwrap();
        assert_eq!(outcome.carried, vec![b]);
        // 22 is blue, so the pair hops on to 26
        let pa = board.piece(a).unwrap();
        let pb = board.piece(b).unwrap();
        assert_eq!(pa.distance_travelled(), Some(26));
        assert_eq!(pa.distance_travelled(), pb.distance_travelled());
        assert_eq!(pa.position(), pb.position());
        assert_eq!(pa.position_color(), pb.position_color());
        assert_eq!(board.piece(lone).unwrap().distance_travelled(), Some(21));
    }

    #[test]
    fn test_stack_settles_together() {
        let mut board = Board::new();
        let a = place(&mut board, Color::Red, 53);
        let b = place(&mut board, Color::Red, 53);
        board.move_piece(b, 5, true).unwrap();
        assert!(board.piece(a).unwrap().is_settled());
        assert!(board.piece(b).unwrap().is_settled());
        assert!(board.stack_of(a).is_empty());
    }

    #[test]
    fn test_standby_never_stacks() {
        let mut board = Board::new();
        let a = place(&mut board, Color::Green, 0);
        let b = place(&mut board, Color::Green, 0);
        assert!(board.stack_of(a).is_empty());
        board.move_piece(a, 3, true).unwrap();
        assert_eq!(board.piece(b).unwrap().position(), Position::Standby);
    }

    #[test]
    fn test_move_settled_fails() {
        let mut board = Board::new();
        let id = place(&mut board, Color::Yellow, 56);
        assert!(matches!(
            board.move_piece(id, 1, true),
            Err(MoveError::InvalidTransition { from: Position::Settled, .. })
        ));
        assert!(board.standby(id).is_err());
    }

    #[test]
    fn test_move_hangar_fails() {
        let mut board = Board::new();
        let id = board.add_piece(Color::Yellow, 0);
        assert!(board.move_piece(id, 6, true).is_err());
        assert!(board.move_piece(PieceId(7), 6, true).is_err());
    }

    #[test]
    fn test_clear() {
        let mut board = Board::new();
        board.add_piece(Color::Red, 0);
        board.add_piece(Color::Blue, 0);
        assert_eq!(board.len(), 2);
        board.clear();
        assert!(board.is_empty());
    }

    fn slot_of(board: &Board, id: PieceId) -> Option<u8> {
        match board.piece(id)?.position() {
            Position::OnTrack(slot) => Some(slot),
            _ => None,
        }
    }
}
