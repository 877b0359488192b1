//! Piece state and the distance-to-position state machine.
//!
//! A piece's `distance_travelled` is the single source of truth: its
//! [`Position`] and display color are always derived from it through
//! [`position_for`] and never assigned independently.

use std::fmt;

use thiserror::Error;

use crate::constants::{
    ENTRY_OFFSETS, HOME_ZONE_DISTANCE, LAST_TRACK_DISTANCE, SELF_JUMP_LENGTH, SETTLE_DISTANCE,
    SHORTCUT_ENTRANCE, SHORTCUT_LENGTH, TRACK_LEN,
};

/// Player color. Order matches turn order and the slot coloring cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Green,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Yellow, Color::Blue, Color::Green];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Track slot where pieces of this color enter play.
    #[inline]
    pub fn entry_offset(self) -> u8 {
        ENTRY_OFFSETS[self.index()]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Green => "green",
        };
        f.pad(name)
    }
}

/// Where a piece currently is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Position {
    /// Off the board, waiting for a take-off roll.
    Hangar,
    /// In play at the entry point but not yet on a track slot.
    Standby,
    /// On the shared track at the given slot (0..=51).
    OnTrack(u8),
    /// In the color's private home stretch.
    HomeZone,
    /// Finished. Terminal.
    Settled,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Hangar => f.write_str("hangar"),
            Position::Standby => f.write_str("standby"),
            Position::OnTrack(slot) => write!(f, "slot {slot}"),
            Position::HomeZone => f.write_str("home zone"),
            Position::Settled => f.write_str("settled"),
        }
    }
}

/// Index of a piece inside its [`Board`](crate::board::Board).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

/// State-changing operation named in a [`MoveError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Standby,
    Move,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Standby => f.write_str("send to standby"),
            Operation::Move => f.write_str("move"),
        }
    }
}

/// Contract violations of the piece state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("invalid transition: cannot {operation} {color} piece {identifier} from {from}")]
    InvalidTransition {
        color: Color,
        identifier: u8,
        from: Position,
        operation: Operation,
    },
    #[error("no piece with id {0} on the board")]
    UnknownPiece(usize),
}

/// Absolute track slot of a piece of `color` that has travelled `distance`.
///
/// Wraps by subtracting a lap once the raw sum passes 52; a raw sum of
/// exactly 52 is slot 0, which shares slot 52's display color.
pub fn slot_for(color: Color, distance: u8) -> u8 {
    let mut raw = color.entry_offset() as u16 + distance as u16;
    if raw > TRACK_LEN as u16 {
        raw -= TRACK_LEN as u16;
    }
    (raw % TRACK_LEN as u16) as u8
}

/// Display color of a track slot.
///
/// Slot colors cycle through `Color::ALL` one step behind `slot % 4`:
/// slot 1 is red, slot 2 yellow, slot 3 blue, slot 0 (and 4, 8, ...) green.
#[inline]
pub fn slot_color(slot: u8) -> Color {
    Color::ALL[(slot as usize + 3) % 4]
}

/// Position reached by a piece of `color` in play after travelling `distance`.
pub fn position_for(color: Color, distance: u8) -> Position {
    if distance < HOME_ZONE_DISTANCE {
        Position::OnTrack(slot_for(color, distance))
    } else if distance < SETTLE_DISTANCE {
        Position::HomeZone
    } else {
        Position::Settled
    }
}

/// A single game piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    color: Color,
    identifier: u8,
    position: Position,
    position_color: Color,
    /// `None` once settled: the piece no longer takes part in stacking or capture.
    distance_travelled: Option<u8>,
}

impl Piece {
    /// Create a piece in its hangar.
    pub fn new(color: Color, identifier: u8) -> Self {
        Self {
            color,
            identifier,
            position: Position::Hangar,
            position_color: color,
            distance_travelled: Some(0),
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Key of this piece within its owning player.
    #[inline]
    pub fn identifier(&self) -> u8 {
        self.identifier
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Display color of the current slot, or the own color when off the track.
    #[inline]
    pub fn position_color(&self) -> Color {
        self.position_color
    }

    #[inline]
    pub fn distance_travelled(&self) -> Option<u8> {
        self.distance_travelled
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.position == Position::Settled
    }

    /// In play: left the hangar and not yet settled.
    pub fn is_in_play(&self) -> bool {
        matches!(
            self.position,
            Position::Standby | Position::OnTrack(_) | Position::HomeZone
        )
    }

    /// Whether this piece can be part of a stack. Standby pieces never stack.
    pub fn is_stackable(&self) -> bool {
        matches!(self.position, Position::OnTrack(_) | Position::HomeZone)
    }

    /// Whether the piece sits on a track slot of its own color.
    pub fn on_own_color(&self) -> bool {
        matches!(self.position, Position::OnTrack(_)) && self.position_color == self.color
    }

    fn invalid(&self, operation: Operation) -> MoveError {
        MoveError::InvalidTransition {
            color: self.color,
            identifier: self.identifier,
            from: self.position,
            operation,
        }
    }

    /// Bring a hangar piece into play.
    ///
    /// # Errors
    /// `InvalidTransition` unless the piece is in its hangar.
    pub fn standby(&mut self) -> Result<(), MoveError> {
        if self.position != Position::Hangar {
            return Err(self.invalid(Operation::Standby));
        }
        self.position = Position::Standby;
        self.position_color = self.color;
        Ok(())
    }

    /// Advance by `distance` and rederive position and display color.
    ///
    /// This is a single step without captures or hops. Those need the rest
    /// of the board and live in [`Board::move_piece`](crate::board::Board::move_piece).
    ///
    /// # Errors
    /// `InvalidTransition` when the piece is in its hangar or settled.
    pub fn travel(&mut self, distance: u8) -> Result<(), MoveError> {
        let current = match (self.position, self.distance_travelled) {
            (Position::Hangar | Position::Settled, _) | (_, None) => {
                return Err(self.invalid(Operation::Move));
            }
            (_, Some(d)) => d,
        };
        let travelled = current.saturating_add(distance);
        self.position = position_for(self.color, travelled);
        match self.position {
            Position::OnTrack(slot) => {
                self.position_color = slot_color(slot);
                self.distance_travelled = Some(travelled);
            }
            Position::Settled => {
                self.position_color = self.color;
                self.distance_travelled = None;
            }
            _ => {
                self.position_color = self.color;
                self.distance_travelled = Some(travelled);
            }
        }
        Ok(())
    }

    /// Return to the hangar after being captured.
    pub fn send_back(&mut self) {
        self.position = Position::Hangar;
        self.position_color = self.color;
        self.distance_travelled = Some(0);
    }

    /// Copy the movement state of a stack leader.
    pub(crate) fn follow(&mut self, leader: &Piece) {
        self.position = leader.position;
        self.position_color = leader.position_color;
        self.distance_travelled = leader.distance_travelled;
    }

    /// Final travelled distance after rolling `roll`, with the shortcut and
    /// self-color jump applied. Captures are ignored.
    ///
    /// Returns `None` when the piece cannot move (hangar, settled) or
    /// when the roll would settle it.
    pub fn projected_distance(&self, roll: u8) -> Option<u8> {
        if !self.is_in_play() {
            return None;
        }
        let mut d = self.distance_travelled?.saturating_add(roll);
        if d == SHORTCUT_ENTRANCE {
            d += SHORTCUT_LENGTH;
        } else if d <= LAST_TRACK_DISTANCE && slot_color(slot_for(self.color, d)) == self.color
        {
            d += SELF_JUMP_LENGTH;
            if d == SHORTCUT_ENTRANCE {
                d += SHORTCUT_LENGTH;
            }
        }
        (d < SETTLE_DISTANCE).then_some(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_board(color: Color, distance: u8) -> Piece {
        let mut p = Piece::new(color, 0);
        p.standby().unwrap();
        p.travel(distance).unwrap();
        p
    }

    #[test]
    fn test_slot_color_cycle() {
        assert_eq!(slot_color(0), Color::Green);
        assert_eq!(slot_color(1), Color::Red);
        assert_eq!(slot_color(2), Color::Yellow);
        assert_eq!(slot_color(3), Color::Blue);
        assert_eq!(slot_color(51), Color::Blue);
    }

    #[test]
    fn test_slot_wraparound() {
        // red enters at 39
        assert_eq!(slot_for(Color::Red, 0), 39);
        assert_eq!(slot_for(Color::Red, 12), 51);
        assert_eq!(slot_for(Color::Red, 13), 0);
        assert_eq!(slot_for(Color::Red, 14), 1);
        assert_eq!(slot_for(Color::Yellow, 50), 50);
        assert_eq!(slot_for(Color::Green, 50), 24);
    }

    #[test]
    fn test_slot_matches_modulo_on_track() {
        for color in Color::ALL {
            for d in 0..=LAST_TRACK_DISTANCE {
                let expected = (color.entry_offset() as u16 + d as u16) % 52;
                assert_eq!(slot_for(color, d) as u16, expected, "{color} at {d}");
            }
        }
    }

    #[test]
    fn test_own_color_every_fourth_step() {
        // every color's own-colored slots sit at distances 2, 6, 10, ...
        for color in Color::ALL {
            for d in 0..=LAST_TRACK_DISTANCE {
                let own = slot_color(slot_for(color, d)) == color;
                assert_eq!(own, d % 4 == 2, "{color} at {d}");
            }
        }
    }

    #[test]
    fn test_new_piece_in_hangar() {
        let p = Piece::new(Color::Blue, 3);
        assert_eq!(p.position(), Position::Hangar);
        assert_eq!(p.position_color(), Color::Blue);
        assert_eq!(p.distance_travelled(), Some(0));
        assert_eq!(p.identifier(), 3);
        assert!(!p.is_in_play());
    }

    #[test]
    fn test_standby_only_from_hangar() {
        let mut p = Piece::new(Color::Red, 0);
        p.standby().unwrap();
        assert_eq!(p.position(), Position::Standby);
        assert!(p.is_in_play());
        assert!(!p.is_stackable());

        let err = p.standby().unwrap_err();
        assert!(matches!(
            err,
            MoveError::InvalidTransition {
                from: Position::Standby,
                operation: Operation::Standby,
                ..
            }
        ));
    }

    #[test]
    fn test_travel_from_hangar_fails() {
        let mut p = Piece::new(Color::Red, 0);
        assert!(p.travel(3).is_err());
        assert_eq!(p.position(), Position::Hangar);
    }

    #[test]
    fn test_transition_table() {
        let p = on_board(Color::Yellow, 50);
        assert_eq!(p.position(), Position::OnTrack(50));
        assert_eq!(p.position_color(), Color::Yellow);

        let p = on_board(Color::Yellow, HOME_ZONE_DISTANCE);
        assert_eq!(p.position(), Position::HomeZone);
        assert_eq!(p.position_color(), Color::Yellow);

        let p = on_board(Color::Green, 55);
        assert_eq!(p.position(), Position::HomeZone);
        assert_eq!(p.position_color(), Color::Green);

        let p = on_board(Color::Green, 56);
        assert_eq!(p.position(), Position::Settled);
        assert_eq!(p.distance_travelled(), None);
    }

    #[test]
    fn test_settle_via_home_zone() {
        let mut p = on_board(Color::Blue, 52);
        assert_eq!(p.position(), Position::HomeZone);
        p.travel(3).unwrap();
        assert_eq!(p.position(), Position::HomeZone);
        p.travel(1).unwrap();
        assert_eq!(p.position(), Position::Settled);
    }

    #[test]
    fn test_settled_is_frozen() {
        let mut p = on_board(Color::Red, 60);
        assert!(p.is_settled());
        assert!(matches!(
            p.travel(1),
            Err(MoveError::InvalidTransition {
                from: Position::Settled,
                operation: Operation::Move,
                ..
            })
        ));
        assert!(p.standby().is_err());
        assert_eq!(p.position(), Position::Settled);
        assert_eq!(p.distance_travelled(), None);
    }

    #[test]
    fn test_send_back_resets() {
        let mut p = on_board(Color::Green, 20);
        p.send_back();
        assert_eq!(p.position(), Position::Hangar);
        assert_eq!(p.position_color(), Color::Green);
        assert_eq!(p.distance_travelled(), Some(0));
    }

    #[test]
    fn test_projected_distance() {
        // plain move
        assert_eq!(on_board(Color::Red, 3).projected_distance(4), Some(7));
        // own color at 10, hop to 14
        assert_eq!(on_board(Color::Red, 7).projected_distance(3), Some(14));
        // lands on the shortcut entrance
        assert_eq!(on_board(Color::Red, 14).projected_distance(4), Some(30));
        // own color at 14, hop lands on 18, shortcut to 30
        assert_eq!(on_board(Color::Red, 9).projected_distance(5), Some(30));
        // settling
        assert_eq!(on_board(Color::Red, 53).projected_distance(6), None);
        // hangar
        assert_eq!(Piece::new(Color::Red, 0).projected_distance(6), None);
    }

    #[test]
    fn test_error_message() {
        let mut p = on_board(Color::Red, 60);
        let err = p.travel(2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid transition: cannot move red piece 0 from settled"
        );
    }
}
