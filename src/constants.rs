//! Constants for track geometry, movement rules, and simulation defaults.
//!
//! Distances are counted from a piece's own entry slot. A piece that has
//! travelled `d` steps is on the shared track while `d <= LAST_TRACK_DISTANCE`,
//! in its home stretch up to `SETTLE_DISTANCE - 1`, and settled afterwards.

// =============================================================================
// Track Geometry
// =============================================================================

/// Number of slots on the shared circular track.
pub const TRACK_LEN: u8 = 52;

/// Entry slot of each color, in `Color::ALL` order (red, yellow, blue, green).
pub const ENTRY_OFFSETS: [u8; 4] = [39, 0, 13, 26];

/// Furthest travelled distance that is still on the shared track.
pub const LAST_TRACK_DISTANCE: u8 = 50;

/// First travelled distance inside the home zone.
pub const HOME_ZONE_DISTANCE: u8 = 51;

/// Travelled distance at which a piece is settled.
pub const SETTLE_DISTANCE: u8 = 56;

// =============================================================================
// Jump Rules
// =============================================================================

/// Travelled distance of the shortcut entrance (same for every color).
pub const SHORTCUT_ENTRANCE: u8 = 18;

/// Length of the shortcut jump.
pub const SHORTCUT_LENGTH: u8 = 12;

/// Bonus hop for landing on a slot of the piece's own color.
pub const SELF_JUMP_LENGTH: u8 = 4;

// =============================================================================
// Turn Rules
// =============================================================================

/// Pieces owned by each player.
pub const PIECES_PER_PLAYER: usize = 4;

/// Faces of the die.
pub const DIE_FACES: u8 = 6;

/// Roll that lets a hangar piece take off and grants another roll.
pub const TAKEOFF_ROLL: u8 = 6;

// =============================================================================
// Simulation Defaults
// =============================================================================

/// Default number of trial games.
pub const N_TRIALS: usize = 10_000;

/// Default seed for the first trial.
pub const DEFAULT_SEED: u64 = 2019;

/// Default number of pieces `control-planes-on-track` keeps in play.
pub const TRACK_CAP: usize = 2;

/// Turn limit after which a game is abandoned as unfinished.
pub const MAX_GAME_TURNS: usize = 10_000;
