//! Constants for board dimensions, coordinates and property keys.
//!
//! Board dimensions are not fixed at compile time: every game tree carries
//! its own size in the root `SZ` property, bounded by what the two-letter
//! SGF coordinate alphabet can address.

use crate::board::Point;

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size used when the root carries no usable `SZ` property.
pub const DEFAULT_BOARD_SIZE: usize = 19;

/// Largest board edge addressable by one coordinate letter (`a`-`z`, `A`-`Z`).
pub const MAX_BOARD_SIZE: usize = 52;

// =============================================================================
// Special Move Values
// =============================================================================

/// Pass move marker. Lies outside every board, which is what makes it a pass.
pub const PASS_MOVE: Point = (usize::MAX, usize::MAX);

// =============================================================================
// Property Keys
// =============================================================================

/// Black move.
pub const KEY_BLACK: &str = "B";

/// White move.
pub const KEY_WHITE: &str = "W";

/// Add black stones (setup).
pub const KEY_ADD_BLACK: &str = "AB";

/// Add white stones (setup).
pub const KEY_ADD_WHITE: &str = "AW";

/// Clear points (setup).
pub const KEY_ADD_EMPTY: &str = "AE";

/// Player to move.
pub const KEY_PLAYER: &str = "PL";

/// Board size, read from the root only.
pub const KEY_SIZE: &str = "SZ";

/// Keys whose mutation changes the board of a node and all of its descendants.
pub const BOARD_ALTERING_KEYS: [&str; 7] = [
    KEY_BLACK,
    KEY_WHITE,
    KEY_ADD_BLACK,
    KEY_ADD_WHITE,
    KEY_ADD_EMPTY,
    KEY_PLAYER,
    KEY_SIZE,
];

/// Returns true if changing `key` invalidates cached boards.
#[inline]
pub fn is_board_altering(key: &str) -> bool {
    BOARD_ALTERING_KEYS.contains(&key)
}
