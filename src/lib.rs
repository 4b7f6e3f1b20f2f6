//! Gofish-Rust: reading and replaying Go game records.
//!
//! This crate parses SGF (Smart Game Format) files into mutable game trees
//! and replays them into rule-correct board positions, with captures,
//! suicide handling and the simple ko rule.
//!
//! ## Modules
//!
//! - [`constants`] - Board size limits and property keys
//! - [`board`] - Board state, captures, legality and move application
//! - [`coord`] - Two-letter SGF point encoding
//! - [`node`] - Arena-backed game trees and their properties
//! - [`replay`] - Cached board positions for tree nodes
//! - [`sgf`] - SGF parser
//! - [`validate`] - Detection of irregular recorded moves
//!
//! ## Example
//!
//! ```
//! use gofish_rust::board::Color;
//! use gofish_rust::sgf::parse_str;
//!
//! let mut games = parse_str("(;SZ[9];B[cc];W[dd])").unwrap();
//! let tree = &mut games[0];
//!
//! let last = tree.main_line(tree.root()).last().unwrap();
//! let board = tree.board_after(last);
//! assert_eq!(board.state_at((2, 2)), Some(Color::Black));
//! assert_eq!(board.to_move(), Color::Black);
//! ```

pub mod board;
pub mod constants;
pub mod coord;
pub mod node;
pub mod replay;
pub mod sgf;
pub mod validate;
