//! Rule checking for recorded games.
//!
//! Replay never refuses a move, so a record can contain moves that could
//! not have been played. [`check_tree`] finds them by testing each move
//! against the board its parent leaves behind, plus any setup stones placed
//! in the move's own node.

use std::fmt;

use crate::board::{Board, Color, Point};
use crate::constants::{
    KEY_ADD_BLACK, KEY_ADD_EMPTY, KEY_ADD_WHITE, KEY_BLACK, KEY_PLAYER, KEY_WHITE,
};
use crate::coord::str_coord;
use crate::node::{GameTree, NodeId};

/// Why a recorded move is irregular.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Problem {
    /// The node holds both a black and a white move.
    BothMoves,
    /// The mover is not the side to move.
    WrongPlayer,
    /// The point already holds a stone.
    Occupied,
    /// The move retakes a ko immediately.
    Ko,
    /// The move would leave its own group without liberties.
    Suicide,
}

/// An irregular move found in a game tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Irregularity {
    pub node: NodeId,
    /// Number of moves from the root up to and including this one.
    pub move_number: usize,
    pub color: Color,
    pub point: Option<Point>,
    pub problem: Problem,
}

impl fmt::Display for Irregularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = match self.color {
            Color::Black => "B",
            Color::White => "W",
        };
        let at = self
            .point
            .and_then(str_coord)
            .unwrap_or_else(|| "pass".to_string());
        let what = match self.problem {
            Problem::BothMoves => "node has both B and W",
            Problem::WrongPlayer => "played out of turn",
            Problem::Occupied => "point not empty",
            Problem::Ko => "retakes ko",
            Problem::Suicide => "suicide",
        };
        write!(f, "move {} {who}[{at}]: {what}", self.move_number)
    }
}

/// Why `color` may not play at `pt` on `board`, if it may not.
fn move_problem(board: &Board, pt: Point, color: Color) -> Option<Problem> {
    if board.legal_move_colour(pt, color) {
        return None;
    }
    if board.state_at(pt).is_some() {
        Some(Problem::Occupied)
    } else if board.ko() == Some(pt) {
        Some(Problem::Ko)
    } else {
        Some(Problem::Suicide)
    }
}

/// The position a node's move is played into: the parent's board plus
/// the node's own setup stones.
fn board_before(tree: &mut GameTree, id: NodeId) -> Board {
    let mut board = match tree.parent(id) {
        Some(parent) => tree.board_after(parent),
        None => {
            let (w, h) = tree.declared_dimensions(id);
            Board::new(w, h)
        }
    };
    tree.apply_setup(id, &mut board);
    board
}

fn is_setup_without_player(tree: &GameTree, id: NodeId) -> bool {
    [KEY_ADD_BLACK, KEY_ADD_WHITE, KEY_ADD_EMPTY]
        .iter()
        .any(|key| tree.has_key(id, key))
        && !tree.has_key(id, KEY_PLAYER)
}

/// Setup often comes without `PL`, so turn order is not checked on a move
/// that shares a node with setup stones or directly follows one.
fn follows_setup(tree: &GameTree, id: NodeId) -> bool {
    is_setup_without_player(tree, id)
        || tree
            .parent(id)
            .is_some_and(|parent| is_setup_without_player(tree, parent))
}

/// Problems with the move at `id`, which is move number `move_number`.
fn check_node(tree: &mut GameTree, id: NodeId, move_number: usize) -> Vec<Irregularity> {
    let Some((color, point)) = tree.move_at(id) else {
        return Vec::new();
    };
    let board = board_before(tree, id);

    let mut problems = Vec::new();
    if tree.has_key(id, KEY_BLACK) && tree.has_key(id, KEY_WHITE) {
        problems.push(Problem::BothMoves);
    }
    if board.to_move() != color && !follows_setup(tree, id) {
        problems.push(Problem::WrongPlayer);
    }
    problems.extend(point.and_then(|pt| move_problem(&board, pt, color)));

    problems
        .into_iter()
        .map(|problem| Irregularity {
            node: id,
            move_number,
            color,
            point,
            problem,
        })
        .collect()
}

/// Check every move in every variation of the tree.
pub fn check_tree(tree: &mut GameTree) -> Vec<Irregularity> {
    let mut found = Vec::new();
    let mut pending = vec![(tree.root(), 0)];

    while let Some((id, before)) = pending.pop() {
        let number = if tree.move_at(id).is_some() {
            found.extend(check_node(tree, id, before + 1));
            before + 1
        } else {
            before
        };
        // Reversed so the main line is visited first.
        for &child in tree.children(id).iter().rev() {
            pending.push((child, number));
        }
    }
    found
}

/// Check only the moves along the main line.
pub fn check_main_line(tree: &mut GameTree) -> Vec<Irregularity> {
    let line: Vec<NodeId> = tree.main_line(tree.root()).collect();
    let mut found = Vec::new();
    let mut number = 0;
    for id in line {
        if tree.move_at(id).is_some() {
            number += 1;
            found.extend(check_node(tree, id, number));
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sgf::parse_str;

    fn check(sgf: &str) -> Vec<Irregularity> {
        let mut tree = parse_str(sgf).unwrap().remove(0);
        check_tree(&mut tree)
    }

    fn problems(found: &[Irregularity]) -> Vec<(usize, Problem)> {
        found.iter().map(|i| (i.move_number, i.problem)).collect()
    }

    #[test]
    fn test_regular_game() {
        assert!(check("(;SZ[9];B[cc];W[dd];B[ee];W[];B[ff])").is_empty());
    }

    #[test]
    fn test_occupied() {
        let found = check("(;B[cc];W[cc])");
        assert_eq!(problems(&found), vec![(2, Problem::Occupied)]);
        assert_eq!(found[0].to_string(), "move 2 W[cc]: point not empty");
    }

    #[test]
    fn test_wrong_player() {
        let found = check("(;B[aa];B[bb])");
        assert_eq!(problems(&found), vec![(2, Problem::WrongPlayer)]);
    }

    #[test]
    fn test_handicap_setup_allows_white_first() {
        assert!(check("(;SZ[19]HA[2]AB[dd][pp];W[qd];B[dp])").is_empty());
    }

    #[test]
    fn test_ko_retake() {
        let found = check("(;AB[ba][ab][bc]AW[ca][bb][db][cc];B[cb];W[bb])");
        assert_eq!(problems(&found), vec![(2, Problem::Ko)]);
    }

    #[test]
    fn test_suicide() {
        let found = check("(;AW[ba][ab];B[aa])");
        assert_eq!(problems(&found), vec![(1, Problem::Suicide)]);
        assert_eq!(found[0].point, Some((0, 0)));
    }

    #[test]
    fn test_variations_are_checked() {
        let sgf = "(;B[aa](;W[bb])(;W[aa]))";
        assert_eq!(problems(&check(sgf)), vec![(2, Problem::Occupied)]);

        let mut tree = parse_str(sgf).unwrap().remove(0);
        assert!(check_main_line(&mut tree).is_empty());
    }

    #[test]
    fn test_both_moves_from_api() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let node = tree.add_child(root);
        tree.set_value(node, "B", "aa");
        tree.set_value(node, "W", "bb");
        let found = check_tree(&mut tree);
        assert_eq!(problems(&found), vec![(1, Problem::BothMoves)]);
    }

    #[test]
    fn test_setup_in_same_node_clears_point_first() {
        assert!(check("(;B[cc];AE[cc]W[cc])").is_empty());
    }

    #[test]
    fn test_setup_in_same_node_can_make_move_suicide() {
        let found = check("(;SZ[9];B[ee];AW[ba][ab]B[aa])");
        assert_eq!(problems(&found), vec![(2, Problem::Suicide)]);
    }

    #[test]
    fn test_root_handicap_with_white_move() {
        assert!(check("(;SZ[9]AB[cc][gg]W[ee])").is_empty());
    }
}
