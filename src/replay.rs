//! Board positions for tree nodes.
//!
//! The board after a node is its parent's board with the node's own
//! properties applied, in a fixed order: `AE`, `AB`, `AW`, `B`, `W`, `PL`.
//! Results are memoised per node; a cached board is always equal to a
//! fresh replay from the root because every board-altering property change
//! drops the caches below it (see [`GameTree::invalidate_subtree`]).

use tracing::trace;

use crate::board::{Board, Color};
use crate::constants::{
    KEY_ADD_BLACK, KEY_ADD_EMPTY, KEY_ADD_WHITE, KEY_BLACK, KEY_PLAYER, KEY_WHITE, PASS_MOVE,
};
use crate::coord::{parse_coord, parse_point_list};
use crate::node::{GameTree, NodeId};

impl GameTree {
    /// The position immediately after `id`'s properties are applied.
    ///
    /// Returns an owned copy; the cached boards stay private to the tree.
    pub fn board_after(&mut self, id: NodeId) -> Board {
        if let Some(board) = &self.data(id).board {
            trace!(node = id.index(), "board cache hit");
            return board.clone();
        }

        // Collect the uncached nodes between `id` and the nearest cached
        // ancestor, then replay them top-down.
        let mut pending = vec![id];
        let mut board = loop {
            let top = pending[pending.len() - 1];
            match self.parent(top) {
                None => {
                    let (w, h) = self.declared_dimensions(top);
                    break Board::new(w, h);
                }
                Some(parent) => match &self.data(parent).board {
                    Some(board) => break board.clone(),
                    None => pending.push(parent),
                },
            }
        };
        trace!(node = id.index(), replayed = pending.len(), "replaying board");

        while let Some(node) = pending.pop() {
            self.apply_properties(node, &mut board);
            self.data_mut(node).board = Some(board.clone());
        }
        board
    }

    /// Apply one node's setup, move and player-to-move properties.
    fn apply_properties(&self, id: NodeId, board: &mut Board) {
        self.apply_setup(id, board);

        for (key, color) in [(KEY_BLACK, Color::Black), (KEY_WHITE, Color::White)] {
            if let Some(value) = self.get_value(id, key) {
                let pt = parse_coord(value).unwrap_or(PASS_MOVE);
                board.play_move_or_pass(pt, color);
            }
        }

        if let Some(value) = self.get_value(id, KEY_PLAYER) {
            match value.trim() {
                "B" | "b" => board.set_to_move(Color::Black),
                "W" | "w" => board.set_to_move(Color::White),
                _ => {}
            }
        }
    }

    /// Apply a node's `AE`, `AB` and `AW` stones, which precede its move.
    pub(crate) fn apply_setup(&self, id: NodeId, board: &mut Board) {
        let setup = [
            (KEY_ADD_EMPTY, None),
            (KEY_ADD_BLACK, Some(Color::Black)),
            (KEY_ADD_WHITE, Some(Color::White)),
        ];
        for (key, state) in setup {
            for value in self.all_values(id, key) {
                for pt in parse_point_list(value) {
                    board.set_at(pt, state);
                }
            }
        }
    }
}
