//! Game trees of property-carrying nodes.
//!
//! A [`GameTree`] owns all of its nodes in an arena and hands out [`NodeId`]
//! handles. Each node has an optional parent, an ordered list of children
//! (the first child is the main line), an ordered multimap of property keys
//! to string values, and an optional cached [`Board`] describing the
//! position after the node.
//!
//! Real game records are often thousands of nodes deep with no branching,
//! so every whole-subtree walk in this module loops down single-child
//! chains and only recurses where a node actually has several children.

use tracing::debug;

use crate::board::{Board, Color, Point};
use crate::constants::{
    DEFAULT_BOARD_SIZE, KEY_BLACK, KEY_SIZE, KEY_WHITE, MAX_BOARD_SIZE, is_board_altering,
};
use crate::coord::parse_coord;

/// Handle to a node inside one [`GameTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A property key with its values, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Property {
    key: String,
    values: Vec<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    props: Vec<Property>,
    pub(crate) board: Option<Board>,
}

impl NodeData {
    fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            props: Vec::new(),
            board: None,
        }
    }

    fn prop(&self, key: &str) -> Option<&Property> {
        self.props.iter().find(|p| p.key == key)
    }

    fn prop_mut(&mut self, key: &str) -> Option<&mut Property> {
        self.props.iter_mut().find(|p| p.key == key)
    }
}

/// A rooted, ordered tree of game nodes.
#[derive(Clone, Debug)]
pub struct GameTree {
    nodes: Vec<NodeData>,
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GameTree {
    /// Create a tree holding a single, empty root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes in the tree. Never zero: the root always exists.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    /// Append a new, empty node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    /// Walk parent links up to the node that has none.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut node = id;
        while let Some(parent) = self.parent(node) {
            node = parent;
        }
        node
    }

    /// Iterate from `id` down the first-child line to its end.
    pub fn main_line(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&n| self.children(n).first().copied())
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Replace every value of `key` with `value`.
    pub fn set_value(&mut self, id: NodeId, key: &str, value: &str) {
        self.invalidate_if_board_altering(id, key);
        let node = self.data_mut(id);
        match node.prop_mut(key) {
            Some(p) => p.values = vec![value.to_string()],
            None => node.props.push(Property {
                key: key.to_string(),
                values: vec![value.to_string()],
            }),
        }
    }

    /// Append `value` to the values of `key`.
    pub fn add_value(&mut self, id: NodeId, key: &str, value: &str) {
        self.invalidate_if_board_altering(id, key);
        self.add_value_no_invalidate(id, key, value.to_string());
    }

    /// Append without touching caches. Only valid while building a node that
    /// has never had a board computed for it or its descendants.
    pub(crate) fn add_value_no_invalidate(&mut self, id: NodeId, key: &str, value: String) {
        let node = self.data_mut(id);
        match node.prop_mut(key) {
            Some(p) => p.values.push(value),
            None => node.props.push(Property {
                key: key.to_string(),
                values: vec![value],
            }),
        }
    }

    /// First value of `key`, if present.
    pub fn get_value(&self, id: NodeId, key: &str) -> Option<&str> {
        self.data(id)
            .prop(key)
            .and_then(|p| p.values.first())
            .map(String::as_str)
    }

    /// All values of `key` in order; empty if the key is absent.
    pub fn all_values(&self, id: NodeId, key: &str) -> &[String] {
        self.data(id)
            .prop(key)
            .map(|p| p.values.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_key(&self, id: NodeId, key: &str) -> bool {
        self.data(id).prop(key).is_some()
    }

    /// Property keys of a node, in insertion order.
    pub fn keys(&self, id: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.data(id).props.iter().map(|p| p.key.as_str())
    }

    pub fn delete_key(&mut self, id: NodeId, key: &str) {
        self.invalidate_if_board_altering(id, key);
        self.data_mut(id).props.retain(|p| p.key != key);
    }

    fn invalidate_if_board_altering(&mut self, id: NodeId, key: &str) {
        if is_board_altering(key) {
            debug!(node = id.0, key, "board-altering property changed");
            self.invalidate_subtree(id);
        }
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    /// Board width: the cached board's if there is one, else from the root's `SZ`.
    pub fn width(&self, id: NodeId) -> usize {
        match &self.data(id).board {
            Some(board) => board.width(),
            None => self.declared_dimensions(id).0,
        }
    }

    /// Board height: the cached board's if there is one, else from the root's `SZ`.
    pub fn height(&self, id: NodeId) -> usize {
        match &self.data(id).board {
            Some(board) => board.height(),
            None => self.declared_dimensions(id).1,
        }
    }

    /// Dimensions declared by the `SZ` property of the root above `id`.
    pub(crate) fn declared_dimensions(&self, id: NodeId) -> (usize, usize) {
        let root = self.root_of(id);
        self.get_value(root, KEY_SIZE)
            .and_then(parse_size)
            .unwrap_or((DEFAULT_BOARD_SIZE, DEFAULT_BOARD_SIZE))
    }

    /// The move played at a node: colour and point.
    ///
    /// The point is `None` for a pass, which includes malformed values and
    /// points off the board. Returns `None` overall if the node has no move.
    pub fn move_at(&self, id: NodeId) -> Option<(Color, Option<Point>)> {
        let (color, value) = if let Some(v) = self.get_value(id, KEY_BLACK) {
            (Color::Black, v)
        } else {
            (Color::White, self.get_value(id, KEY_WHITE)?)
        };
        let (w, h) = (self.width(id), self.height(id));
        let pt = parse_coord(value).filter(|&(x, y)| x < w && y < h);
        Some((color, pt))
    }

    /// Point of the node's move, or `None` for a pass or a node without a move.
    pub fn move_coords(&self, id: NodeId) -> Option<Point> {
        self.move_at(id).and_then(|(_, pt)| pt)
    }

    /// True if a board is currently cached at `id`.
    pub fn is_cached(&self, id: NodeId) -> bool {
        self.data(id).board.is_some()
    }

    /// Drop the cached board at `id` and at every descendant.
    pub fn invalidate_subtree(&mut self, id: NodeId) {
        let mut node = id;
        loop {
            self.nodes[node.0].board = None;
            match self.nodes[node.0].children.len() {
                0 => break,
                1 => node = self.nodes[node.0].children[0],
                _ => {
                    let children = self.nodes[node.0].children.clone();
                    for child in children {
                        self.invalidate_subtree(child);
                    }
                    break;
                }
            }
        }
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`.
    pub fn subtree_size(&self, id: NodeId) -> usize {
        let mut node = id;
        let mut count = 0;
        loop {
            count += 1;
            match self.children(node) {
                [] => return count,
                [only] => node = *only,
                children => {
                    return count
                        + children
                            .iter()
                            .map(|&child| self.subtree_size(child))
                            .sum::<usize>();
                }
            }
        }
    }
}

/// Parse an `SZ` value: `"19"` or `"9:13"` (width then height).
///
/// Each dimension is clamped to [`MAX_BOARD_SIZE`]; zero or anything that
/// does not parse rejects the whole value.
pub fn parse_size(value: &str) -> Option<(usize, usize)> {
    let dim = |s: &str| -> Option<usize> {
        match s.trim().parse::<usize>() {
            Ok(0) | Err(_) => None,
            Ok(n) => Some(n.min(MAX_BOARD_SIZE)),
        }
    };
    match value.split_once(':') {
        Some((w, h)) => Some((dim(w)?, dim(h)?)),
        None => {
            let n = dim(value)?;
            Some((n, n))
        }
    }
}
