//! SGF reading.
//!
//! [`parse_all`] turns a byte buffer holding one or more back-to-back SGF
//! game records into [`GameTree`]s. Properties are stored as raw strings;
//! nothing is interpreted beyond splitting keys from values and refusing
//! nodes with more than one move.
//!
//! The scanner walks each node sequence in a loop and only recurses when a
//! `(` opens a variation, so a long unbranched game costs no stack.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, trace};

use crate::constants::{KEY_BLACK, KEY_WHITE};
use crate::node::{GameTree, NodeId};

#[derive(Debug, Error)]
pub enum SgfError {
    #[error("malformed SGF: unexpected byte 0x{byte:02x} at offset {offset}")]
    MalformedInput { offset: usize, byte: u8 },
    #[error("malformed SGF: second move property in one node at offset {offset}")]
    DuplicateMove { offset: usize },
    #[error("no SGF game found")]
    EmptyResult,
    #[error("SGF input ended inside an open game tree")]
    UnterminatedTree,
    #[error("failed to read SGF file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse every complete game in `buf`.
///
/// Parsing stops quietly at the first game that fails, keeping the games
/// read before it. It is an error only if not a single game parses.
pub fn parse_all(buf: &[u8]) -> Result<Vec<GameTree>, SgfError> {
    let mut games = Vec::new();
    let mut off = 0;

    loop {
        let mut tree = GameTree::new();
        match parse_tree(buf, off, &mut tree, None) {
            Ok(read) => {
                trace!(offset = off, nodes = tree.len(), "parsed game");
                games.push(tree);
                off += read;
            }
            Err(e) if games.is_empty() => return Err(e),
            Err(e) => {
                debug!(offset = off, games = games.len(), "stopping at unparsable remainder: {e}");
                break;
            }
        }
    }
    Ok(games)
}

pub fn parse_str(s: &str) -> Result<Vec<GameTree>, SgfError> {
    parse_all(s.as_bytes())
}

/// Read a file and parse every game in it.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<GameTree>, SgfError> {
    let buf = std::fs::read(path.as_ref())?;
    parse_all(&buf)
}

/// Create the next node: a child of `current`, or the local root of this
/// (sub)tree if there is no current node yet.
fn open_node(tree: &mut GameTree, current: Option<NodeId>, parent: Option<NodeId>) -> NodeId {
    match (current, parent) {
        (Some(node), _) | (None, Some(node)) => tree.add_child(node),
        (None, None) => tree.root(),
    }
}

/// Parse one game tree starting at `off`, attaching its root below `parent`
/// (or using the tree's own root when `parent` is `None`).
///
/// Returns the number of bytes consumed, up to and including the closing `)`.
fn parse_tree(
    buf: &[u8],
    off: usize,
    tree: &mut GameTree,
    parent: Option<NodeId>,
) -> Result<usize, SgfError> {
    let mut root: Option<NodeId> = None;
    let mut node: Option<NodeId> = None;
    let mut tree_started = false;
    let mut inside_value = false;
    let mut escape = false;

    let mut value: Vec<u8> = Vec::new();
    let mut key = String::new();
    let mut key_complete = false;

    let mut i = off;
    while i < buf.len() {
        let c = buf[i];
        i += 1;

        if !tree_started {
            match c {
                _ if c <= b' ' => continue,
                b'(' => {
                    tree_started = true;
                    continue;
                }
                _ => return Err(SgfError::MalformedInput { offset: i - 1, byte: c }),
            }
        }

        if inside_value {
            if escape {
                value.push(c);
                escape = false;
            } else if c == b'\\' {
                escape = true;
            } else if c == b']' {
                inside_value = false;
                let Some(n) = node else {
                    return Err(SgfError::MalformedInput { offset: i - 1, byte: c });
                };
                let text = String::from_utf8_lossy(&value).into_owned();
                tree.add_value_no_invalidate(n, &key, text);
            } else {
                value.push(c);
            }
            continue;
        }

        match c {
            _ if c <= b' ' || c.is_ascii_lowercase() => {}
            b'[' => {
                let n = match node {
                    Some(n) => n,
                    None => {
                        let n = open_node(tree, None, parent);
                        node = Some(n);
                        root = Some(n);
                        n
                    }
                };
                if key.is_empty() {
                    return Err(SgfError::MalformedInput { offset: i - 1, byte: c });
                }
                if (key == KEY_BLACK || key == KEY_WHITE)
                    && (tree.has_key(n, KEY_BLACK) || tree.has_key(n, KEY_WHITE))
                {
                    return Err(SgfError::DuplicateMove { offset: i - 1 });
                }
                value.clear();
                inside_value = true;
                key_complete = true;
            }
            b'(' => {
                let Some(n) = node else {
                    return Err(SgfError::MalformedInput { offset: i - 1, byte: c });
                };
                // The recursive call consumes from the `(` itself.
                let read = parse_tree(buf, i - 1, tree, Some(n))?;
                i = i - 1 + read;
            }
            b')' => {
                if root.is_none() {
                    return Err(SgfError::MalformedInput { offset: i - 1, byte: c });
                }
                return Ok(i - off);
            }
            b';' => {
                let n = open_node(tree, node, parent);
                if root.is_none() {
                    root = Some(n);
                }
                node = Some(n);
                key.clear();
                key_complete = false;
            }
            b'A'..=b'Z' => {
                if key_complete {
                    key.clear();
                    key_complete = false;
                }
                key.push(c as char);
            }
            _ => return Err(SgfError::MalformedInput { offset: i - 1, byte: c }),
        }
    }

    if tree_started {
        Err(SgfError::UnterminatedTree)
    } else {
        Err(SgfError::EmptyResult)
    }
}
