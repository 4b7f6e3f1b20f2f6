//! SGF point encoding.
//!
//! A point is written as two letters, column then row, each mapping
//! `a`-`z` to 0-25 and `A`-`Z` to 26-51. Whether the decoded point lies on
//! a particular board is for the caller to decide.

use crate::board::Point;
use crate::constants::MAX_BOARD_SIZE;

/// Map one coordinate letter to its index.
#[inline]
fn letter_value(b: u8) -> Option<usize> {
    match b {
        b'a'..=b'z' => Some((b - b'a') as usize),
        b'A'..=b'Z' => Some((b - b'A') as usize + 26),
        _ => None,
    }
}

#[inline]
fn value_letter(v: usize) -> Option<char> {
    match v {
        0..=25 => Some((b'a' + v as u8) as char),
        26..=51 => Some((b'A' + (v - 26) as u8) as char),
        _ => None,
    }
}

/// Parse a two-letter point (e.g. `"dp"`).
///
/// Returns `None` for the empty string, wrong lengths and unmappable
/// letters. Move properties treat all of those as a pass.
pub fn parse_coord(s: &str) -> Option<Point> {
    match s.as_bytes() {
        [x, y] => Some((letter_value(*x)?, letter_value(*y)?)),
        _ => None,
    }
}

/// Encode a point as two letters. Returns `None` beyond the 52x52 alphabet.
pub fn str_coord((x, y): Point) -> Option<String> {
    if x >= MAX_BOARD_SIZE || y >= MAX_BOARD_SIZE {
        return None;
    }
    Some([value_letter(x)?, value_letter(y)?].iter().collect())
}

/// Parse a setup value: a single point, or a compressed rectangle `ab:cd`
/// naming two opposite corners. Malformed values yield no points.
pub fn parse_point_list(s: &str) -> Vec<Point> {
    let Some((a, b)) = s.split_once(':') else {
        return parse_coord(s).into_iter().collect();
    };
    let (Some((x1, y1)), Some((x2, y2))) = (parse_coord(a), parse_coord(b)) else {
        return Vec::new();
    };

    let mut points = Vec::new();
    for y in y1.min(y2)..=y1.max(y2) {
        for x in x1.min(x2)..=x1.max(x2) {
            points.push((x, y));
        }
    }
    points
}
