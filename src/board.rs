//! Board state and the rules of play.
//!
//! A [`Board`] is a fixed-size rectangular grid of points, each empty or
//! holding a black or white stone, plus the bookkeeping needed to replay a
//! game: capture counts, the simple-ko point and the side to move.
//!
//! Points are `(x, y)` pairs. Any point outside the grid is accepted by every
//! operation and treated as harmless: reads return empty, writes do nothing,
//! and playing there is a pass (see [`PASS_MOVE`](crate::constants::PASS_MOVE)).

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Returns the other player.
    pub fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

pub type Point = (usize, usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>>,
    ko: Option<Point>,
    to_move: Color,
    captures_by_black: u32,
    captures_by_white: u32,
}

impl Board {
    /// Create an empty board with Black to move.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
            ko: None,
            to_move: Color::Black,
            captures_by_black: 0,
            captures_by_white: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The point the next move may not be played on, if any.
    pub fn ko(&self) -> Option<Point> {
        self.ko
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn set_to_move(&mut self, color: Color) {
        self.to_move = color;
    }

    /// Number of opposing stones removed from the board by `color`.
    pub fn captures(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.captures_by_black,
            Color::White => self.captures_by_white,
        }
    }

    pub fn in_bounds(&self, (x, y): Point) -> bool {
        x < self.width && y < self.height
    }

    fn idx(&self, (x, y): Point) -> usize {
        y * self.width + x
    }

    pub fn state_at(&self, pt: Point) -> Option<Color> {
        if !self.in_bounds(pt) {
            return None;
        }
        self.cells[self.idx(pt)]
    }

    pub fn set_at(&mut self, pt: Point, state: Option<Color>) {
        if !self.in_bounds(pt) {
            return;
        }
        let i = self.idx(pt);
        self.cells[i] = state;
    }

    /// Orthogonal neighbours inside the board, in the order +x, -x, +y, -y.
    /// Points off the board have no neighbours.
    pub fn neighbours(&self, pt: Point) -> std::vec::IntoIter<Point> {
        let (x, y) = pt;
        let mut v = Vec::with_capacity(4);
        if self.in_bounds(pt) {
            if x + 1 < self.width {
                v.push((x + 1, y));
            }
            if x > 0 {
                v.push((x - 1, y));
            }
            if y + 1 < self.height {
                v.push((x, y + 1));
            }
            if y > 0 {
                v.push((x, y - 1));
            }
        }
        v.into_iter()
    }

    /// True if the group containing `pt` touches at least one empty point.
    /// Empty points have no group and so no liberties.
    pub fn has_liberties(&self, pt: Point) -> bool {
        self.has_liberty_other_than(pt, None)
    }

    /// Depth-first search over the group at `start`, stopping at the first
    /// liberty that is not `excluded`.
    fn has_liberty_other_than(&self, start: Point, excluded: Option<Point>) -> bool {
        let color = match self.state_at(start) {
            Some(c) => c,
            None => return false,
        };
        let mut stack = vec![start];
        let mut visited = vec![false; self.width * self.height];
        visited[self.idx(start)] = true;

        while let Some(pt) = stack.pop() {
            for n in self.neighbours(pt) {
                match self.state_at(n) {
                    None if Some(n) != excluded => return true,
                    Some(c) if c == color => {
                        let ni = self.idx(n);
                        if !visited[ni] {
                            visited[ni] = true;
                            stack.push(n);
                        }
                    }
                    _ => {}
                }
            }
        }
        false
    }

    /// Remove the whole group containing `pt`, crediting each stone to the
    /// opponent's capture count. Returns the number of stones removed.
    pub fn destroy_group(&mut self, pt: Point) -> u32 {
        let color = match self.state_at(pt) {
            Some(c) => c,
            None => return 0,
        };
        let mut stack = vec![pt];
        let mut count = 0u32;
        self.set_at(pt, None);

        while let Some(cur) = stack.pop() {
            count += 1;
            let same: Vec<Point> = self
                .neighbours(cur)
                .filter(|&n| self.state_at(n) == Some(color))
                .collect();
            for n in same {
                self.set_at(n, None);
                stack.push(n);
            }
        }

        match color {
            Color::Black => self.captures_by_white += count,
            Color::White => self.captures_by_black += count,
        }
        count
    }

    /// Whether the side to move may play at `pt`.
    pub fn legal_move(&self, pt: Point) -> bool {
        self.legal_move_colour(pt, self.to_move)
    }

    /// Whether `color` may play at `pt`: the point must be on the board,
    /// empty, not the ko point, and the move must not be suicide.
    pub fn legal_move_colour(&self, pt: Point, color: Color) -> bool {
        if !self.in_bounds(pt) || self.state_at(pt).is_some() || self.ko == Some(pt) {
            return false;
        }

        for n in self.neighbours(pt) {
            match self.state_at(n) {
                None => return true,
                Some(c) if c == color => {
                    if self.has_liberty_other_than(n, Some(pt)) {
                        return true;
                    }
                }
                Some(_) => {
                    if !self.has_liberty_other_than(n, Some(pt)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Apply a move or, for any point off the board, a pass.
    ///
    /// No legality check is made: recorded games may contain irregular
    /// moves, and replaying them must still produce a consistent board.
    pub fn play_move_or_pass(&mut self, pt: Point, color: Color) {
        self.to_move = color.opposite();
        self.ko = None;

        if !self.in_bounds(pt) {
            return;
        }

        self.set_at(pt, Some(color));

        let opp = color.opposite();
        let mut total_captures = 0;
        for n in self.neighbours(pt) {
            if self.state_at(n) == Some(opp) && !self.has_liberties(n) {
                total_captures += self.destroy_group(n);
            }
        }

        if !self.has_liberties(pt) {
            self.destroy_group(pt);
            return;
        }

        if total_captures == 1 {
            if let Some(lib) = self.sole_liberty_of_lone_stone(pt) {
                self.ko = Some(lib);
            }
        }
    }

    /// If the stone at `pt` has no friendly neighbours and exactly one
    /// liberty, returns that liberty.
    fn sole_liberty_of_lone_stone(&self, pt: Point) -> Option<Point> {
        let color = self.state_at(pt)?;
        let mut liberty = None;
        for n in self.neighbours(pt) {
            match self.state_at(n) {
                Some(c) if c == color => return None,
                Some(_) => {}
                None if liberty.is_some() => return None,
                None => liberty = Some(n),
            }
        }
        liberty
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = match self.state_at((x, y)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PASS_MOVE;

    #[test]
    fn test_out_of_bounds_access_is_harmless() {
        let mut board = Board::new(9, 9);
        board.set_at((9, 0), Some(Color::Black));
        board.set_at(PASS_MOVE, Some(Color::White));
        assert_eq!(board.state_at((9, 0)), None);
        assert_eq!(board.state_at(PASS_MOVE), None);
        assert!(!board.legal_move((0, 9)));
    }

    #[test]
    fn test_neighbours_order_and_edges() {
        let board = Board::new(5, 3);
        let n: Vec<Point> = board.neighbours((2, 1)).collect();
        assert_eq!(n, vec![(3, 1), (1, 1), (2, 2), (2, 0)]);

        let corner: Vec<Point> = board.neighbours((0, 0)).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);

        let far: Vec<Point> = board.neighbours((4, 2)).collect();
        assert_eq!(far, vec![(3, 2), (4, 1)]);
    }

    #[test]
    fn test_has_liberties() {
        let mut board = Board::new(9, 9);
        assert!(!board.has_liberties((4, 4)), "empty point has no group");

        board.set_at((0, 0), Some(Color::White));
        board.set_at((1, 0), Some(Color::Black));
        assert!(board.has_liberties((0, 0)));
        board.set_at((0, 1), Some(Color::Black));
        assert!(!board.has_liberties((0, 0)));
    }

    #[test]
    fn test_destroy_group_credits_opponent() {
        let mut board = Board::new(9, 9);
        for pt in [(3, 3), (3, 4), (4, 4)] {
            board.set_at(pt, Some(Color::White));
        }
        board.set_at((5, 5), Some(Color::White));

        assert_eq!(board.destroy_group((3, 4)), 3);
        assert_eq!(board.captures(Color::Black), 3);
        assert_eq!(board.captures(Color::White), 0);
        assert_eq!(board.state_at((3, 3)), None);
        assert_eq!(board.state_at((4, 4)), None);
        assert_eq!(board.state_at((5, 5)), Some(Color::White));

        assert_eq!(board.destroy_group((0, 0)), 0);
    }

    #[test]
    fn test_capture_single_stone() {
        let mut board = Board::new(19, 19);
        board.set_at((1, 1), Some(Color::White));
        board.set_at((0, 1), Some(Color::Black));
        board.set_at((2, 1), Some(Color::Black));
        board.set_at((1, 0), Some(Color::Black));

        assert!(board.legal_move_colour((1, 2), Color::Black));
        board.play_move_or_pass((1, 2), Color::Black);

        assert_eq!(board.state_at((1, 1)), None);
        assert_eq!(board.captures(Color::Black), 1);
        assert_eq!(board.to_move(), Color::White);
    }

    #[test]
    fn test_suicide_is_illegal_and_self_captures_when_forced() {
        let mut board = Board::new(9, 9);
        board.set_at((1, 0), Some(Color::White));
        board.set_at((0, 1), Some(Color::White));
        board.set_at((5, 5), Some(Color::Black));

        assert!(!board.legal_move_colour((0, 0), Color::Black));
        assert!(board.legal_move_colour((0, 0), Color::White));

        board.play_move_or_pass((0, 0), Color::Black);
        assert_eq!(board.state_at((0, 0)), None);
        assert_eq!(board.captures(Color::Black), 0);
        assert_eq!(board.captures(Color::White), 1);
    }

    #[test]
    fn test_connecting_to_group_with_liberty_is_legal() {
        let mut board = Board::new(9, 9);
        // Black (1,0) with liberty at (2,0); (0,0) surrounded by (1,0) and white (0,1).
        board.set_at((1, 0), Some(Color::Black));
        board.set_at((0, 1), Some(Color::White));
        board.set_at((1, 1), Some(Color::White));
        assert!(board.legal_move_colour((0, 0), Color::Black));

        board.set_at((2, 0), Some(Color::White));
        assert!(
            !board.legal_move_colour((0, 0), Color::Black),
            "filling the last liberty of own group is suicide\n{board}"
        );
    }

    #[test]
    fn test_pass_flips_player_and_clears_ko() {
        let mut board = Board::new(9, 9);
        board.play_move_or_pass(PASS_MOVE, Color::Black);
        assert_eq!(board.to_move(), Color::White);
        assert_eq!(board.ko(), None);
        assert_eq!(board, {
            let mut b = Board::new(9, 9);
            b.set_to_move(Color::White);
            b
        });
    }

    #[test]
    fn test_simple_ko() {
        // . X O .
        // X O . O
        // . X O .
        let mut board = Board::new(9, 9);
        for pt in [(1, 0), (0, 1), (1, 2)] {
            board.set_at(pt, Some(Color::Black));
        }
        for pt in [(2, 0), (1, 1), (3, 1), (2, 2)] {
            board.set_at(pt, Some(Color::White));
        }

        board.play_move_or_pass((2, 1), Color::Black);
        assert_eq!(board.state_at((1, 1)), None);
        assert_eq!(board.ko(), Some((1, 1)));
        assert!(!board.legal_move((1, 1)), "immediate retake is ko");

        board.play_move_or_pass((7, 7), Color::White);
        assert_eq!(board.ko(), None);
        board.play_move_or_pass((7, 6), Color::Black);
        assert!(board.legal_move((1, 1)));
    }

    #[test]
    fn test_capturing_two_stones_sets_no_ko() {
        let mut board = Board::new(9, 9);
        // White pair at (0,0),(0,1); black at (1,0),(1,1); last liberty (0,2).
        board.set_at((0, 0), Some(Color::White));
        board.set_at((0, 1), Some(Color::White));
        board.set_at((1, 0), Some(Color::Black));
        board.set_at((1, 1), Some(Color::Black));
        board.play_move_or_pass((0, 2), Color::Black);
        assert_eq!(board.captures(Color::Black), 2);
        assert_eq!(board.ko(), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut board = Board::new(9, 9);
        board.play_move_or_pass((4, 4), Color::Black);
        let snapshot = board.clone();
        board.play_move_or_pass((3, 3), Color::White);
        assert_eq!(snapshot.state_at((3, 3)), None);
        assert_eq!(snapshot.to_move(), Color::White);
        assert_ne!(snapshot, board);
    }
}
