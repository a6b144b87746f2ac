use std::collections::VecDeque;

use crate::{Coord, Position};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Parses the raw key names the frontend reports. Anything that isn't
    /// one of the four arrow names is not a direction.
    pub fn from_key(key: &str) -> Option<Direction> {
        match key {
            "Up" => Some(Up),
            "Down" => Some(Down),
            "Left" => Some(Left),
            "Right" => Some(Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn offset(self, step: Coord) -> (Coord, Coord) {
        match self {
            Up => (0, -step),
            Down => (0, step),
            Left => (-step, 0),
            Right => (step, 0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Snake {
    // Head at the front
    body: VecDeque<Position>,
    direction: Direction,
}

impl Snake {
    /// `body` is head first and must hold at least one segment; an empty
    /// body panics.
    pub fn new(body: &[Position], direction: Direction) -> Self {
        assert!(!body.is_empty(), "a snake needs at least one segment");
        Snake { body: body.iter().copied().collect(), direction }
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn segments(&self) -> Vec<Position> {
        self.body.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Where the head lands if the snake moves one cell in its current direction
    pub fn next_head(&self, cell_size: Coord) -> Position {
        let (head, (dx, dy)) = (self.head(), self.direction.offset(cell_size));
        (head.0 + dx, head.1 + dy)
    }

    /// Moves the head to `new_head`. With `growth == 0` the tail follows;
    /// otherwise the old tail stays put and `growth - 1` extra segments are
    /// appended along the tail's trailing direction.
    pub fn advance(&mut self, new_head: Position, growth: usize) {
        self.body.push_front(new_head);

        if growth == 0 {
            self.body.pop_back();
            return;
        }

        for _ in 1..growth {
            let ext = self.tail_extension();
            self.body.push_back(ext);
        }
    }

    /// Returns whether the direction was taken; reversals are refused.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn tail_extension(&self) -> Position {
        let n = self.body.len();
        let last = self.body[n - 1];
        let prev = if n > 1 { self.body[n - 2] } else { last };

        // Vertical whenever the last two segments share a column, even if
        // they sit on the same cell
        if last.0 == prev.0 {
            (last.0, last.1 + (last.1 - prev.1))
        } else {
            (last.0 + (last.0 - prev.0), last.1)
        }
    }
}
