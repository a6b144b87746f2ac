use crate::config::{BOARD_HEIGHT, BOARD_WIDTH, CELL_SIZE};
use crate::{Coord, Position};

/// Pixel-space dimensions of the playing field. Every position on it is a
/// multiple of `cell_size`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub width: Coord,
    pub height: Coord,
    pub cell_size: Coord,
}

impl Board {
    pub fn new(width: Coord, height: Coord, cell_size: Coord) -> Self {
        Board { width, height, cell_size }
    }

    pub fn columns(&self) -> Coord {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> Coord {
        self.height / self.cell_size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.0 >= 0 && pos.0 < self.width && pos.1 >= 0 && pos.1 < self.height
    }

    /// Grid (column, row) of an in-bounds position
    pub fn cell_of(&self, pos: Position) -> Option<(Coord, Coord)> {
        if self.contains(pos) {
            Some((pos.0 / self.cell_size, pos.1 / self.cell_size))
        } else {
            None
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new(BOARD_WIDTH, BOARD_HEIGHT, CELL_SIZE)
    }
}
