use rand::Rng;

use crate::board::Board;
use crate::config::{INITIAL_CIRCULAR_FOOD, INITIAL_STAR_FOOD};
use crate::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FoodKind {
    Circular,
    Star,
}

impl FoodKind {
    /// Segments gained by eating one
    pub fn growth(self) -> usize {
        match self {
            FoodKind::Circular => 1,
            FoodKind::Star => 2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FoodItem {
    pub position: Position,
    pub kind: FoodKind,
}

impl FoodItem {
    pub fn new(position: Position, kind: FoodKind) -> Self {
        FoodItem { position, kind }
    }
}

/// Places food uniformly over the whole grid. Occupancy is never looked at,
/// so food can land on the snake or on other food.
pub struct FoodGenerator<R> {
    board: Board,
    rng: R,
}

impl<R: Rng> FoodGenerator<R> {
    pub fn new(board: Board, rng: R) -> Self {
        FoodGenerator { board, rng }
    }

    pub fn place_random(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.board.columns()) * self.board.cell_size;
        let y = self.rng.gen_range(0..self.board.rows()) * self.board.cell_size;
        (x, y)
    }

    pub fn spawn(&mut self, kind: FoodKind) -> FoodItem {
        FoodItem::new(self.place_random(), kind)
    }

    /// Circular items first, then stars
    pub fn initial_food(&mut self) -> Vec<FoodItem> {
        let circular = (0..INITIAL_CIRCULAR_FOOD).map(|_| FoodKind::Circular);
        let star = (0..INITIAL_STAR_FOOD).map(|_| FoodKind::Star);
        circular.chain(star).map(|kind| self.spawn(kind)).collect()
    }
}
