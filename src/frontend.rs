use std::time::Duration;

use anyhow::Result;

use crate::board::Board;
use crate::food::FoodItem;
use crate::session::GameStatus;
use crate::snake::Snake;

/// Everything a frontend needs to draw one screen.
pub struct Frame<'a> {
    pub board: Board,
    pub snake: &'a Snake,
    pub food: &'a [FoodItem],
    pub length: usize,
    pub elapsed_seconds: u64,
    pub status: GameStatus,
    /// Overlay text for the end screens, one entry per line
    pub message: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// Raw key name, e.g. "Left" or "q"
    Key(String),
    Quit,
}

pub trait Frontend {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()>;

    /// Blocks for at most `timeout` and returns whatever input arrived.
    fn poll_input(&mut self, timeout: Duration) -> Result<Vec<Input>>;
}
