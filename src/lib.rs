pub mod board;
pub mod clock;
pub mod config;
pub mod food;
pub mod frontend;
pub mod game;
pub mod logging;
pub mod scheduler;
pub mod session;
pub mod snake;
pub mod term;

pub type Coord = i32;
pub type Position = (Coord, Coord);
