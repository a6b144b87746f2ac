//! Hard-coded game rules. There is no config file: everything the game
//! needs to know about its board and pacing lives here.
use std::time::Duration;

use crate::snake::Direction;
use crate::{Coord, Position};

pub const BOARD_WIDTH: Coord = 800;
pub const BOARD_HEIGHT: Coord = 800;
pub const CELL_SIZE: Coord = 20;

/// Head first
pub const INITIAL_SNAKE: [Position; 3] = [(100, 100), (80, 100), (60, 100)];
pub const INITIAL_DIRECTION: Direction = Direction::Right;

pub const INITIAL_CIRCULAR_FOOD: usize = 5;
pub const INITIAL_STAR_FOOD: usize = 2;

/// Reaching this length wins the game
pub const WIN_LENGTH: usize = 8;

pub const INITIAL_UPDATE_INTERVAL: Duration = Duration::from_millis(100);
/// Taken off the update interval once per elapsed second
pub const UPDATE_INTERVAL_DECREMENT: Duration = Duration::from_millis(4);
pub const MIN_UPDATE_INTERVAL: Duration = Duration::from_millis(20);
pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// How long the final screen stays up before the game quits
pub const EXIT_DELAY: Duration = Duration::from_secs(5);

/// Upper bound on how long the runner blocks waiting for input
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(5);
