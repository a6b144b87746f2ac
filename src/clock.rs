use std::time::Duration;

use crate::config::{INITIAL_UPDATE_INTERVAL, MIN_UPDATE_INTERVAL, UPDATE_INTERVAL_DECREMENT};

/// Elapsed game time and the movement speed derived from it. This is the
/// only owner of the update interval; the scheduler reads it when it
/// re-arms the next tick.
#[derive(Clone, Debug)]
pub struct GameClock {
    elapsed_seconds: u64,
    update_interval: Duration,
    running: bool,
    started: bool,
}

impl GameClock {
    pub fn new() -> Self {
        GameClock {
            elapsed_seconds: 0,
            update_interval: INITIAL_UPDATE_INTERVAL,
            running: true,
            started: false,
        }
    }

    /// The clock's first beat, right after the opening tick: speeds up
    /// once without counting a second. Only the first call does anything.
    pub fn start(&mut self) -> bool {
        if !self.running || self.started {
            return false;
        }

        self.started = true;
        self.speed_up();
        true
    }

    /// One real-time second went by. Does nothing once stopped.
    pub fn advance_second(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.elapsed_seconds += 1;
        self.speed_up();
        true
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    fn speed_up(&mut self) {
        self.update_interval = self
            .update_interval
            .saturating_sub(UPDATE_INTERVAL_DECREMENT)
            .max(MIN_UPDATE_INTERVAL);
    }
}

impl Default for GameClock {
    fn default() -> Self {
        GameClock::new()
    }
}
