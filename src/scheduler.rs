use std::time::Duration;

use crate::config::CLOCK_PERIOD;
use crate::session::{Session, TickOutcome};

/// Decides when the clock second and the movement tick are due. Times are
/// offsets from the start of the game, so the caller can drive it from a
/// monotonic clock or from a fake one.
///
/// The first tick runs at zero and re-arms with the starting interval; the
/// clock's opening beat follows it at the same instant, so every tick after
/// that is already one step faster. Seconds are caught up one by one and
/// always applied before a tick that is due at the same instant; ticks are
/// re-armed from the moment they ran, using whatever interval the clock
/// holds at that point.
pub struct Scheduler {
    next_tick: Duration,
    next_second: Duration,
    clock_started: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler { next_tick: Duration::ZERO, next_second: CLOCK_PERIOD, clock_started: false }
    }

    /// Runs whatever is due at `now`. Returns the tick outcome if a tick ran.
    pub fn poll(&mut self, now: Duration, session: &mut Session) -> Option<TickOutcome> {
        while session.is_running() && self.next_second <= now {
            session.on_second();
            self.next_second += CLOCK_PERIOD;
        }

        if !session.is_running() || self.next_tick > now {
            return None;
        }

        let outcome = session.tick();
        self.next_tick = now + session.update_interval();

        if !self.clock_started {
            self.clock_started = true;
            session.start_clock();
        }
        Some(outcome)
    }

    /// Earliest time anything is due
    pub fn next_deadline(&self) -> Duration {
        self.next_tick.min(self.next_second)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new()
    }
}
