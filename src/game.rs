use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

use crate::config::{EXIT_DELAY, INPUT_POLL_INTERVAL};
use crate::frontend::{Frontend, Input};
use crate::scheduler::Scheduler;
use crate::session::{Session, TickOutcome};

/// How a run ended
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Exit {
    /// The game ended and the final screen timed out
    Finished,
    /// The player asked to quit
    Quit,
}

/// Drives a session in real time against a frontend.
pub struct SnakeGame<F> {
    session: Session,
    frontend: F,
    scheduler: Scheduler,
    exit_delay: Duration,
}

impl<F: Frontend> SnakeGame<F> {
    pub fn new(session: Session, frontend: F) -> Self {
        SnakeGame { session, frontend, scheduler: Scheduler::new(), exit_delay: EXIT_DELAY }
    }

    pub fn with_exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay = delay;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    pub fn play(&mut self) -> Result<Exit> {
        self.frontend.render(&self.session.frame())?;
        let start = Instant::now();

        loop {
            let timeout = self.scheduler.next_deadline().saturating_sub(start.elapsed()).min(INPUT_POLL_INTERVAL);

            for input in self.frontend.poll_input(timeout)? {
                match input {
                    Input::Quit => return Ok(Exit::Quit),
                    Input::Key(key) => {
                        self.session.handle_key(&key);
                    }
                }
            }

            match self.scheduler.poll(start.elapsed(), &mut self.session) {
                Some(TickOutcome::Moved { .. }) => self.frontend.render(&self.session.frame())?,
                Some(outcome @ TickOutcome::Lost { .. }) | Some(outcome @ TickOutcome::Won { .. }) => {
                    info!(?outcome, "game ended");
                    self.frontend.render(&self.session.frame())?;
                    break;
                }
                Some(TickOutcome::Halted) | None => {}
            }
        } // Game loop

        self.wait_for_exit()
    }

    ///////////////////////////////////////////////////////////////////////////

    // Keeps the final screen up for the exit delay; CTRL+C cuts it short
    fn wait_for_exit(&mut self) -> Result<Exit> {
        let deadline = Instant::now() + self.exit_delay;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(Exit::Finished);
            }

            let inputs = self.frontend.poll_input(remaining.min(INPUT_POLL_INTERVAL))?;
            if inputs.contains(&Input::Quit) {
                return Ok(Exit::Quit);
            }
        }
    }
}
