use std::time::{Duration, Instant};

use log::debug;
use winit::event_loop::ControlFlow;

/// Re-armable tick source driven by the event loop's wake-up deadline.
///
/// The loop sleeps until [`TickTimer::control_flow`] says so and then calls
/// [`TickTimer::poll`]. A disarmed timer never fires.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Changes the period. An armed timer restarts its countdown with the
    /// new interval. Returns whether the interval changed.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) -> bool {
        if interval == self.interval {
            return false;
        }
        debug!("timer interval {:?} -> {:?}", self.interval, interval);
        self.interval = interval;
        if self.is_armed() {
            self.arm(now);
        }
        true
    }

    /// Brings the timer in line with the game: armed at `interval` while
    /// running, disarmed otherwise.
    pub fn sync(&mut self, running: bool, interval: Duration, now: Instant) {
        if !running {
            self.disarm();
            return;
        }
        self.set_interval(interval, now);
        if !self.is_armed() {
            self.arm(now);
        }
    }

    /// Returns true once per expiry and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.arm(now);
                true
            }
            _ => false,
        }
    }

    pub fn control_flow(&self) -> ControlFlow {
        match self.deadline {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        }
    }
}
