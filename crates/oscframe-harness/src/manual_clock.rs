//! Hand-advanced clock.

use std::{cell::Cell, rc::Rc};

use oscframe_core::Clock;
use oscframe_proto::Timetag;

/// A clock that only moves when the test says so.
///
/// Clones share the same underlying time, so a test can keep one handle
/// and give another to the server.
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<Timetag>>,
}

impl Default for ManualClock {
    /// Starts at [`Timetag::IMMEDIATELY`]: a host with no time
    /// reference, for tests that do not care about deferral.
    fn default() -> Self {
        Self::starting_at(Timetag::IMMEDIATELY)
    }
}

impl ManualClock {
    /// Create a clock reading `now`.
    #[must_use]
    pub fn starting_at(now: Timetag) -> Self {
        Self { now: Rc::new(Cell::new(now)) }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: Timetag) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn time(&self) -> Timetag {
        self.now.get()
    }
}
