use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic elapsed time.
pub trait TimeSource {
    /// Time elapsed since the source was created.
    fn elapsed(&self) -> Duration;
}

/// Wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Hand-driven time, for tests and headless simulation.
///
/// Clones share the same counter, so a caller can keep one clone to advance
/// time while a [`Clock`] owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, dt: Duration) {
        self.elapsed.set(self.elapsed.get() + dt);
    }

    pub fn set(&self, elapsed: Duration) {
        self.elapsed.set(elapsed);
    }
}

impl TimeSource for ManualClock {
    fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

/// Elapsed-time counter read once per frame.
pub struct Clock {
    source: Box<dyn TimeSource>,
}

impl Clock {
    pub fn new(source: impl TimeSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// A clock driven by wall-clock time, starting now.
    pub fn system() -> Self {
        Self::new(SystemClock::new())
    }

    /// Seconds since the clock started.
    pub fn elapsed(&self) -> f32 {
        self.source.elapsed().as_secs_f32()
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_drives_elapsed() {
        let manual = ManualClock::new();
        let clock = Clock::new(manual.clone());
        assert_eq!(clock.elapsed(), 0.0);
        manual.advance(Duration::from_millis(1500));
        assert_eq!(clock.elapsed(), 1.5);
        manual.set(Duration::from_secs(10));
        assert_eq!(clock.elapsed(), 10.0);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = Clock::system();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(b >= a);
    }
}
