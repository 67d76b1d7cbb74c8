//! Tick pacing.
//!
//! A rate limiter rather than a time source: the loop asks whether the next
//! tick is due and, once it has run, schedules the following one. Under load
//! ticks are late rather than bunched.

use std::time::{Duration, Instant};

/// Fixed-rate tick scheduler.
#[derive(Debug, Clone)]
pub struct TickClock {
    /// Ticks per second.
    rate: u32,
    /// Instant the next tick becomes due. `None` until the first tick.
    next: Option<Instant>,
    /// Ticks run since creation or the last reset.
    ticks: u64,
}

impl TickClock {
    /// Create a clock running at `rate` ticks per second (at least 1).
    pub fn new(rate: u32) -> Self {
        Self {
            rate: rate.max(1),
            next: None,
            ticks: 0,
        }
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Duration of one tick at the current rate.
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.rate))
    }

    /// Change the rate. Takes effect from the next scheduled tick.
    pub fn set_rate(&mut self, rate: u32) {
        self.rate = rate.max(1);
    }

    /// The next tick may run at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next.map_or(true, |next| now >= next)
    }

    /// Mark a tick as run at `now` and schedule the next one.
    ///
    /// The schedule advances from the previous deadline so pacing does not
    /// drift, unless the loop has fallen a whole interval behind, in which case
    /// it restarts from `now`.
    pub fn tick(&mut self, now: Instant) -> Instant {
        let interval = self.interval();
        let next = match self.next {
            Some(prev) if now < prev + interval => prev + interval,
            _ => now + interval,
        };
        self.next = Some(next);
        self.ticks += 1;
        next
    }

    /// Instant of the next tick, if one is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Forget the schedule; the next tick is due immediately.
    pub fn reset(&mut self) {
        self.next = None;
        self.ticks = 0;
    }

    /// Block the current thread until the next tick is due.
    pub fn wait(&self) {
        if let Some(next) = self.next {
            let now = Instant::now();
            if next > now {
                std::thread::sleep(next - now);
            }
        }
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_creation() {
        let clock = TickClock::new(60);
        assert_eq!(clock.rate(), 60);
        assert_eq!(clock.ticks(), 0);
        assert!(clock.is_due(Instant::now()));
        assert_eq!(TickClock::new(0).rate(), 1);
    }

    #[test]
    fn test_interval() {
        let clock = TickClock::new(50);
        assert_eq!(clock.interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_tick_schedules_next() {
        let start = Instant::now();
        let mut clock = TickClock::new(10);

        let next = clock.tick(start);
        assert_eq!(next, start + Duration::from_millis(100));
        assert!(!clock.is_due(start + Duration::from_millis(50)));
        assert!(clock.is_due(start + Duration::from_millis(100)));

        // On time: advance from the previous deadline.
        let next = clock.tick(start + Duration::from_millis(105));
        assert_eq!(next, start + Duration::from_millis(200));
        assert_eq!(clock.ticks(), 2);
    }

    #[test]
    fn test_tick_restarts_when_behind() {
        let start = Instant::now();
        let mut clock = TickClock::new(10);
        clock.tick(start);

        let late = start + Duration::from_millis(450);
        let next = clock.tick(late);
        assert_eq!(next, late + Duration::from_millis(100));
    }

    #[test]
    fn test_set_rate_and_reset() {
        let start = Instant::now();
        let mut clock = TickClock::new(10);
        clock.tick(start);
        clock.set_rate(20);
        assert_eq!(clock.interval(), Duration::from_millis(50));

        clock.reset();
        assert!(clock.deadline().is_none());
        assert!(clock.is_due(start));
    }
}
