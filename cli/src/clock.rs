use web_time::{Duration, Instant};

/// Turns wall time into whole-second ticks for the engine.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Clock {
    anchor: Instant,
}

impl Clock {
    pub(crate) fn new(now: Instant) -> Self {
        Self { anchor: now }
    }

    /// Restart counting from `now`, dropping any partial second.
    pub(crate) fn reset(&mut self, now: Instant) {
        self.anchor = now;
    }

    /// Whole seconds since the last call, the remainder carries over to the next one.
    pub(crate) fn take_ticks(&mut self, now: Instant) -> u64 {
        let secs = now.saturating_duration_since(self.anchor).as_secs();
        self.anchor += Duration::from_secs(secs);
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whole_seconds_and_keeps_remainder() {
        let start = Instant::now();
        let mut clock = Clock::new(start);

        assert_eq!(clock.take_ticks(start + Duration::from_millis(2500)), 2);
        assert_eq!(clock.take_ticks(start + Duration::from_millis(2900)), 0);
        assert_eq!(clock.take_ticks(start + Duration::from_millis(3100)), 1);
    }

    #[test]
    fn reset_drops_partial_second() {
        let start = Instant::now();
        let mut clock = Clock::new(start);

        clock.reset(start + Duration::from_millis(900));
        assert_eq!(clock.take_ticks(start + Duration::from_millis(1500)), 0);
        assert_eq!(clock.take_ticks(start + Duration::from_millis(1900)), 1);
    }

    #[test]
    fn time_going_backwards_gives_no_ticks() {
        let start = Instant::now() + Duration::from_secs(5);
        let mut clock = Clock::new(start);
        assert_eq!(clock.take_ticks(start - Duration::from_secs(1)), 0);
    }
}
