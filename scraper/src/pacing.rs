use std::time::{Duration, Instant};

/// Enforces a minimum quiet interval between successive requests.
///
/// The interval runs from the moment the previous request finished, so time
/// spent loading or rendering a page never counts towards the pause.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// How long a request issued at `now` must still wait after the last
    /// one finished.
    pub fn delay_needed(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self
                .min_interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Blocks until the next request is allowed.
    pub fn wait(&mut self) {
        let delay = self.delay_needed(Instant::now());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    /// Marks the current request as finished; the next interval starts now.
    pub fn finish(&mut self) {
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_is_not_delayed() {
        let pacer = Pacer::new(Duration::from_secs(1));
        assert_eq!(pacer.delay_needed(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_delay_is_remainder_of_interval() {
        let start = Instant::now();
        let pacer = Pacer {
            min_interval: Duration::from_millis(1000),
            last: Some(start),
        };
        assert_eq!(
            pacer.delay_needed(start + Duration::from_millis(300)),
            Duration::from_millis(700)
        );
        assert_eq!(
            pacer.delay_needed(start + Duration::from_millis(1500)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_interval_starts_when_request_finishes() {
        let mut pacer = Pacer::new(Duration::from_millis(40));
        pacer.wait();
        // A slow request longer than the interval must not cancel the pause.
        std::thread::sleep(Duration::from_millis(60));
        pacer.finish();

        let started = Instant::now();
        pacer.wait();
        assert!(started.elapsed() >= Duration::from_millis(35));
    }

    #[test]
    fn test_wait_without_finish_does_not_block() {
        let mut pacer = Pacer::new(Duration::from_secs(5));
        let started = Instant::now();
        pacer.wait();
        pacer.wait();
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
