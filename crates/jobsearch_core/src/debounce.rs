use std::time::Duration;

/// Generation-gated debounce.
///
/// Every [`Debounce::input`] supersedes the pending value and returns a new
/// generation; the caller arms a timer for that generation. When a timer
/// fires, [`Debounce::elapsed`] yields the value only if no newer input
/// arrived in between, so at most one propagation happens per quiet period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounce<T> {
    quiet: Duration,
    generation: u64,
    pending: Option<T>,
}

impl<T> Debounce<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            generation: 0,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Replace the pending value and return the generation to arm a timer for.
    pub fn input(&mut self, value: T) -> u64 {
        self.generation += 1;
        self.pending = Some(value);
        self.generation
    }

    pub fn elapsed(&mut self, generation: u64) -> Option<T> {
        if generation != self.generation {
            return None;
        }
        self.pending.take()
    }

    /// Drop the pending value; any timer already armed becomes a no-op.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_generation_propagates() {
        let mut debounce = Debounce::new(Duration::from_millis(250));
        let first = debounce.input("r");
        let second = debounce.input("ru");
        let third = debounce.input("rust");

        assert_eq!(debounce.elapsed(first), None);
        assert_eq!(debounce.elapsed(second), None);
        assert_eq!(debounce.elapsed(third), Some("rust"));
        assert_eq!(debounce.elapsed(third), None);
    }

    #[test]
    fn cancel_discards_pending_value() {
        let mut debounce = Debounce::new(Duration::from_millis(200));
        let generation = debounce.input(1);
        debounce.cancel();
        assert!(!debounce.is_pending());
        assert_eq!(debounce.elapsed(generation), None);
    }
}
