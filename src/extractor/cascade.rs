use tracing::debug;

/// One way of finding a field value. Returns `None` when it has nothing to
/// offer, never an error.
pub struct Strategy<C> {
    pub name: &'static str,
    pub run: fn(&C) -> Option<String>,
}

impl<C> Strategy<C> {
    pub const fn new(name: &'static str, run: fn(&C) -> Option<String>) -> Self {
        Self { name, run }
    }
}

/// Evaluate `strategies` in order and return the first non-blank value.
/// Strategies after the first success are not run.
pub fn run_cascade<C>(field: &str, strategies: &[Strategy<C>], ctx: &C) -> Option<String> {
    for strategy in strategies {
        match (strategy.run)(ctx) {
            Some(value) if !value.trim().is_empty() => {
                debug!(field, strategy = strategy.name, value = %value, "Strategy matched");
                return Some(value);
            }
            Some(_) => debug!(field, strategy = strategy.name, "Strategy yielded a blank value"),
            None => debug!(field, strategy = strategy.name, "Strategy found nothing"),
        }
    }

    debug!(field, "No strategy produced a value");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CallCount {
        calls: Cell<usize>,
    }

    fn nothing(counter: &CallCount) -> Option<String> {
        counter.calls.set(counter.calls.get() + 1);
        None
    }

    fn blank(counter: &CallCount) -> Option<String> {
        counter.calls.set(counter.calls.get() + 1);
        Some("   ".to_string())
    }

    fn found(counter: &CallCount) -> Option<String> {
        counter.calls.set(counter.calls.get() + 1);
        Some("value".to_string())
    }

    fn unreachable_strategy(_: &CallCount) -> Option<String> {
        panic!("cascade kept going after a match");
    }

    #[test]
    fn test_first_success_wins_and_stops() {
        let counter = CallCount { calls: Cell::new(0) };
        let strategies = [
            Strategy::new("nothing", nothing),
            Strategy::new("blank", blank),
            Strategy::new("found", found),
            Strategy::new("never", unreachable_strategy),
        ];

        assert_eq!(run_cascade("test", &strategies, &counter), Some("value".to_string()));
        assert_eq!(counter.calls.get(), 3);
    }

    #[test]
    fn test_exhausted_cascade() {
        let counter = CallCount { calls: Cell::new(0) };
        let strategies = [Strategy::new("nothing", nothing), Strategy::new("blank", blank)];

        assert_eq!(run_cascade("test", &strategies, &counter), None);
        assert_eq!(counter.calls.get(), 2);
    }
}
