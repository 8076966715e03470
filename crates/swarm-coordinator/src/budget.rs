//! Per-tick processing budget
//!
//! The coordinator asks the budget before each room. Once it reports
//! exhaustion, every remaining room is deferred whole to the next tick.

/// Source of the per-tick processing allowance
pub trait TickBudget {
    /// Whether another room may be processed after `processed` rooms
    fn has_capacity(&mut self, processed: usize) -> bool;
}

/// Never runs out
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl TickBudget for Unlimited {
    fn has_capacity(&mut self, _processed: usize) -> bool {
        true
    }
}

/// At most `n` rooms per tick
#[derive(Debug, Clone, Copy)]
pub struct RoomLimit(pub usize);

impl TickBudget for RoomLimit {
    fn has_capacity(&mut self, processed: usize) -> bool {
        processed < self.0
    }
}

/// Budget backed by a closure, e.g. a host CPU meter
pub struct FnBudget<F>(pub F);

impl<F> TickBudget for FnBudget<F>
where
    F: FnMut(usize) -> bool,
{
    fn has_capacity(&mut self, processed: usize) -> bool {
        (self.0)(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_limit() {
        let mut budget = RoomLimit(2);
        assert!(budget.has_capacity(0));
        assert!(budget.has_capacity(1));
        assert!(!budget.has_capacity(2));
    }

    #[test]
    fn test_fn_budget() {
        let mut cpu_left = 3.0_f64;
        let mut budget = FnBudget(|_| {
            cpu_left -= 1.5;
            cpu_left >= 0.0
        });
        assert!(budget.has_capacity(0));
        assert!(budget.has_capacity(1));
        assert!(!budget.has_capacity(2));
    }

    #[test]
    fn test_unlimited() {
        assert!(Unlimited.has_capacity(usize::MAX));
    }
}
