use super::process::Ticks;
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    busy_since: Ticks,
    busy_total: Ticks,
}

/// A fixed pool of fungible compute cores with cumulative busy-time
/// accounting. The pool does not queue requesters; that is the driver's job.
///
/// Slots are indexed by the busy count at grant time, not by a stable core
/// identity, so with more than one core the per-slot totals can shift between
/// slot indexes across the run. Only the aggregate figure is attribution-safe.
#[derive(Debug)]
pub struct CorePool {
    slots: Vec<Slot>,
    busy: usize,
}

impl CorePool {
    pub fn new(core_count: usize) -> Self {
        assert!(core_count > 0, "CorePool requires at least one core");
        Self {
            slots: vec![Slot::default(); core_count],
            busy: 0,
        }
    }

    pub fn core_count(&self) -> usize {
        self.slots.len()
    }

    pub fn busy_count(&self) -> usize {
        self.busy
    }

    /// Claim a core, returning false (and mutating nothing) when all cores
    /// are busy.
    pub fn try_acquire(&mut self, now: Ticks) -> bool {
        if self.busy == self.slots.len() {
            return false;
        }
        self.slots[self.busy].busy_since = now;
        self.busy += 1;
        true
    }

    /// Release a core, crediting the vacated slot with its busy interval.
    /// Releasing with no busy core is an accounting bug and aborts the run.
    pub fn release(&mut self, now: Ticks) -> SimResult<()> {
        if self.busy == 0 {
            return Err(SimError::ResourceUnderflow);
        }
        self.busy -= 1;
        let slot = &mut self.slots[self.busy];
        slot.busy_total += now - slot.busy_since;
        Ok(())
    }

    /// Busy percentage per slot over `elapsed` simulated time.
    pub fn per_slot_utilization(&self, elapsed: Ticks) -> Vec<f64> {
        self.slots
            .iter()
            .map(|slot| {
                if elapsed == 0 {
                    0.0
                } else {
                    100.0 * slot.busy_total as f64 / elapsed as f64
                }
            })
            .collect()
    }

    /// Pool-wide busy percentage: total busy core-time over total core-time.
    pub fn aggregate_utilization(&self, elapsed: Ticks) -> f64 {
        if elapsed == 0 {
            return 0.0;
        }
        let busy_total: Ticks = self.slots.iter().map(|slot| slot.busy_total).sum();
        100.0 * busy_total as f64 / (self.slots.len() as f64 * elapsed as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_fails_when_pool_is_full() {
        let mut pool = CorePool::new(2);
        assert!(pool.try_acquire(0));
        assert!(pool.try_acquire(0));
        assert!(!pool.try_acquire(1));
        assert_eq!(pool.busy_count(), 2);
    }

    #[test]
    fn release_credits_the_vacated_slot() {
        let mut pool = CorePool::new(1);
        assert!(pool.try_acquire(2));
        pool.release(7).unwrap();
        assert_eq!(pool.per_slot_utilization(10), vec![50.0]);
        assert_eq!(pool.aggregate_utilization(10), 50.0);
    }

    #[test]
    fn release_underflow_is_fatal() {
        let mut pool = CorePool::new(1);
        assert_eq!(pool.release(0), Err(SimError::ResourceUnderflow));
    }

    #[test]
    fn zero_elapsed_time_reports_zero_utilization() {
        let pool = CorePool::new(3);
        assert_eq!(pool.per_slot_utilization(0), vec![0.0, 0.0, 0.0]);
        assert_eq!(pool.aggregate_utilization(0), 0.0);
    }

    #[test]
    fn utilization_stays_within_bounds() {
        let mut pool = CorePool::new(2);
        assert!(pool.try_acquire(0));
        assert!(pool.try_acquire(3));
        pool.release(5).unwrap();
        pool.release(9).unwrap();

        for value in pool.per_slot_utilization(9) {
            assert!((0.0..=100.0).contains(&value));
        }
        let aggregate = pool.aggregate_utilization(9);
        assert!((0.0..=100.0).contains(&aggregate));
    }
}
