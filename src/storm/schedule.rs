//! Strikes that fire some time after they were requested: the second flash
//! of a double strike, staggered burst members, click bursts and the opening
//! strikes. They live inside the manager, so dropping the manager drops
//! them and nothing can fire against a torn-down surface.

use std::time::Duration;

use crate::domain::{bolt::StrikeOptions, geometry::Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum DeferredStrike {
    Between {
        from: Point,
        to: Point,
        options: StrikeOptions,
    },
    Burst {
        center: Point,
    },
    Random,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledStrike {
    pub id: ScheduleId,
    pub due: Duration,
    pub strike: DeferredStrike,
}

/// Pending strikes ordered by due time, then by scheduling order.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    pending: Vec<ScheduledStrike>,
    next_id: u64,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, strike: DeferredStrike) -> ScheduleId {
        let id = ScheduleId(self.next_id);
        self.next_id += 1;
        let at = self.pending.partition_point(|entry| entry.due <= due);
        self.pending
            .insert(at, ScheduledStrike { id, due, strike });
        id
    }

    pub fn cancel(&mut self, id: ScheduleId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Removes and returns every strike due at or before `now`.
    pub fn drain_due(&mut self, now: Duration) -> Vec<ScheduledStrike> {
        let split = self.pending.partition_point(|entry| entry.due <= now);
        self.pending.drain(..split).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.first().map(|entry| entry.due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn drains_in_due_order() {
        let mut queue = DeferredQueue::new();
        let late = queue.schedule(ms(300), DeferredStrike::Random);
        let early = queue.schedule(ms(100), DeferredStrike::Random);
        let middle = queue.schedule(ms(200), DeferredStrike::Random);

        let fired: Vec<_> = queue.drain_due(ms(250)).into_iter().map(|s| s.id).collect();
        assert_eq!(fired, vec![early, middle]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_due(), Some(ms(300)));

        let fired: Vec<_> = queue.drain_due(ms(300)).into_iter().map(|s| s.id).collect();
        assert_eq!(fired, vec![late]);
        assert!(queue.is_empty());
    }

    #[test]
    fn equal_due_times_keep_scheduling_order() {
        let mut queue = DeferredQueue::new();
        let first = queue.schedule(ms(50), DeferredStrike::Random);
        let second = queue.schedule(ms(50), DeferredStrike::Burst {
            center: Point::new(1.0, 1.0),
        });
        let fired: Vec<_> = queue.drain_due(ms(50)).into_iter().map(|s| s.id).collect();
        assert_eq!(fired, vec![first, second]);
    }

    #[test]
    fn cancelled_strikes_never_fire() {
        let mut queue = DeferredQueue::new();
        let keep = queue.schedule(ms(10), DeferredStrike::Random);
        let dropped = queue.schedule(ms(20), DeferredStrike::Random);

        assert!(queue.cancel(dropped));
        assert!(!queue.cancel(dropped));

        let fired: Vec<_> = queue.drain_due(ms(1_000)).into_iter().map(|s| s.id).collect();
        assert_eq!(fired, vec![keep]);
    }

    #[test]
    fn nothing_due_before_first_deadline() {
        let mut queue = DeferredQueue::new();
        queue.schedule(ms(500), DeferredStrike::Random);
        assert!(queue.drain_due(ms(499)).is_empty());
        queue.cancel_all();
        assert!(queue.drain_due(ms(10_000)).is_empty());
    }
}
