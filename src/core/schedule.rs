use std::collections::BTreeMap;

use super::event::Event;
use super::process::Ticks;

/// Ordering key for pending events. `seq` is a monotonically increasing
/// insertion counter, so events sharing a timestamp keep FIFO order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventKey {
    pub time: Ticks,
    seq: u64,
}

/// Time-ordered multiset of pending events, the sole source of "what happens
/// next". Peek and remove are decoupled so a handler can add follow-up events
/// before the event it is executing is taken off the schedule.
#[derive(Debug, Default)]
pub struct EventSchedule {
    pending: BTreeMap<EventKey, Event>,
    next_seq: u64,
}

impl EventSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `event` at `time`, after any events already scheduled there.
    pub fn add(&mut self, time: Ticks, event: Event) {
        let key = EventKey {
            time,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert(key, event);
    }

    /// The earliest-time, earliest-inserted pending event, or `None` when the
    /// schedule has drained (the end-of-simulation condition).
    pub fn peek_next(&self) -> Option<(EventKey, Event)> {
        self.pending
            .first_key_value()
            .map(|(&key, &event)| (key, event))
    }

    /// Remove the event previously returned by [`EventSchedule::peek_next`].
    /// Removing a key that was never peeked is a programming error.
    pub fn remove(&mut self, key: EventKey) {
        self.pending
            .remove(&key)
            .expect("removed an event that was never on the schedule");
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
