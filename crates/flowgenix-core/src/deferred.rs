//! One-shot deferred callbacks with explicit, cancellable handles.
//!
//! The queue does not run anything by itself: the owner polls it with the
//! current time and handles whatever has come due. A cancelled handle never
//! fires; cancelling twice, or after firing, is a harmless no-op.

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
pub struct DeferredQueue<T> {
    next_id: u64,
    by_deadline: BTreeMap<(NaiveDateTime, u64), T>,
    deadlines: HashMap<u64, NaiveDateTime>,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            by_deadline: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    pub fn schedule(&mut self, at: NaiveDateTime, payload: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.by_deadline.insert((at, id), payload);
        self.deadlines.insert(id, at);
        TimerHandle(id)
    }

    /// Returns true if the handle was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle.0) {
            Some(at) => self.by_deadline.remove(&(at, handle.0)).is_some(),
            None => false,
        }
    }

    /// Remove and return the earliest item due at or before `now`.
    ///
    /// Items are handed out one at a time; whatever the caller has not taken
    /// yet stays pending under its original handle.
    pub fn pop_next_due(&mut self, now: NaiveDateTime) -> Option<(TimerHandle, T)> {
        let entry = self.by_deadline.first_entry()?;
        let (at, id) = *entry.key();
        if at > now {
            return None;
        }
        let payload = entry.remove();
        self.deadlines.remove(&id);
        Some((TimerHandle(id), payload))
    }

    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.by_deadline.keys().next().map(|(at, _)| *at)
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Pending payloads in firing order.
    pub fn pending(&self) -> impl Iterator<Item = (NaiveDateTime, &T)> {
        self.by_deadline.iter().map(|((at, _), p)| (*at, p))
    }

    pub fn len(&self) -> usize {
        self.by_deadline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_deadline.is_empty()
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn drain<T>(q: &mut DeferredQueue<T>, now: NaiveDateTime) -> Vec<(TimerHandle, T)> {
        std::iter::from_fn(|| q.pop_next_due(now)).collect()
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut q = DeferredQueue::new();
        q.schedule(at(10, 0), "late");
        q.schedule(at(9, 0), "early");
        q.schedule(at(11, 0), "future");

        let fired: Vec<_> = drain(&mut q, at(10, 0)).into_iter().map(|(_, p)| p).collect();
        assert_eq!(fired, vec!["early", "late"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_deadline(), Some(at(11, 0)));
    }

    #[test]
    fn cancelled_handle_never_fires() {
        let mut q = DeferredQueue::new();
        let h = q.schedule(at(9, 0), 1);
        assert!(q.is_pending(h));
        assert!(q.cancel(h));
        assert!(!q.cancel(h));
        assert!(q.pop_next_due(at(12, 0)).is_none());
    }

    #[test]
    fn same_deadline_keeps_insertion_order() {
        let mut q = DeferredQueue::new();
        let a = q.schedule(at(9, 0), 'a');
        let b = q.schedule(at(9, 0), 'b');
        let fired = drain(&mut q, at(9, 0));
        assert_eq!(fired, vec![(a, 'a'), (b, 'b')]);
        assert!(!q.cancel(a));
    }

    #[test]
    fn untaken_items_stay_pending() {
        let mut q = DeferredQueue::new();
        let first = q.schedule(at(8, 0), "first");
        let second = q.schedule(at(8, 30), "second");

        assert_eq!(q.pop_next_due(at(9, 0)), Some((first, "first")));
        assert!(q.is_pending(second));
        assert_eq!(q.next_deadline(), Some(at(8, 30)));
        assert!(q.cancel(second));
    }
}
