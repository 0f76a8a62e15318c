//! Deterministic cooperative scheduler
//!
//! Every timed behaviour on the page (typing, rotation, flicker, particle
//! lifetimes, carousel, counters) is a task on one `Scheduler`. The browser
//! drives it from a single animation-frame loop; tests drive it by hand.
//!
//! # Example
//! ```
//! # use feva_motion::core::scheduler::Scheduler;
//! let mut scheduler = Scheduler::new();
//! scheduler.after(100.0, "once");
//! let ticker = scheduler.every(50.0, "tick");
//!
//! let mut fired = Vec::new();
//! while let Some(due) = scheduler.pop_due(120.0) {
//!     fired.push(due.task);
//! }
//! assert_eq!(fired, vec!["tick", "once", "tick"]);
//!
//! scheduler.cancel(ticker);
//! assert!(scheduler.pop_due(1000.0).is_none());
//! ```

/// Time in milliseconds on the scheduler clock
pub type Millis = f64;

/// Smallest allowed period for repeating tasks
pub const MIN_PERIOD_MS: Millis = 1.0;

/// Handle to a scheduled task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A task whose due time has been reached
#[derive(Clone, Debug, PartialEq)]
pub struct Due<T> {
    pub id: TimerId,
    pub at: Millis,
    pub task: T,
}

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    due: Millis,
    period: Option<Millis>,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Millis,
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a scheduler whose clock starts at `now`
    pub fn starting_at(now: Millis) -> Self {
        Self {
            now,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Run `task` once, `delay` ms from now
    pub fn after(&mut self, delay: Millis, task: T) -> TimerId {
        let due = self.now + delay.max(0.0);
        self.push(due, None, task)
    }

    /// Run `task` every `period` ms, first firing one period from now
    pub fn every(&mut self, period: Millis, task: T) -> TimerId {
        let period = period.max(MIN_PERIOD_MS);
        let due = self.now + period;
        self.push(due, Some(period), task)
    }

    fn push(&mut self, due: Millis, period: Option<Millis>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due,
            period,
            task,
        });
        id
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Pop the earliest task due at or before `until`.
    ///
    /// The clock moves to the task's due time, so work scheduled while
    /// handling it is measured from the moment it fired.
    pub fn pop_due(&mut self, until: Millis) -> Option<Due<T>> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(index, _)| index)?;

        let at = self.entries[index].due;
        if at > self.now {
            self.now = at;
        }

        let entry = &mut self.entries[index];
        let fired = Due {
            id: entry.id,
            at,
            task: entry.task.clone(),
        };

        match entry.period {
            Some(period) => entry.due += period,
            None => {
                self.entries.remove(index);
            }
        }

        Some(fired)
    }

    /// Move the clock forward to `until` once all due work has been popped
    pub fn settle(&mut self, until: Millis) {
        if until > self.now {
            self.now = until;
        }
    }

    /// Treat the time up to `until` as paused. The clock and every pending
    /// task move forward together, so nothing that fell due in the gap fires.
    pub fn skip_to(&mut self, until: Millis) {
        let gap = until - self.now;
        if gap <= 0.0 {
            return;
        }
        for entry in &mut self.entries {
            entry.due += gap;
        }
        self.now = until;
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
