//! Delayed callbacks on a frame loop
//!
//! A cooperative, single-threaded scheduler. The host loop calls
//! [`Scheduler::advance`] once per frame with that frame's delta; any task
//! whose delay has elapsed runs inside that call, on the caller's thread.
//!
//! Tasks cannot reach the scheduler that runs them, so nothing scheduled
//! later can run inside the `advance` that is currently draining.
//!
//! The clock saturates at `Duration::MAX`. A task whose due time saturates
//! is never due.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use tracing::trace;

/// Handle for a scheduled task, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

type Task = Box<dyn FnOnce()>;

/// Frame-driven delayed invocation
#[derive(Default)]
pub struct Scheduler {
    /// Scheduler clock: sum of every delta passed to `advance`
    elapsed: Duration,

    next_id: u64,

    /// Pending tasks keyed by (due time, scheduling order)
    tasks: BTreeMap<(Duration, u64), Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once `delay` has passed on the scheduler clock
    pub fn schedule_after(&mut self, delay: Duration, task: impl FnOnce() + 'static) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;

        let due = self.elapsed.saturating_add(delay);
        self.tasks.insert((due, id), Box::new(task));

        trace!(id, due_ms = due.as_millis() as u64, "scheduled task");
        TaskId(id)
    }

    /// Drop a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|(_, seq), _| *seq != id.0);
        self.tasks.len() != before
    }

    /// Move the clock forward by one frame and run every task now due
    ///
    /// Tasks run in due-time order; tasks due at the same instant run in the
    /// order they were scheduled. Returns how many ran.
    pub fn advance(&mut self, delta: Duration) -> usize {
        self.elapsed = self.elapsed.saturating_add(delta);

        let mut due = Vec::new();
        while let Some(entry) = self.tasks.first_entry() {
            let at = entry.key().0;
            if at > self.elapsed || at == Duration::MAX {
                break;
            }
            due.push(entry.remove());
        }

        let ran = due.len();
        for task in due {
            task();
        }
        ran
    }

    /// Number of tasks still waiting
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Current scheduler clock
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("elapsed", &self.elapsed)
            .field("pending", &self.tasks.len())
            .finish()
    }
}
