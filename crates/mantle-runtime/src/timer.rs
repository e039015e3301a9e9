#![forbid(unsafe_code)]

//! One-shot task scheduler.
//!
//! Tasks are closures with a deadline on the scheduler's clock. The host
//! advances the clock, either explicitly with [`Scheduler::advance`] or from
//! wall time with [`Scheduler::tick`]; due tasks then run in deadline order,
//! ties broken by scheduling order.
//!
//! # Invariants
//!
//! - A task runs at most once.
//! - Tasks never run while the scheduler's own state is borrowed, so a task
//!   may schedule or cancel other tasks.
//! - A task scheduled while advancing runs in the same pass if its deadline
//!   falls within the advanced window.
//!
//! # Failure Modes
//!
//! - `cancel()` of a fired or unknown id returns `false`.
//! - Cancelling drops the task closure, releasing whatever it captured.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Pending {
    id: TimerId,
    deadline: Duration,
    task: Box<dyn FnOnce()>,
}

struct SchedulerState {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
    last_tick: Instant,
}

impl SchedulerState {
    /// Remove and return the earliest task due at or before `limit`.
    fn pop_due(&mut self, limit: Duration) -> Option<Pending> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= limit)
            .min_by_key(|(_, p)| (p.deadline, p.id.0))
            .map(|(idx, _)| idx)?;
        Some(self.pending.remove(idx))
    }
}

/// Shared handle to a task queue.
#[derive(Clone)]
pub struct Scheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Scheduler")
            .field("now", &state.now)
            .field("pending", &state.pending.len())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SchedulerState {
                now: Duration::ZERO,
                next_id: 1,
                pending: Vec::new(),
                last_tick: Instant::now(),
            })),
        }
    }

    /// Current position of the scheduler clock.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Run `task` once `delay` has elapsed on the scheduler clock.
    pub fn schedule(&self, delay: Duration, task: impl FnOnce() + 'static) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId(state.next_id);
        state.next_id += 1;
        let deadline = state.now + delay;
        state.pending.push(Pending {
            id,
            deadline,
            task: Box::new(task),
        });
        tracing::trace!(timer = id.0, ?delay, "timer scheduled");
        id
    }

    /// Run `task` on the next pass, after the current event has settled.
    pub fn defer(&self, task: impl FnOnce() + 'static) -> TimerId {
        self.schedule(Duration::ZERO, task)
    }

    /// Cancel a pending task. Returns `false` if it already ran or never existed.
    pub fn cancel(&self, id: TimerId) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            state
                .pending
                .iter()
                .position(|p| p.id == id)
                .map(|idx| state.pending.remove(idx))
        };
        match removed {
            Some(pending) => {
                tracing::trace!(timer = id.0, "timer cancelled");
                // Dropped outside the borrow: the task may own guards that
                // touch other page state.
                drop(pending);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.state.borrow().pending.iter().any(|p| p.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Advance the clock by `by`, running every task that becomes due.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.borrow().now + by;
        let mut ran = 0;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let next = state.pop_due(target);
                if let Some(p) = &next {
                    state.now = state.now.max(p.deadline);
                }
                next
            };
            let Some(pending) = next else {
                break;
            };
            tracing::trace!(timer = pending.id.0, "timer fired");
            (pending.task)();
            ran += 1;
        }
        self.state.borrow_mut().now = target;
        ran
    }

    /// Run tasks that are already due without moving the clock.
    pub fn run_due(&self) -> usize {
        self.advance(Duration::ZERO)
    }

    /// Advance by the wall time elapsed since the previous tick.
    pub fn tick(&self) -> usize {
        let elapsed = {
            let mut state = self.state.borrow_mut();
            let now = Instant::now();
            let elapsed = now.duration_since(state.last_tick);
            state.last_tick = now;
            elapsed
        };
        self.advance(elapsed)
    }
}
