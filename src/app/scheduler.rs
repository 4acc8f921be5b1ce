// SPDX-License-Identifier: GPL-3.0-only

//! Delayed messages
//!
//! Animations and the focus indicator expiry are modelled as messages posted
//! back to the viewfinder after a delay. Production code uses
//! [`TokioScheduler`]; [`ManualScheduler`] lets a host (or a test) drive a
//! virtual clock by hand.

use crate::app::state::Message;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Posts messages to the viewfinder after a delay
pub trait Scheduler: Send {
    fn schedule(&self, delay: Duration, message: Message) -> TimerHandle;
}

/// Handle to a scheduled message
///
/// Dropping the handle leaves the timer running; only [`TimerHandle::cancel`]
/// stops it.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Prevent the message from being delivered, if it has not been already
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TimerHandle")
    }
}

/// Scheduler backed by tokio timers
pub struct TokioScheduler {
    sender: UnboundedSender<Message>,
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(sender: UnboundedSender<Message>, handle: tokio::runtime::Handle) -> Self {
        Self { sender, handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, message: Message) -> TimerHandle {
        let sender = self.sender.clone();
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(message).is_err() {
                debug!("Viewfinder channel closed, timer message discarded");
            }
        });
        TimerHandle::new(move || task.abort())
    }
}

struct PendingTimer {
    id: u64,
    due: Duration,
    message: Message,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

/// Scheduler driven by an explicit virtual clock
///
/// Due messages are sent into the viewfinder channel when the clock is
/// advanced. Clones share the same clock.
#[derive(Clone)]
pub struct ManualScheduler {
    sender: UnboundedSender<Message>,
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new(sender: UnboundedSender<Message>) -> Self {
        Self {
            sender,
            state: Arc::new(Mutex::new(ManualState::default())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of timers not yet fired or cancelled
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Advance the clock, delivering every timer that falls due, in due order
    ///
    /// Returns the number of messages delivered.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut state = self.lock();
            state.now += by;
            let now = state.now;
            let (mut due, rest): (Vec<_>, Vec<_>) =
                state.pending.drain(..).partition(|t| t.due <= now);
            state.pending = rest;
            due.sort_by_key(|t| (t.due, t.id));
            due
        };
        self.deliver(due)
    }

    /// Jump to the earliest pending timer and deliver everything due at that instant
    ///
    /// Returns false when nothing is pending.
    pub fn fire_next(&self) -> bool {
        let next_due = {
            let state = self.lock();
            match state.pending.iter().map(|t| t.due).min() {
                Some(due) => due.saturating_sub(state.now),
                None => return false,
            }
        };
        self.advance(next_due) > 0
    }

    fn deliver(&self, due: Vec<PendingTimer>) -> usize {
        let count = due.len();
        for timer in due {
            if self.sender.send(timer.message).is_err() {
                debug!("Viewfinder channel closed, timer message discarded");
            }
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, message: Message) -> TimerHandle {
        let id = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            let due = state.now + delay;
            state.pending.push(PendingTimer { id, due, message });
            id
        };
        let state = Arc::clone(&self.state);
        TimerHandle::new(move || {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            state.pending.retain(|t| t.id != id);
        })
    }
}
