//! Fan-in latch
//!
//! A reusable counting join. Callers [`add`](FanInLatch::add) pending work
//! before starting it, each piece [`resolve`](FanInLatch::resolve)s once, and
//! continuations registered with [`then`](FanInLatch::then) run exactly once
//! when the counter drains to zero.
//!
//! The latch has no error channel. Every `add` must be matched by exactly one
//! `resolve` on every path, including early returns; [`LatchTicket`] does that
//! by resolving on drop.
//!
//! Continuations run one at a time, in the order they became ready, on a
//! single runner task of the current Tokio runtime. Outside a runtime they
//! stay queued until a later `then` or `resolve` runs inside one.
//!
//! ```ignore
//! let latch = FanInLatch::new();
//! for id in ids {
//!     let ticket = latch.ticket();
//!     tokio::spawn(async move {
//!         let _ticket = ticket;
//!         load(id).await;
//!     });
//! }
//! latch.wait().await;
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::{debug, warn};

type Continuation = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct LatchState {
    pending: usize,
    /// Number of times the counter drained to zero
    drains: u64,
    continuations: Vec<Continuation>,
    /// Fired continuations waiting for the runner
    ready: VecDeque<Continuation>,
    running: bool,
}

#[derive(Default)]
struct LatchInner {
    state: Mutex<LatchState>,
    drained: Notify,
}

/// Counting join primitive with completion hooks
///
/// Cloning yields another handle to the same latch.
#[derive(Clone, Default)]
pub struct FanInLatch {
    inner: Arc<LatchInner>,
}

impl FanInLatch {
    /// Create a latch with no pending work
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, LatchState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `n` pending sub-operations
    pub fn add(&self, n: usize) {
        self.state().pending += n;
    }

    /// Register one pending sub-operation, resolved when the ticket drops
    pub fn ticket(&self) -> LatchTicket {
        self.add(1);
        LatchTicket {
            latch: self.clone(),
            resolved: false,
        }
    }

    /// Mark one sub-operation as finished
    ///
    /// The resolve that drains the counter queues every registered
    /// continuation, in registration order, for the runner.
    pub fn resolve(&self) {
        {
            let mut state = self.state();
            if state.pending == 0 {
                warn!("latch resolved with no pending work; ignoring");
                return;
            }
            state.pending -= 1;
            if state.pending > 0 {
                return;
            }
            state.drains += 1;
            let fired = std::mem::take(&mut state.continuations);
            state.ready.extend(fired);
        }
        self.inner.drained.notify_waiters();
        self.start_runner();
    }

    /// Run `continuation` once the counter drains
    ///
    /// With nothing pending the continuation is queued for the runner,
    /// never run inline.
    pub fn then<F>(&self, continuation: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.state();
            if state.pending > 0 {
                state.continuations.push(Box::new(continuation));
                return;
            }
            state.ready.push_back(Box::new(continuation));
        }
        self.start_runner();
    }

    /// Wait until the counter drains
    ///
    /// Returns immediately when nothing is pending.
    pub async fn wait(&self) {
        let start = self.state().drains;
        loop {
            let notified = self.inner.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            {
                let state = self.state();
                if state.pending == 0 || state.drains != start {
                    return;
                }
            }
            notified.await;
        }
    }

    /// Reset to "no pending work" without running continuations
    ///
    /// Lets one latch stage several sequential rounds of one operation.
    /// Registered continuations are discarded; tasks parked in
    /// [`wait`](Self::wait) stay parked until the next drain.
    pub fn identity(&self) {
        let mut state = self.state();
        state.pending = 0;
        state.continuations.clear();
    }

    /// Number of unresolved sub-operations
    pub fn pending(&self) -> usize {
        self.state().pending
    }

    /// Spawn the runner unless one is active or nothing is ready
    fn start_runner(&self) {
        let mut state = self.state();
        if state.running || state.ready.is_empty() {
            return;
        }
        let Ok(handle) = Handle::try_current() else {
            debug!(queued = state.ready.len(), "no runtime, latch continuations stay queued");
            return;
        };
        state.running = true;
        drop(state);
        let latch = self.clone();
        handle.spawn(async move { latch.run_ready() });
    }

    /// Run ready continuations until the queue is empty
    fn run_ready(&self) {
        let _runner = RunnerGuard { latch: self };
        loop {
            let next = {
                let mut state = self.state();
                match state.ready.pop_front() {
                    Some(continuation) => continuation,
                    None => {
                        state.running = false;
                        return;
                    }
                }
            };
            next();
        }
    }
}

/// Releases the runner slot if a continuation panics
struct RunnerGuard<'a> {
    latch: &'a FanInLatch,
}

impl Drop for RunnerGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.latch.state().running = false;
        }
    }
}

impl std::fmt::Debug for FanInLatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("FanInLatch")
            .field("pending", &state.pending)
            .field("continuations", &state.continuations.len())
            .field("ready", &state.ready.len())
            .finish()
    }
}

/// One registered sub-operation of a [`FanInLatch`]
///
/// Resolves the latch exactly once: explicitly via
/// [`resolve`](Self::resolve) or implicitly when dropped.
#[must_use = "dropping a ticket resolves it immediately"]
pub struct LatchTicket {
    latch: FanInLatch,
    resolved: bool,
}

impl LatchTicket {
    /// Resolve now
    pub fn resolve(mut self) {
        self.resolved = true;
        self.latch.resolve();
    }
}

impl Drop for LatchTicket {
    fn drop(&mut self) {
        if !self.resolved {
            self.latch.resolve();
        }
    }
}
