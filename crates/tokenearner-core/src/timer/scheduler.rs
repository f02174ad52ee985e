//! Repeating-task scheduling for the countdown.
//!
//! The reward machine owns at most one live [`TaskHandle`]. Pausing cancels
//! it and resuming arms a fresh one; the machine never relies on an implicit
//! platform timer.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// A cancellable repeating task.
pub trait TaskHandle {
    fn cancel(&mut self);
}

pub trait Scheduler {
    /// Arm a task that fires every `period`, first firing one period from now.
    fn schedule_repeating(&mut self, period: Duration) -> Box<dyn TaskHandle>;
}

// ── Manual ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ManualState {
    live: Option<u64>,
    next_id: u64,
    arm_count: usize,
    period: Option<Duration>,
}

/// Scheduler for callers that deliver ticks themselves.
///
/// Nothing fires on its own; the scheduler only records whether a task is
/// currently armed. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.state.borrow().live.is_some()
    }

    /// How many tasks were armed over the scheduler's lifetime.
    pub fn arm_count(&self) -> usize {
        self.state.borrow().arm_count
    }

    pub fn period(&self) -> Option<Duration> {
        self.state.borrow().period
    }
}

struct ManualHandle {
    id: u64,
    state: Rc<RefCell<ManualState>>,
}

impl TaskHandle for ManualHandle {
    fn cancel(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.live == Some(self.id) {
            state.live = None;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> Box<dyn TaskHandle> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.arm_count += 1;
        state.live = Some(state.next_id);
        state.period = Some(period);
        Box::new(ManualHandle {
            id: state.next_id,
            state: self.state.clone(),
        })
    }
}

// ── Tokio ───────────────────────────────────────────────────────────

/// One firing of an armed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

/// Scheduler backed by `tokio::time::interval`.
///
/// Each arm spawns a task on the current runtime; ticks arrive through the
/// paired [`TickReceiver`]. Must be used from within a tokio runtime.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<Tick>,
    live: Arc<AtomicU64>,
    next_generation: u64,
}

/// Receiving side of a [`TokioScheduler`].
pub struct TickReceiver {
    rx: mpsc::UnboundedReceiver<Tick>,
    live: Arc<AtomicU64>,
}

/// Create a connected scheduler/receiver pair.
pub fn tokio_scheduler() -> (TokioScheduler, TickReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let live = Arc::new(AtomicU64::new(0));
    (
        TokioScheduler {
            tx,
            live: live.clone(),
            next_generation: 0,
        },
        TickReceiver { rx, live },
    )
}

impl TickReceiver {
    /// Wait for the next tick of the currently armed task.
    ///
    /// Ticks a cancelled task queued before it was aborted are dropped, so a
    /// pause can never be followed by a stray decrement.
    pub async fn recv(&mut self) -> Option<Tick> {
        loop {
            let tick = self.rx.recv().await?;
            if tick.generation == self.live.load(Ordering::SeqCst) {
                return Some(tick);
            }
            tracing::trace!(generation = tick.generation, "dropping stale tick");
        }
    }
}

struct TokioHandle {
    handle: JoinHandle<()>,
    generation: u64,
    live: Arc<AtomicU64>,
}

impl TaskHandle for TokioHandle {
    fn cancel(&mut self) {
        self.handle.abort();
        let _ = self
            .live
            .compare_exchange(self.generation, 0, Ordering::SeqCst, Ordering::SeqCst);
    }
}

impl Drop for TokioHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> Box<dyn TaskHandle> {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.live.store(generation, Ordering::SeqCst);

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });

        Box::new(TokioHandle {
            handle,
            generation,
            live: self.live.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_cancel_only_affects_own_task() {
        let mut scheduler = ManualScheduler::new();
        let mut first = scheduler.schedule_repeating(Duration::from_secs(1));
        let _second = scheduler.schedule_repeating(Duration::from_secs(1));
        first.cancel();
        assert!(scheduler.is_armed());
        assert_eq!(scheduler.arm_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticks_once_per_period() {
        let (mut scheduler, mut ticks) = tokio_scheduler();
        let _handle = scheduler.schedule_repeating(Duration::from_secs(1));

        let start = Instant::now();
        ticks.recv().await.unwrap();
        ticks.recv().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_stops_delivering() {
        let (mut scheduler, mut ticks) = tokio_scheduler();
        let mut handle = scheduler.schedule_repeating(Duration::from_secs(1));
        ticks.recv().await.unwrap();
        handle.cancel();

        let next = time::timeout(Duration::from_secs(5), ticks.recv()).await;
        assert!(next.is_err(), "no tick expected after cancel");

        let _rearmed = scheduler.schedule_repeating(Duration::from_secs(1));
        assert!(ticks.recv().await.is_some());
    }
}
