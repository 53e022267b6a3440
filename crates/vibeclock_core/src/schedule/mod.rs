//! Cancellable timers on a tokio runtime.
//!
//! # Responsibility
//! - "Repeat every K until cancelled", one-shot, and self-rescheduling
//!   randomized timers for the rendering drivers.
//! - Tie each timer's lifetime to a [`TimerHandle`] owned by the view.
//!
//! # Invariants
//! - After [`TimerHandle::cancel`] returns (or the handle drops), the
//!   callback is never invoked again.
//! - Callback bodies are synchronous; timers never overlap themselves.

use rand::Rng;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};

/// Shortest accepted period; zero periods are raised to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Cancellation flag shared between a handle and its task.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Owner of one running timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
    flag: CancelFlag,
}

impl TimerHandle {
    /// Handle that owns nothing, for views with nothing to schedule.
    pub fn inert() -> Self {
        Self {
            task: None,
            flag: CancelFlag::default(),
        }
    }

    /// Stops the timer immediately. Idempotent.
    pub fn cancel(&mut self) {
        self.flag.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// `true` while the timer task exists and has not been cancelled.
    pub fn is_active(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| !task.is_finished() && !self.flag.is_cancelled())
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Inclusive-exclusive random delay range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayWindow {
    pub min: Duration,
    pub max: Duration,
}

impl DelayWindow {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Draws one delay; a degenerate window always yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min_ms = duration_millis(self.min);
        let max_ms = duration_millis(self.max);
        if max_ms <= min_ms {
            return self.min;
        }
        Duration::from_millis(rng.random_range(min_ms..max_ms))
    }

    pub fn contains(&self, delay: Duration) -> bool {
        delay >= self.min && (delay < self.max || self.max <= self.min)
    }
}

/// Spawns timers onto one runtime.
#[derive(Debug, Clone)]
pub struct Scheduler {
    runtime: Handle,
}

impl Scheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Scheduler for the runtime of the calling task, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Runs an async body that can observe its own cancellation.
    pub fn spawn<F, Fut>(&self, body: F) -> TimerHandle
    where
        F: FnOnce(CancelFlag) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let flag = CancelFlag::default();
        let task = self.runtime.spawn(body(flag.clone()));
        TimerHandle {
            task: Some(task),
            flag,
        }
    }

    /// Calls `tick` now and then every `period` until cancelled.
    ///
    /// Late ticks are skipped rather than bunched up.
    pub fn repeat<F>(&self, period: Duration, mut tick: F) -> TimerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        self.spawn(move |flag| async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticks.tick().await;
                if flag.is_cancelled() {
                    break;
                }
                tick();
            }
        })
    }

    /// Calls `fire` once after `delay` unless cancelled first.
    pub fn once<F>(&self, delay: Duration, fire: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        self.spawn(move |flag| async move {
            sleep(delay).await;
            if !flag.is_cancelled() {
                fire();
            }
        })
    }

    /// One-shot timer that re-arms itself after every firing with a fresh
    /// delay drawn from `window`.
    ///
    /// Each delay is measured from the previous firing, not from the end of
    /// the callback.
    pub fn repeat_randomized<R, F>(&self, window: DelayWindow, mut rng: R, mut fire: F) -> TimerHandle
    where
        R: Rng + Send + 'static,
        F: FnMut() + Send + 'static,
    {
        self.spawn(move |flag| async move {
            let mut next_fire = Instant::now() + window.sample(&mut rng);
            loop {
                tokio::time::sleep_until(next_fire).await;
                if flag.is_cancelled() {
                    break;
                }
                let fired_at = Instant::now();
                fire();
                next_fire = fired_at + window.sample(&mut rng);
            }
        })
    }
}

fn duration_millis(value: Duration) -> u64 {
    u64::try_from(value.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::{DelayWindow, Scheduler, TimerHandle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn delay_window_samples_stay_in_range() {
        let window = DelayWindow::new(Duration::from_secs(180), Duration::from_secs(420));
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let delay = window.sample(&mut rng);
            assert!(window.contains(delay), "{delay:?} outside window");
        }
    }

    #[test]
    fn degenerate_window_returns_min() {
        let window = DelayWindow::new(Duration::from_secs(5), Duration::from_secs(5));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(window.sample(&mut rng), Duration::from_secs(5));
    }

    #[test]
    fn inert_handle_is_never_active() {
        let mut handle = TimerHandle::inert();
        assert!(!handle.is_active());
        handle.cancel();
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn once_fires_after_delay_unless_cancelled() {
        let scheduler = Scheduler::current().expect("inside runtime");
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let _kept = scheduler.once(Duration::from_millis(2_500), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&fired);
        let mut cancelled = scheduler.once(Duration::from_millis(2_500), move || {
            counter.fetch_add(10, Ordering::SeqCst);
        });
        cancelled.cancel();

        tokio::time::sleep(Duration::from_millis(2_400)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
