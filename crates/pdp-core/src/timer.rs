//! Cancellable one-shot timers for hiding the notification.

use std::time::Duration;

use crate::state::TimerId;

/// Backend that runs hide timers for the controller.
///
/// A scheduled timer fires at most once. Cancelling a timer that already
/// fired (or never existed) is a no-op that returns `false`.
pub trait HideScheduler {
    /// Schedule `timer` to fire after `after`.
    fn schedule(&mut self, timer: TimerId, after: Duration);

    /// Cancel a pending timer.
    fn cancel(&mut self, timer: TimerId) -> bool;

    /// Timers that have not fired or been cancelled.
    fn pending(&self) -> Vec<TimerId>;

    /// Cancel everything still pending. Returns how many were cancelled.
    fn cancel_all(&mut self) -> usize {
        self.pending()
            .into_iter()
            .filter(|timer| self.cancel(*timer))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VirtualEntry {
    due: Duration,
    seq: u64,
    timer: TimerId,
}

/// Deterministic scheduler on a virtual clock.
///
/// Time only moves when [`VirtualScheduler::advance`] is called, which makes
/// timer behavior reproducible in tests and in the CLI simulator.
#[derive(Debug, Clone, Default)]
pub struct VirtualScheduler {
    now: Duration,
    seq: u64,
    entries: Vec<VirtualEntry>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Time until the next pending timer is due.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.entries
            .iter()
            .map(|e| e.due.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward and return the timers that came due, in fire
    /// order (earliest first, ties in scheduling order).
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;
        let now = self.now;

        let mut due: Vec<VirtualEntry> = Vec::new();
        self.entries.retain(|entry| {
            if entry.due <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| (e.due, e.seq));
        due.into_iter().map(|e| e.timer).collect()
    }
}

impl HideScheduler for VirtualScheduler {
    fn schedule(&mut self, timer: TimerId, after: Duration) {
        self.seq += 1;
        self.entries.push(VirtualEntry {
            due: self.now + after,
            seq: self.seq,
            timer,
        });
    }

    fn cancel(&mut self, timer: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.timer != timer);
        self.entries.len() < before
    }

    fn pending(&self) -> Vec<TimerId> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| (e.due, e.seq));
        entries.into_iter().map(|e| e.timer).collect()
    }
}

#[cfg(feature = "tokio")]
pub use tokio_backend::TokioScheduler;

#[cfg(feature = "tokio")]
mod tokio_backend {
    use std::collections::HashMap;
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;

    use super::HideScheduler;
    use crate::state::TimerId;

    /// Scheduler backed by Tokio tasks.
    ///
    /// Each timer is a task that sleeps and then posts its id on a channel;
    /// cancelling aborts the task. Must be used inside a Tokio runtime.
    #[derive(Debug)]
    pub struct TokioScheduler {
        tx: mpsc::UnboundedSender<TimerId>,
        rx: mpsc::UnboundedReceiver<TimerId>,
        tasks: HashMap<TimerId, JoinHandle<()>>,
    }

    impl TokioScheduler {
        pub fn new() -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            Self {
                tx,
                rx,
                tasks: HashMap::new(),
            }
        }

        /// Wait for the next timer to fire.
        ///
        /// Returns `None` once nothing is pending. Fires from timers that were
        /// cancelled after they had already posted are skipped.
        pub async fn next_fired(&mut self) -> Option<TimerId> {
            loop {
                if self.tasks.is_empty() {
                    return None;
                }
                let timer = self.rx.recv().await?;
                if self.tasks.remove(&timer).is_some() {
                    return Some(timer);
                }
            }
        }
    }

    impl Default for TokioScheduler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl HideScheduler for TokioScheduler {
        fn schedule(&mut self, timer: TimerId, after: Duration) {
            let tx = self.tx.clone();
            let handle = tokio::spawn(async move {
                tokio::time::sleep(after).await;
                let _ = tx.send(timer);
            });
            if let Some(previous) = self.tasks.insert(timer, handle) {
                previous.abort();
            }
        }

        fn cancel(&mut self, timer: TimerId) -> bool {
            match self.tasks.remove(&timer) {
                Some(handle) => {
                    handle.abort();
                    true
                }
                None => false,
            }
        }

        fn pending(&self) -> Vec<TimerId> {
            let mut timers: Vec<TimerId> = self.tasks.keys().copied().collect();
            timers.sort();
            timers
        }
    }

    impl Drop for TokioScheduler {
        fn drop(&mut self) {
            for (_, handle) in self.tasks.drain() {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_virtual_fires_when_due() {
        let mut sched = VirtualScheduler::new();
        sched.schedule(TimerId::new(1), ms(3000));

        assert!(sched.advance(ms(2999)).is_empty());
        assert_eq!(sched.advance(ms(1)), vec![TimerId::new(1)]);
        assert!(sched.pending().is_empty());
        assert_eq!(sched.now(), ms(3000));
    }

    #[test]
    fn test_virtual_fire_order() {
        let mut sched = VirtualScheduler::new();
        sched.schedule(TimerId::new(1), ms(3000));
        sched.advance(ms(1000));
        sched.schedule(TimerId::new(2), ms(1000));
        sched.schedule(TimerId::new(3), ms(1000));

        assert_eq!(sched.next_due_in(), Some(ms(1000)));
        assert_eq!(
            sched.advance(ms(5000)),
            vec![TimerId::new(2), TimerId::new(3), TimerId::new(1)]
        );
    }

    #[test]
    fn test_virtual_cancel() {
        let mut sched = VirtualScheduler::new();
        sched.schedule(TimerId::new(1), ms(100));
        sched.schedule(TimerId::new(2), ms(200));

        assert!(sched.cancel(TimerId::new(1)));
        assert!(!sched.cancel(TimerId::new(1)));
        assert_eq!(sched.pending(), vec![TimerId::new(2)]);
        assert_eq!(sched.advance(ms(500)), vec![TimerId::new(2)]);
    }

    #[test]
    fn test_cancel_all() {
        let mut sched = VirtualScheduler::new();
        sched.schedule(TimerId::new(1), ms(100));
        sched.schedule(TimerId::new(2), ms(200));

        assert_eq!(sched.cancel_all(), 2);
        assert!(sched.advance(ms(1000)).is_empty());
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_tokio_fires_after_delay() {
        let mut sched = TokioScheduler::new();
        sched.schedule(TimerId::new(7), ms(3000));
        assert_eq!(sched.pending(), vec![TimerId::new(7)]);

        let fired = sched.next_fired().await;
        assert_eq!(fired, Some(TimerId::new(7)));
        assert!(sched.pending().is_empty());
        assert_eq!(sched.next_fired().await, None);
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_tokio_cancel_skips_timer() {
        let mut sched = TokioScheduler::new();
        sched.schedule(TimerId::new(1), ms(1000));
        sched.schedule(TimerId::new(2), ms(2000));

        assert!(sched.cancel(TimerId::new(1)));
        assert_eq!(sched.next_fired().await, Some(TimerId::new(2)));
        assert_eq!(sched.next_fired().await, None);
    }
}
