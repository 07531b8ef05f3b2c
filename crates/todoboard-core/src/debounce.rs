//! Keyed debouncing with cancel-and-reschedule semantics.
//!
//! Each key owns at most one pending timer. Scheduling work for a key that
//! already has a pending timer cancels that timer, so a burst of calls inside
//! the quiet period runs only the last scheduled work. Once a timer fires its
//! work runs to completion; a later reschedule never interrupts it.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Pending {
    // Dropping the sender cancels a timer that has not fired yet.
    cancel: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct Debouncer<K> {
    delay: Duration,
    pending: HashMap<K, Pending>,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `work` to run after the quiet period, replacing any work
    /// still waiting for the same key. Must be called inside a tokio runtime.
    pub fn call<F>(&mut self, key: K, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.prune();

        if self.pending.remove(&key).is_some() {
            tracing::trace!("Rescheduled debounced work for {:?}", key);
        }

        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = &mut cancel_rx => return,
                _ = tokio::time::sleep(delay) => {}
            }
            work.await;
        });

        self.pending.insert(
            key,
            Pending {
                cancel: cancel_tx,
                handle,
            },
        );
    }

    /// Cancel the pending work for `key`. Returns false when nothing was waiting.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.prune();
        self.pending.remove(key).is_some()
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending
            .get(key)
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .values()
            .filter(|pending| !pending.handle.is_finished())
            .count()
    }

    /// Wait for every scheduled piece of work to fire and finish.
    pub async fn settle(&mut self) {
        let pending: Vec<Pending> = self.pending.drain().map(|(_, p)| p).collect();
        for Pending { cancel, handle } in pending {
            if let Err(e) = handle.await {
                tracing::warn!("Debounced work did not complete: {}", e);
            }
            drop(cancel);
        }
    }

    fn prune(&mut self) {
        self.pending.retain(|_, pending| !pending.handle.is_finished());
    }
}
