//! Per-key trailing-edge debouncing on the tokio runtime.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs at most one pending task per key.
///
/// Arming a key cancels the task still waiting for that key and schedules
/// the new one after `delay`, so a burst of requests results in a single
/// run of the last task. A task that has started running is never
/// interrupted.
#[derive(Debug)]
pub struct Debouncer<K> {
    timers: HashMap<K, JoinHandle<()>>,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            timers: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone + Debug> Debouncer<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` for `key` after `delay`, replacing any pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(&mut self, key: K, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.timers.retain(|_, handle| !handle.is_finished());
        if let Some(previous) = self.timers.remove(&key) {
            tracing::trace!("Rescheduling {:?}", key);
            previous.abort();
        }

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        self.timers.insert(key, handle);
    }

    /// Cancels the pending task for `key`. Returns true if one was waiting.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.timers.remove(key) {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    /// Returns true if a task for `key` is scheduled and has not finished.
    pub fn is_pending(&self, key: &K) -> bool {
        self.timers
            .get(key)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancels every pending task.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for handle in self.timers.values() {
            handle.abort();
        }
    }
}
