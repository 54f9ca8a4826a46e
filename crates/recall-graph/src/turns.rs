use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Serializes turns per thread id
///
/// Waiters are admitted in arrival order (tokio's mutex is fair). Different
/// thread ids hold different locks and never wait on each other.
#[derive(Default)]
pub struct TurnGate {
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl TurnGate {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock_for(&self, thread_id: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().await.get(thread_id) {
            return Arc::clone(lock);
        }

        let mut locks = self.locks.write().await;
        Arc::clone(
            locks
                .entry(thread_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Wait for the thread's turn; the slot is held until the guard drops
    pub async fn acquire(&self, thread_id: &str) -> OwnedMutexGuard<()> {
        self.lock_for(thread_id).await.lock_owned().await
    }

    #[cfg(test)]
    async fn is_busy(&self, thread_id: &str) -> bool {
        match self.locks.read().await.get(thread_id) {
            Some(lock) => lock.try_lock().is_err(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_thread_waits() {
        let gate = Arc::new(TurnGate::new());
        let guard = gate.acquire("t1").await;
        assert!(gate.is_busy("t1").await);

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                let _guard = gate.acquire("t1").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert!(!gate.is_busy("t1").await);
    }

    #[tokio::test]
    async fn test_different_threads_do_not_contend() {
        let gate = TurnGate::new();
        let _a = gate.acquire("a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), gate.acquire("b")).await;
        assert!(b.is_ok());
    }
}
