use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use tokio::sync::{watch, Notify};

/// Lifecycle of a metadata service client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClientState {
    /// Accepting requests
    Active = 0,
    /// No new requests; in-flight ones are being cancelled and drained
    ShuttingDown = 1,
    /// Pool released; every request is rejected
    Closed = 2,
}

impl ClientState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ClientState::Active,
            1 => ClientState::ShuttingDown,
            _ => ClientState::Closed,
        }
    }
}

/// Tracks state and in-flight requests of a client
///
/// Transitions only move forward: `Active -> ShuttingDown -> Closed`.
#[derive(Debug)]
pub struct ClientLifecycle {
    state: AtomicU8,
    in_flight: AtomicUsize,
    idle: Notify,
    cancel_tx: watch::Sender<bool>,
}

impl Default for ClientLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientLifecycle {
    pub fn new() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            state: AtomicU8::new(ClientState::Active as u8),
            in_flight: AtomicUsize::new(0),
            idle: Notify::new(),
            cancel_tx,
        }
    }

    pub fn state(&self) -> ClientState {
        ClientState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Registers a request. Returns `None` once shutdown has begun.
    pub fn try_enter(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        // Re-check after incrementing so wait_idle never misses this request.
        if self.state() != ClientState::Active {
            self.leave();
            return None;
        }
        Some(InFlightGuard { lifecycle: self })
    }

    /// Receiver that turns `true` when in-flight work must be abandoned
    pub fn subscribe_cancel(&self) -> watch::Receiver<bool> {
        self.cancel_tx.subscribe()
    }

    /// Moves `Active -> ShuttingDown` and signals cancellation.
    /// Returns `false` if shutdown had already begun.
    pub fn begin_shutdown(&self) -> bool {
        let won = self
            .state
            .compare_exchange(
                ClientState::Active as u8,
                ClientState::ShuttingDown as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if won {
            self.cancel_tx.send_replace(true);
        }
        won
    }

    /// Resolves once no request is in flight
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }

    pub fn finish(&self) {
        self.state.store(ClientState::Closed as u8, Ordering::Release);
        self.idle.notify_waiters();
    }

    fn leave(&self) {
        if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }
}

/// Holds one in-flight slot; released on drop
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    lifecycle: &'a ClientLifecycle,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.lifecycle.leave();
    }
}

/// Resolves when `rx` observes a cancellation signal
///
/// Never resolves if the sender is dropped without signalling.
pub async fn cancelled(mut rx: watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_starts_active() {
        let lifecycle = ClientLifecycle::new();
        assert_eq!(lifecycle.state(), ClientState::Active);
        assert_eq!(lifecycle.in_flight(), 0);
    }

    #[test]
    fn test_guard_tracks_in_flight() {
        let lifecycle = ClientLifecycle::new();
        let guard = lifecycle.try_enter().unwrap();
        assert_eq!(lifecycle.in_flight(), 1);
        drop(guard);
        assert_eq!(lifecycle.in_flight(), 0);
    }

    #[test]
    fn test_begin_shutdown_once() {
        let lifecycle = ClientLifecycle::new();
        assert!(lifecycle.begin_shutdown());
        assert!(!lifecycle.begin_shutdown());
        assert_eq!(lifecycle.state(), ClientState::ShuttingDown);
        lifecycle.finish();
        assert_eq!(lifecycle.state(), ClientState::Closed);
        assert!(!lifecycle.begin_shutdown());
    }

    #[test]
    fn test_rejects_after_shutdown() {
        let lifecycle = ClientLifecycle::new();
        lifecycle.begin_shutdown();
        assert!(lifecycle.try_enter().is_none());
        assert_eq!(lifecycle.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancel_signal_reaches_subscribers() {
        let lifecycle = ClientLifecycle::new();
        let rx = lifecycle.subscribe_cancel();
        lifecycle.begin_shutdown();
        tokio::time::timeout(Duration::from_secs(1), cancelled(rx))
            .await
            .expect("cancellation should be observed");
    }

    #[tokio::test]
    async fn test_wait_idle_returns_when_guards_drop() {
        let lifecycle = Arc::new(ClientLifecycle::new());
        let guard_owner = lifecycle.clone();

        let worker = tokio::spawn(async move {
            let _guard = guard_owner.try_enter().unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
        });
        tokio::time::sleep(Duration::from_millis(5)).await;

        tokio::time::timeout(Duration::from_secs(1), lifecycle.wait_idle())
            .await
            .expect("should become idle");
        worker.await.unwrap();
        assert_eq!(lifecycle.in_flight(), 0);
    }
}
