use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::{Receiver, Sender};

/// Broadcasts a one-shot shutdown signal to every listener derived from this handle.
///
/// The signal is latched, so a listener created after [ShutdownHandle::shutdown] has been
/// called still observes the shutdown.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Sender<()>,
    fired: Arc<AtomicBool>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn shutdown(&self) {
        self.fired.store(true, Ordering::SeqCst);
        if let Err(e) = self.sender.send(()) {
            // Fails when nobody is listening yet, which is harmless because the
            // latched flag covers listeners created later.
            log::debug!("No active listeners for shutdown signal: {e:?}");
        }
    }

    /// Point in time check, without creating a listener.
    pub fn is_shutdown(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    pub fn new_listener(&self) -> DelegatedShutdownListener {
        DelegatedShutdownListener {
            receiver: self.sender.subscribe(),
            fired: self.fired.clone(),
        }
    }
}

/// A listener handed to a task so it can observe the shutdown signal.
#[derive(Debug)]
pub struct DelegatedShutdownListener {
    receiver: Receiver<()>,
    fired: Arc<AtomicBool>,
}

impl Clone for DelegatedShutdownListener {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.resubscribe(),
            fired: self.fired.clone(),
        }
    }
}

impl DelegatedShutdownListener {
    /// Point in time check whether the shutdown signal has been received. Once this returns
    /// true, the task holding the listener should stop its work so the run can wind down.
    pub fn should_shutdown(&mut self) -> bool {
        if self.fired.load(Ordering::SeqCst) {
            return true;
        }

        match self.receiver.try_recv() {
            Ok(_) => true,
            Err(tokio::sync::broadcast::error::TryRecvError::Closed) => true,
            // Empty or lagged means no shutdown yet.
            Err(_) => false,
        }
    }

    /// Wait until the shutdown signal is received. Safe to race against other futures so the
    /// signal can cancel work in progress.
    pub async fn wait_for_shutdown(&mut self) {
        if self.fired.load(Ordering::SeqCst) {
            return;
        }

        // A closed channel means the handle is gone, treat that as shutdown too.
        let _ = self.receiver.recv().await;
    }
}

/// Marks an error produced because a future was cancelled by the shutdown signal.
#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct ShutdownSignalError {
    msg: String,
}

impl Default for ShutdownSignalError {
    fn default() -> Self {
        Self {
            msg: "Execution cancelled by shutdown signal".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listener_observes_shutdown() {
        let handle = ShutdownHandle::new();
        let mut listener = handle.new_listener();

        assert!(!listener.should_shutdown());
        handle.shutdown();
        assert!(listener.should_shutdown());
    }

    #[tokio::test]
    async fn late_listener_sees_latched_signal() {
        let handle = ShutdownHandle::new();
        handle.shutdown();

        let mut listener = handle.new_listener();
        assert!(listener.should_shutdown());

        // Must not hang either.
        listener.wait_for_shutdown().await;
    }

    #[tokio::test]
    async fn wait_for_shutdown_races_cleanly() {
        let handle = ShutdownHandle::new();
        let mut listener = handle.new_listener();

        let waiter = tokio::spawn(async move {
            listener.wait_for_shutdown().await;
        });

        handle.shutdown();
        waiter.await.unwrap();
    }
}
