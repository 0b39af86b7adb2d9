use gust_core::prelude::ShutdownHandle;
use tokio::signal;

/// Install the Ctrl-C handler so an operator can interrupt a run. Interrupting skips the
/// remaining scenario time but still produces the end-of-run summary.
pub(crate) fn start_shutdown_listener(runtime: &tokio::runtime::Runtime) -> ShutdownHandle {
    let handle = ShutdownHandle::default();

    let listener_handle = handle.clone();
    runtime.spawn(async move {
        if signal::ctrl_c().await.is_err() {
            log::warn!("Failed to install Ctrl-C handler, interrupts will kill the run hard");
            return;
        }
        println!("Received shutdown signal, winding down...");
        listener_handle.shutdown();
    });

    handle
}
