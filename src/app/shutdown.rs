//! Cooperative shutdown shared by the simulation, input and reporting threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Manages graceful shutdown of the application.
///
/// Clones share one flag; any of them may request shutdown.
#[derive(Clone, Debug)]
pub struct ShutdownManager {
    shutdown_requested: Arc<AtomicBool>,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    /// Creates a new shutdown manager.
    pub fn new() -> Self {
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests shutdown. Only the first request is logged.
    pub fn request_shutdown(&self) {
        if !self.shutdown_requested.swap(true, Ordering::SeqCst) {
            tracing::info!("Shutdown requested");
        }
    }

    /// Checks if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Turns Ctrl+C into a shutdown request.
    ///
    /// The signal is awaited on a detached thread driving a single-threaded
    /// runtime, so the process keeps its final report on interrupt.
    pub fn install_ctrl_c_handler(&self) -> std::io::Result<JoinHandle<()>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let shutdown = self.clone();
        thread::Builder::new()
            .name("signals".into())
            .spawn(move || {
                runtime.block_on(async {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        tracing::info!("Ctrl+C received, initiating graceful shutdown...");
                        shutdown.request_shutdown();
                    }
                });
            })
    }
}
