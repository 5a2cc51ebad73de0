//! Background task management
//!
//! Registers long-running workers, captures their panics, and shuts them
//! down together with a bounded grace period. The error boundary lives
//! here: a crashing worker is logged, never propagated.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A registered background task
struct RegisteredTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

/// Background task registry
///
/// # Example
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// let token = tasks.shutdown_token();
/// tasks.spawn("notification_worker", worker.run(rx, token));
/// // ...
/// tasks.shutdown(Duration::from_secs(10)).await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token tasks watch for the shutdown signal
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Register and start a background task
    ///
    /// The future is wrapped to capture panics; an abnormal exit is logged
    /// and the rest of the server keeps running.
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            if let Err(panic) = AssertUnwindSafe(future).catch_unwind().await {
                tracing::error!(task = name, ?panic, "Background task panicked");
            }
        });
        tracing::info!(task = name, "Background task started");
        self.tasks.push(RegisteredTask { name, handle });
    }

    /// Signal shutdown and wait for every task, up to `timeout` total
    pub async fn shutdown(self, timeout: Duration) {
        self.shutdown.cancel();

        let deadline = tokio::time::Instant::now() + timeout;
        for task in self.tasks {
            match tokio::time::timeout_at(deadline, task.handle).await {
                Ok(_) => tracing::info!(task = task.name, "Background task stopped"),
                Err(_) => {
                    tracing::warn!(task = task.name, "Background task did not stop in time")
                }
            }
        }
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tasks_stop_on_shutdown_signal() {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();
        tasks.spawn("test_worker", async move {
            token.cancelled().await;
        });
        tasks.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn panicking_task_is_contained() {
        let mut tasks = BackgroundTasks::new();
        tasks.spawn("panicking_worker", async {
            panic!("boom");
        });
        // Must not propagate the panic
        tasks.shutdown(Duration::from_secs(1)).await;
    }
}
