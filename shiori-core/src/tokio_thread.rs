use std::time::Duration;

use tokio::{runtime::Handle, sync::oneshot};

/// How long blocking work (source searches) gets to finish once the thread is told
/// to stop.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// A multi-threaded tokio runtime parked on a thread of its own. Work is spawned
/// through the runtime's handle, which the (non-async) UI thread can use without
/// entering the runtime.
///
/// Dropping this stops the runtime; tasks still pending are cancelled.
pub struct TokioThread {
    handle: Handle,
    _shutdown_tx: oneshot::Sender<()>,
}
impl TokioThread {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("shiori-worker")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        std::thread::Builder::new()
            .name("shiori-tokio".to_string())
            .spawn(move || {
                // Resolves once the sender is dropped along with the owner.
                let _ = runtime.block_on(shutdown_rx);
                tracing::debug!("stopping background runtime");
                runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
            })?;

        Ok(Self {
            handle,
            _shutdown_tx: shutdown_tx,
        })
    }

    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        self.handle.spawn(task);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn spawned_tasks_run_on_the_runtime() {
        let thread = TokioThread::new().unwrap();
        let (tx, rx) = mpsc::channel();
        for i in 0..3 {
            let tx = tx.clone();
            thread.spawn(async move {
                tokio::task::yield_now().await;
                tx.send(i).unwrap();
            });
        }

        let mut received: Vec<i32> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        received.sort();
        assert_eq!(received, [0, 1, 2]);
    }

    #[test]
    fn dropping_cancels_pending_tasks() {
        let thread = TokioThread::new().unwrap();
        let (tx, rx) = mpsc::channel::<()>();
        thread.spawn(async move {
            std::future::pending::<()>().await;
            drop(tx);
        });
        drop(thread);

        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        );
    }
}
