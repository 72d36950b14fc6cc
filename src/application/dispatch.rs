use crate::error::{EquipError, Result};
use std::future::Future;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::debug;

/// Runs network-bound work off the input loop and hands results back
/// through a channel.
#[derive(Clone)]
pub struct BackgroundExecutor {
    handle: Handle,
}

impl BackgroundExecutor {
    /// Executor bound to the runtime of the calling task.
    pub fn current() -> Self {
        Self {
            handle: Handle::current(),
        }
    }

    /// Submits `task`; its result is delivered through the returned [`Pending`].
    pub fn submit<F>(&self, task: F) -> Pending<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.handle.spawn(async move {
            if tx.send(task.await).is_err() {
                debug!("completion dropped, receiver went away");
            }
        });
        Pending { rx }
    }

    /// Submits `task` and calls `on_complete` with its result on the runtime.
    pub fn submit_with<F, C>(&self, task: F, on_complete: C) -> JoinHandle<()>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
        C: FnOnce(F::Output) + Send + 'static,
    {
        self.handle.spawn(async move { on_complete(task.await) })
    }
}

/// Result of a submitted task that may not have completed yet.
pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Pending<T> {
    /// Waits for the task to finish.
    pub async fn wait(self) -> Result<T> {
        self.rx.await.map_err(|_| EquipError::TaskAborted)
    }

    /// Non-blocking check; `None` while the task is still running.
    pub fn try_take(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(value) => Some(Ok(value)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(EquipError::TaskAborted)),
        }
    }
}
