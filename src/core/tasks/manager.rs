use std::future::Future;

use tokio::{
    runtime::Handle,
    sync::mpsc,
};

use crate::core::EmberError;

/// Cloneable spawning side of a [`TaskManager`].
pub struct TaskSender<R> {
    runtime: Handle,
    sender: mpsc::UnboundedSender<R>,
}

impl<R> Clone for TaskSender<R> {
    fn clone(&self) -> Self {
        Self { runtime: self.runtime.clone(), sender: self.sender.clone() }
    }
}

impl<R: Send + 'static> TaskSender<R> {
    /// Runs `work` on the runtime and queues its output for the owning loop.
    pub fn spawn<F>(&self, work: F)
    where
        F: Future<Output = R> + Send + 'static,
    {
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let result = work.await;
            // Receiver gone means the owner was dropped; nobody is left to render.
            let _ = sender.send(result);
        });
    }
}

/// Network work runs on tokio; completions are consumed by a single owner, either
/// by polling between input events or by awaiting the next one.
pub struct TaskManager<R> {
    receiver: mpsc::UnboundedReceiver<R>,
    sender: TaskSender<R>,
}

impl<R: Send + 'static> TaskManager<R> {
    pub fn new() -> Result<Self, EmberError> {
        let runtime = Handle::try_current()
            .map_err(|e| EmberError::Custom(format!("TaskManager needs a tokio runtime: {e}")))?;
        Ok(Self::with_handle(runtime))
    }

    pub fn with_handle(runtime: Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { receiver, sender: TaskSender { runtime, sender } }
    }

    pub fn sender(&self) -> TaskSender<R> {
        self.sender.clone()
    }

    pub fn handle(&self) -> Handle {
        self.sender.runtime.clone()
    }

    pub fn poll_results(&mut self) -> Vec<R> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    /// Never returns `None` while the manager itself holds a sender.
    pub async fn next_result(&mut self) -> Option<R> {
        self.receiver.recv().await
    }
}
