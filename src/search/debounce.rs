use std::{
    sync::Arc,
    time::Duration,
};

use tokio::{
    runtime::Handle,
    task::JoinHandle,
};

use crate::core::EmberError;

/// Trailing-edge debouncer.
///
/// Every [`trigger`](Debouncer::trigger) supersedes the pending one; the action runs
/// once, `delay` after the last trigger, with that trigger's argument. The action
/// always runs on a spawned task, so even a zero delay never executes inside
/// `trigger`. Triggering takes `&mut self`: callers on several tasks must serialise.
///
/// The runtime handle is captured up front, so `trigger` also works from a plain
/// thread that is outside any runtime context.
pub struct Debouncer<T> {
    runtime: Handle,
    delay: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(
        delay: Duration,
        action: impl Fn(T) + Send + Sync + 'static,
    ) -> Result<Self, EmberError> {
        let runtime = Handle::try_current()
            .map_err(|e| EmberError::Custom(format!("Debouncer needs a tokio runtime: {e}")))?;
        Ok(Self::with_handle(runtime, delay, action))
    }

    pub fn with_handle(
        runtime: Handle,
        delay: Duration,
        action: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self { runtime, delay, action: Arc::new(action), pending: None }
    }

    pub fn trigger(&mut self, args: T) {
        self.cancel();

        let action = self.action.clone();
        let delay = self.delay;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            action(args);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|pending| !pending.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
