use std::{
    sync::{
        atomic::{
            AtomicU64,
            Ordering,
        },
        Arc,
    },
    time::Duration,
};

use futures::future::BoxFuture;
use tracing::{
    debug,
    info,
    warn,
};

use super::{
    debounce::Debouncer,
    region::ResultRegion,
    selection::InvoiceSelection,
    SearchTarget,
};
use crate::core::{
    tasks::{
        TaskManager,
        TaskSender,
    },
    EmberError,
    ServerResponse,
};

/// Anything that can answer a search query for a target.
pub trait SearchBackend: Send + Sync {
    fn search(
        &self,
        target: SearchTarget,
        query: String,
    ) -> BoxFuture<'static, Result<ServerResponse, EmberError>>;
}

#[derive(Debug)]
pub struct SearchCompletion {
    pub seq: u64,
    pub query: String,
    pub result: Result<ServerResponse, EmberError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Replaced { seq: u64, query: String },
    Discarded { seq: u64, latest: u64 },
    Failed { seq: u64, diagnostic: String },
}

#[derive(Clone)]
struct QueryIssuer {
    target: SearchTarget,
    backend: Arc<dyn SearchBackend>,
    latest: Arc<AtomicU64>,
    tasks: TaskSender<SearchCompletion>,
}

impl QueryIssuer {
    fn issue(&self, query: String) -> u64 {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        info!(target_name = self.target.name(), seq, query = %query, "issuing search");

        let request = self.backend.search(self.target, query.clone());
        self.tasks.spawn(async move { SearchCompletion { seq, query, result: request.await } });
        seq
    }
}

/// Keeps a result region in sync with a search box.
///
/// Input is debounced, every issued query gets the next sequence number, and only
/// the response to the most recently issued query may touch the region.
pub struct LiveSearch {
    target: SearchTarget,
    issuer: QueryIssuer,
    debouncer: Debouncer<String>,
    tasks: TaskManager<SearchCompletion>,
    region: ResultRegion,
    selection: Option<InvoiceSelection>,
}

impl LiveSearch {
    pub fn new(
        target: SearchTarget,
        backend: Arc<dyn SearchBackend>,
        delay: Duration,
    ) -> Result<Self, EmberError> {
        let tasks = TaskManager::new()?;
        let issuer = QueryIssuer {
            target,
            backend,
            latest: Arc::new(AtomicU64::new(0)),
            tasks: tasks.sender(),
        };

        let debounced = issuer.clone();
        let debouncer = Debouncer::with_handle(tasks.handle(), delay, move |query: String| {
            debounced.issue(query);
        });

        let selection = target.has_invoice_selection().then(InvoiceSelection::new);

        Ok(Self { target, issuer, debouncer, tasks, region: ResultRegion::default(), selection })
    }

    pub fn with_initial_content(mut self, content: impl Into<String>) -> Self {
        self.region = ResultRegion::new(content);
        self
    }

    /// An `input` event on the search box.
    pub fn input(&mut self, text: impl Into<String>) {
        self.debouncer.trigger(text.into());
    }

    /// Skips the debounce window, superseding anything pending.
    pub fn search_now(&mut self, text: impl Into<String>) -> u64 {
        self.debouncer.cancel();
        self.issuer.issue(text.into())
    }

    /// Applies every completion that has already arrived.
    pub fn poll(&mut self) -> Vec<SearchEvent> {
        self.tasks.poll_results().into_iter().map(|completion| self.apply(completion)).collect()
    }

    /// Waits for the next completion and applies it.
    pub async fn next_event(&mut self) -> Option<SearchEvent> {
        let completion = self.tasks.next_result().await?;
        Some(self.apply(completion))
    }

    fn apply(&mut self, completion: SearchCompletion) -> SearchEvent {
        let SearchCompletion { seq, query, result } = completion;
        let latest = self.latest_issued();

        if seq != latest {
            debug!(
                target_name = self.target.name(),
                seq,
                latest,
                "discarding stale search response"
            );
            return SearchEvent::Discarded { seq, latest };
        }

        let diagnostic = match result {
            Ok(ServerResponse::Fragment(fragment)) => {
                self.region.replace(&query, fragment);
                if let Some(selection) = self.selection.as_mut() {
                    selection.clear();
                }
                return SearchEvent::Replaced { seq, query };
            }
            Ok(ServerResponse::Error { message, .. }) => message,
            Ok(ServerResponse::Redirect(url)) => format!("server asked to redirect to {url}"),
            Ok(ServerResponse::Data(value)) => format!("unexpected search response: {value}"),
            Err(e) => e.to_string(),
        };

        warn!(target_name = self.target.name(), seq, query = %query, "search failed: {diagnostic}");
        self.region.set_diagnostic(diagnostic.clone());
        SearchEvent::Failed { seq, diagnostic }
    }

    pub fn latest_issued(&self) -> u64 {
        self.issuer.latest.load(Ordering::SeqCst)
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn target(&self) -> SearchTarget {
        self.target
    }

    pub fn region(&self) -> &ResultRegion {
        &self.region
    }

    pub fn selection(&self) -> Option<&InvoiceSelection> {
        self.selection.as_ref()
    }

    pub fn selection_mut(&mut self) -> Option<&mut InvoiceSelection> {
        self.selection.as_mut()
    }

    /// Invoice links rendered in the current region.
    pub fn available_invoices(&self) -> Vec<String> {
        self.region.checkbox_values(super::INVOICE_CHECKBOX_CLASS)
    }
}
