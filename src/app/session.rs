//! Async driver for the events table.
//!
//! [`TableSession`] closes the loop between [`handle_event`] and the outside
//! world. It executes the [`Action`]s the handler returns:
//!
//! - `Fetch` answers from the shared [`QueryCache`] when a fresh entry exists,
//!   otherwise spawns a request (unless one for the same query is in flight)
//! - `Refetch` always spawns a request
//! - `DebounceSearch` feeds the [`Debouncer`]
//!
//! Spawned requests and the debouncer report back through one completion
//! channel as [`Event`]s, which [`pump`](TableSession::pump) feeds into the
//! handler again. Responses for queries that are no longer current are
//! dropped by the handler, so the table always shows the result of the most
//! recently requested query.
//!
//! [`invalidate_events`](TableSession::invalidate_events) starts a new
//! request generation: requests sent before it are aborted, their results
//! are neither cached nor applied, and the current query is requested again.
//!
//! Dropping the session (or calling [`shutdown`](TableSession::shutdown))
//! aborts all in-flight requests and the debouncer; aborted work never
//! produces an event.

use super::debounce::Debouncer;
use super::registration::{RegistrationFlow, SubmitOutcome};
use super::{handle_event, Action, Event, TableState};
use crate::api::EventsApi;
use crate::cache::{QueryCache, QueryKey, EVENTS_NAMESPACE};
use crate::domain::error::Result;
use crate::domain::{EventRecord, PageQuery, PageResult, PageSize, RegistrationRecord};
use crate::ui::viewmodel::TableViewModel;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cache of event-list pages shared between sessions.
pub type EventsCache = QueryCache<PageResult<EventRecord>>;

/// Work reported back to the session.
#[derive(Debug)]
enum Completion {
    /// The debouncer settled on a search value.
    Search(String),
    /// A list request finished with `PageLoaded` or `PageFailed`.
    Page { generation: u64, event: Event },
}

/// Runtime of one mounted events table.
pub struct TableSession {
    state: TableState,
    api: Arc<dyn EventsApi>,
    cache: Arc<EventsCache>,
    debouncer: Debouncer<Completion>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: HashMap<PageQuery, JoinHandle<()>>,
    generation: u64,
    requests_issued: usize,
}

impl std::fmt::Debug for TableSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSession")
            .field("state", &self.state)
            .field("in_flight", &self.in_flight.len())
            .field("generation", &self.generation)
            .field("requests_issued", &self.requests_issued)
            .finish_non_exhaustive()
    }
}

impl TableSession {
    /// Creates a session. Must be called inside a tokio runtime.
    ///
    /// Nothing is fetched until [`mount`](Self::mount).
    #[must_use]
    pub fn new(
        api: Arc<dyn EventsApi>,
        cache: Arc<EventsCache>,
        search_debounce: Duration,
        page_size: PageSize,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::spawn(search_debounce, completions_tx.clone());

        Self {
            state: TableState::new(page_size),
            api,
            cache,
            debouncer,
            completions_tx,
            completions_rx,
            in_flight: HashMap::new(),
            generation: 0,
            requests_issued: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &TableState {
        &self.state
    }

    #[must_use]
    pub fn viewmodel(&self) -> TableViewModel {
        self.state.compute_viewmodel()
    }

    /// Number of requests sent to the API so far.
    #[must_use]
    pub const fn requests_issued(&self) -> usize {
        self.requests_issued
    }

    /// Number of requests currently running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.values().filter(|task| !task.is_finished()).count()
    }

    /// Loads the current query for the first time.
    ///
    /// # Errors
    ///
    /// Propagates handler errors.
    pub async fn mount(&mut self) -> Result<bool> {
        self.dispatch(Event::Mount).await
    }

    /// Feeds one event through the handler and executes the resulting actions.
    ///
    /// Cache hits are applied before this returns. Returns whether anything
    /// visible changed.
    ///
    /// # Errors
    ///
    /// Propagates handler errors; actions of earlier events in the same
    /// dispatch stay applied.
    pub async fn dispatch(&mut self, event: Event) -> Result<bool> {
        let mut queue = VecDeque::from([event]);
        let mut needs_render = false;

        while let Some(event) = queue.pop_front() {
            let (render, actions) = handle_event(&mut self.state, &event)?;
            needs_render |= render;

            for action in actions {
                if let Some(event) = self.execute(action).await {
                    queue.push_back(event);
                }
            }
        }

        Ok(needs_render)
    }

    /// Waits for the next completion (loaded page, settled search) and applies it.
    ///
    /// # Errors
    ///
    /// Propagates handler errors.
    pub async fn pump(&mut self) -> Result<bool> {
        match self.completions_rx.recv().await {
            Some(completion) => self.apply(completion).await,
            None => Ok(false),
        }
    }

    /// Applies every completion that is already available without waiting.
    ///
    /// # Errors
    ///
    /// Propagates handler errors.
    pub async fn pump_ready(&mut self) -> Result<bool> {
        let mut needs_render = false;
        while let Ok(completion) = self.completions_rx.try_recv() {
            needs_render |= self.apply(completion).await?;
        }
        Ok(needs_render)
    }

    /// Pumps completions until no request is in flight.
    ///
    /// A pending debounce is not waited for.
    ///
    /// # Errors
    ///
    /// Propagates handler errors.
    pub async fn settle(&mut self) -> Result<bool> {
        let mut needs_render = self.pump_ready().await?;
        while self.in_flight() > 0 {
            needs_render |= self.pump().await?;
        }
        needs_render |= self.pump_ready().await?;
        Ok(needs_render)
    }

    /// Drops every cached event list and reloads the current query.
    ///
    /// Requests still in flight were sent before the change that caused the
    /// invalidation, so they are aborted and their results discarded; the
    /// reload always goes to the server.
    ///
    /// # Errors
    ///
    /// Propagates handler errors.
    pub async fn invalidate_events(&mut self) -> Result<bool> {
        self.generation += 1;
        self.abort_in_flight();
        let removed = self.cache.invalidate_namespace(EVENTS_NAMESPACE).await;
        tracing::debug!(removed, "event lists invalidated");
        self.dispatch(Event::EventsInvalidated).await
    }

    /// Submits a registration and, on success, invalidates the event lists so
    /// the table reloads the updated spot counts.
    ///
    /// # Errors
    ///
    /// Submission failures are reported in the outcome; only handler errors
    /// from the follow-up reload propagate.
    pub async fn submit_registration(
        &mut self,
        flow: &mut RegistrationFlow,
    ) -> Result<SubmitOutcome<RegistrationRecord>> {
        let outcome = flow.submit(self.api.as_ref()).await;
        if outcome.is_success() {
            self.invalidate_events().await?;
        }
        Ok(outcome)
    }

    /// Aborts in-flight requests and the debouncer.
    pub fn shutdown(&mut self) {
        self.debouncer.cancel();
        self.abort_in_flight();
    }

    fn abort_in_flight(&mut self) {
        for (query, task) in self.in_flight.drain() {
            if !task.is_finished() {
                tracing::debug!(page = query.page, "aborting in-flight request");
            }
            task.abort();
        }
    }

    /// Feeds one completion into the handler, dropping results of requests
    /// from an earlier generation.
    async fn apply(&mut self, completion: Completion) -> Result<bool> {
        match completion {
            Completion::Search(value) => self.dispatch(Event::SearchSettled(value)).await,
            Completion::Page { generation, event } => {
                if generation != self.generation {
                    tracing::debug!(
                        generation,
                        current = self.generation,
                        "dropping result from before invalidation"
                    );
                    return Ok(false);
                }
                if let Event::PageLoaded { query, .. } | Event::PageFailed { query, .. } = &event {
                    self.in_flight.remove(query);
                }
                self.dispatch(event).await
            }
        }
    }

    /// Executes one action. Returns an event to apply right away, if any.
    async fn execute(&mut self, action: Action) -> Option<Event> {
        match action {
            Action::Fetch(query) => {
                let key = QueryKey::events(query.clone());
                if let Some(result) = self.cache.get_fresh(&key).await {
                    tracing::debug!(page = query.page, "serving page from cache");
                    return Some(Event::PageLoaded { query, result });
                }
                self.spawn_fetch(query);
                None
            }
            Action::Refetch(query) => {
                self.spawn_fetch(query);
                None
            }
            Action::DebounceSearch(value) => {
                if !self.debouncer.push(Completion::Search(value)) {
                    tracing::debug!("search dropped, debouncer stopped");
                }
                None
            }
        }
    }

    fn spawn_fetch(&mut self, query: PageQuery) {
        self.in_flight.retain(|_, task| !task.is_finished());
        if self
            .in_flight
            .get(&query)
            .is_some_and(|task| !task.is_finished())
        {
            tracing::debug!(page = query.page, "request already in flight");
            return;
        }

        let api = Arc::clone(&self.api);
        let cache = Arc::clone(&self.cache);
        let completions = self.completions_tx.clone();
        let task_query = query.clone();
        let generation = self.generation;

        let task = tokio::spawn(async move {
            let epoch = cache.epoch(EVENTS_NAMESPACE).await;
            let event = match api.list_events(&task_query).await {
                Ok(result) => {
                    cache
                        .insert_if_current(
                            QueryKey::events(task_query.clone()),
                            result.clone(),
                            epoch,
                        )
                        .await;
                    Event::PageLoaded {
                        query: task_query,
                        result,
                    }
                }
                Err(error) => Event::PageFailed {
                    query: task_query,
                    message: error.to_string(),
                },
            };
            // The receiver only disappears with the session itself.
            let _ = completions.send(Completion::Page { generation, event });
        });

        self.requests_issued += 1;
        self.in_flight.insert(query, task);
    }
}

impl Drop for TableSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
