//! The worker task and the handle used to reach it.

use cardex_core::{
    BuildReport, Card, CardId, CardSource, DEFAULT_SEARCH_LIMIT, FetchError, Index, LoadError,
    Normalizer, fetch_card, load_index,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::protocol::{IdPayload, InitPayload, Request, Response, SearchPayload};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Worker is not running")]
    Closed,

    #[error("Worker dropped the request before replying")]
    Dropped,
}

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub normalizer: Normalizer,
    /// Result cap for searches that don't name one
    pub default_limit: usize,
    /// Requests buffered before `submit` waits
    pub channel_capacity: usize,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::default(),
            default_limit: DEFAULT_SEARCH_LIMIT,
            channel_capacity: 64,
        }
    }
}

struct Envelope {
    request: Request,
    reply: oneshot::Sender<Response>,
}

/// Result of a spawned load or refresh, routed back into the worker loop.
enum Completion {
    Loaded {
        generation: u64,
        started: Instant,
        result: Result<(Index, BuildReport), LoadError>,
        reply: oneshot::Sender<Response>,
    },
    Refreshed {
        id: CardId,
        index_generation: u64,
        seq: u64,
        result: Result<Option<Card>, FetchError>,
        reply: oneshot::Sender<Response>,
    },
}

/// Cloneable sender side of a running worker.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    tx: mpsc::Sender<Envelope>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

impl WorkerHandle {
    /// Start a worker on the current runtime. It runs until every handle is
    /// dropped and all in-flight work has replied.
    #[must_use]
    pub fn spawn<S>(source: Arc<S>, settings: WorkerSettings) -> (Self, JoinHandle<()>)
    where
        S: CardSource + ?Sized + 'static,
    {
        let (tx, rx) = mpsc::channel(settings.channel_capacity.max(1));
        let state = WorkerState::new(source, settings);
        let task = tokio::spawn(state.run(rx));
        (Self { tx }, task)
    }

    /// Queue a request; the receiver resolves with its response.
    ///
    /// Responses to different requests may arrive in any order.
    pub async fn submit(&self, request: Request) -> Result<oneshot::Receiver<Response>, WorkerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| WorkerError::Closed)?;
        Ok(rx)
    }

    /// Submit and wait. Delivery failures come back as [`Response::Error`].
    pub async fn send(&self, request: Request) -> Response {
        match self.submit(request).await {
            Ok(rx) => rx
                .await
                .unwrap_or_else(|_| Response::error(WorkerError::Dropped)),
            Err(e) => Response::error(e),
        }
    }

    pub async fn init(&self, pack_url: impl Into<String>) -> Response {
        self.send(Request::Init(InitPayload {
            pack_url: pack_url.into(),
        }))
        .await
    }

    pub async fn search(&self, payload: SearchPayload) -> Response {
        self.send(Request::Search(payload)).await
    }

    pub async fn get(&self, id: CardId) -> Response {
        self.send(Request::Get(IdPayload { id })).await
    }

    pub async fn refresh(&self, id: CardId) -> Response {
        self.send(Request::RefreshRaw(IdPayload { id })).await
    }
}

struct WorkerState<S: ?Sized> {
    source: Arc<S>,
    normalizer: Arc<Normalizer>,
    default_limit: usize,
    index: Option<Index>,
    /// Bumped by every init; only the newest load may install its index.
    load_generation: u64,
    /// Bumped whenever a load installs a new index.
    index_generation: u64,
    refresh_seq: u64,
    /// Newest refresh sequence issued per id.
    latest_refresh: HashMap<CardId, u64>,
}

impl<S> WorkerState<S>
where
    S: CardSource + ?Sized + 'static,
{
    fn new(source: Arc<S>, settings: WorkerSettings) -> Self {
        Self {
            source,
            normalizer: Arc::new(settings.normalizer),
            default_limit: settings.default_limit,
            index: None,
            load_generation: 0,
            index_generation: 0,
            refresh_seq: 0,
            latest_refresh: HashMap::new(),
        }
    }

    async fn run(mut self, mut requests: mpsc::Receiver<Envelope>) {
        info!("Worker started");
        let mut tasks: JoinSet<Completion> = JoinSet::new();

        loop {
            tokio::select! {
                envelope = requests.recv() => {
                    let Some(Envelope { request, reply }) = envelope else {
                        break;
                    };
                    self.dispatch(request, reply, &mut tasks);
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    self.on_joined(joined);
                }
            }
        }

        // Every handle is gone; let in-flight work reply before exiting.
        while let Some(joined) = tasks.join_next().await {
            self.on_joined(joined);
        }
        info!("Worker stopped");
    }

    fn on_joined(&mut self, joined: Result<Completion, tokio::task::JoinError>) {
        match joined {
            Ok(completion) => self.complete(completion),
            // The task's reply sender went down with it, so the caller
            // sees `WorkerError::Dropped`.
            Err(e) => error!("Worker task failed: {e}"),
        }
    }

    fn dispatch(
        &mut self,
        request: Request,
        reply: oneshot::Sender<Response>,
        tasks: &mut JoinSet<Completion>,
    ) {
        debug!("Worker request: {:?}", request);
        match request {
            Request::Init(InitPayload { pack_url }) => self.start_load(pack_url, reply, tasks),
            Request::Search(payload) => respond(reply, self.search(payload)),
            Request::Get(IdPayload { id }) => respond(reply, self.get(id)),
            Request::RefreshRaw(IdPayload { id }) => self.start_refresh(id, reply, tasks),
        }
    }

    fn start_load(
        &mut self,
        location: String,
        reply: oneshot::Sender<Response>,
        tasks: &mut JoinSet<Completion>,
    ) {
        self.load_generation += 1;
        let generation = self.load_generation;
        let source = Arc::clone(&self.source);
        let normalizer = Arc::clone(&self.normalizer);
        info!("Loading pack {} (generation {})", location, generation);

        tasks.spawn(async move {
            let started = Instant::now();
            let result = load_index(source.as_ref(), &location, &normalizer).await;
            Completion::Loaded {
                generation,
                started,
                result,
                reply,
            }
        });
    }

    fn start_refresh(
        &mut self,
        id: CardId,
        reply: oneshot::Sender<Response>,
        tasks: &mut JoinSet<Completion>,
    ) {
        self.refresh_seq += 1;
        let seq = self.refresh_seq;
        self.latest_refresh.insert(id, seq);
        let index_generation = self.index_generation;
        let source = Arc::clone(&self.source);
        let normalizer = Arc::clone(&self.normalizer);

        tasks.spawn(async move {
            let result = fetch_card(source.as_ref(), &normalizer, id).await;
            Completion::Refreshed {
                id,
                index_generation,
                seq,
                result,
                reply,
            }
        });
    }

    fn search(&self, payload: SearchPayload) -> Response {
        let Some(index) = &self.index else {
            return Response::error("index not ready");
        };
        let limit = payload.limit.unwrap_or(self.default_limit);
        let results = index.search(&payload.query, limit, payload.include_text);
        Response::SearchResults {
            query: payload.query,
            results,
        }
    }

    fn get(&self, id: CardId) -> Response {
        let Some(index) = &self.index else {
            return Response::error("index not ready");
        };
        Response::Card {
            card: index.get(id).cloned(),
            refreshed: false,
        }
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Loaded {
                generation,
                started,
                result,
                reply,
            } => {
                let response = self.finish_load(generation, started, result);
                respond(reply, response);
            }
            Completion::Refreshed {
                id,
                index_generation,
                seq,
                result,
                reply,
            } => {
                let response = self.finish_refresh(id, index_generation, seq, result);
                respond(reply, response);
            }
        }
    }

    fn finish_load(
        &mut self,
        generation: u64,
        started: Instant,
        result: Result<(Index, BuildReport), LoadError>,
    ) -> Response {
        if generation != self.load_generation {
            info!(
                "Discarding pack load generation {} (current is {})",
                generation, self.load_generation
            );
            return Response::error("pack load superseded by a newer init");
        }

        match result {
            Ok((index, report)) => {
                let count = index.len();
                let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                self.index = Some(index);
                self.index_generation += 1;
                info!(
                    "Index ready: {} cards in {}ms ({} rejected, {} duplicates)",
                    count, elapsed_ms, report.rejected, report.duplicates
                );
                Response::Ready { count, elapsed_ms }
            }
            Err(e) => {
                warn!("Pack load failed: {e}");
                Response::error(e)
            }
        }
    }

    fn finish_refresh(
        &mut self,
        id: CardId,
        index_generation: u64,
        seq: u64,
        result: Result<Option<Card>, FetchError>,
    ) -> Response {
        let is_latest = self.latest_refresh.get(&id) == Some(&seq);
        if is_latest {
            self.latest_refresh.remove(&id);
        }

        let card = match result {
            Ok(card) => card,
            Err(e) => {
                warn!("Refresh of card {} failed: {e}", id);
                return Response::error(e);
            }
        };

        if let Some(card) = &card {
            match self.index.as_mut() {
                Some(index) if is_latest && index_generation == self.index_generation => {
                    let outcome = index.replace(card.clone());
                    info!("Refreshed card {} ({:?})", id, outcome);
                }
                Some(_) => info!("Refresh of card {} is stale, index left unchanged", id),
                None => debug!("Refresh of card {} arrived before any index", id),
            }
        }

        Response::Card {
            card,
            refreshed: true,
        }
    }
}

fn respond(reply: oneshot::Sender<Response>, response: Response) {
    if reply.send(response).is_err() {
        debug!("Caller went away before its response was ready");
    }
}
