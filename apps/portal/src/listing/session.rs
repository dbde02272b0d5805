//! Live listing sessions.
//!
//! Each session is a task that owns one [`Listing`]. Inputs arrive over an
//! mpsc channel and are applied one at a time; the latest snapshot is
//! published on a watch channel. Typed search text is debounced on the
//! trailing edge: every keystroke restarts the timer and only the last text
//! is applied.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch, RwLock};
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::listing::engine::{Listing, ListingEvent, ListingSnapshot, ListingState};
use crate::models::job::JobRecord;

const INPUT_BUFFER: usize = 32;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Listing session {0} not found")]
    NotFound(Uuid),

    #[error("Listing session closed")]
    Closed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionInput {
    /// Applied immediately.
    Event { event: ListingEvent },
    /// A keystroke in the search box. Applied once typing pauses.
    SearchTyped { text: String },
}

struct Command {
    input: SessionInput,
    reply: Option<oneshot::Sender<ListingSnapshot>>,
}

#[derive(Clone)]
pub struct ListingSession {
    commands: mpsc::Sender<Command>,
    latest: watch::Receiver<ListingSnapshot>,
}

impl ListingSession {
    /// Starts the session task. It runs until every handle is dropped.
    pub fn spawn(
        records: Arc<[JobRecord]>,
        page_size: usize,
        state: ListingState,
        debounce: Duration,
    ) -> Self {
        let listing = Listing::from_state(records, page_size, state);
        let (latest_tx, latest_rx) = watch::channel(listing.snapshot());
        let (commands_tx, commands_rx) = mpsc::channel(INPUT_BUFFER);

        tokio::spawn(run_session(listing, commands_rx, latest_tx, debounce));

        Self {
            commands: commands_tx,
            latest: latest_rx,
        }
    }

    pub fn latest(&self) -> ListingSnapshot {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot> {
        self.latest.clone()
    }

    /// Sends an input and waits for the session to acknowledge it. A typed
    /// search acknowledges with the unchanged snapshot.
    pub async fn send(&self, input: SessionInput) -> Result<ListingSnapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command {
                input,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }

    /// Queues an event without waiting for room in the queue.
    fn try_notify(&self, event: ListingEvent) -> Result<(), TrySendError<Command>> {
        self.commands.try_send(Command {
            input: SessionInput::Event { event },
            reply: None,
        })
    }
}

async fn run_session(
    mut listing: Listing,
    mut commands: mpsc::Receiver<Command>,
    latest: watch::Sender<ListingSnapshot>,
    debounce: Duration,
) {
    let mut pending_search: Option<(String, Instant)> = None;

    loop {
        let deadline = pending_search.as_ref().map(|(_, at)| *at);

        tokio::select! {
            command = commands.recv() => {
                let Some(Command { input, reply }) = command else {
                    break;
                };
                let snapshot = match input {
                    SessionInput::SearchTyped { text } => {
                        pending_search = Some((text, Instant::now() + debounce));
                        listing.snapshot()
                    }
                    SessionInput::Event { event } => {
                        if matches!(event, ListingEvent::SetSearch(_) | ListingEvent::ClearFilters) {
                            pending_search = None;
                        }
                        let snapshot = listing.dispatch(event);
                        latest.send_replace(snapshot.clone());
                        snapshot
                    }
                };
                if let Some(reply) = reply {
                    let _ = reply.send(snapshot);
                }
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some((text, _)) = pending_search.take() {
                    debug!("Applying debounced search {:?}", text);
                    latest.send_replace(listing.dispatch(ListingEvent::SetSearch(text)));
                }
            }
        }
    }

    debug!("Listing session ended");
}

/// How long a session may go untouched before the registry drops it.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct Entry {
    session: ListingSession,
    last_seen: Instant,
}

/// Live sessions keyed by id. Sessions nobody has read or written within the
/// idle TTL are evicted, which ends their task.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TTL)
    }
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    /// Opens a session over the collection `records` resolves to. The
    /// registry stays write-locked from reading the collection until the
    /// insert, so a concurrent [`broadcast`](Self::broadcast) either sees the
    /// new session or finished before the collection was read.
    pub async fn create<F>(
        &self,
        records: F,
        page_size: usize,
        state: ListingState,
        debounce: Duration,
    ) -> (Uuid, ListingSnapshot)
    where
        F: Future<Output = Arc<[JobRecord]>>,
    {
        let mut map = self.sessions.write().await;
        evict_expired(&mut map, self.idle_ttl);

        let id = Uuid::new_v4();
        let session = ListingSession::spawn(records.await, page_size, state, debounce);
        let snapshot = session.latest();
        map.insert(
            id,
            Entry {
                session,
                last_seen: Instant::now(),
            },
        );
        (id, snapshot)
    }

    /// Looks a session up and marks it as active.
    pub async fn get(&self, id: Uuid) -> Result<ListingSession, SessionError> {
        let mut map = self.sessions.write().await;
        let entry = map.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        entry.last_seen = Instant::now();
        Ok(entry.session.clone())
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<ListingSnapshot, SessionError> {
        Ok(self.get(id).await?.latest())
    }

    pub async fn send(&self, id: Uuid, input: SessionInput) -> Result<ListingSnapshot, SessionError> {
        self.get(id).await?.send(input).await
    }

    /// Drops the registry's handle; the task ends once no request holds one.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session idle for longer than the TTL. Returns how many
    /// went.
    pub async fn evict_idle(&self) -> usize {
        evict_expired(&mut *self.sessions.write().await, self.idle_ttl)
    }

    /// Evicts idle sessions every `period`, forever.
    pub async fn sweep_every(self, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.evict_idle().await;
        }
    }

    /// Hands a reloaded collection to every live session without waiting on
    /// any of them. A session whose queue is full or whose task has gone away
    /// is dropped; its client opens a new one over the fresh collection.
    pub async fn broadcast(&self, records: Arc<[JobRecord]>) {
        let mut map = self.sessions.write().await;
        evict_expired(&mut map, self.idle_ttl);

        map.retain(|id, entry| {
            match entry
                .session
                .try_notify(ListingEvent::RecordsLoaded(records.clone()))
            {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    warn!("Listing session {id} is backed up, dropping it on reload");
                    false
                }
                Err(TrySendError::Closed(_)) => false,
            }
        });
    }
}

fn evict_expired(map: &mut HashMap<Uuid, Entry>, idle_ttl: Duration) -> usize {
    let before = map.len();
    let now = Instant::now();
    map.retain(|_, entry| now.duration_since(entry.last_seen) < idle_ttl);
    let evicted = before - map.len();
    if evicted > 0 {
        info!("Evicted {evicted} idle listing sessions ({} live)", map.len());
    }
    evicted
}
