//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;

use crate::config::EngineConfig;
use crate::engine::TripSession;
use crate::presenter::RecordingPresenter;
use crate::session::{FileStorage, MemoryStorage, SessionCodec, SnapshotStorage, StorageError};

/// Upper bound on live sessions held in memory.
const MAX_SESSIONS: u64 = 10_000;

/// Snapshot storage shared by all clients.
#[derive(Debug, Clone)]
pub enum SessionStorage {
    Memory(MemoryStorage),
    File(FileStorage),
}

impl SessionStorage {
    /// The part of the storage belonging to one client.
    pub fn scoped(&self, client: &str) -> Result<Self, StorageError> {
        match self {
            SessionStorage::Memory(storage) => Ok(SessionStorage::Memory(storage.scoped(client))),
            SessionStorage::File(storage) => storage.scoped(client).map(SessionStorage::File),
        }
    }
}

impl SnapshotStorage for SessionStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            SessionStorage::Memory(s) => s.read(key),
            SessionStorage::File(s) => s.read(key),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            SessionStorage::Memory(s) => s.write(key, value),
            SessionStorage::File(s) => s.write(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            SessionStorage::Memory(s) => s.remove(key),
            SessionStorage::File(s) => s.remove(key),
        }
    }
}

/// A client's live session.
pub type ClientSession = TripSession<SessionStorage, RecordingPresenter>;

/// Shared handle to a client's live session.
pub type SharedSession = Arc<Mutex<ClientSession>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions keyed by client id. Idle sessions are evicted after the
    /// snapshot lifetime; their snapshot survives in `storage`.
    sessions: MokaCache<String, SharedSession>,

    /// Snapshot storage, scoped per client
    storage: SessionStorage,

    /// Engine configuration for new sessions
    pub config: Arc<EngineConfig>,
}

impl AppState {
    pub fn new(config: EngineConfig, storage: SessionStorage) -> Self {
        let idle = Duration::from_secs(config.snapshot_ttl_mins.max(1) as u64 * 60);
        let sessions = MokaCache::builder()
            .time_to_idle(idle)
            .max_capacity(MAX_SESSIONS)
            .build();

        Self {
            sessions,
            storage,
            config: Arc::new(config),
        }
    }

    /// State with in-memory snapshot storage.
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::new(config, SessionStorage::Memory(MemoryStorage::new()))
    }

    /// Look up a client's live session.
    pub async fn session(&self, client: &str) -> Option<SharedSession> {
        self.sessions.get(client).await
    }

    /// Start a fresh session for `client` on `page_key`, replacing any
    /// live one. Persisted state is left alone.
    pub async fn open_session(
        &self,
        client: &str,
        page_key: &str,
    ) -> Result<SharedSession, StorageError> {
        let session = TripSession::new(
            EngineConfig::clone(&self.config),
            self.storage.scoped(client)?,
            RecordingPresenter::new(),
            page_key,
        );
        let session = Arc::new(Mutex::new(session));
        self.sessions
            .insert(client.to_string(), Arc::clone(&session))
            .await;
        Ok(session)
    }

    /// Codec over a client's storage, independent of any live session.
    pub fn codec(&self, client: &str) -> Result<SessionCodec<SessionStorage>, StorageError> {
        Ok(SessionCodec::new(self.storage.scoped(client)?).with_ttl(self.config.snapshot_ttl()))
    }
}
