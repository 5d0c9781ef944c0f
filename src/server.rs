//! Server context tying the record store and the topic bus together.

use crate::bus::TopicBus;
use crate::config::ServerConfig;
use crate::records::RecordStore;
use crate::ticker::Ticker;
use parking_lot::RwLock;
use tracing::info;

/// The server context passed to every resolver.
///
/// Owns:
/// - The record store (users, posts, comments)
/// - The topic bus subscribers listen on
///
/// Mutations hold the store's write lock across the store change, the event
/// decision and the publish, so no two mutations interleave. Queries and
/// subscription checks take the read lock.
pub struct Server {
    config: ServerConfig,

    pub(crate) store: RwLock<RecordStore>,

    pub(crate) bus: TopicBus,
}

impl Server {
    /// Create a server with an empty store.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_store(config, RecordStore::new())
    }

    /// Create a server over an existing store.
    pub fn with_store(config: ServerConfig, store: RecordStore) -> Self {
        let bus = TopicBus::with_config(config.bus.clone());
        info!(
            users = store.users().len(),
            posts = store.posts().len(),
            comments = store.comments().len(),
            "server created"
        );

        Self {
            config,
            store: RwLock::new(store),
            bus,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The bus events are published on.
    pub fn bus(&self) -> &TopicBus {
        &self.bus
    }

    /// A consistent copy of every collection.
    pub fn snapshot(&self) -> RecordStore {
        self.store.read().clone()
    }

    /// Start the demonstration counter, if enabled.
    pub fn start_count_ticker(&self) -> Option<Ticker> {
        if !self.config.count_enabled {
            return None;
        }
        Some(Ticker::start(self.bus.clone(), self.config.count_interval))
    }

    /// Drop every live subscription.
    pub fn shutdown(&self) {
        info!("server shutting down");
        self.bus.close();
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}
