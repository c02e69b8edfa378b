//! Application state wiring all services together.
//!
//! AppState holds the concrete coordinator used by both the CLI and the
//! REST API. The coordinator is generic over store/responder/clock traits,
//! but AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use devtalk_core::clock::SystemClock;
use devtalk_core::exchange::ExchangeCoordinator;
use devtalk_infra::config::{load_global_config, resolve_data_dir};
use devtalk_infra::responder::AnthropicResponder;
use devtalk_infra::sqlite::pool::DatabasePool;
use devtalk_infra::sqlite::session::SqliteSessionStore;
use devtalk_types::config::GlobalConfig;

/// Concrete type alias for the coordinator generics pinned to infra implementations.
pub type ConcreteCoordinator =
    ExchangeCoordinator<SqliteSessionStore, AnthropicResponder, SystemClock>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ConcreteCoordinator>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire the coordinator.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("devtalk.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let config = load_global_config(&data_dir).await;

        // The API key comes from the environment. A missing key is not
        // fatal: exchanges still run and are recorded as failed replies.
        let api_key = match std::env::var("ANTHROPIC_API_KEY") {
            Ok(key) => SecretString::from(key),
            Err(_) => {
                tracing::warn!(
                    "ANTHROPIC_API_KEY is not set; responder calls will fail until it is"
                );
                SecretString::from(String::new())
            }
        };

        let store = SqliteSessionStore::new(db_pool.clone());
        let responder = AnthropicResponder::new(api_key, &config.responder);
        let coordinator = ExchangeCoordinator::new(
            store,
            responder,
            SystemClock,
            Duration::from_secs(config.responder.timeout_secs),
        );

        Ok(Self {
            coordinator: Arc::new(coordinator),
            config,
            data_dir,
            db_pool,
        })
    }
}
