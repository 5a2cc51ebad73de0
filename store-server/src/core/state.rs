use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::mpsc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::notify::{NotificationEvent, NotificationService};
use crate::services::SettingsService;

/// Server state — shared references to every service
///
/// Cheap to clone (Arc/pool handles inside); one copy per request via axum
/// `State`.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Settings snapshot provider
    pub settings: SettingsService,
    /// Fire-and-forget notification publisher
    pub notifications: NotificationService,
    /// JWT verification service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Assemble state from already-built services
    ///
    /// Usually [`ServerState::initialize`] is used instead; tests build
    /// state directly on an in-memory pool.
    pub fn new(
        config: Config,
        pool: SqlitePool,
        settings: SettingsService,
        notifications: NotificationService,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            config,
            pool,
            settings,
            notifications,
            jwt_service,
        }
    }

    /// Initialize server state
    ///
    /// Order: work directory layout → database (with migrations) →
    /// services. Returns the state plus the receiving end of the
    /// notification channel for the worker.
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be initialized —
    /// the server cannot run without either.
    pub async fn initialize(config: &Config) -> (Self, mpsc::Receiver<NotificationEvent>) {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_file();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let pool = db_service.pool;

        let settings = SettingsService::new(pool.clone());
        let (notifications, notify_rx) = NotificationService::channel(config.notification_buffer);
        let jwt_service = Arc::new(JwtService::default());

        let state = Self::new(config.clone(), pool, settings, notifications, jwt_service);
        (state, notify_rx)
    }
}
