//! Storefront Server
//!
//! Order lifecycle service for the storefront: checkout persistence,
//! order queries, the status state machine, and fire-and-forget WhatsApp
//! notifications.
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── auth/          # JWT verification, caller identity
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── notify/        # notification dispatcher, providers, worker
//! ├── services/      # settings snapshots
//! └── utils/         # logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_router};
pub use notify::{NotificationEvent, NotificationService, NotificationWorker};

// Re-export unified error types from shared
pub use shared::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Set up the process environment: dotenv plus logging
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}
