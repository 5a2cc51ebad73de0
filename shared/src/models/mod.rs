//! Data models
//!
//! Shared between store-server and front-ends (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod order;
pub mod product;
pub mod settings;

// Re-exports
pub use order::*;
pub use product::*;
pub use settings::*;
