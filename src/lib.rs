//! Scoreboard user service
//!
//! Keeps a table of users with a display name and a point total, and serves
//! upsert and list operations over JSON.

pub mod api;
pub mod config;
pub mod db;
pub mod error;

pub use api::server::{AppState, build_router};
pub use config::Config;
pub use db::models::{User, UserPatch};
pub use db::repo::UserStore;
pub use error::{AppError, Result};
