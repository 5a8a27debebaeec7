pub mod auth;
pub mod chunk;
pub mod config;
pub mod error;
pub mod handlers;
pub mod history;
pub mod relay;
pub mod router;
pub mod state;
