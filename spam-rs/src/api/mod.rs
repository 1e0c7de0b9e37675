//! REST API module for spam-rs
//!
//! Exposes scoring, bulk analysis and history over HTTP

pub mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::ApiServer;
