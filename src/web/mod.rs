//! Web dashboard for SpaceX launch records
//!
//! Serves the single-page dashboard and the JSON API behind it:
//! - Layout (dropdown options, slider bounds, chart slots)
//! - Per-session control events, answered with the charts they affect
//! - Stateless chart rendering for an explicit selection

pub mod routes;
pub mod server;

pub use server::{AppState, ServerConfig, start_server};
