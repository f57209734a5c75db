//! Fathom API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! WebSocket infrastructure, generation runner) so integration tests, the
//! server binary, and the audit CLI can all reach them.

pub mod audit;
pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod ws;
