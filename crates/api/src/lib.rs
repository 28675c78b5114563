//! Parkwise HTTP API.
//!
//! Library half of the `parkwise-api` binary so integration tests can build
//! the same router and call the booking engine directly.

pub mod auth;
pub mod background;
pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
