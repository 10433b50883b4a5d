// Library exports for wallfeed
// This allows integration tests and the binary to share the same modules

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod feed;
pub mod models;
pub mod registry;
pub mod routes;
pub mod seed;
pub mod shell;
pub mod state;
