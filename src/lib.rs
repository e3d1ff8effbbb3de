//! Taskdeck Frontend
//!
//! Optimistic task and note client: a query cache, a mutation coordinator
//! that writes to it before the server answers, and Leptos views on top.

pub mod app;
pub mod cache;
pub mod commands;
pub mod components;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod mutation;
pub mod notice;
pub mod store;

#[cfg(test)]
mod testing;

pub use app::App;
pub use config::ClientConfig;
