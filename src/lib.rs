// src/lib.rs

pub mod api;
pub mod config;
pub mod files;
pub mod operations;
pub mod project;
pub mod server;
pub mod state;
pub mod tasks;
pub mod tools;
pub mod verification;

pub use state::AppState;
