// src/api/http/mod.rs

pub mod files;
pub mod operations;
pub mod projects;
pub mod router;
pub mod verification;

pub use router::http_router;
