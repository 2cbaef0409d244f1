// src/files/mod.rs
pub mod reconciler;
pub mod store;
pub mod types;

pub use reconciler::FileReconciler;
pub use store::FileStore;
pub use types::ProjectFile;
