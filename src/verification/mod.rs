// src/verification/mod.rs
pub mod aggregator;
pub mod store;
pub mod types;

pub use store::VerificationStore;
pub use types::{ProofObligation, ProofStatus, VerificationFile};
