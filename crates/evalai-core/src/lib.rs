//! evalai-core — State model, scoring traits, and persistence contract.
//!
//! This crate defines the data model for subjects, evaluation results and
//! uploaded answer scripts, the collaborator traits the state manager is
//! wired to, and the manager itself.

pub mod error;
pub mod manager;
pub mod model;
pub mod scoring;
pub mod statistics;
pub mod store;
pub mod traits;
