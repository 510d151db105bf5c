//! Collaborator traits for pluggable backends

pub mod contact;
pub mod store;

pub use contact::{ContactInitiator, ContactRequest, ProfileSnapshot};
pub use store::{ActivationReceipt, LeadFilter, LeadStore, ProfileStore};
