//! Core traits and types for the lead pipeline
//!
//! This crate provides foundational types used across all other crates:
//! - Lead records and the pipeline status state machine
//! - Prospecting profile (ICP) types
//! - Error taxonomy
//! - Collaborator traits for pluggable backends (lead store, profile
//!   store, outbound contact initiation)

pub mod error;
pub mod lead;
pub mod profile;
pub mod time;
pub mod traits;

pub use error::{Error, Result};
pub use lead::{
    Classification, ConversationEntry, Direction, Lead, LeadStatus, NewLead,
    QualificationOutcome, Urgency,
};
pub use profile::{ClientType, ProspectingProfile};

pub use traits::{
    ActivationReceipt, ContactInitiator, ContactRequest, LeadFilter, LeadStore,
    ProfileSnapshot, ProfileStore,
};
