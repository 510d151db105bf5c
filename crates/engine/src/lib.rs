//! Pipeline operations: activation control, lead ingestion and
//! prospecting dispatch
//!
//! These are the mutating flows around the analytics core. Each one
//! validates before touching the store; the prospecting dispatcher is
//! the only flow with per-item compensation (delivery failures revert
//! the individual lead instead of failing the batch).

pub mod activation;
pub mod contact;
pub mod ingestion;
pub mod prospecting;

pub use activation::ActivationController;
pub use contact::WebhookContactInitiator;
pub use ingestion::IngestionService;
pub use prospecting::{DispatchSummary, ProspectingDispatcher};
