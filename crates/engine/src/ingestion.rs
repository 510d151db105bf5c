//! Lead and qualification-result ingestion
//!
//! Inbound webhook payloads are validated field-by-field before any
//! store call; a rejected payload never mutates anything.

use std::sync::Arc;

use uuid::Uuid;

use leadflow_core::{Error, Lead, LeadStore, NewLead, QualificationOutcome, Result};

/// Validates and persists inbound lead data
pub struct IngestionService {
    store: Arc<dyn LeadStore>,
}

impl IngestionService {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self { store }
    }

    /// Ingest a new lead from the external prospecting collaborator
    ///
    /// `company_name`, `segment` and `city` are required; `status`
    /// defaults to prospectable upstream of this call.
    pub async fn ingest(&self, payload: NewLead) -> Result<Lead> {
        validate_required(&payload.company_name, "company_name")?;
        validate_required(&payload.segment, "segment")?;
        validate_required(&payload.city, "city")?;
        validate_score(payload.score)?;

        let lead = self.store.create(payload).await?;
        tracing::info!(lead_id = %lead.id, company_id = %lead.company_id, "lead ingested");
        Ok(lead)
    }

    /// Record a qualification result pushed by the external
    /// qualification collaborator
    ///
    /// The lead must already exist under the company; the named fields
    /// are overwritten and the status moves through the state machine.
    pub async fn record_qualification(
        &self,
        company_id: Uuid,
        lead_id: Uuid,
        outcome: QualificationOutcome,
    ) -> Result<Lead> {
        validate_score(outcome.score)?;
        let lead = self
            .store
            .apply_qualification(company_id, lead_id, outcome)
            .await?;
        tracing::info!(lead_id = %lead.id, status = %lead.status, "qualification recorded");
        Ok(lead)
    }
}

fn validate_required(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "is required"));
    }
    Ok(())
}

fn validate_score(score: Option<u8>) -> Result<()> {
    if let Some(score) = score {
        if score > 100 {
            return Err(Error::validation("score", "must be between 0 and 100"));
        }
    }
    Ok(())
}
