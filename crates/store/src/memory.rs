//! In-memory lead and profile stores
//!
//! Batch activation is the one correctness-critical path: the quota check
//! and the status mutation form a check-then-act sequence, so both run
//! inside a single write-lock critical section. Two concurrent activation
//! requests for the same company serialize on the lock and the second one
//! re-reads today's count after the first committed.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use leadflow_core::{
    ActivationReceipt, Error, Lead, LeadFilter, LeadStatus, LeadStore, NewLead,
    ProfileStore, ProspectingProfile, QualificationOutcome, Result,
};

/// In-memory lead store (default)
///
/// Leads are indexed by id; every read and write is additionally scoped
/// by `company_id` so a lead is never visible across the tenant boundary.
#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<HashMap<Uuid, Lead>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn count_activated_since(
        leads: &HashMap<Uuid, Lead>,
        company_id: Uuid,
        since: DateTime<Utc>,
    ) -> u32 {
        leads
            .values()
            .filter(|lead| {
                lead.company_id == company_id
                    && lead.status == LeadStatus::Activated
                    && lead.activated_at.map(|at| at >= since).unwrap_or(false)
            })
            .count() as u32
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn create(&self, new_lead: NewLead) -> Result<Lead> {
        let lead = new_lead.into_lead();
        let mut leads = self.leads.write();
        leads.insert(lead.id, lead.clone());
        tracing::debug!(lead_id = %lead.id, company_id = %lead.company_id, status = %lead.status, "lead created");
        Ok(lead)
    }

    async fn get(&self, company_id: Uuid, lead_id: Uuid) -> Result<Option<Lead>> {
        let leads = self.leads.read();
        Ok(leads
            .get(&lead_id)
            .filter(|lead| lead.company_id == company_id)
            .cloned())
    }

    async fn count(&self, company_id: Uuid, filter: &LeadFilter) -> Result<u64> {
        let leads = self.leads.read();
        Ok(leads
            .values()
            .filter(|lead| lead.company_id == company_id && filter.matches(lead))
            .count() as u64)
    }

    async fn find_many(
        &self,
        company_id: Uuid,
        filter: &LeadFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Lead>> {
        let leads = self.leads.read();
        let mut matching: Vec<Lead> = leads
            .values()
            .filter(|lead| lead.company_id == company_id && filter.matches(lead))
            .cloned()
            .collect();
        matching.sort_by_key(|lead| lead.created_at);
        if let Some(limit) = limit {
            matching.truncate(limit);
        }
        Ok(matching)
    }

    async fn update_status(
        &self,
        company_id: Uuid,
        lead_id: Uuid,
        new_status: LeadStatus,
    ) -> Result<Lead> {
        let mut leads = self.leads.write();
        let lead = leads
            .get_mut(&lead_id)
            .filter(|lead| lead.company_id == company_id)
            .ok_or_else(|| Error::not_found(format!("lead {lead_id}")))?;

        if !lead.status.can_transition_to(new_status) {
            return Err(Error::conflict(format!(
                "lead {lead_id} cannot move from {} to {}",
                lead.status, new_status
            )));
        }

        lead.status = new_status;
        if new_status == LeadStatus::Activated {
            lead.activated_at = Some(Utc::now());
        }
        tracing::debug!(lead_id = %lead_id, status = %new_status, "lead status updated");
        Ok(lead.clone())
    }

    async fn apply_qualification(
        &self,
        company_id: Uuid,
        lead_id: Uuid,
        outcome: QualificationOutcome,
    ) -> Result<Lead> {
        let mut leads = self.leads.write();
        let lead = leads
            .get_mut(&lead_id)
            .filter(|lead| lead.company_id == company_id)
            .ok_or_else(|| Error::not_found(format!("lead {lead_id}")))?;

        if outcome.status != lead.status && !lead.status.can_transition_to(outcome.status) {
            return Err(Error::conflict(format!(
                "lead {lead_id} cannot move from {} to {}",
                lead.status, outcome.status
            )));
        }

        lead.status = outcome.status;
        if let Some(score) = outcome.score {
            lead.score = Some(score);
        }
        if let Some(classification) = outcome.classification {
            lead.classification = Some(classification);
        }
        if let Some(urgency) = outcome.urgency {
            lead.urgency = Some(urgency);
        }
        if let Some(main_pain) = outcome.main_pain {
            lead.main_pain = Some(main_pain);
        }
        if let Some(summary) = outcome.conversation_summary {
            lead.conversation_summary = Some(summary);
        }
        if let Some(reason) = outcome.discard_reason {
            lead.discard_reason = Some(reason);
        }
        if !outcome.conversation_history.is_empty() {
            lead.conversation_history = outcome.conversation_history;
        }

        tracing::debug!(lead_id = %lead_id, status = %lead.status, "qualification applied");
        Ok(lead.clone())
    }

    async fn activate_batch(
        &self,
        company_id: Uuid,
        lead_ids: &[Uuid],
        activated_by: &str,
        daily_capacity: u32,
        day_start: DateTime<Utc>,
    ) -> Result<ActivationReceipt> {
        // Validation, quota re-check and mutation share one write lock.
        let mut leads = self.leads.write();

        for lead_id in lead_ids {
            let lead = leads
                .get(lead_id)
                .filter(|lead| lead.company_id == company_id)
                .ok_or_else(|| Error::not_found(format!("lead {lead_id}")))?;
            if lead.status != LeadStatus::Available {
                return Err(Error::conflict(format!(
                    "lead {lead_id} is {} and not available for activation",
                    lead.status
                )));
            }
        }

        let activated_today = Self::count_activated_since(&leads, company_id, day_start);
        if activated_today + lead_ids.len() as u32 > daily_capacity {
            return Err(Error::QuotaExceeded {
                remaining: daily_capacity.saturating_sub(activated_today),
            });
        }

        let activated_at = Utc::now();
        for lead_id in lead_ids {
            // All ids were validated above under the same lock.
            if let Some(lead) = leads.get_mut(lead_id) {
                lead.status = LeadStatus::Activated;
                lead.activated_at = Some(activated_at);
                lead.activated_by = Some(activated_by.to_string());
            }
        }

        tracing::info!(
            company_id = %company_id,
            batch = lead_ids.len(),
            activated_today = activated_today + lead_ids.len() as u32,
            "activation batch committed"
        );

        Ok(ActivationReceipt {
            activated: lead_ids.to_vec(),
            activated_at,
            previously_activated_today: activated_today,
        })
    }
}

/// In-memory prospecting profile store
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, ProspectingProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find(&self, company_id: Uuid) -> Result<Option<ProspectingProfile>> {
        Ok(self.profiles.read().get(&company_id).cloned())
    }

    async fn upsert(&self, profile: ProspectingProfile) -> Result<()> {
        self.profiles.write().insert(profile.company_id, profile);
        Ok(())
    }
}
