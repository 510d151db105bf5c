//! Persisted-store contracts for leads and prospecting profiles
//!
//! The store is shared across tenants; every operation takes an explicit
//! `company_id` and must be scoped by it. Batch activation is a single
//! atomic conditional update: ownership/state validation and the daily
//! quota re-check happen inside the same critical section as the
//! mutation, so concurrent activation requests cannot overrun the quota.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::lead::{Lead, LeadStatus, NewLead, QualificationOutcome};
use crate::profile::ProspectingProfile;

/// Filter for lead count/find queries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadFilter {
    /// Match a single status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    /// Match any of these statuses (ignored when `status` is set)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<LeadStatus>,
    /// Only leads with a score present
    #[serde(default)]
    pub scored: bool,
    /// Only leads activated at or after this instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_since: Option<DateTime<Utc>>,
}

impl LeadFilter {
    /// Filter by a single status
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Filter by a set of statuses
    pub fn statuses(statuses: impl Into<Vec<LeadStatus>>) -> Self {
        Self {
            statuses: statuses.into(),
            ..Self::default()
        }
    }

    /// Only scored leads
    pub fn scored() -> Self {
        Self {
            scored: true,
            ..Self::default()
        }
    }

    /// Restrict to leads activated at or after `since`
    pub fn activated_since(mut self, since: DateTime<Utc>) -> Self {
        self.activated_since = Some(since);
        self
    }

    /// Whether a lead matches this filter
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(status) = self.status {
            if lead.status != status {
                return false;
            }
        } else if !self.statuses.is_empty() && !self.statuses.contains(&lead.status) {
            return false;
        }
        if self.scored && lead.score.is_none() {
            return false;
        }
        if let Some(since) = self.activated_since {
            match lead.activated_at {
                Some(at) if at >= since => {}
                _ => return false,
            }
        }
        true
    }
}

/// Receipt for a committed activation batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationReceipt {
    /// Ids activated in this batch
    pub activated: Vec<Uuid>,
    /// Timestamp written to every lead in the batch
    pub activated_at: DateTime<Utc>,
    /// Activations already committed today before this batch
    pub previously_activated_today: u32,
}

/// Persisted lead store
///
/// Implementations:
/// - `InMemoryLeadStore` - default, `RwLock<HashMap>` keyed by lead id
#[async_trait]
pub trait LeadStore: Send + Sync + 'static {
    /// Create a lead from an ingestion payload
    async fn create(&self, lead: NewLead) -> Result<Lead>;

    /// Fetch a single lead scoped by company
    async fn get(&self, company_id: Uuid, lead_id: Uuid) -> Result<Option<Lead>>;

    /// Count leads matching the filter
    async fn count(&self, company_id: Uuid, filter: &LeadFilter) -> Result<u64>;

    /// Fetch leads matching the filter, oldest first
    async fn find_many(
        &self,
        company_id: Uuid,
        filter: &LeadFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Lead>>;

    /// Move a lead to a new stage
    ///
    /// Fails with `Conflict` when the transition is not allowed by the
    /// status state machine.
    async fn update_status(
        &self,
        company_id: Uuid,
        lead_id: Uuid,
        new_status: LeadStatus,
    ) -> Result<Lead>;

    /// Overwrite qualification fields on an existing lead
    async fn apply_qualification(
        &self,
        company_id: Uuid,
        lead_id: Uuid,
        outcome: QualificationOutcome,
    ) -> Result<Lead>;

    /// Atomically activate a batch of available leads
    ///
    /// All-or-nothing: every id must reference an `Available` lead of the
    /// company, and `activated_today + batch` must stay within
    /// `daily_capacity` (activations counted from `day_start`). No lead
    /// is mutated when any check fails.
    async fn activate_batch(
        &self,
        company_id: Uuid,
        lead_ids: &[Uuid],
        activated_by: &str,
        daily_capacity: u32,
        day_start: DateTime<Utc>,
    ) -> Result<ActivationReceipt>;
}

/// Prospecting profile store
#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    /// Fetch the company's profile, if onboarding created one
    async fn find(&self, company_id: Uuid) -> Result<Option<ProspectingProfile>>;

    /// Create or replace the company's profile
    async fn upsert(&self, profile: ProspectingProfile) -> Result<()>;
}
