//! Activation controller
//!
//! Claims available leads for a human operator, consuming daily
//! capacity. The batch is all-or-nothing; the ownership/state checks and
//! the quota re-check run atomically inside the store's
//! `activate_batch`, so concurrent requests cannot overrun the quota.

use std::sync::Arc;

use uuid::Uuid;

use leadflow_config::ActivationConfig;
use leadflow_core::{time, ActivationReceipt, Error, LeadStore, ProfileStore, Result};

/// Enforces the daily activation quota and performs the
/// available -> activated transition per batch
pub struct ActivationController {
    store: Arc<dyn LeadStore>,
    profiles: Arc<dyn ProfileStore>,
    config: ActivationConfig,
}

impl ActivationController {
    pub fn new(
        store: Arc<dyn LeadStore>,
        profiles: Arc<dyn ProfileStore>,
        config: ActivationConfig,
    ) -> Self {
        Self {
            store,
            profiles,
            config,
        }
    }

    /// Activate a batch of leads for the operator
    ///
    /// Daily capacity comes from the company's prospecting profile,
    /// falling back to the configured default when onboarding has not
    /// created one yet.
    pub async fn activate(
        &self,
        company_id: Uuid,
        lead_ids: &[Uuid],
        operator: &str,
    ) -> Result<ActivationReceipt> {
        if lead_ids.is_empty() {
            return Err(Error::validation("lead_ids", "at least one lead id is required"));
        }
        if operator.is_empty() {
            return Err(Error::validation("operator", "operator identity is required"));
        }

        // A duplicated id would be counted twice against the quota
        let mut unique = lead_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();
        if unique.len() != lead_ids.len() {
            return Err(Error::validation("lead_ids", "duplicate lead ids in batch"));
        }

        let daily_capacity = self
            .profiles
            .find(company_id)
            .await?
            .map(|profile| profile.daily_capacity)
            .unwrap_or(self.config.default_daily_capacity);

        let receipt = self
            .store
            .activate_batch(
                company_id,
                lead_ids,
                operator,
                daily_capacity,
                time::local_day_start(),
            )
            .await?;

        tracing::info!(
            company_id = %company_id,
            operator = operator,
            activated = receipt.activated.len(),
            "leads activated"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::{LeadStatus, NewLead, ProspectingProfile};
    use leadflow_store::{InMemoryLeadStore, InMemoryProfileStore};

    async fn setup() -> (Arc<InMemoryLeadStore>, Arc<InMemoryProfileStore>, ActivationController) {
        let store = Arc::new(InMemoryLeadStore::new());
        let profiles = Arc::new(InMemoryProfileStore::new());
        let controller = ActivationController::new(
            store.clone(),
            profiles.clone(),
            ActivationConfig::default(),
        );
        (store, profiles, controller)
    }

    async fn available_lead(store: &InMemoryLeadStore, company: Uuid) -> Uuid {
        store
            .create(
                NewLead::new(company, "Acme", "SaaS", "Austin").with_status(LeadStatus::Available),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let (_, _, controller) = setup().await;
        let err = controller
            .activate(Uuid::new_v4(), &[], "operator-1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected() {
        let (store, _, controller) = setup().await;
        let company = Uuid::new_v4();
        let id = available_lead(&store, company).await;

        let err = controller
            .activate(company, &[id, id], "operator-1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));

        let lead = store.get(company, id).await.unwrap().unwrap();
        assert_eq!(lead.status, LeadStatus::Available);
    }

    #[tokio::test]
    async fn test_uses_profile_capacity() {
        let (store, profiles, controller) = setup().await;
        let company = Uuid::new_v4();
        profiles
            .upsert(ProspectingProfile::new(company, "Clinics", 5000.0).with_daily_capacity(1))
            .await
            .unwrap();

        let first = available_lead(&store, company).await;
        let second = available_lead(&store, company).await;

        controller
            .activate(company, &[first], "operator-1")
            .await
            .unwrap();
        let err = controller
            .activate(company, &[second], "operator-1")
            .await
            .unwrap_err();
        match err {
            Error::QuotaExceeded { remaining } => assert_eq!(remaining, 0),
            other => panic!("expected quota error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_default_capacity_without_profile() {
        let (store, _, controller) = setup().await;
        let company = Uuid::new_v4();
        let batch: Vec<Uuid> = {
            let mut ids = Vec::new();
            for _ in 0..10 {
                ids.push(available_lead(&store, company).await);
            }
            ids
        };

        // Default capacity is 10: the full batch fits exactly
        let receipt = controller
            .activate(company, &batch, "operator-1")
            .await
            .unwrap();
        assert_eq!(receipt.activated.len(), 10);

        let extra = available_lead(&store, company).await;
        let err = controller
            .activate(company, &[extra], "operator-1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { remaining: 0 }));
    }

    #[tokio::test]
    async fn test_operator_recorded() {
        let (store, _, controller) = setup().await;
        let company = Uuid::new_v4();
        let id = available_lead(&store, company).await;

        controller
            .activate(company, &[id], "ana@example.com")
            .await
            .unwrap();
        let lead = store.get(company, id).await.unwrap().unwrap();
        assert_eq!(lead.activated_by.as_deref(), Some("ana@example.com"));
        assert!(lead.activated_at.is_some());
    }
}
