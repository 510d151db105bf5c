//! Prospecting dispatch
//!
//! Pulls a batch of prospectable leads, marks them in contact, and hands
//! each one to the external contact automation. Delivery failures are
//! compensated per lead: the lead's status is reverted to prospectable
//! and the batch continues.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use leadflow_core::{
    ContactInitiator, ContactRequest, Error, LeadFilter, LeadStatus, LeadStore, ProfileStore,
    Result,
};

/// Outcome of one prospecting trigger
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchSummary {
    /// Leads handed to the contact automation
    pub dispatched: Vec<Uuid>,
    /// Leads reverted to prospectable after a delivery failure
    pub reverted: Vec<Uuid>,
}

/// Moves prospectable leads into contact via the external automation
pub struct ProspectingDispatcher {
    store: Arc<dyn LeadStore>,
    profiles: Arc<dyn ProfileStore>,
    initiator: Arc<dyn ContactInitiator>,
    batch_size: usize,
}

impl ProspectingDispatcher {
    pub fn new(
        store: Arc<dyn LeadStore>,
        profiles: Arc<dyn ProfileStore>,
        initiator: Arc<dyn ContactInitiator>,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            profiles,
            initiator,
            batch_size,
        }
    }

    /// Dispatch one batch of prospectable leads for the company
    ///
    /// Requires a prospecting profile (onboarding must be complete) and a
    /// configured contact initiator. An empty batch is a successful no-op.
    pub async fn dispatch(&self, company_id: Uuid) -> Result<DispatchSummary> {
        if !self.initiator.is_ready() {
            return Err(Error::UpstreamDelivery(
                "contact automation is not configured".to_string(),
            ));
        }

        let profile = self.profiles.find(company_id).await?.ok_or_else(|| {
            Error::not_found("prospecting profile; complete onboarding first")
        })?;

        let leads = self
            .store
            .find_many(
                company_id,
                &LeadFilter::status(LeadStatus::Prospectable),
                Some(self.batch_size),
            )
            .await?;

        if leads.is_empty() {
            tracing::debug!(company_id = %company_id, "no prospectable leads");
            return Ok(DispatchSummary::default());
        }

        let mut summary = DispatchSummary::default();
        for lead in leads {
            self.store
                .update_status(company_id, lead.id, LeadStatus::InContact)
                .await?;

            let request = ContactRequest::for_lead(&lead, &profile);
            match self.initiator.initiate(&request).await {
                Ok(()) => summary.dispatched.push(lead.id),
                Err(err) => {
                    tracing::warn!(
                        lead_id = %lead.id,
                        initiator = self.initiator.name(),
                        error = %err,
                        "contact delivery failed, reverting lead"
                    );
                    // Compensating action; the revert itself should not fail
                    // unless the store has gone away entirely.
                    self.store
                        .update_status(company_id, lead.id, LeadStatus::Prospectable)
                        .await?;
                    summary.reverted.push(lead.id);
                }
            }
        }

        tracing::info!(
            company_id = %company_id,
            dispatched = summary.dispatched.len(),
            reverted = summary.reverted.len(),
            "prospecting batch complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use leadflow_core::{NewLead, ProspectingProfile};
    use leadflow_store::{InMemoryLeadStore, InMemoryProfileStore};
    use parking_lot::Mutex;

    /// Records requests; fails for lead ids listed in `fail_for`
    #[derive(Default)]
    struct RecordingInitiator {
        requests: Mutex<Vec<ContactRequest>>,
        fail_for: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl ContactInitiator for RecordingInitiator {
        async fn initiate(&self, request: &ContactRequest) -> Result<()> {
            self.requests.lock().push(request.clone());
            if self.fail_for.lock().contains(&request.lead_id) {
                return Err(Error::UpstreamDelivery("connection refused".to_string()));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct UnreadyInitiator;

    #[async_trait]
    impl ContactInitiator for UnreadyInitiator {
        async fn initiate(&self, _request: &ContactRequest) -> Result<()> {
            unreachable!("dispatcher must check readiness first")
        }

        fn name(&self) -> &str {
            "unready"
        }

        fn is_ready(&self) -> bool {
            false
        }
    }

    async fn setup(
        initiator: Arc<dyn ContactInitiator>,
    ) -> (Arc<InMemoryLeadStore>, Arc<InMemoryProfileStore>, ProspectingDispatcher) {
        let store = Arc::new(InMemoryLeadStore::new());
        let profiles = Arc::new(InMemoryProfileStore::new());
        let dispatcher =
            ProspectingDispatcher::new(store.clone(), profiles.clone(), initiator, 10);
        (store, profiles, dispatcher)
    }

    #[tokio::test]
    async fn test_requires_profile() {
        let (_, _, dispatcher) = setup(Arc::new(RecordingInitiator::default())).await;
        let err = dispatcher.dispatch(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unready_initiator_rejected_before_mutation() {
        let (store, profiles, dispatcher) = setup(Arc::new(UnreadyInitiator)).await;
        let company = Uuid::new_v4();
        profiles
            .upsert(ProspectingProfile::new(company, "Clinics", 5000.0))
            .await
            .unwrap();
        let lead = store
            .create(NewLead::new(company, "Acme", "SaaS", "Austin"))
            .await
            .unwrap();

        let err = dispatcher.dispatch(company).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamDelivery(_)));
        let lead = store.get(company, lead.id).await.unwrap().unwrap();
        assert_eq!(lead.status, LeadStatus::Prospectable);
    }

    #[tokio::test]
    async fn test_dispatch_moves_leads_in_contact() {
        let initiator = Arc::new(RecordingInitiator::default());
        let (store, profiles, dispatcher) = setup(initiator.clone()).await;
        let company = Uuid::new_v4();
        profiles
            .upsert(ProspectingProfile::new(company, "Clinics", 5000.0))
            .await
            .unwrap();
        let lead = store
            .create(
                NewLead::new(company, "Acme", "Healthcare", "Austin").with_phone("+15125550100"),
            )
            .await
            .unwrap();

        let summary = dispatcher.dispatch(company).await.unwrap();
        assert_eq!(summary.dispatched, vec![lead.id]);
        assert!(summary.reverted.is_empty());

        let updated = store.get(company, lead.id).await.unwrap().unwrap();
        assert_eq!(updated.status, LeadStatus::InContact);

        let requests = initiator.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prospecting_profile.niche, "Clinics");
        assert_eq!(requests[0].phone.as_deref(), Some("+15125550100"));
    }

    #[tokio::test]
    async fn test_delivery_failure_reverts_single_lead() {
        let initiator = Arc::new(RecordingInitiator::default());
        let (store, profiles, dispatcher) = setup(initiator.clone()).await;
        let company = Uuid::new_v4();
        profiles
            .upsert(ProspectingProfile::new(company, "Clinics", 5000.0))
            .await
            .unwrap();

        let good = store
            .create(NewLead::new(company, "Good", "SaaS", "Austin"))
            .await
            .unwrap();
        let bad = store
            .create(NewLead::new(company, "Bad", "SaaS", "Austin"))
            .await
            .unwrap();
        initiator.fail_for.lock().push(bad.id);

        let summary = dispatcher.dispatch(company).await.unwrap();
        assert_eq!(summary.dispatched, vec![good.id]);
        assert_eq!(summary.reverted, vec![bad.id]);

        assert_eq!(
            store.get(company, good.id).await.unwrap().unwrap().status,
            LeadStatus::InContact
        );
        assert_eq!(
            store.get(company, bad.id).await.unwrap().unwrap().status,
            LeadStatus::Prospectable
        );
    }

    #[tokio::test]
    async fn test_batch_size_limits_dispatch() {
        let initiator = Arc::new(RecordingInitiator::default());
        let store = Arc::new(InMemoryLeadStore::new());
        let profiles = Arc::new(InMemoryProfileStore::new());
        let dispatcher =
            ProspectingDispatcher::new(store.clone(), profiles.clone(), initiator, 3);
        let company = Uuid::new_v4();
        profiles
            .upsert(ProspectingProfile::new(company, "Clinics", 5000.0))
            .await
            .unwrap();
        for i in 0..5 {
            store
                .create(NewLead::new(company, format!("Lead {i}"), "SaaS", "Austin"))
                .await
                .unwrap();
        }

        let summary = dispatcher.dispatch(company).await.unwrap();
        assert_eq!(summary.dispatched.len(), 3);
        assert_eq!(
            store
                .count(company, &LeadFilter::status(LeadStatus::Prospectable))
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let (_, profiles, dispatcher) = setup(Arc::new(RecordingInitiator::default())).await;
        let company = Uuid::new_v4();
        profiles
            .upsert(ProspectingProfile::new(company, "Clinics", 5000.0))
            .await
            .unwrap();
        let summary = dispatcher.dispatch(company).await.unwrap();
        assert!(summary.dispatched.is_empty());
    }
}
