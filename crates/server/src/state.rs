//! Shared application state

use std::sync::Arc;

use leadflow_analytics::{ConversationEngine, FunnelEngine, InsightEngine};
use leadflow_config::Settings;
use leadflow_core::{ContactInitiator, LeadStore, ProfileStore};
use leadflow_engine::{
    ActivationController, IngestionService, ProspectingDispatcher, WebhookContactInitiator,
};
use leadflow_store::{InMemoryLeadStore, InMemoryProfileStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub leads: Arc<dyn LeadStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub ingestion: Arc<IngestionService>,
    pub activation: Arc<ActivationController>,
    pub prospecting: Arc<ProspectingDispatcher>,
    pub funnel: Arc<FunnelEngine>,
    pub conversations: Arc<ConversationEngine>,
    pub insights: Arc<InsightEngine>,
}

impl AppState {
    /// Build state over the in-memory stores and the configured
    /// webhook contact initiator
    pub fn new(settings: Settings) -> Self {
        let leads: Arc<dyn LeadStore> = Arc::new(InMemoryLeadStore::new());
        let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
        let initiator: Arc<dyn ContactInitiator> =
            Arc::new(WebhookContactInitiator::from_config(&settings.prospecting));
        Self::with_stores(settings, leads, profiles, initiator)
    }

    /// Build state over explicit collaborators (tests, alternate stores)
    pub fn with_stores(
        settings: Settings,
        leads: Arc<dyn LeadStore>,
        profiles: Arc<dyn ProfileStore>,
        initiator: Arc<dyn ContactInitiator>,
    ) -> Self {
        let ingestion = Arc::new(IngestionService::new(leads.clone()));
        let activation = Arc::new(ActivationController::new(
            leads.clone(),
            profiles.clone(),
            settings.activation.clone(),
        ));
        let prospecting = Arc::new(ProspectingDispatcher::new(
            leads.clone(),
            profiles.clone(),
            initiator,
            settings.prospecting.batch_size,
        ));
        let funnel = Arc::new(FunnelEngine::new(leads.clone(), settings.funnel.clone()));
        let conversations = Arc::new(ConversationEngine::new(leads.clone()));
        let insights = Arc::new(InsightEngine::new(
            leads.clone(),
            settings.insights.clone(),
        ));

        Self {
            settings: Arc::new(settings),
            leads,
            profiles,
            ingestion,
            activation,
            prospecting,
            funnel,
            conversations,
            insights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_default_settings() {
        let state = AppState::new(Settings::default());
        assert_eq!(state.settings.prospecting.batch_size, 10);
    }
}
