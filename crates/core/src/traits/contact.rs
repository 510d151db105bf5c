//! Outbound contact-initiation contract
//!
//! The prospecting dispatcher forwards each lead to an external messaging
//! automation (WhatsApp flow runner). Delivery failures are surfaced as
//! `Error::UpstreamDelivery` and compensated per lead by the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::lead::{Lead, Urgency};
use crate::profile::{ClientType, ProspectingProfile};

/// Read-only profile fields forwarded to the contact automation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub niche: String,
    pub client_type: ClientType,
    pub min_ticket: f64,
    pub needs_decision_maker: bool,
    pub min_urgency: Urgency,
}

impl From<&ProspectingProfile> for ProfileSnapshot {
    fn from(profile: &ProspectingProfile) -> Self {
        Self {
            niche: profile.niche.clone(),
            client_type: profile.client_type,
            min_ticket: profile.min_ticket,
            needs_decision_maker: profile.needs_decision_maker,
            min_urgency: profile.min_urgency,
        }
    }
}

/// Payload sent to the contact automation for one lead
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub lead_id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    pub prospecting_profile: ProfileSnapshot,
}

impl ContactRequest {
    /// Build a request for one lead from its profile
    pub fn for_lead(lead: &Lead, profile: &ProspectingProfile) -> Self {
        Self {
            lead_id: lead.id,
            company_id: lead.company_id,
            company_name: lead.company_name.clone(),
            phone: lead.phone.clone(),
            whatsapp: lead.whatsapp.clone(),
            prospecting_profile: ProfileSnapshot::from(profile),
        }
    }
}

/// Contact initiation interface
///
/// Implementations:
/// - `WebhookContactInitiator` - POSTs the request to a configured URL
#[async_trait]
pub trait ContactInitiator: Send + Sync + 'static {
    /// Hand one lead to the external automation
    async fn initiate(&self, request: &ContactRequest) -> Result<()>;

    /// Get initiator name for logging
    fn name(&self) -> &str;

    /// Whether the initiator has a usable destination configured
    ///
    /// Dispatchers check this before mutating any lead so an unconfigured
    /// webhook fails the whole trigger instead of churning status reverts.
    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::NewLead;

    #[test]
    fn test_contact_request_carries_profile_snapshot() {
        let company = Uuid::new_v4();
        let lead = NewLead::new(company, "Acme Clinics", "Healthcare", "Austin")
            .with_phone("+15125550100")
            .into_lead();
        let profile = ProspectingProfile::new(company, "Clinics", 5000.0);

        let request = ContactRequest::for_lead(&lead, &profile);
        assert_eq!(request.lead_id, lead.id);
        assert_eq!(request.company_id, company);
        assert_eq!(request.prospecting_profile.niche, "Clinics");
        assert_eq!(request.phone.as_deref(), Some("+15125550100"));
    }
}
