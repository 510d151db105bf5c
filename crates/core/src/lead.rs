//! Lead records and the pipeline status state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline stages a lead moves through
///
/// `Activated` and `Discarded` are terminal. An external ingestion
/// collaborator creates leads as `Prospectable` (or pre-seeded), the
/// prospecting trigger moves them to `InContact`, the qualification
/// collaborator produces `Qualified`/`Available`/`Discarded`, and the
/// activation controller claims `Available` leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Waiting for outbound contact
    #[default]
    Prospectable,
    /// Outbound contact in progress
    InContact,
    /// Qualification conversation completed positively
    Qualified,
    /// Ready for a human operator to claim
    Available,
    /// Claimed by an operator (terminal)
    Activated,
    /// Rejected during qualification (terminal)
    Discarded,
}

impl LeadStatus {
    /// All six stages in funnel order
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::Prospectable,
        LeadStatus::InContact,
        LeadStatus::Qualified,
        LeadStatus::Available,
        LeadStatus::Activated,
        LeadStatus::Discarded,
    ];

    /// Get allowed transitions from the current stage
    ///
    /// `InContact -> Prospectable` is the delivery-failure revert used by
    /// the prospecting dispatcher.
    pub fn allowed_transitions(&self) -> Vec<LeadStatus> {
        match self {
            LeadStatus::Prospectable => vec![LeadStatus::InContact],
            LeadStatus::InContact => vec![
                LeadStatus::Qualified,
                LeadStatus::Available,
                LeadStatus::Discarded,
                LeadStatus::Prospectable,
            ],
            LeadStatus::Qualified => vec![LeadStatus::Available, LeadStatus::Discarded],
            LeadStatus::Available => vec![LeadStatus::Activated, LeadStatus::Discarded],
            LeadStatus::Activated => vec![],
            LeadStatus::Discarded => vec![],
        }
    }

    /// Check if transition to the target stage is allowed
    pub fn can_transition_to(&self, target: LeadStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Terminal stages accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeadStatus::Activated | LeadStatus::Discarded)
    }

    /// Human-readable stage name used in funnel reports
    pub fn display_name(&self) -> &'static str {
        match self {
            LeadStatus::Prospectable => "Prospectable",
            LeadStatus::InContact => "In Contact",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Available => "Available",
            LeadStatus::Activated => "Activated",
            LeadStatus::Discarded => "Discarded",
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Interest classification assigned during qualification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Hot,
    Warm,
    Cold,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Hot => write!(f, "hot"),
            Classification::Warm => write!(f, "warm"),
            Classification::Cold => write!(f, "cold"),
        }
    }
}

/// Urgency detected during qualification
///
/// Ordered so profile minimums can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Direction of a single conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Sent,
    Received,
}

/// A single message in the qualification conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Who sent the message (sent = automation, received = lead)
    pub direction: Direction,
    /// Message text
    pub message: String,
    /// When the message occurred
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    /// Create a new entry
    pub fn new(direction: Direction, message: impl Into<String>) -> Self {
        Self {
            direction,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an outbound entry
    pub fn sent(message: impl Into<String>) -> Self {
        Self::new(Direction::Sent, message)
    }

    /// Create an inbound entry
    pub fn received(message: impl Into<String>) -> Self {
        Self::new(Direction::Received, message)
    }
}

/// A prospect record tracked through the qualification pipeline
///
/// Owned by exactly one company for its lifetime; never physically
/// deleted. `activated_at`/`activated_by` are set iff `status` is
/// `Activated`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Unique id
    pub id: Uuid,
    /// Owning company (tenant boundary)
    pub company_id: Uuid,
    /// Prospect company name
    pub company_name: String,
    /// Market segment
    pub segment: String,
    /// City
    pub city: String,
    /// Contact channels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Pipeline stage
    pub status: LeadStatus,
    /// Qualification score (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    /// Interest classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    /// Detected urgency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    /// Main pain point captured during qualification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_pain: Option<String>,
    /// Summary of the qualification conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_summary: Option<String>,
    /// Why the lead was discarded (discarded leads only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discard_reason: Option<String>,
    /// Full conversation history
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation_history: Vec<ConversationEntry>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Set on transition to `Activated`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
    /// Operator who claimed the lead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_by: Option<String>,
}

impl Lead {
    /// Whether the lead completed the qualification conversation
    pub fn has_completed_qualification(&self) -> bool {
        matches!(
            self.status,
            LeadStatus::Qualified
                | LeadStatus::Available
                | LeadStatus::Activated
                | LeadStatus::Discarded
        )
    }
}

/// Payload for creating a lead via the ingestion interface
///
/// `status` defaults to `Prospectable` when absent from the inbound
/// payload; the qualification collaborator occasionally seeds leads in
/// later stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLead {
    pub company_id: Uuid,
    pub company_name: String,
    pub segment: String,
    pub city: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub classification: Option<Classification>,
    #[serde(default)]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub main_pain: Option<String>,
    #[serde(default)]
    pub conversation_summary: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationEntry>,
}

impl NewLead {
    /// Create a minimal payload with the required fields
    pub fn new(
        company_id: Uuid,
        company_name: impl Into<String>,
        segment: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            company_id,
            company_name: company_name.into(),
            segment: segment.into(),
            city: city.into(),
            phone: None,
            whatsapp: None,
            email: None,
            status: LeadStatus::Prospectable,
            score: None,
            classification: None,
            urgency: None,
            main_pain: None,
            conversation_summary: None,
            conversation_history: Vec::new(),
        }
    }

    /// Set the initial status
    pub fn with_status(mut self, status: LeadStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the score
    pub fn with_score(mut self, score: u8) -> Self {
        self.score = Some(score);
        self
    }

    /// Set the classification
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    /// Set the phone contact
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Materialize a `Lead` with a fresh id
    pub fn into_lead(self) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            company_id: self.company_id,
            company_name: self.company_name,
            segment: self.segment,
            city: self.city,
            phone: self.phone,
            whatsapp: self.whatsapp,
            email: self.email,
            status: self.status,
            score: self.score,
            classification: self.classification,
            urgency: self.urgency,
            main_pain: self.main_pain,
            conversation_summary: self.conversation_summary,
            discard_reason: None,
            conversation_history: self.conversation_history,
            created_at: Utc::now(),
            activated_at: None,
            activated_by: None,
        }
    }
}

/// Result of a qualification conversation, pushed by the external
/// qualification collaborator
///
/// Overwrites the named fields on the target lead; `status` must be a
/// legal transition from the lead's current stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualificationOutcome {
    /// New pipeline stage (qualified/available/discarded)
    pub status: LeadStatus,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub classification: Option<Classification>,
    #[serde(default)]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub main_pain: Option<String>,
    #[serde(default)]
    pub conversation_summary: Option<String>,
    #[serde(default)]
    pub discard_reason: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationEntry>,
}
