//! Prospecting profile (ICP) types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lead::Urgency;

/// Target client type for prospecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    Individual,
    #[default]
    Business,
    Both,
}

/// Ideal customer profile, one per company
///
/// Read-only input to the prospecting trigger and the daily activation
/// quota check; the analytics core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectingProfile {
    /// Owning company
    pub company_id: Uuid,
    /// Target niche (e.g. "Clinics")
    pub niche: String,
    /// Target client type
    #[serde(default)]
    pub client_type: ClientType,
    /// Target cities
    #[serde(default)]
    pub target_cities: Vec<String>,
    /// Minimum acceptable deal value
    pub min_ticket: f64,
    /// Whether a decision maker must be on the call
    #[serde(default)]
    pub needs_decision_maker: bool,
    /// Minimum acceptable urgency
    #[serde(default = "default_min_urgency")]
    pub min_urgency: Urgency,
    /// Daily activation capacity for the company
    #[serde(default = "default_daily_capacity")]
    pub daily_capacity: u32,
}

fn default_min_urgency() -> Urgency {
    Urgency::Low
}

fn default_daily_capacity() -> u32 {
    10
}

impl ProspectingProfile {
    /// Create a profile with defaults for the optional targeting fields
    pub fn new(company_id: Uuid, niche: impl Into<String>, min_ticket: f64) -> Self {
        Self {
            company_id,
            niche: niche.into(),
            client_type: ClientType::default(),
            target_cities: Vec::new(),
            min_ticket,
            needs_decision_maker: false,
            min_urgency: default_min_urgency(),
            daily_capacity: default_daily_capacity(),
        }
    }

    /// Set the daily activation capacity
    pub fn with_daily_capacity(mut self, capacity: u32) -> Self {
        self.daily_capacity = capacity;
        self
    }

    /// Set the target cities
    pub fn with_target_cities(mut self, cities: Vec<String>) -> Self {
        self.target_cities = cities;
        self
    }
}
