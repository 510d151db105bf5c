//! Analytics threshold configuration
//!
//! The funnel and insight engines are heuristic threshold systems, not
//! statistical models. The constants here are fixed design policy with no
//! documented derivation; they are exposed as configuration so operators
//! can tune them, with defaults equal to the shipped policy values.

use serde::{Deserialize, Serialize};

/// Drop-point thresholds for the four funnel transitions (percent)
///
/// A transition is flagged as a drop point when its conversion rate falls
/// below the threshold and the denominator stage has at least one lead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FunnelThresholds {
    /// prospectable -> in_contact
    #[serde(default = "default_contact_threshold")]
    pub prospectable_to_contact: f64,

    /// in_contact -> qualified
    #[serde(default = "default_qualified_threshold")]
    pub contact_to_qualified: f64,

    /// qualified -> available
    #[serde(default = "default_available_threshold")]
    pub qualified_to_available: f64,

    /// available -> activated
    #[serde(default = "default_activated_threshold")]
    pub available_to_activated: f64,
}

fn default_contact_threshold() -> f64 {
    50.0
}
fn default_qualified_threshold() -> f64 {
    40.0
}
fn default_available_threshold() -> f64 {
    60.0
}
fn default_activated_threshold() -> f64 {
    70.0
}

impl Default for FunnelThresholds {
    fn default() -> Self {
        Self {
            prospectable_to_contact: default_contact_threshold(),
            contact_to_qualified: default_qualified_threshold(),
            qualified_to_available: default_available_threshold(),
            available_to_activated: default_activated_threshold(),
        }
    }
}

/// Thresholds driving the dashboard insight rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InsightThresholds {
    /// Qualification efficiency (%) at or above which the success insight fires
    #[serde(default = "default_high_efficiency")]
    pub high_efficiency_pct: f64,

    /// Efficiency (%) below which the warning fires
    #[serde(default = "default_low_efficiency")]
    pub low_efficiency_pct: f64,

    /// Processed-lead count required before efficiency/discard warnings fire
    #[serde(default = "default_min_processed")]
    pub min_processed_for_warnings: u64,

    /// Prospectable backlog that signals a contact-stage bottleneck
    #[serde(default = "default_contact_backlog")]
    pub contact_bottleneck_backlog: u64,

    /// In-contact count below which the backlog is considered stuck
    #[serde(default = "default_contact_floor")]
    pub contact_bottleneck_floor: u64,

    /// In-contact count above which qualification conversion is checked
    #[serde(default = "default_qualification_volume")]
    pub qualification_check_volume: u64,

    /// Qualified-to-in-contact ratio below which the conversion warning fires
    #[serde(default = "default_qualification_ratio")]
    pub qualification_ratio: f64,

    /// Available-lead count that makes an idle day an activation opportunity
    #[serde(default = "default_opportunity_backlog")]
    pub activation_opportunity_backlog: u64,

    /// Prospectable volume for the automation-scale rules
    #[serde(default = "default_scale_prospectable")]
    pub scale_prospectable_volume: u64,

    /// In-qualification volume for the high-automation warning
    #[serde(default = "default_scale_qualification")]
    pub scale_qualification_volume: u64,

    /// Total-activated count below which high automation is flagged
    #[serde(default = "default_scale_activated_floor")]
    pub scale_activated_floor: u64,

    /// Prospectable volume for the scalability success insight
    #[serde(default = "default_scalability_prospectable")]
    pub scalability_prospectable_volume: u64,

    /// In-qualification volume for the scalability success insight
    #[serde(default = "default_scalability_qualification")]
    pub scalability_qualification_volume: u64,

    /// Today's activation rate (%) below which the info insight fires
    #[serde(default = "default_activation_rate")]
    pub low_activation_rate_pct: f64,

    /// Scored-lead count required before average-score insights fire
    #[serde(default = "default_min_scored")]
    pub min_scored_leads: u64,

    /// Scored-lead count required before the low-score warning fires
    #[serde(default = "default_min_scored_warning")]
    pub min_scored_for_warning: u64,

    /// Average score at or above which the success insight fires
    #[serde(default = "default_high_score")]
    pub high_avg_score: f64,

    /// Average score below which the warning fires
    #[serde(default = "default_low_score")]
    pub low_avg_score: f64,

    /// Sample cap for the average-score computation
    #[serde(default = "default_score_sample")]
    pub score_sample_size: usize,

    /// Discard rate (%) above which the elevated-discard warning fires
    #[serde(default = "default_discard_rate")]
    pub high_discard_rate_pct: f64,

    /// Maximum insights returned per report
    #[serde(default = "default_max_insights")]
    pub max_insights: usize,
}

fn default_high_efficiency() -> f64 {
    70.0
}
fn default_low_efficiency() -> f64 {
    50.0
}
fn default_min_processed() -> u64 {
    10
}
fn default_contact_backlog() -> u64 {
    20
}
fn default_contact_floor() -> u64 {
    5
}
fn default_qualification_volume() -> u64 {
    10
}
fn default_qualification_ratio() -> f64 {
    0.3
}
fn default_opportunity_backlog() -> u64 {
    10
}
fn default_scale_prospectable() -> u64 {
    50
}
fn default_scale_qualification() -> u64 {
    20
}
fn default_scale_activated_floor() -> u64 {
    5
}
fn default_scalability_prospectable() -> u64 {
    30
}
fn default_scalability_qualification() -> u64 {
    10
}
fn default_activation_rate() -> f64 {
    30.0
}
fn default_min_scored() -> u64 {
    5
}
fn default_min_scored_warning() -> u64 {
    10
}
fn default_high_score() -> f64 {
    70.0
}
fn default_low_score() -> f64 {
    50.0
}
fn default_score_sample() -> usize {
    100
}
fn default_discard_rate() -> f64 {
    50.0
}
fn default_max_insights() -> usize {
    5
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            high_efficiency_pct: default_high_efficiency(),
            low_efficiency_pct: default_low_efficiency(),
            min_processed_for_warnings: default_min_processed(),
            contact_bottleneck_backlog: default_contact_backlog(),
            contact_bottleneck_floor: default_contact_floor(),
            qualification_check_volume: default_qualification_volume(),
            qualification_ratio: default_qualification_ratio(),
            activation_opportunity_backlog: default_opportunity_backlog(),
            scale_prospectable_volume: default_scale_prospectable(),
            scale_qualification_volume: default_scale_qualification(),
            scale_activated_floor: default_scale_activated_floor(),
            scalability_prospectable_volume: default_scalability_prospectable(),
            scalability_qualification_volume: default_scalability_qualification(),
            low_activation_rate_pct: default_activation_rate(),
            min_scored_leads: default_min_scored(),
            min_scored_for_warning: default_min_scored_warning(),
            high_avg_score: default_high_score(),
            low_avg_score: default_low_score(),
            score_sample_size: default_score_sample(),
            high_discard_rate_pct: default_discard_rate(),
            max_insights: default_max_insights(),
        }
    }
}
