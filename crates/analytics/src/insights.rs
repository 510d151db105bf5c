//! Dashboard insight generator
//!
//! A rules engine over the current pipeline snapshot. The rules are an
//! ordered table of independent predicates evaluated in fixed sequence;
//! the emitted list is truncated to `max_insights`, so emission order is
//! the only priority mechanism. Thresholds are policy configuration with
//! defaults matching the shipped heuristics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use leadflow_config::InsightThresholds;
use leadflow_core::{time, LeadFilter, LeadStatus, LeadStore, Result};

/// Insight severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Success,
    Warning,
    Info,
    Alert,
}

/// A single operational insight shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl Insight {
    fn new(kind: InsightType, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            action: None,
            action_url: None,
        }
    }

    /// Success insight
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(InsightType::Success, title, message)
    }

    /// Warning insight
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(InsightType::Warning, title, message)
    }

    /// Info insight
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(InsightType::Info, title, message)
    }

    /// Alert insight
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(InsightType::Alert, title, message)
    }

    /// Attach a suggested action
    pub fn with_action(mut self, action: impl Into<String>, url: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self.action_url = Some(url.into());
        self
    }
}

/// Pipeline snapshot the rules evaluate against
#[derive(Debug, Clone, Default)]
pub struct InsightSnapshot {
    pub prospectable: u64,
    pub in_contact: u64,
    pub qualified: u64,
    pub available: u64,
    /// Leads activated since the start of the current local day
    pub activated_today: u64,
    pub total_activated: u64,
    pub discarded: u64,
    /// Count of leads carrying a score, across all stages
    pub scored_leads: u64,
    /// Sampled scores (up to the configured sample size)
    pub sampled_scores: Vec<u8>,
}

impl InsightSnapshot {
    /// Leads currently in the qualification conversation
    pub fn in_qualification(&self) -> u64 {
        self.in_contact + self.qualified
    }

    /// Leads that finished processing (activated or discarded)
    pub fn total_processed(&self) -> u64 {
        self.total_activated + self.discarded
    }

    fn avg_sampled_score(&self) -> Option<f64> {
        if self.sampled_scores.is_empty() {
            return None;
        }
        let sum: u64 = self.sampled_scores.iter().map(|s| u64::from(*s)).sum();
        Some(sum as f64 / self.sampled_scores.len() as f64)
    }
}

type InsightRule = fn(&InsightSnapshot, &InsightThresholds) -> Option<Insight>;

/// Rule table, in emission (priority) order
const RULES: &[InsightRule] = &[
    rule_high_efficiency,
    rule_low_efficiency,
    rule_contact_bottleneck,
    rule_low_qualification_conversion,
    rule_activation_opportunity,
    rule_high_automation_low_conversion,
    rule_good_scalability,
    rule_leads_ready,
    rule_low_activation_rate_today,
    rule_high_avg_score,
    rule_low_avg_score,
    rule_no_leads_in_process,
    rule_elevated_discard_rate,
];

fn rule_high_efficiency(s: &InsightSnapshot, t: &InsightThresholds) -> Option<Insight> {
    let processed = s.total_processed();
    if processed == 0 {
        return None;
    }
    let efficiency = s.total_activated as f64 / processed as f64 * 100.0;
    if efficiency >= t.high_efficiency_pct {
        return Some(Insight::success(
            "High AI efficiency",
            format!(
                "{efficiency:.0}% of processed leads were qualified. The automation is performing well."
            ),
        ));
    }
    None
}

fn rule_low_efficiency(s: &InsightSnapshot, t: &InsightThresholds) -> Option<Insight> {
    let processed = s.total_processed();
    if processed == 0 {
        return None;
    }
    let efficiency = s.total_activated as f64 / processed as f64 * 100.0;
    if efficiency < t.low_efficiency_pct && processed > t.min_processed_for_warnings {
        return Some(
            Insight::warning(
                "AI efficiency below expectation",
                format!("{efficiency:.0}% qualification rate. Consider adjusting the prospecting criteria."),
            )
            .with_action("View funnel", "/funnel"),
        );
    }
    None
}

fn rule_contact_bottleneck(s: &InsightSnapshot, t: &InsightThresholds) -> Option<Insight> {
    if s.prospectable > t.contact_bottleneck_backlog && s.in_contact < t.contact_bottleneck_floor {
        return Some(
            Insight::warning(
                "Bottleneck at the contact stage",
                format!(
                    "{} leads waiting but only {} in contact. The automation may be overloaded or converting poorly on first touch.",
                    s.prospectable, s.in_contact
                ),
            )
            .with_action("View funnel", "/funnel"),
        );
    }
    None
}

fn rule_low_qualification_conversion(s: &InsightSnapshot, t: &InsightThresholds) -> Option<Insight> {
    if s.in_contact > t.qualification_check_volume
        && (s.qualified as f64) < s.in_contact as f64 * t.qualification_ratio
    {
        let conversion = s.qualified as f64 / s.in_contact as f64 * 100.0;
        return Some(
            Insight::warning(
                "Low qualification conversion",
                format!(
                    "{conversion:.0}% of leads in contact are being qualified. The conversation flow may need adjustment."
                ),
            )
            .with_action("View reports", "/reports"),
        );
    }
    None
}

fn rule_activation_opportunity(s: &InsightSnapshot, t: &InsightThresholds) -> Option<Insight> {
    if s.available > t.activation_opportunity_backlog && s.activated_today == 0 {
        return Some(
            Insight::info(
                "Activation opportunity",
                format!(
                    "{} qualified leads waiting. Activate them to speed up the sales process.",
                    s.available
                ),
            )
            .with_action("View leads", "/leads"),
        );
    }
    None
}

fn rule_high_automation_low_conversion(
    s: &InsightSnapshot,
    t: &InsightThresholds,
) -> Option<Insight> {
    if s.prospectable > t.scale_prospectable_volume
        && s.in_qualification() > t.scale_qualification_volume
        && s.total_activated < t.scale_activated_floor
    {
        return Some(
            Insight::warning(
                "High automation, low conversion",
                "Many leads being processed but few activated. There may be a commercial bottleneck or weak qualification.",
            )
            .with_action("View reports", "/reports"),
        );
    }
    None
}

fn rule_good_scalability(s: &InsightSnapshot, t: &InsightThresholds) -> Option<Insight> {
    if s.prospectable > t.scalability_prospectable_volume
        && s.in_qualification() > t.scalability_qualification_volume
    {
        return Some(Insight::success(
            "Good operational scalability",
            format!(
                "{} leads in simultaneous processing. The automation is operating at scale.",
                s.prospectable + s.in_qualification()
            ),
        ));
    }
    None
}

fn rule_leads_ready(s: &InsightSnapshot, _t: &InsightThresholds) -> Option<Insight> {
    if s.available > 0 {
        return Some(
            Insight::success(
                format!("{} lead(s) ready for activation", s.available),
                "Qualified leads are waiting for your contact.",
            )
            .with_action("Activate now", "/leads"),
        );
    }
    None
}

fn rule_low_activation_rate_today(s: &InsightSnapshot, t: &InsightThresholds) -> Option<Insight> {
    if s.activated_today > 0 && s.available > 0 {
        let rate = s.activated_today as f64 / (s.available + s.activated_today) as f64 * 100.0;
        if rate < t.low_activation_rate_pct {
            return Some(Insight::info(
                format!("Activation rate today: {rate:.0}%"),
                "There are still leads available for activation.",
            ));
        }
    }
    None
}

fn rule_high_avg_score(s: &InsightSnapshot, t: &InsightThresholds) -> Option<Insight> {
    if s.scored_leads > t.min_scored_leads {
        if let Some(avg) = s.avg_sampled_score() {
            if avg >= t.high_avg_score {
                return Some(Insight::success(
                    "High average score",
                    format!("Average score of {avg:.0} indicates good quality of qualified leads."),
                ));
            }
        }
    }
    None
}

fn rule_low_avg_score(s: &InsightSnapshot, t: &InsightThresholds) -> Option<Insight> {
    if s.scored_leads > t.min_scored_leads {
        if let Some(avg) = s.avg_sampled_score() {
            if avg < t.low_avg_score && s.scored_leads > t.min_scored_for_warning {
                return Some(
                    Insight::warning(
                        "Low average score",
                        format!("Average score of {avg:.0} suggests qualification needs improvement."),
                    )
                    .with_action("View reports", "/reports"),
                );
            }
        }
    }
    None
}

fn rule_no_leads_in_process(s: &InsightSnapshot, _t: &InsightThresholds) -> Option<Insight> {
    if s.available == 0 && s.in_qualification() == 0 && s.prospectable == 0 && s.total_activated == 0
    {
        return Some(Insight::alert(
            "No leads in process",
            "System without activity. Check the prospecting integration.",
        ));
    }
    None
}

fn rule_elevated_discard_rate(s: &InsightSnapshot, t: &InsightThresholds) -> Option<Insight> {
    let processed = s.total_processed();
    if s.discarded > 0 && processed > t.min_processed_for_warnings {
        let discard_rate = s.discarded as f64 / processed as f64 * 100.0;
        if discard_rate > t.high_discard_rate_pct {
            return Some(
                Insight::warning(
                    "Elevated discard rate",
                    format!(
                        "{discard_rate:.0}% of leads were discarded. Review the qualification criteria."
                    ),
                )
                .with_action("View settings", "/settings"),
            );
        }
    }
    None
}

/// Evaluate every rule in order and keep the first `max_insights`
pub fn generate_insights(snapshot: &InsightSnapshot, thresholds: &InsightThresholds) -> Vec<Insight> {
    let mut insights: Vec<Insight> = RULES
        .iter()
        .filter_map(|rule| rule(snapshot, thresholds))
        .collect();
    insights.truncate(thresholds.max_insights);
    insights
}

/// Insight generation engine
pub struct InsightEngine {
    store: Arc<dyn LeadStore>,
    thresholds: InsightThresholds,
}

impl InsightEngine {
    pub fn new(store: Arc<dyn LeadStore>, thresholds: InsightThresholds) -> Self {
        Self { store, thresholds }
    }

    /// Build the insight list for one company
    pub async fn report(&self, company_id: Uuid) -> Result<Vec<Insight>> {
        let snapshot = self.snapshot(company_id).await?;
        let insights = generate_insights(&snapshot, &self.thresholds);
        tracing::debug!(company_id = %company_id, insights = insights.len(), "insights generated");
        Ok(insights)
    }

    /// Fetch the pipeline snapshot with a concurrent fan-out
    pub async fn snapshot(&self, company_id: Uuid) -> Result<InsightSnapshot> {
        let day_start = time::local_day_start();

        // The filters must outlive the joined futures borrowing them
        let by_prospectable = LeadFilter::status(LeadStatus::Prospectable);
        let by_in_contact = LeadFilter::status(LeadStatus::InContact);
        let by_qualified = LeadFilter::status(LeadStatus::Qualified);
        let by_available = LeadFilter::status(LeadStatus::Available);
        let by_activated_today = LeadFilter::status(LeadStatus::Activated).activated_since(day_start);
        let by_activated = LeadFilter::status(LeadStatus::Activated);
        let by_discarded = LeadFilter::status(LeadStatus::Discarded);
        let by_scored = LeadFilter::scored();

        let (prospectable, in_contact, qualified, available, activated_today, total_activated, discarded, scored_leads) =
            futures::try_join!(
                self.store.count(company_id, &by_prospectable),
                self.store.count(company_id, &by_in_contact),
                self.store.count(company_id, &by_qualified),
                self.store.count(company_id, &by_available),
                self.store.count(company_id, &by_activated_today),
                self.store.count(company_id, &by_activated),
                self.store.count(company_id, &by_discarded),
                self.store.count(company_id, &by_scored),
            )?;

        // The score sample is only consumed once enough leads carry one
        let sampled_scores = if scored_leads > self.thresholds.min_scored_leads {
            self.store
                .find_many(company_id, &by_scored, Some(self.thresholds.score_sample_size))
                .await?
                .into_iter()
                .filter_map(|lead| lead.score)
                .collect()
        } else {
            Vec::new()
        };

        Ok(InsightSnapshot {
            prospectable,
            in_contact,
            qualified,
            available,
            activated_today,
            total_activated,
            discarded,
            scored_leads,
            sampled_scores,
        })
    }
}
