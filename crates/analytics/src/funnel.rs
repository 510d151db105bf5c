//! Funnel metrics engine
//!
//! Computes per-stage counts, stage-to-stage conversion rates and flags
//! under-performing transitions as drop points.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use leadflow_config::FunnelThresholds;
use leadflow_core::{LeadFilter, LeadStatus, LeadStore, Result};

/// Lead counts per pipeline stage
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StageCounts {
    pub prospectable: u64,
    pub in_contact: u64,
    pub qualified: u64,
    pub available: u64,
    pub activated: u64,
    pub discarded: u64,
}

/// Stage-to-stage conversion rates, in percent
///
/// A rate whose denominator stage is empty is exactly 0, never NaN.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelConversions {
    pub prospectable_to_contact: f64,
    pub contact_to_qualified: f64,
    pub qualified_to_available: f64,
    pub available_to_activated: f64,
}

/// A stage transition whose conversion rate fell below policy threshold
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropPoint {
    pub from: &'static str,
    pub to: &'static str,
    /// 100 - conversion rate
    pub drop_rate: f64,
    /// Signed difference between the stage counts. The stages are static
    /// snapshots rather than a cohort, so this approximates (and can
    /// overstate or even negate) the leads actually lost in transit.
    pub count: i64,
}

/// Full funnel report for one company
///
/// Response-only: serialized for the dashboard, never read back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelMetrics {
    #[serde(flatten)]
    pub counts: StageCounts,
    pub conversions: FunnelConversions,
    pub drop_points: Vec<DropPoint>,
}

fn rate(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// Compute the funnel report from current stage counts
///
/// Pure function of the counts; thresholds are policy configuration.
pub fn compute_funnel(counts: StageCounts, thresholds: &FunnelThresholds) -> FunnelMetrics {
    let started = counts.prospectable + counts.in_contact;

    let conversions = FunnelConversions {
        prospectable_to_contact: rate(counts.in_contact, started),
        contact_to_qualified: rate(counts.qualified, counts.in_contact),
        qualified_to_available: rate(counts.available, counts.qualified),
        available_to_activated: rate(counts.activated, counts.available),
    };

    let mut drop_points = Vec::new();

    if conversions.prospectable_to_contact < thresholds.prospectable_to_contact && started > 0 {
        drop_points.push(DropPoint {
            from: LeadStatus::Prospectable.display_name(),
            to: LeadStatus::InContact.display_name(),
            drop_rate: 100.0 - conversions.prospectable_to_contact,
            count: counts.prospectable as i64 - counts.in_contact as i64,
        });
    }

    if conversions.contact_to_qualified < thresholds.contact_to_qualified && counts.in_contact > 0 {
        drop_points.push(DropPoint {
            from: LeadStatus::InContact.display_name(),
            to: LeadStatus::Qualified.display_name(),
            drop_rate: 100.0 - conversions.contact_to_qualified,
            count: counts.in_contact as i64 - counts.qualified as i64,
        });
    }

    if conversions.qualified_to_available < thresholds.qualified_to_available
        && counts.qualified > 0
    {
        drop_points.push(DropPoint {
            from: LeadStatus::Qualified.display_name(),
            to: LeadStatus::Available.display_name(),
            drop_rate: 100.0 - conversions.qualified_to_available,
            count: counts.qualified as i64 - counts.available as i64,
        });
    }

    if conversions.available_to_activated < thresholds.available_to_activated
        && counts.available > 0
    {
        drop_points.push(DropPoint {
            from: LeadStatus::Available.display_name(),
            to: LeadStatus::Activated.display_name(),
            drop_rate: 100.0 - conversions.available_to_activated,
            count: counts.available as i64 - counts.activated as i64,
        });
    }

    FunnelMetrics {
        counts,
        conversions,
        drop_points,
    }
}

/// Funnel metrics engine
///
/// Fetches the six stage counts concurrently and computes the report.
pub struct FunnelEngine {
    store: Arc<dyn LeadStore>,
    thresholds: FunnelThresholds,
}

impl FunnelEngine {
    pub fn new(store: Arc<dyn LeadStore>, thresholds: FunnelThresholds) -> Self {
        Self { store, thresholds }
    }

    /// Build the funnel report for one company
    pub async fn report(&self, company_id: Uuid) -> Result<FunnelMetrics> {
        let counts = self.stage_counts(company_id).await?;
        Ok(compute_funnel(counts, &self.thresholds))
    }

    /// Fetch all six stage counts with a concurrent fan-out
    pub async fn stage_counts(&self, company_id: Uuid) -> Result<StageCounts> {
        // The filters must outlive the joined futures borrowing them
        let by_prospectable = LeadFilter::status(LeadStatus::Prospectable);
        let by_in_contact = LeadFilter::status(LeadStatus::InContact);
        let by_qualified = LeadFilter::status(LeadStatus::Qualified);
        let by_available = LeadFilter::status(LeadStatus::Available);
        let by_activated = LeadFilter::status(LeadStatus::Activated);
        let by_discarded = LeadFilter::status(LeadStatus::Discarded);

        let (prospectable, in_contact, qualified, available, activated, discarded) =
            futures::try_join!(
                self.store.count(company_id, &by_prospectable),
                self.store.count(company_id, &by_in_contact),
                self.store.count(company_id, &by_qualified),
                self.store.count(company_id, &by_available),
                self.store.count(company_id, &by_activated),
                self.store.count(company_id, &by_discarded),
            )?;

        Ok(StageCounts {
            prospectable,
            in_contact,
            qualified,
            available,
            activated,
            discarded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::NewLead;
    use leadflow_store::InMemoryLeadStore;

    fn counts(
        prospectable: u64,
        in_contact: u64,
        qualified: u64,
        available: u64,
        activated: u64,
        discarded: u64,
    ) -> StageCounts {
        StageCounts {
            prospectable,
            in_contact,
            qualified,
            available,
            activated,
            discarded,
        }
    }

    #[test]
    fn test_zero_denominators_yield_zero_rates() {
        let metrics = compute_funnel(StageCounts::default(), &FunnelThresholds::default());
        assert_eq!(metrics.conversions.prospectable_to_contact, 0.0);
        assert_eq!(metrics.conversions.contact_to_qualified, 0.0);
        assert_eq!(metrics.conversions.qualified_to_available, 0.0);
        assert_eq!(metrics.conversions.available_to_activated, 0.0);
        assert!(metrics.drop_points.is_empty());
    }

    #[test]
    fn test_conversion_rates() {
        let metrics = compute_funnel(counts(10, 10, 5, 4, 4, 0), &FunnelThresholds::default());
        assert_eq!(metrics.conversions.prospectable_to_contact, 50.0);
        assert_eq!(metrics.conversions.contact_to_qualified, 50.0);
        assert_eq!(metrics.conversions.qualified_to_available, 80.0);
        assert_eq!(metrics.conversions.available_to_activated, 100.0);
    }

    #[test]
    fn test_drop_points_require_positive_denominator() {
        // qualified stage empty: no qualified->available drop point even
        // though its rate is 0
        let metrics = compute_funnel(counts(0, 10, 0, 0, 0, 0), &FunnelThresholds::default());
        let pairs: Vec<_> = metrics
            .drop_points
            .iter()
            .map(|d| (d.from, d.to))
            .collect();
        assert!(pairs.contains(&("In Contact", "Qualified")));
        assert!(!pairs.contains(&("Qualified", "Available")));
    }

    #[test]
    fn test_drop_point_contents() {
        // 25 prospectable, 3 in contact: rate 3/28 ~ 10.7% < 50%
        let metrics = compute_funnel(counts(25, 3, 0, 0, 0, 0), &FunnelThresholds::default());
        let drop = &metrics.drop_points[0];
        assert_eq!(drop.from, "Prospectable");
        assert_eq!(drop.to, "In Contact");
        assert_eq!(drop.count, 22);
        assert!((drop.drop_rate - (100.0 - 3.0 / 28.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_drop_point_counts_are_snapshot_differences() {
        let metrics = compute_funnel(counts(0, 0, 0, 2, 1, 0), &FunnelThresholds::default());
        let drop = metrics
            .drop_points
            .iter()
            .find(|d| d.from == "Available")
            .unwrap();
        assert_eq!(drop.count, 1);

        let metrics = compute_funnel(counts(0, 10, 12, 0, 0, 0), &FunnelThresholds::default());
        assert!(metrics.drop_points.iter().all(|d| d.from != "In Contact"));
        // 12 qualified vs 0 available fires with positive count though
        assert!(metrics.drop_points.iter().any(|d| d.from == "Qualified"));
    }

    #[test]
    fn test_healthy_funnel_has_no_drop_points() {
        let metrics = compute_funnel(counts(5, 20, 15, 10, 9, 1), &FunnelThresholds::default());
        assert!(metrics.drop_points.is_empty());
    }

    #[test]
    fn test_report_serializes_with_camel_case_keys() {
        let metrics = compute_funnel(counts(25, 3, 0, 0, 0, 0), &FunnelThresholds::default());
        let json = serde_json::to_value(&metrics).unwrap();

        assert_eq!(json["prospectable"], 25);
        assert!(json["conversions"]["prospectableToContact"].is_number());
        let drop = &json["dropPoints"][0];
        assert_eq!(drop["from"], "Prospectable");
        assert_eq!(drop["to"], "In Contact");
        assert_eq!(drop["count"], 22);
        assert!(drop["dropRate"].is_number());
    }

    #[tokio::test]
    async fn test_engine_counts_scoped_to_company() {
        let store = Arc::new(InMemoryLeadStore::new());
        let company = Uuid::new_v4();
        let other = Uuid::new_v4();
        for _ in 0..3 {
            store
                .create(NewLead::new(company, "Acme", "SaaS", "Austin"))
                .await
                .unwrap();
        }
        store
            .create(NewLead::new(other, "Zenith", "Retail", "Boston"))
            .await
            .unwrap();

        let engine = FunnelEngine::new(store, FunnelThresholds::default());
        let metrics = engine.report(company).await.unwrap();
        assert_eq!(metrics.counts.prospectable, 3);
        assert_eq!(metrics.counts.in_contact, 0);
    }
}
