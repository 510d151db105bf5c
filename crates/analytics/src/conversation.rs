//! Conversation analysis engine
//!
//! Aggregates classification and score data across leads that completed
//! the qualification conversation, and ranks discard reasons by
//! frequency.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use leadflow_core::{Classification, Lead, LeadFilter, LeadStatus, LeadStore, Result};

/// Lead counts per interest classification
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestBreakdown {
    pub hot: u64,
    pub warm: u64,
    pub cold: u64,
    pub unclassified: u64,
}

/// One discard reason and its share of all conversations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscardReason {
    pub reason: String,
    pub count: u64,
    /// Percentage of total conversations, not of discarded leads
    pub percentage: f64,
}

/// Aggregate conversation statistics for one company
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAnalysis {
    pub total_conversations: u64,
    pub by_interest: InterestBreakdown,
    /// Mean score over scored leads, rounded; 0 when nothing is scored
    pub avg_score: u32,
    /// Top 5 discard reasons by count
    pub top_reasons: Vec<DiscardReason>,
}

/// Aggregate a set of post-qualification leads
///
/// A lead without a discard reason contributes to `total_conversations`
/// but to neither side of the `top_reasons` percentages.
pub fn analyze_conversations(leads: &[Lead]) -> ConversationAnalysis {
    let total_conversations = leads.len() as u64;

    let mut by_interest = InterestBreakdown::default();
    for lead in leads {
        match lead.classification {
            Some(Classification::Hot) => by_interest.hot += 1,
            Some(Classification::Warm) => by_interest.warm += 1,
            Some(Classification::Cold) => by_interest.cold += 1,
            None => by_interest.unclassified += 1,
        }
    }

    let scores: Vec<u32> = leads
        .iter()
        .filter_map(|lead| lead.score.map(u32::from))
        .collect();
    let avg_score = if scores.is_empty() {
        0
    } else {
        (scores.iter().sum::<u32>() as f64 / scores.len() as f64).round() as u32
    };

    let mut reason_counts: HashMap<&str, u64> = HashMap::new();
    for lead in leads {
        if let Some(reason) = lead.discard_reason.as_deref() {
            *reason_counts.entry(reason).or_insert(0) += 1;
        }
    }

    let mut top_reasons: Vec<DiscardReason> = reason_counts
        .into_iter()
        .map(|(reason, count)| DiscardReason {
            reason: reason.to_string(),
            count,
            percentage: if total_conversations > 0 {
                count as f64 / total_conversations as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    // Count descending, then alphabetical so equal counts order stably
    top_reasons.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.reason.cmp(&b.reason)));
    top_reasons.truncate(5);

    ConversationAnalysis {
        total_conversations,
        by_interest,
        avg_score,
        top_reasons,
    }
}

/// Conversation analysis engine
pub struct ConversationEngine {
    store: Arc<dyn LeadStore>,
}

impl ConversationEngine {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self { store }
    }

    /// Build the conversation report for one company
    pub async fn report(&self, company_id: Uuid) -> Result<ConversationAnalysis> {
        let filter = LeadFilter::statuses(vec![
            LeadStatus::Qualified,
            LeadStatus::Available,
            LeadStatus::Activated,
            LeadStatus::Discarded,
        ]);
        let leads = self.store.find_many(company_id, &filter, None).await?;
        tracing::debug!(company_id = %company_id, conversations = leads.len(), "conversation analysis");
        Ok(analyze_conversations(&leads))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::{NewLead, QualificationOutcome, Urgency};
    use leadflow_store::InMemoryLeadStore;

    fn lead(status: LeadStatus) -> Lead {
        NewLead::new(Uuid::new_v4(), "Acme", "SaaS", "Austin")
            .with_status(status)
            .into_lead()
    }

    fn scored_lead(status: LeadStatus, score: u8) -> Lead {
        let mut l = lead(status);
        l.score = Some(score);
        l
    }

    fn discarded_for(reason: &str) -> Lead {
        let mut l = lead(LeadStatus::Discarded);
        l.discard_reason = Some(reason.to_string());
        l
    }

    #[test]
    fn test_empty_set() {
        let analysis = analyze_conversations(&[]);
        assert_eq!(analysis.total_conversations, 0);
        assert_eq!(analysis.avg_score, 0);
        assert!(analysis.top_reasons.is_empty());
    }

    #[test]
    fn test_avg_score_mean_and_rounding() {
        let leads = vec![
            scored_lead(LeadStatus::Available, 80),
            scored_lead(LeadStatus::Qualified, 60),
            lead(LeadStatus::Discarded),
        ];
        let analysis = analyze_conversations(&leads);
        assert_eq!(analysis.avg_score, 70);
        assert_eq!(analysis.total_conversations, 3);
    }

    #[test]
    fn test_interest_breakdown_counts_unclassified() {
        let mut hot = lead(LeadStatus::Available);
        hot.classification = Some(Classification::Hot);
        let mut warm = lead(LeadStatus::Qualified);
        warm.classification = Some(Classification::Warm);
        let leads = vec![hot, warm, lead(LeadStatus::Discarded)];

        let analysis = analyze_conversations(&leads);
        assert_eq!(analysis.by_interest.hot, 1);
        assert_eq!(analysis.by_interest.warm, 1);
        assert_eq!(analysis.by_interest.cold, 0);
        assert_eq!(analysis.by_interest.unclassified, 1);
    }

    #[test]
    fn test_reason_percentage_uses_total_conversations() {
        // 10 conversations, 4 discarded for "budget": 40%, not 100%
        let mut leads: Vec<Lead> = (0..4).map(|_| discarded_for("budget")).collect();
        leads.extend((0..6).map(|_| lead(LeadStatus::Available)));

        let analysis = analyze_conversations(&leads);
        assert_eq!(analysis.top_reasons.len(), 1);
        assert_eq!(analysis.top_reasons[0].reason, "budget");
        assert_eq!(analysis.top_reasons[0].count, 4);
        assert_eq!(analysis.top_reasons[0].percentage, 40.0);
    }

    #[test]
    fn test_discarded_without_reason_only_counts_toward_total() {
        let leads = vec![lead(LeadStatus::Discarded), discarded_for("no budget")];
        let analysis = analyze_conversations(&leads);
        assert_eq!(analysis.total_conversations, 2);
        assert_eq!(analysis.top_reasons.len(), 1);
        assert_eq!(analysis.top_reasons[0].percentage, 50.0);
    }

    #[test]
    fn test_top_reasons_sorted_and_capped_at_five() {
        let mut leads = Vec::new();
        for (i, reason) in ["a", "b", "c", "d", "e", "f"].iter().enumerate() {
            for _ in 0..=i {
                leads.push(discarded_for(reason));
            }
        }
        let analysis = analyze_conversations(&leads);
        assert_eq!(analysis.top_reasons.len(), 5);
        assert_eq!(analysis.top_reasons[0].reason, "f");
        assert!(analysis.top_reasons.iter().all(|r| r.reason != "a"));
        let counts: Vec<u64> = analysis.top_reasons.iter().map(|r| r.count).collect();
        let mut sorted = counts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(counts, sorted);
    }

    #[tokio::test]
    async fn test_engine_only_reads_post_qualification_leads() {
        let store = Arc::new(InMemoryLeadStore::new());
        let company = Uuid::new_v4();

        store
            .create(NewLead::new(company, "Early", "SaaS", "Austin"))
            .await
            .unwrap();
        let contacted = store
            .create(
                NewLead::new(company, "Acme", "SaaS", "Austin").with_status(LeadStatus::InContact),
            )
            .await
            .unwrap();
        store
            .apply_qualification(
                company,
                contacted.id,
                QualificationOutcome {
                    status: LeadStatus::Available,
                    score: Some(90),
                    classification: Some(Classification::Hot),
                    urgency: Some(Urgency::High),
                    main_pain: None,
                    conversation_summary: None,
                    discard_reason: None,
                    conversation_history: Vec::new(),
                },
            )
            .await
            .unwrap();

        let engine = ConversationEngine::new(store);
        let analysis = engine.report(company).await.unwrap();
        // The prospectable lead is not a conversation
        assert_eq!(analysis.total_conversations, 1);
        assert_eq!(analysis.avg_score, 90);
        assert_eq!(analysis.by_interest.hot, 1);
    }
}
