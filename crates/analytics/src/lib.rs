//! Funnel metrics, conversation analysis and insight generation
//!
//! Each engine fans out its read-only store queries concurrently and then
//! delegates to a pure function over the fetched snapshot. The pure layer
//! carries all of the thresholding logic and is tested without a store.
//! Minor skew between fan-out counts is tolerated; the reports are
//! best-effort dashboard snapshots, not transactional reads.

pub mod conversation;
pub mod funnel;
pub mod insights;

pub use conversation::{
    analyze_conversations, ConversationAnalysis, ConversationEngine, DiscardReason,
    InterestBreakdown,
};
pub use funnel::{compute_funnel, DropPoint, FunnelConversions, FunnelEngine, FunnelMetrics, StageCounts};
pub use insights::{generate_insights, Insight, InsightEngine, InsightSnapshot, InsightType};
