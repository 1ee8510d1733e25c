//! Keyword routing over the agent catalog
//!
//! Picks a specialist for a query by scanning trigger words in priority
//! order. The match is plain substring containment on the lowercased
//! query, so "searching" trips the "search" trigger. First matching rule
//! wins; queries with no trigger fall to the default agent.

use tracing::debug;

/// Agent chosen when no trigger matches
pub const DEFAULT_AGENT_ID: &str = "research_agent";

/// Trigger rules in priority order
const TRIGGER_RULES: &[(&str, &[&str])] = &[
    (
        "research_agent",
        &["research", "find", "search", "information"],
    ),
    (
        "creative_agent",
        &["create", "generate", "write", "creative"],
    ),
    ("analytical_agent", &["analyze", "data", "chart", "graph"]),
    ("task_agent", &["schedule", "task", "remind", "calendar"]),
];

/// First rule whose trigger appears in the query
///
/// Rules whose agent the caller does not have are skipped, so routing
/// stays total over reduced catalogs.
pub fn keyword_route(query: &str, is_registered: impl Fn(&str) -> bool) -> Option<&'static str> {
    let lower = query.to_lowercase();
    for (agent_id, triggers) in TRIGGER_RULES {
        if !is_registered(agent_id) {
            continue;
        }
        if triggers.iter().any(|t| lower.contains(t)) {
            debug!("query matched trigger for '{}'", agent_id);
            return Some(agent_id);
        }
    }
    None
}
