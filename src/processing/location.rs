//! Location job market insights

use crate::processing::reference::{LocationMatch, ReferenceTables};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAnalysis {
    /// Table key of the resolved location, `None` when national averages were used.
    pub location: Option<String>,
    pub match_kind: LocationMatch,
    pub growth_pct: f64,
    /// 1-10.
    pub market_strength: u8,
    pub salary_multiplier: f64,
    pub in_demand_skills: BTreeSet<String>,
    /// In-demand skills the candidate has.
    pub matched_in_demand: BTreeSet<String>,
    /// In-demand skills the candidate lacks.
    pub missing_in_demand: BTreeSet<String>,
    /// Share of the location's in-demand skills the candidate has, 0-100.
    pub user_skill_match: u8,
    pub low_confidence: bool,
}

pub struct LocationAnalyzer<'a> {
    tables: &'a ReferenceTables,
}

impl<'a> LocationAnalyzer<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self { tables }
    }

    pub fn analyze(&self, location: &str, candidate_skills: &BTreeSet<String>) -> LocationAnalysis {
        let lookup = self.tables.locations.lookup(location);
        let stats = lookup.stats;

        let matched_in_demand: BTreeSet<String> = stats
            .in_demand_skills
            .intersection(candidate_skills)
            .cloned()
            .collect();
        let missing_in_demand: BTreeSet<String> = stats
            .in_demand_skills
            .difference(candidate_skills)
            .cloned()
            .collect();

        // An empty in-demand list gives nothing to match against, so 0.
        let user_skill_match = if stats.in_demand_skills.is_empty() {
            0
        } else {
            (100.0 * matched_in_demand.len() as f64 / stats.in_demand_skills.len() as f64).round() as u8
        };

        let low_confidence = lookup.match_kind == LocationMatch::Default;
        if low_confidence && !location.trim().is_empty() {
            log::warn!("Unknown location '{}', using national averages", location);
        }

        LocationAnalysis {
            location: lookup.key.map(|k| k.to_string()),
            match_kind: lookup.match_kind,
            growth_pct: stats.growth_pct,
            market_strength: stats.market_strength,
            salary_multiplier: stats.salary_multiplier,
            in_demand_skills: stats.in_demand_skills.clone(),
            matched_in_demand,
            missing_in_demand,
            user_skill_match,
            low_confidence,
        }
    }
}
