//! Immutable reference tables compiled from configuration
//!
//! Built once at startup and shared by reference with every component. Nothing
//! here is mutated after construction, so a single instance can be used from
//! many threads at once.

use crate::config::{Config, ExtractionConfig, LocationEntry, ScoringConfig};
use crate::error::{CandidateFitError, Result};
use crate::processing::text_processor::normalize_for_matching;
use crate::processing::vocabulary::SkillVocabulary;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strsim::jaro_winkler;

pub struct ReferenceTables {
    pub vocabulary: SkillVocabulary,
    pub high_value_skills: BTreeSet<String>,
    pub roles: RoleSalaryTable,
    pub locations: LocationTable,
    pub extraction: ExtractionConfig,
    pub scoring: ScoringConfig,
}

impl ReferenceTables {
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let reference = &config.reference;

        let vocabulary = SkillVocabulary::new(&reference.skills, &reference.skill_aliases)?;

        let high_value_skills = canonical_set(&vocabulary, &reference.high_value_skills, "high value skill")?;

        let roles = RoleSalaryTable::new(&reference.role_salaries, reference.industry_average_salary);

        let mut markets = BTreeMap::new();
        for (name, entry) in &reference.locations {
            markets.insert(normalize_for_matching(name), MarketStats::from_entry(&vocabulary, name, entry)?);
        }
        let national_average = MarketStats::from_entry(&vocabulary, "national average", &reference.national_average)?;
        let aliases = reference
            .location_aliases
            .iter()
            .map(|(alias, key)| (normalize_for_matching(alias), normalize_for_matching(key)))
            .collect();

        let locations = LocationTable {
            markets,
            aliases,
            national_average,
            fuzzy_threshold: config.scoring.location_fuzzy_threshold,
        };

        log::info!(
            "Loaded reference tables: {} skills, {} roles, {} locations",
            vocabulary.len(),
            roles.len(),
            locations.len()
        );

        Ok(Self {
            vocabulary,
            high_value_skills,
            roles,
            locations,
            extraction: config.extraction.clone(),
            scoring: config.scoring.clone(),
        })
    }
}

fn canonical_set(vocabulary: &SkillVocabulary, names: &[String], what: &str) -> Result<BTreeSet<String>> {
    names
        .iter()
        .map(|name| {
            vocabulary
                .canonical_name(name)
                .map(|s| s.to_string())
                .ok_or_else(|| CandidateFitError::Configuration(format!("Unknown {} '{}'", what, name)))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleMatch {
    /// The role is a table key.
    Exact,
    /// A table key appears as a whole phrase inside the role.
    Partial,
    /// Nothing matched; the industry average was used.
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoleLookup {
    pub base_salary: u64,
    pub matched_role: Option<String>,
    pub match_kind: RoleMatch,
}

pub struct RoleSalaryTable {
    salaries: BTreeMap<String, u64>,
    industry_average: u64,
}

impl RoleSalaryTable {
    pub fn new(salaries: &BTreeMap<String, u64>, industry_average: u64) -> Self {
        let salaries = salaries
            .iter()
            .map(|(role, salary)| (normalize_for_matching(role), *salary))
            .filter(|(role, _)| !role.is_empty())
            .collect();

        Self {
            salaries,
            industry_average,
        }
    }

    /// Base salary for a role: exact key, then the longest key contained in
    /// the role as a whole phrase, then the industry average.
    pub fn lookup(&self, role: &str) -> RoleLookup {
        let normalized = normalize_for_matching(role);

        if let Some(salary) = self.salaries.get(&normalized) {
            return RoleLookup {
                base_salary: *salary,
                matched_role: Some(normalized),
                match_kind: RoleMatch::Exact,
            };
        }

        let padded = format!(" {} ", normalized);
        let partial = self
            .salaries
            .iter()
            .filter(|(key, _)| padded.contains(&format!(" {} ", key)))
            // Longest key wins; BTreeMap order breaks ties deterministically.
            .fold(None::<(&String, &u64)>, |best, candidate| match best {
                Some(current) if current.0.len() >= candidate.0.len() => Some(current),
                _ => Some(candidate),
            });

        match partial {
            Some((key, salary)) => RoleLookup {
                base_salary: *salary,
                matched_role: Some(key.clone()),
                match_kind: RoleMatch::Partial,
            },
            None => RoleLookup {
                base_salary: self.industry_average,
                matched_role: None,
                match_kind: RoleMatch::Default,
            },
        }
    }

    pub fn industry_average(&self) -> u64 {
        self.industry_average
    }

    pub fn len(&self) -> usize {
        self.salaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.salaries.is_empty()
    }
}

/// Job market statistics for a location.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketStats {
    pub growth_pct: f64,
    pub market_strength: u8,
    pub salary_multiplier: f64,
    pub in_demand_skills: BTreeSet<String>,
}

impl MarketStats {
    fn from_entry(vocabulary: &SkillVocabulary, name: &str, entry: &LocationEntry) -> Result<Self> {
        Ok(Self {
            growth_pct: entry.growth_pct,
            market_strength: entry.market_strength,
            salary_multiplier: entry.salary_multiplier,
            in_demand_skills: canonical_set(
                vocabulary,
                &entry.in_demand_skills,
                &format!("in-demand skill for '{}'", name),
            )?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationMatch {
    Exact,
    Alias,
    /// A known location name appears inside a longer description.
    Contained,
    /// Close spelling of a known location.
    Fuzzy,
    /// Unknown location; national averages were used.
    Default,
}

#[derive(Debug, Clone)]
pub struct LocationLookup<'a> {
    /// Table key of the resolved location, `None` for the national average.
    pub key: Option<&'a str>,
    pub stats: &'a MarketStats,
    pub match_kind: LocationMatch,
}

pub struct LocationTable {
    markets: BTreeMap<String, MarketStats>,
    aliases: BTreeMap<String, String>,
    national_average: MarketStats,
    fuzzy_threshold: f64,
}

impl LocationTable {
    /// Resolve a free-form location. Each comma-separated part is tried in
    /// order ("Bengaluru, Karnataka, India" resolves on its first part).
    pub fn lookup(&self, location: &str) -> LocationLookup<'_> {
        for part in location.split(',') {
            let normalized = normalize_for_matching(part);
            if normalized.is_empty() {
                continue;
            }
            if let Some(found) = self.resolve(&normalized) {
                return found;
            }
        }

        LocationLookup {
            key: None,
            stats: &self.national_average,
            match_kind: LocationMatch::Default,
        }
    }

    fn resolve(&self, normalized: &str) -> Option<LocationLookup<'_>> {
        if let Some((key, stats)) = self.markets.get_key_value(normalized) {
            return Some(self.found(key, stats, LocationMatch::Exact));
        }

        if let Some(target) = self.aliases.get(normalized) {
            return self
                .markets
                .get_key_value(target.as_str())
                .map(|(key, stats)| self.found(key, stats, LocationMatch::Alias));
        }

        let padded = format!(" {} ", normalized);
        let contained = self
            .names()
            .filter(|(name, _)| padded.contains(&format!(" {} ", name)))
            .max_by_key(|(name, _)| name.len());
        if let Some((_, key)) = contained {
            return self
                .markets
                .get_key_value(key)
                .map(|(key, stats)| self.found(key, stats, LocationMatch::Contained));
        }

        let mut best: Option<(f64, &str)> = None;
        for (name, key) in self.names() {
            let score = jaro_winkler(normalized, name);
            if score >= self.fuzzy_threshold && best.map_or(true, |(s, _)| score > s) {
                best = Some((score, key));
            }
        }
        best.and_then(|(score, key)| {
            log::debug!("Fuzzy matched location '{}' to '{}' ({:.3})", normalized, key, score);
            self.markets
                .get_key_value(key)
                .map(|(key, stats)| self.found(key, stats, LocationMatch::Fuzzy))
        })
    }

    fn found<'a>(&'a self, key: &'a str, stats: &'a MarketStats, match_kind: LocationMatch) -> LocationLookup<'a> {
        LocationLookup {
            key: Some(key),
            stats,
            match_kind,
        }
    }

    /// Every spelling the table knows, paired with its market key.
    fn names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.markets
            .keys()
            .map(|k| (k.as_str(), k.as_str()))
            .chain(self.aliases.iter().map(|(alias, key)| (alias.as_str(), key.as_str())))
    }

    /// Known location mentioned in free text, as its table key.
    pub fn find_mention(&self, text: &str) -> Option<&str> {
        let padded = format!(" {} ", normalize_for_matching(text));
        self.names()
            .filter_map(|(name, key)| padded.find(&format!(" {} ", name)).map(|pos| (pos, key)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, key)| key)
    }

    pub fn national_average(&self) -> &MarketStats {
        &self.national_average
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}
