//! Salary projection from role, experience, location and skills

use crate::processing::career::CareerLevel;
use crate::processing::reference::{LocationMatch, ReferenceTables, RoleMatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryProjection {
    /// Role as given; `role_match` says how it resolved.
    pub role: String,
    pub experience_level: CareerLevel,
    /// Point estimate, rounded to the configured unit.
    pub projected_salary: u64,
    pub salary_band: SalaryBand,
    pub base_salary: u64,
    pub experience_multiplier: f64,
    pub location_multiplier: f64,
    pub skill_bonus: f64,
    /// High-value skills that earned the bonus.
    pub bonus_skills: BTreeSet<String>,
    pub role_match: RoleMatch,
    pub location_match: LocationMatch,
}

/// Likely pay range around the point estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBand {
    pub low: u64,
    pub high: u64,
}

const RANGE_LOW_FACTOR: f64 = 0.85;
const RANGE_HIGH_FACTOR: f64 = 1.20;

pub struct SalaryModel<'a> {
    tables: &'a ReferenceTables,
}

impl<'a> SalaryModel<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self { tables }
    }

    /// Project a salary.
    ///
    /// The estimate is `base * experience * location * skill_bonus`, where
    /// experience grows linearly up to the configured cap and the skill bonus
    /// counts high-value skills among the matched ones, also capped. The
    /// result never decreases as experience grows.
    pub fn project(
        &self,
        role: &str,
        experience_years: f64,
        location: &str,
        matched_skills: &BTreeSet<String>,
    ) -> SalaryProjection {
        let scoring = &self.tables.scoring;

        let role_lookup = self.tables.roles.lookup(role);
        let location_lookup = self.tables.locations.lookup(location);

        let years = if experience_years.is_finite() {
            experience_years.clamp(0.0, scoring.experience_cap_years)
        } else {
            0.0
        };
        let experience_multiplier = 1.0 + years * scoring.experience_step;
        let location_multiplier = location_lookup.stats.salary_multiplier;

        let bonus_skills: BTreeSet<String> = matched_skills
            .intersection(&self.tables.high_value_skills)
            .cloned()
            .collect();
        let skill_bonus = 1.0 + (bonus_skills.len() as f64 * scoring.skill_bonus_step).min(scoring.skill_bonus_cap);

        let raw = role_lookup.base_salary as f64 * experience_multiplier * location_multiplier * skill_bonus;

        log::debug!(
            "Salary for '{}': base {} x exp {:.2} x loc {:.2} x skills {:.2} = {:.0}",
            role,
            role_lookup.base_salary,
            experience_multiplier,
            location_multiplier,
            skill_bonus,
            raw
        );

        SalaryProjection {
            role: role.trim().to_string(),
            experience_level: CareerLevel::from_experience(experience_years),
            projected_salary: self.round(raw),
            salary_band: SalaryBand {
                low: self.round(raw * RANGE_LOW_FACTOR),
                high: self.round(raw * RANGE_HIGH_FACTOR),
            },
            base_salary: role_lookup.base_salary,
            experience_multiplier,
            location_multiplier,
            skill_bonus,
            bonus_skills,
            role_match: role_lookup.match_kind,
            location_match: location_lookup.match_kind,
        }
    }

    /// Round to the nearest unit, never below one unit.
    fn round(&self, value: f64) -> u64 {
        let unit = self.tables.scoring.salary_rounding;
        let units = (value / unit as f64).round().max(1.0) as u64;
        units * unit
    }
}
