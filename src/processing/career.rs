//! Career level classification and growth recommendations

use crate::processing::skill_gap::SkillGapResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Experience brackets, lower bound inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CareerLevel {
    Entry,
    Mid,
    Senior,
    Lead,
    Executive,
}

impl CareerLevel {
    pub const ALL: [CareerLevel; 5] = [
        CareerLevel::Entry,
        CareerLevel::Mid,
        CareerLevel::Senior,
        CareerLevel::Lead,
        CareerLevel::Executive,
    ];

    /// Bracket for a number of years. Negative or non-finite input counts as zero.
    pub fn from_experience(years: f64) -> Self {
        let years = if years.is_finite() { years.max(0.0) } else { 0.0 };
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|level| years >= level.min_years())
            .unwrap_or(CareerLevel::Entry)
    }

    pub fn min_years(&self) -> f64 {
        match self {
            CareerLevel::Entry => 0.0,
            CareerLevel::Mid => 2.0,
            CareerLevel::Senior => 5.0,
            CareerLevel::Lead => 10.0,
            CareerLevel::Executive => 15.0,
        }
    }

    pub fn next(&self) -> Option<CareerLevel> {
        match self {
            CareerLevel::Entry => Some(CareerLevel::Mid),
            CareerLevel::Mid => Some(CareerLevel::Senior),
            CareerLevel::Senior => Some(CareerLevel::Lead),
            CareerLevel::Lead => Some(CareerLevel::Executive),
            CareerLevel::Executive => None,
        }
    }

    /// Upper bound of the bracket, exclusive. The top bracket is open.
    pub fn max_years(&self) -> Option<f64> {
        self.next().map(|next| next.min_years())
    }
}

impl std::fmt::Display for CareerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CareerLevel::Entry => write!(f, "Entry Level"),
            CareerLevel::Mid => write!(f, "Mid Level"),
            CareerLevel::Senior => write!(f, "Senior Level"),
            CareerLevel::Lead => write!(f, "Lead"),
            CareerLevel::Executive => write!(f, "Executive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CareerPath {
    /// Work toward the next bracket.
    Promotion { target: CareerLevel },
    /// Top bracket reached; grow through depth instead of title.
    Specialization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerGrowth {
    pub current_level: CareerLevel,
    pub next_level: Option<CareerLevel>,
    pub path: CareerPath,
    /// Years until the next bracket at the current pace, if there is one.
    pub years_to_next_level: Option<f64>,
    /// Missing skills the recommendations focus on.
    pub focus_skills: Vec<String>,
    pub recommendations: Vec<String>,
}

struct GrowthRules {
    skill_template: &'static str,
    with_skill_gap: &'static [&'static str],
    generic: &'static [&'static str],
}

fn rules_for(level: CareerLevel) -> GrowthRules {
    match level {
        CareerLevel::Entry => GrowthRules {
            skill_template: "Build a hands-on project with {skill}; the target role lists it",
            with_skill_gap: &["Practice fundamentals daily with small coding exercises"],
            generic: &[
                "Build 3 to 5 portfolio projects that show end-to-end ownership",
                "Practice fundamentals daily with small coding exercises",
                "Contribute to an open source project",
                "Get comfortable with version control and automated testing",
            ],
        },
        CareerLevel::Mid => GrowthRules {
            skill_template: "Use {skill} in production work; senior roles expect depth in it",
            with_skill_gap: &["Learn system design fundamentals"],
            generic: &[
                "Learn system design fundamentals",
                "Take ownership of a feature from design to release",
                "Get certified in a core technology of your stack",
                "Mentor interns or junior developers",
            ],
        },
        CareerLevel::Senior => GrowthRules {
            skill_template: "Gain production depth in {skill} so you can lead work that depends on it",
            with_skill_gap: &["Lead a technical initiative that spans more than one team"],
            generic: &[
                "Lead a technical initiative that spans more than one team",
                "Mentor junior developers",
                "Drive architecture decisions and document them",
            ],
        },
        CareerLevel::Lead => GrowthRules {
            skill_template: "Make sure your team covers {skill}, through hiring or upskilling",
            with_skill_gap: &["Own the technical roadmap for your area"],
            generic: &[
                "Own the technical roadmap for your area",
                "Grow engineers on your team into senior roles",
                "Build influence with product and business partners",
            ],
        },
        CareerLevel::Executive => GrowthRules {
            skill_template: "Build strategic fluency in {skill} to steer technology decisions",
            with_skill_gap: &["Specialize in a domain where your experience is rare"],
            generic: &[
                "Specialize in a domain where your experience is rare",
                "Build an industry reputation through talks and writing",
                "Advise on technology strategy at the organization level",
            ],
        },
    }
}

const FOCUS_SKILL_LIMIT: usize = 3;

pub struct CareerAdvisor<'a> {
    high_value_skills: &'a BTreeSet<String>,
}

impl<'a> CareerAdvisor<'a> {
    pub fn new(high_value_skills: &'a BTreeSet<String>) -> Self {
        Self { high_value_skills }
    }

    /// Classify experience and recommend next steps.
    ///
    /// With a skill gap the recommendations target its most valuable missing
    /// skills; without one a generic set for the level is returned. A gap
    /// computed from requirements with no known skills says nothing about
    /// the candidate and is treated as absent.
    pub fn advise(&self, experience_years: f64, skill_gap: Option<&SkillGapResult>) -> CareerGrowth {
        let skill_gap = skill_gap.filter(|gap| !gap.low_confidence);
        let current_level = CareerLevel::from_experience(experience_years);
        let next_level = current_level.next();
        let rules = rules_for(current_level);

        let path = match next_level {
            Some(target) => CareerPath::Promotion { target },
            None => CareerPath::Specialization,
        };

        let years = if experience_years.is_finite() { experience_years.max(0.0) } else { 0.0 };
        let years_to_next_level = next_level.map(|next| ((next.min_years() - years) * 10.0).round() / 10.0);

        let focus_skills = skill_gap
            .map(|gap| gap.priority_missing(self.high_value_skills, FOCUS_SKILL_LIMIT))
            .unwrap_or_default();

        let recommendations: Vec<String> = match skill_gap {
            Some(_) if !focus_skills.is_empty() => focus_skills
                .iter()
                .map(|skill| rules.skill_template.replace("{skill}", skill))
                .chain(rules.with_skill_gap.iter().map(|s| s.to_string()))
                .collect(),
            Some(_) => std::iter::once("You already cover every skill this role lists".to_string())
                .chain(rules.generic.iter().map(|s| s.to_string()))
                .collect(),
            None => rules.generic.iter().map(|s| s.to_string()).collect(),
        };

        CareerGrowth {
            current_level,
            next_level,
            path,
            years_to_next_level,
            focus_skills,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets() {
        assert_eq!(CareerLevel::from_experience(0.0), CareerLevel::Entry);
        assert_eq!(CareerLevel::from_experience(1.9), CareerLevel::Entry);
        assert_eq!(CareerLevel::from_experience(2.0), CareerLevel::Mid);
        assert_eq!(CareerLevel::from_experience(5.0), CareerLevel::Senior);
        assert_eq!(CareerLevel::from_experience(10.0), CareerLevel::Lead);
        assert_eq!(CareerLevel::from_experience(17.0), CareerLevel::Executive);
        assert_eq!(CareerLevel::from_experience(-3.0), CareerLevel::Entry);
        assert_eq!(CareerLevel::from_experience(f64::NAN), CareerLevel::Entry);
    }

    #[test]
    fn test_brackets_are_contiguous() {
        for level in CareerLevel::ALL {
            assert_eq!(CareerLevel::from_experience(level.min_years()), level);
            if let Some(max) = level.max_years() {
                assert_eq!(CareerLevel::from_experience(max - 0.01), level);
            }
        }
    }

    #[test]
    fn test_generic_advice_without_skill_gap() {
        let high_value = BTreeSet::new();
        let growth = CareerAdvisor::new(&high_value).advise(0.0, None);

        assert_eq!(growth.current_level, CareerLevel::Entry);
        assert_eq!(growth.next_level, Some(CareerLevel::Mid));
        assert_eq!(growth.years_to_next_level, Some(2.0));
        assert!(growth.focus_skills.is_empty());
        assert!(!growth.recommendations.is_empty());
    }

    #[test]
    fn test_executive_has_no_next_level() {
        let high_value = BTreeSet::new();
        let growth = CareerAdvisor::new(&high_value).advise(17.0, None);

        assert_eq!(growth.current_level, CareerLevel::Executive);
        assert_eq!(growth.next_level, None);
        assert_eq!(growth.path, CareerPath::Specialization);
        assert_eq!(growth.years_to_next_level, None);
    }

    #[test]
    fn test_recommendations_target_missing_skills() {
        let high_value: BTreeSet<String> = ["Kubernetes".to_string()].into_iter().collect();
        let missing: BTreeSet<String> = ["Angular", "Bash", "Docker", "Kubernetes"].iter().map(|s| s.to_string()).collect();
        let gap = SkillGapResult {
            job_skills: missing.clone(),
            matched: BTreeSet::new(),
            missing,
            match_percentage: 0,
            low_confidence: false,
            similarity: None,
        };

        let growth = CareerAdvisor::new(&high_value).advise(3.0, Some(&gap));

        assert_eq!(growth.focus_skills, vec!["Kubernetes", "Angular", "Bash"]);
        assert!(growth.recommendations[0].contains("Kubernetes"));
        assert!(growth.recommendations.iter().all(|r| !r.contains("{skill}")));
    }

    #[test]
    fn test_vacuous_skill_gap_gets_generic_advice() {
        let high_value = BTreeSet::new();
        let advisor = CareerAdvisor::new(&high_value);
        let gap = SkillGapResult {
            job_skills: BTreeSet::new(),
            matched: BTreeSet::new(),
            missing: BTreeSet::new(),
            match_percentage: 100,
            low_confidence: true,
            similarity: None,
        };

        let growth = advisor.advise(6.0, Some(&gap));

        assert_eq!(growth.recommendations, advisor.advise(6.0, None).recommendations);
        assert!(growth.focus_skills.is_empty());
        assert!(growth.recommendations.iter().all(|r| !r.contains("already cover")));
    }
}
