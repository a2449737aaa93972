//! Symptom triage with severity scoring.
//!
//! The score comes from the strongest matching keyword rule, raised by risk
//! factors found in the patient's medical history. Rules fire on the
//! patient's own words only; no model output is trusted for triage.

mod rules;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::enums::Severity;
use crate::models::MedicalHistory;
use rules::{contains_word, rules};

/// Score for a non-empty description that no rule recognizes.
pub const UNMATCHED_SCORE: u8 = 30;

/// Score added per matching risk factor.
pub const RISK_FACTOR_BONUS: u8 = 10;

const MAX_SCORE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub summary: String,
    pub severity: Severity,
    pub score: u8,
    /// Every rule that fired, in registry order.
    pub matched_rules: Vec<String>,
    pub risk_factors: Vec<String>,
}

impl TriageAssessment {
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// Anything that can turn a symptom description into an assessment.
pub trait SymptomAnalyzer: Send + Sync {
    fn analyze(&self, description: &str, history: &MedicalHistory) -> TriageAssessment;
}

/// Keyword-rule triage.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedTriage;

impl SymptomAnalyzer for RuleBasedTriage {
    fn analyze(&self, description: &str, history: &MedicalHistory) -> TriageAssessment {
        triage(description, history)
    }
}

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9']+").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Lowercase and collapse whitespace.
fn normalize_summary(description: &str) -> String {
    WHITESPACE_RE
        .replace_all(description.trim(), " ")
        .to_lowercase()
}

/// Lowercase, strip punctuation, and pad with spaces so keywords can be
/// matched on word boundaries.
fn normalize_for_matching(description: &str) -> String {
    let lowered = description.to_lowercase().replace('\u{2019}', "'");
    let words = NON_WORD_RE.replace_all(&lowered, " ");
    format!(" {} ", words.trim())
}

/// Assess a symptom description against the rule registry.
pub fn triage(description: &str, history: &MedicalHistory) -> TriageAssessment {
    if description.trim().is_empty() {
        tracing::info!("No symptom description to analyze");
        return TriageAssessment {
            summary: "No symptom description".into(),
            severity: Severity::Unknown,
            score: 0,
            matched_rules: vec![],
            risk_factors: vec![],
        };
    }

    let haystack = normalize_for_matching(description);
    let registry = rules();

    let matched: Vec<_> = registry
        .iter()
        .filter(|rule| rule.condition.matches(&haystack))
        .collect();

    // Highest score wins; `max_by_key` returns the last maximum, so scan
    // in reverse to keep the earliest rule on ties.
    let top = matched.iter().rev().max_by_key(|rule| rule.score).copied();

    let (mut score, summary) = match top {
        Some(rule) => (rule.score, rule.summary.to_string()),
        None => (UNMATCHED_SCORE, normalize_summary(description)),
    };

    let mut risk_factors = Vec::new();

    if let Some(rule) = top {
        for entry in history.conditions.iter().chain(history.medications.iter()) {
            let entry_lower = entry.to_lowercase();
            if rule
                .risk_conditions
                .iter()
                .any(|risk| entry_lower.contains(risk))
            {
                risk_factors.push(entry.clone());
            }
        }
    }

    for allergy in &history.allergies {
        if contains_word(&haystack, &normalize_for_matching(allergy)) {
            risk_factors.push(format!("allergy: {allergy}"));
        }
    }

    let bonus = (risk_factors.len() as u32 * RISK_FACTOR_BONUS as u32).min(MAX_SCORE as u32) as u8;
    score = score.saturating_add(bonus).min(MAX_SCORE);

    let assessment = TriageAssessment {
        summary,
        severity: Severity::from_score(score),
        score,
        matched_rules: matched.iter().map(|r| r.id.to_string()).collect(),
        risk_factors,
    };

    tracing::info!(
        severity = %assessment.severity,
        score = assessment.score,
        rules = ?assessment.matched_rules,
        risk_factors = assessment.risk_factors.len(),
        "Symptom triage complete"
    );

    assessment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_history() -> MedicalHistory {
        MedicalHistory::default()
    }

    fn history_with_conditions(conditions: &[&str]) -> MedicalHistory {
        MedicalHistory {
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
            ..MedicalHistory::default()
        }
    }

    #[test]
    fn chest_pain_with_arm_numbness_is_critical() {
        let a = triage("I feel a sharp pain in my chest and my arm is numb.", &no_history());
        assert_eq!(a.severity, Severity::Critical);
        assert_eq!(a.summary, "Severe chest pain, arm numbness");
        assert_eq!(a.matched_rules.first().map(String::as_str), Some("TRI-001"));
        // Chest pain alone also matches but ranks below TRI-001.
        assert!(a.matched_rules.contains(&"TRI-010".to_string()));
        assert_eq!(a.score, 95);
    }

    #[test]
    fn difficulty_breathing_is_critical() {
        let a = triage("Difficulty breathing since this morning", &no_history());
        assert_eq!(a.severity, Severity::Critical);
        assert_eq!(a.summary, "Difficulty breathing");
        assert_eq!(a.matched_rules, vec!["TRI-002".to_string()]);
    }

    #[test]
    fn curly_apostrophe_is_normalized() {
        let a = triage("I can\u{2019}t breathe", &no_history());
        assert_eq!(a.matched_rules, vec!["TRI-002".to_string()]);
    }

    #[test]
    fn unmatched_description_is_moderate_lowercased() {
        let a = triage("My  Knee\tHurts after running", &no_history());
        assert_eq!(a.severity, Severity::Moderate);
        assert_eq!(a.score, UNMATCHED_SCORE);
        assert_eq!(a.summary, "my knee hurts after running");
        assert!(a.matched_rules.is_empty());
    }

    #[test]
    fn empty_description_is_unknown() {
        let a = triage("   ", &no_history());
        assert_eq!(a.severity, Severity::Unknown);
        assert_eq!(a.score, 0);
    }

    #[test]
    fn asthma_raises_breathing_score_capped() {
        let a = triage("shortness of breath", &history_with_conditions(&["Asthma"]));
        assert_eq!(a.score, 100);
        assert_eq!(a.risk_factors, vec!["Asthma".to_string()]);

        let b = triage(
            "shortness of breath",
            &history_with_conditions(&["Asthma", "COPD", "Chronic bronchitis"]),
        );
        assert_eq!(b.score, 100);
        assert_eq!(b.risk_factors.len(), 3);
    }

    #[test]
    fn chest_pain_alone_becomes_critical_with_hypertension() {
        let plain = triage("I have chest pain", &no_history());
        assert_eq!(plain.severity, Severity::Urgent);
        assert_eq!(plain.score, 75);

        let risky = triage("I have chest pain", &history_with_conditions(&["Hypertension"]));
        assert_eq!(risky.score, 85);
        assert_eq!(risky.severity, Severity::Critical);
    }

    #[test]
    fn medication_counts_as_risk_factor() {
        let history = MedicalHistory {
            medications: vec!["Warfarin 5mg".into()],
            ..MedicalHistory::default()
        };
        let a = triage("I hit my head on the door", &history);
        assert_eq!(a.summary, "Head injury");
        assert_eq!(a.score, 75);
        assert_eq!(a.risk_factors, vec!["Warfarin 5mg".to_string()]);
    }

    #[test]
    fn unrelated_condition_is_not_a_risk_factor() {
        let a = triage("I have a high fever", &history_with_conditions(&["Asthma"]));
        assert_eq!(a.score, 60);
        assert!(a.risk_factors.is_empty());
    }

    #[test]
    fn mentioned_allergen_is_flagged() {
        let history = MedicalHistory {
            allergies: vec!["Penicillin".into()],
            ..MedicalHistory::default()
        };
        let a = triage("I took penicillin an hour ago and my throat is swelling", &history);
        assert_eq!(a.summary, "Possible anaphylaxis");
        assert_eq!(a.score, 100);
        assert!(a.risk_factors.contains(&"allergy: Penicillin".to_string()));
    }

    #[test]
    fn allergen_without_rule_raises_moderate() {
        let history = MedicalHistory {
            allergies: vec!["Peanuts".into()],
            ..MedicalHistory::default()
        };
        let a = triage("I think I ate peanuts", &history);
        assert_eq!(a.score, UNMATCHED_SCORE + RISK_FACTOR_BONUS);
        assert_eq!(a.severity, Severity::Moderate);
    }

    #[test]
    fn hyphenated_allergen_is_flagged() {
        let history = MedicalHistory {
            allergies: vec!["Co-trimoxazole".into(), "Vitamin K (phytonadione)".into()],
            ..MedicalHistory::default()
        };
        let a = triage("I took co-trimoxazole an hour ago and feel dizzy", &history);
        assert_eq!(a.risk_factors, vec!["allergy: Co-trimoxazole".to_string()]);
        assert_eq!(a.score, UNMATCHED_SCORE + RISK_FACTOR_BONUS);

        let b = triage("they gave me vitamin k (phytonadione) yesterday", &history);
        assert_eq!(b.risk_factors, vec!["allergy: Vitamin K (phytonadione)".to_string()]);
    }

    #[test]
    fn punctuation_only_allergy_never_matches() {
        let history = MedicalHistory {
            allergies: vec!["--".into()],
            ..MedicalHistory::default()
        };
        let a = triage("I feel dizzy", &history);
        assert!(a.risk_factors.is_empty());
    }

    #[test]
    fn tie_keeps_registry_order() {
        // TRI-001 and TRI-003 both score 95; TRI-001 is registered first.
        let a = triage("chest pain in my left arm and then he collapsed", &no_history());
        assert_eq!(a.summary, "Severe chest pain, arm numbness");
        assert_eq!(a.matched_rules[0], "TRI-001");
        assert!(a.matched_rules.contains(&"TRI-003".to_string()));
    }

    #[test]
    fn keyword_inside_other_word_does_not_fire() {
        // "harmless" contains "arm" but must not count as arm pain.
        let a = triage("chest pain that feels harmless", &no_history());
        assert_eq!(a.matched_rules, vec!["TRI-010".to_string()]);
    }

    #[test]
    fn analyzer_trait_delegates() {
        let analyzer: &dyn SymptomAnalyzer = &RuleBasedTriage;
        let a = analyzer.analyze("seizure", &no_history());
        assert_eq!(a.summary, "Seizure");
        assert!(a.is_critical());
    }
}
