//! Hard-coded triage rules.
//!
//! Each rule carries a 0-100 score; the severity class is derived from the
//! score, never stored on the rule. Keywords are matched on word boundaries
//! against the normalized description.

/// When a rule fires.
pub(crate) enum RuleCondition {
    /// Description contains any keyword.
    AnyKeyword(&'static [&'static str]),
    /// Every group has at least one keyword in the description.
    AllOf(&'static [&'static [&'static str]]),
}

impl RuleCondition {
    pub(crate) fn matches(&self, haystack: &str) -> bool {
        match self {
            Self::AnyKeyword(keywords) => contains_any(haystack, keywords),
            Self::AllOf(groups) => groups.iter().all(|group| contains_any(haystack, group)),
        }
    }
}

pub(crate) struct TriageRule {
    /// Unique identifier for the incident log.
    pub id: &'static str,
    pub score: u8,
    pub summary: &'static str,
    pub condition: RuleCondition,
    /// History entries (conditions or medications) that raise the score.
    pub risk_conditions: &'static [&'static str],
}

/// `haystack` must be a padded, word-normalized string (see `normalize_for_matching`).
pub(crate) fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| contains_word(haystack, kw))
}

pub(crate) fn contains_word(haystack: &str, phrase: &str) -> bool {
    let phrase = phrase.trim();
    !phrase.is_empty() && haystack.contains(&format!(" {phrase} "))
}

// ── Keyword sets ────────────────────────────────────────────

const CHEST_PAIN_KEYWORDS: &[&str] = &[
    "chest pain", "chest pains", "pain in my chest", "pain in the chest", "pain in his chest",
    "pain in her chest", "chest tightness", "tight chest", "chest pressure",
    "pressure in my chest", "crushing chest", "chest hurts",
];

const RADIATING_KEYWORDS: &[&str] = &[
    "arm", "arms", "left", "jaw", "shoulder", "numb", "numbness", "tingling",
];

const BREATHING_KEYWORDS: &[&str] = &[
    "difficulty breathing", "trouble breathing", "hard to breathe", "can't breathe",
    "cant breathe", "cannot breathe", "shortness of breath", "short of breath",
    "struggling to breathe", "choking", "gasping",
];

const UNCONSCIOUS_KEYWORDS: &[&str] = &[
    "unconscious", "unresponsive", "not responding", "passed out", "fainted", "collapsed",
    "won't wake up", "blacked out",
];

const STROKE_KEYWORDS: &[&str] = &[
    "face drooping", "drooping face", "face is drooping", "slurred speech", "slurring",
    "sudden weakness", "weakness on one side", "numb on one side", "sudden confusion",
    "can't speak",
];

const BLEEDING_KEYWORDS: &[&str] = &[
    "bleeding heavily", "heavy bleeding", "severe bleeding", "won't stop bleeding",
    "lot of blood", "losing blood", "bleeding badly",
];

const SEIZURE_KEYWORDS: &[&str] = &[
    "seizure", "seizures", "seizing", "convulsion", "convulsions", "convulsing",
];

const ANAPHYLAXIS_KEYWORDS: &[&str] = &[
    "throat swelling", "throat is swelling", "swollen throat", "swollen tongue",
    "tongue swelling", "anaphylaxis", "anaphylactic", "allergic reaction",
];

const HIGH_FEVER_KEYWORDS: &[&str] = &[
    "high fever", "fever of 103", "fever of 104", "fever of 40", "burning up",
];

const HEAD_INJURY_KEYWORDS: &[&str] = &[
    "head injury", "hit my head", "hit his head", "hit her head", "fell on my head",
    "concussion", "head wound",
];

const SEVERE_PAIN_KEYWORDS: &[&str] = &[
    "severe pain", "unbearable pain", "excruciating", "worst pain",
];

const VOMITING_BLOOD_KEYWORDS: &[&str] = &[
    "vomiting blood", "throwing up blood", "coughing up blood", "vomited blood",
];

// ── Risk factors ────────────────────────────────────────────

const CARDIAC_RISK: &[&str] = &[
    "heart", "cardiac", "coronary", "angina", "hypertension", "high blood pressure", "diabetes",
];

const RESPIRATORY_RISK: &[&str] = &[
    "asthma", "copd", "emphysema", "bronchitis", "heart failure",
];

const STROKE_RISK: &[&str] = &[
    "hypertension", "high blood pressure", "atrial fibrillation", "previous stroke", "diabetes",
];

const BLEEDING_RISK: &[&str] = &[
    "hemophilia", "bleeding disorder", "warfarin", "apixaban", "rivaroxaban", "blood thinner",
];

const SEIZURE_RISK: &[&str] = &["epilepsy"];

const FEVER_RISK: &[&str] = &[
    "immunocompromised", "chemotherapy", "cancer", "leukemia", "transplant",
];

// ── Rule registry ───────────────────────────────────────────

/// Build the rule set. Critical rules first; registry order breaks score ties.
pub(crate) fn rules() -> Vec<TriageRule> {
    vec![
        // TRI-001: chest pain radiating to arm/jaw or with numbness
        TriageRule {
            id: "TRI-001",
            score: 95,
            summary: "Severe chest pain, arm numbness",
            condition: RuleCondition::AllOf(&[CHEST_PAIN_KEYWORDS, RADIATING_KEYWORDS]),
            risk_conditions: CARDIAC_RISK,
        },
        TriageRule {
            id: "TRI-002",
            score: 90,
            summary: "Difficulty breathing",
            condition: RuleCondition::AnyKeyword(BREATHING_KEYWORDS),
            risk_conditions: RESPIRATORY_RISK,
        },
        TriageRule {
            id: "TRI-003",
            score: 95,
            summary: "Loss of consciousness",
            condition: RuleCondition::AnyKeyword(UNCONSCIOUS_KEYWORDS),
            risk_conditions: &[],
        },
        TriageRule {
            id: "TRI-004",
            score: 92,
            summary: "Possible stroke",
            condition: RuleCondition::AnyKeyword(STROKE_KEYWORDS),
            risk_conditions: STROKE_RISK,
        },
        TriageRule {
            id: "TRI-005",
            score: 90,
            summary: "Severe bleeding",
            condition: RuleCondition::AnyKeyword(BLEEDING_KEYWORDS),
            risk_conditions: BLEEDING_RISK,
        },
        TriageRule {
            id: "TRI-006",
            score: 88,
            summary: "Seizure",
            condition: RuleCondition::AnyKeyword(SEIZURE_KEYWORDS),
            risk_conditions: SEIZURE_RISK,
        },
        TriageRule {
            id: "TRI-007",
            score: 90,
            summary: "Possible anaphylaxis",
            condition: RuleCondition::AnyKeyword(ANAPHYLAXIS_KEYWORDS),
            risk_conditions: RESPIRATORY_RISK,
        },
        // TRI-010: chest pain without radiating signs
        TriageRule {
            id: "TRI-010",
            score: 75,
            summary: "Chest pain",
            condition: RuleCondition::AnyKeyword(CHEST_PAIN_KEYWORDS),
            risk_conditions: CARDIAC_RISK,
        },
        TriageRule {
            id: "TRI-011",
            score: 60,
            summary: "High fever",
            condition: RuleCondition::AnyKeyword(HIGH_FEVER_KEYWORDS),
            risk_conditions: FEVER_RISK,
        },
        TriageRule {
            id: "TRI-012",
            score: 65,
            summary: "Head injury",
            condition: RuleCondition::AnyKeyword(HEAD_INJURY_KEYWORDS),
            risk_conditions: BLEEDING_RISK,
        },
        TriageRule {
            id: "TRI-013",
            score: 55,
            summary: "Severe pain",
            condition: RuleCondition::AnyKeyword(SEVERE_PAIN_KEYWORDS),
            risk_conditions: &[],
        },
        TriageRule {
            id: "TRI-014",
            score: 70,
            summary: "Vomiting blood",
            condition: RuleCondition::AnyKeyword(VOMITING_BLOOD_KEYWORDS),
            risk_conditions: BLEEDING_RISK,
        },
    ]
}
