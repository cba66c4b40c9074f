//! Scheme eligibility checklists.
//!
//! Each scheme maps to a fixed checklist by name; a farmer is eligible only
//! when every item is satisfied. Evaluation is pure: saving the outcome is a
//! separate `AgriStore::set_scheme_eligibility` call.

use serde::Serialize;

/// One checklist item with the answer pre-filled in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Criterion {
    pub text: &'static str,
    pub default: bool,
}

const fn criterion(text: &'static str, default: bool) -> Criterion {
    Criterion { text, default }
}

const CROP_INSURANCE: [Criterion; 3] = [
    criterion("Owns agricultural land", true),
    criterion("Crop insured under PMFBY", false),
    criterion("Annual income below ₹2,50,000", false),
];

const KISAN_CREDIT_CARD: [Criterion; 3] = [
    criterion("Owns agricultural land", true),
    criterion("Annual income below ₹3,00,000", false),
    criterion("Has valid Aadhaar card", true),
];

const GENERIC: [Criterion; 2] = [
    criterion("Owns agricultural land", true),
    criterion("Annual income below threshold", false),
];

/// Lowercase name fragment -> checklist. First match wins.
const CRITERIA_TABLE: [(&str, &[Criterion]); 2] = [
    ("fasal bima", &CROP_INSURANCE),
    ("kisan credit card", &KISAN_CREDIT_CARD),
];

/// Checklist for a scheme, falling back to the generic two-item list.
pub fn criteria_for(scheme_name: &str) -> &'static [Criterion] {
    let name = scheme_name.to_lowercase();
    CRITERIA_TABLE
        .iter()
        .find(|(key, _)| name.contains(key))
        .map(|(_, criteria)| *criteria)
        .unwrap_or(&GENERIC)
}

/// Pre-filled answers for a scheme's checklist
pub fn default_answers(scheme_name: &str) -> Vec<bool> {
    criteria_for(scheme_name).iter().map(|c| c.default).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EligibilityOutcome {
    pub met_count: usize,
    pub total_count: usize,
    pub eligible: bool,
}

impl EligibilityOutcome {
    /// Fraction of criteria met, for a progress bar
    pub fn progress(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.met_count as f64 / self.total_count as f64
    }
}

/// Score `answers` against the scheme's checklist, position by position.
///
/// Missing answers count as unmet; answers past the end of the checklist
/// are ignored.
pub fn evaluate(scheme_name: &str, answers: &[bool]) -> EligibilityOutcome {
    let total_count = criteria_for(scheme_name).len();
    let met_count = answers.iter().take(total_count).filter(|a| **a).count();

    EligibilityOutcome {
        met_count,
        total_count,
        eligible: met_count == total_count,
    }
}
