use serde::{Deserialize, Serialize};

/// Government programs seeded into an empty store, in display order.
pub const SEEDED_SCHEMES: [&str; 8] = [
    "Pradhan Mantri Fasal Bima Yojana (PMFBY)",
    "Kisan Credit Card (KCC) Scheme",
    "PM-KISAN Samman Nidhi Yojana",
    "Soil Health Card Scheme",
    "PM-KUSUM Yojana",
    "Rashtriya Krishi Vikas Yojana (RKVY)",
    "e-NAM (National Agriculture Market)",
    "National Mission on Sustainable Agriculture (NMSA)",
];

/// Lowercase name fragments of the schemes surfaced as dashboard alerts
const ALERT_KEYS: [&str; 4] = ["fasal bima", "pmfby", "kisan credit", "kcc"];

/// Alerts shown when no scheme matches `ALERT_KEYS`
const FALLBACK_ALERT_COUNT: usize = 2;

/// A named government program with a stored eligibility flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: i64,
    pub name: String,
    pub eligible: bool,
}

impl Scheme {
    fn is_alert(&self) -> bool {
        let name = self.name.to_lowercase();
        ALERT_KEYS.iter().any(|k| name.contains(k))
    }
}

/// Pick the schemes for the dashboard's alert card.
///
/// Crop insurance and credit-card schemes come first; without them the
/// first two schemes are shown instead.
pub fn scheme_alerts(schemes: &[Scheme]) -> Vec<Scheme> {
    let alerts: Vec<Scheme> = schemes.iter().filter(|s| s.is_alert()).cloned().collect();
    if alerts.is_empty() {
        schemes.iter().take(FALLBACK_ALERT_COUNT).cloned().collect()
    } else {
        alerts
    }
}
