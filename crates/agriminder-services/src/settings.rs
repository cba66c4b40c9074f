use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use agriminder_core::ValidationError;

/// Fixed id of the single settings row
pub const SETTINGS_ID: i64 = 1;

/// Preferred interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }

    pub fn all() -> &'static [Language] {
        &[Language::English, Language::Hindi]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::all()
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::new("language", format!("Unsupported language: {}", s)))
    }
}

/// Farmer profile (single-tenant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub farmer_name: String,
    /// Acres
    pub land_size: f64,
    /// Free text, comma separated by convention
    pub crops: String,
    pub default_city: String,
    pub language: Language,
}

impl Settings {
    /// Crops split on commas, blanks removed
    pub fn crop_list(&self) -> Vec<&str> {
        self.crops
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Reject values the store must never hold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.land_size.is_finite() || self.land_size < 0.0 {
            return Err(ValidationError::new(
                "land_size",
                "Land size must be zero or more acres.",
            ));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            farmer_name: "John Doe".to_string(),
            land_size: 2.0,
            crops: "Wheat, Rice".to_string(),
            default_city: "Delhi".to_string(),
            language: Language::English,
        }
    }
}
