//! Dashboard snapshot and its plain-text rendering.

use std::fmt;

use agriminder_core::Units;
use agriminder_services::{Reminder, Scheme};
use agriminder_weather::ForecastDay;

/// Name shown when the profile has none
pub const FALLBACK_FARMER_NAME: &str = "Farmer";

/// Weather card contents
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherPanel {
    Forecast {
        city: String,
        units: Units,
        days: Vec<ForecastDay>,
    },
    /// The fetch failed or could not be attempted; `message` is user-facing.
    Unavailable { city: String, message: String },
}

impl WeatherPanel {
    pub fn city(&self) -> &str {
        match self {
            WeatherPanel::Forecast { city, .. } | WeatherPanel::Unavailable { city, .. } => city,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, WeatherPanel::Forecast { .. })
    }
}

/// Everything the home screen shows, gathered at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub farmer_name: String,
    pub upcoming: Vec<Reminder>,
    pub scheme_alerts: Vec<Scheme>,
    pub weather: WeatherPanel,
}

impl DashboardSummary {
    pub fn welcome(&self) -> String {
        format!("Welcome back, {}!", self.farmer_name)
    }
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.welcome())?;

        writeln!(f, "\nUpcoming reminders")?;
        if self.upcoming.is_empty() {
            writeln!(f, "  No upcoming reminders.")?;
        }
        for reminder in &self.upcoming {
            writeln!(f, "  {}  {}", reminder.display_time(), reminder.title)?;
        }

        writeln!(f, "\nScheme alerts")?;
        if self.scheme_alerts.is_empty() {
            writeln!(f, "  No schemes available.")?;
        }
        for scheme in &self.scheme_alerts {
            let mark = if scheme.eligible { "eligible" } else { "check eligibility" };
            writeln!(f, "  {} ({})", scheme.name, mark)?;
        }

        writeln!(f, "\nWeather: {}", self.weather.city())?;
        match &self.weather {
            WeatherPanel::Forecast { days, units, .. } => {
                if days.is_empty() {
                    writeln!(f, "  No forecast data.")?;
                }
                for (i, day) in days.iter().enumerate() {
                    let label = match day.date {
                        Some(date) => date.format("%a %b %d").to_string(),
                        None => format!("Day {}", i + 1),
                    };
                    writeln!(
                        f,
                        "  {}  {}  {}",
                        label,
                        day.headline(),
                        day.readings(*units)
                    )?;
                }
            }
            WeatherPanel::Unavailable { message, .. } => writeln!(f, "  {}", message)?,
        }

        Ok(())
    }
}
