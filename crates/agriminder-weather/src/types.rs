use agriminder_core::Units;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// `dt_txt` layout used by the forecast API
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One calendar day's representative reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// `None` when the raw slot carried no usable timestamp
    pub date: Option<NaiveDate>,
    pub temperature: f64,
    pub description: String,
    /// Percent
    pub humidity: u8,
    pub wind_speed: f64,
}

impl ForecastDay {
    /// Description with its first letter capitalized ("light rain" -> "Light rain")
    pub fn headline(&self) -> String {
        let mut chars = self.description.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// One-line reading, e.g. `31.2°C | 40% humidity | 3.6 m/s wind`
    pub fn readings(&self, units: Units) -> String {
        format!(
            "{}{} | {}% humidity | {} {} wind",
            self.temperature,
            units.temperature_suffix(),
            self.humidity,
            self.wind_speed,
            units.wind_suffix()
        )
    }
}

/// A normalized forecast for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub city: String,
    /// At most five days in series order, one per known date
    pub days: Vec<ForecastDay>,
    pub fetched_at: DateTime<Utc>,
}

/// Raw `/forecast` response body
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

/// One 3-hour slot of the raw series
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// Unix seconds, UTC
    #[serde(default)]
    pub dt: Option<i64>,
    /// `YYYY-MM-DD HH:MM:SS`, UTC
    #[serde(default)]
    pub dt_txt: Option<String>,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionText>,
    pub wind: Wind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionText {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

impl ForecastEntry {
    /// Slot time from `dt_txt`, falling back to `dt`
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.dt_txt
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), DT_TXT_FORMAT).ok())
            .or_else(|| {
                self.dt
                    .and_then(|secs| DateTime::from_timestamp(secs, 0))
                    .map(|dt| dt.naive_utc())
            })
    }

    pub fn to_day(&self, date: Option<NaiveDate>) -> ForecastDay {
        ForecastDay {
            date,
            temperature: self.main.temp,
            description: self
                .weather
                .first()
                .map(|w| w.description.clone())
                .unwrap_or_default(),
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
        }
    }
}
