//! Weather forecasts for AgriMinder
//!
//! Fetches the OpenWeather 5-day / 3-hour forecast, reduces it to one
//! reading per day, and caches results per city for a short window.

pub mod cache;
pub mod normalize;
pub mod provider;
pub mod types;

pub use cache::{WeatherCache, DEFAULT_TTL};
pub use normalize::{reduce_forecast, MAX_FORECAST_DAYS};
pub use provider::WeatherProvider;
pub use types::*;
