//! Application state shared by every dashboard action.

use chrono::NaiveDateTime;

use agriminder_core::{AppError, Config};
use agriminder_services::{
    evaluate, scheme_alerts, AgriStore, EligibilityOutcome, NewReminder, Reminder, Scheme,
};
use agriminder_weather::WeatherProvider;

use crate::dashboard::{DashboardSummary, WeatherPanel, FALLBACK_FARMER_NAME};

/// Owns the loaded config, the store, and the weather provider.
///
/// Actions run one at a time against this object; there is no global state.
#[derive(Debug)]
pub struct AgriContext {
    config: Config,
    store: AgriStore,
    provider: WeatherProvider,
    api_key: Option<String>,
}

impl AgriContext {
    /// Build from config. The API key is resolved once, environment first.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let store = AgriStore::new(&config.database.path);
        let provider = WeatherProvider::new(&config.weather)?;
        let api_key = config.weather.resolve_api_key();

        Ok(Self {
            config,
            store,
            provider,
            api_key,
        })
    }

    /// Replace the resolved API key
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Create tables and seed data; safe to call on every start.
    pub fn initialize(&self) -> Result<(), AppError> {
        self.store.initialize()?;
        tracing::info!("Store ready at {}", self.store.path().display());
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &AgriStore {
        &self.store
    }

    pub fn provider_mut(&mut self) -> &mut WeatherProvider {
        &mut self.provider
    }

    /// Gather the home screen as of `now`.
    ///
    /// Store failures are returned; weather failures become the panel's
    /// message.
    pub async fn dashboard(&mut self, now: NaiveDateTime) -> Result<DashboardSummary, AppError> {
        let settings = self.store.get_settings()?;
        let farmer_name = match settings.farmer_name.trim() {
            "" => FALLBACK_FARMER_NAME.to_string(),
            name => name.to_string(),
        };

        let upcoming = self
            .store
            .upcoming_reminders(now, self.config.dashboard.upcoming_reminders)?;
        let alerts = scheme_alerts(&self.store.list_schemes()?);

        let city = settings.default_city.trim().to_string();
        let weather = match self
            .provider
            .fetch_forecast(&city, self.api_key.as_deref())
            .await
        {
            Ok(data) => WeatherPanel::Forecast {
                city: data.city,
                units: self.provider.units(),
                days: data
                    .days
                    .into_iter()
                    .take(self.config.dashboard.forecast_days)
                    .collect(),
            },
            Err(e) => {
                if e.is_input_gap() {
                    tracing::debug!("Weather skipped: {}", e);
                } else {
                    tracing::warn!("Weather unavailable for {}: {}", city, e);
                }
                WeatherPanel::Unavailable {
                    city,
                    message: e.user_message(),
                }
            }
        };

        Ok(DashboardSummary {
            farmer_name,
            upcoming,
            scheme_alerts: alerts,
            weather,
        })
    }

    /// Quick action: store the sample irrigation reminder for tomorrow.
    pub fn add_sample_reminder(&self, now: NaiveDateTime) -> Result<Reminder, AppError> {
        Ok(self.store.add_reminder(&NewReminder::sample(now))?)
    }

    /// Evaluate `answers` against the scheme's checklist and store the result.
    pub fn save_eligibility(
        &self,
        scheme: &Scheme,
        answers: &[bool],
    ) -> Result<EligibilityOutcome, AppError> {
        let outcome = evaluate(&scheme.name, answers);
        if !self.store.set_scheme_eligibility(scheme.id, outcome.eligible)? {
            tracing::warn!("Scheme {} no longer exists; result not saved", scheme.id);
        }
        Ok(outcome)
    }
}
