//! Centralized error types for the AgriMinder application.
//!
//! This module provides a typed error hierarchy that:
//! - Separates bad user input from storage and weather-service failures
//! - Provides user-friendly messages suitable for the dashboard
//! - Preserves full error context for logging

use thiserror::Error;

/// Top-level application error type.
///
/// No variant is fatal: every failure ends up as a displayed message.
/// Use `user_message()` to get the text to show.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.user_message(),
            AppError::Database(e) => e.user_message().to_string(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Weather(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

/// Rejected user input, tied to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Validation messages are written for the farmer already.
    pub fn user_message(&self) -> String {
        self.message.clone()
    }
}

/// Database/storage errors (SQLite data file).
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Data corruption detected: {0}")]
    Corruption(String),
}

impl DatabaseError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed(_) => {
                "Unable to access local data. Try restarting the app."
            }
            DatabaseError::QueryFailed(_) => "A data operation failed. Please try again.",
            DatabaseError::Corruption(_) => {
                "Local data may be corrupted. Consider resetting app data."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Weather forecast errors.
///
/// Input gaps (`MissingApiKey`, `MissingCity`) are checked before any
/// network traffic; the rest describe the provider's answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("No OpenWeather API key configured")]
    MissingApiKey,

    #[error("No city provided")]
    MissingCity,

    #[error("Invalid API key (401)")]
    Unauthorized,

    #[error("City not found (404)")]
    CityNotFound,

    #[error("Rate limit reached (429)")]
    RateLimited,

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Request failed: {detail}")]
    TransportError { detail: String },
}

impl WeatherError {
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::MissingApiKey => {
                "No OpenWeather API key configured. Set OPENWEATHER_API_KEY.".to_string()
            }
            WeatherError::MissingCity => "No city provided.".to_string(),
            WeatherError::Unauthorized => "Invalid API key (401).".to_string(),
            WeatherError::CityNotFound => "City not found (404). Try 'Delhi,IN'.".to_string(),
            WeatherError::RateLimited => "Rate limit reached (429).".to_string(),
            WeatherError::HttpError { body, .. } => body.clone(),
            WeatherError::TransportError { detail } => detail.clone(),
        }
    }

    /// True for gaps the user fixes through settings rather than by retrying.
    pub fn is_input_gap(&self) -> bool {
        matches!(self, WeatherError::MissingApiKey | WeatherError::MissingCity)
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_weather_error(self) -> WeatherError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_weather_error(self) -> WeatherError {
        let detail = if self.is_timeout() {
            format!("Request timed out: {}", self)
        } else if self.is_connect() {
            format!("Connection failed: {}", self)
        } else if self.is_decode() {
            format!("Invalid forecast response: {}", self)
        } else {
            self.to_string()
        };
        WeatherError::TransportError { detail }
    }
}

/// Extension trait for converting rusqlite errors to our error types.
pub trait RusqliteErrorExt {
    fn into_database_error(self) -> DatabaseError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_database_error(self) -> DatabaseError {
        match &self {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("corrupt") => {
                DatabaseError::Corruption(self.to_string())
            }
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::CannotOpen =>
            {
                DatabaseError::ConnectionFailed(self.to_string())
            }
            _ => DatabaseError::QueryFailed(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let err = WeatherError::CityNotFound;
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::Weather(WeatherError::CityNotFound)));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Weather(WeatherError::Unauthorized);
        assert_eq!(app_err.user_message(), "Invalid API key (401).");
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let app_err: AppError = ValidationError::new("title", "Title required.").into();
        assert_eq!(app_err.user_message(), "Title required.");
        assert_eq!(app_err.to_string(), "Validation error: title: Title required.");
    }

    #[test]
    fn test_http_error_shows_body() {
        let err = WeatherError::HttpError {
            status: 500,
            body: "upstream exploded".into(),
        };
        assert_eq!(err.user_message(), "upstream exploded");
        assert_eq!(err.to_string(), "HTTP 500: upstream exploded");
    }

    #[test]
    fn test_input_gaps() {
        assert!(WeatherError::MissingApiKey.is_input_gap());
        assert!(WeatherError::MissingCity.is_input_gap());
        assert!(!WeatherError::RateLimited.is_input_gap());
    }

    #[test]
    fn test_rusqlite_error_maps_to_query_failed() {
        let err = rusqlite::Error::QueryReturnedNoRows.into_database_error();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
