//! Integration tests for WeatherProvider using wiremock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use agriminder_core::{Units, WeatherConfig, WeatherError};
use agriminder_weather::WeatherProvider;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-key";

fn config_for(server: &MockServer) -> WeatherConfig {
    WeatherConfig {
        api_base_url: server.uri(),
        ..WeatherConfig::default()
    }
}

fn series_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 21)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Helper to create a raw 3-hourly slot
fn slot(ts: NaiveDateTime, temp: f64, description: &str) -> serde_json::Value {
    serde_json::json!({
        "dt": ts.and_utc().timestamp(),
        "main": {"temp": temp, "feels_like": temp, "humidity": 60},
        "weather": [{"id": 800, "main": "Clear", "description": description}],
        "wind": {"speed": 2.1, "deg": 90},
        "dt_txt": ts.format("%Y-%m-%d %H:%M:%S").to_string()
    })
}

/// `count` slots three hours apart starting at `first`
fn forecast_body(first: NaiveDateTime, count: usize) -> serde_json::Value {
    let list: Vec<_> = (0..count)
        .map(|i| {
            let ts = first + Duration::hours(3 * i as i64);
            let description = if ts.format("%H").to_string() == "12" {
                "clear sky"
            } else {
                "night"
            };
            slot(ts, 20.0 + i as f64, description)
        })
        .collect();
    serde_json::json!({"cod": "200", "cnt": count, "list": list})
}

#[tokio::test]
async fn test_fetch_forecast_five_noon_days() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Delhi"))
        .and(query_param("appid", KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(series_start(), 40)))
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    let data = provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap();

    assert_eq!(data.city, "Delhi");
    assert_eq!(data.days.len(), 5);
    assert_eq!(data.days[0].date, Some(series_start().date()));
    assert!(data.days.iter().all(|d| d.description == "clear sky"));
    assert_eq!(data.days[0].temperature, 24.0);
    assert_eq!(data.days[0].humidity, 60);
    assert!(data.days.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn test_fetch_forecast_imperial_units_and_trimmed_city() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Pune,IN"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(series_start(), 8)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = WeatherConfig {
        units: Units::Imperial,
        ..config_for(&mock_server)
    };
    let mut provider = WeatherProvider::new(&config).unwrap();
    let data = provider.fetch_forecast("  Pune,IN ", Some(KEY)).await.unwrap();

    assert_eq!(data.city, "Pune,IN");
    assert_eq!(data.days.len(), 1);
}

#[tokio::test]
async fn test_fetch_forecast_without_noon_slots_falls_back() {
    let mock_server = MockServer::start().await;

    // 01:00, 04:00, ... never noon
    let first = series_start() + Duration::hours(1);
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(first, 40)))
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    let data = provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap();

    assert_eq!(data.days.len(), 5);
    let temps: Vec<f64> = data.days.iter().map(|d| d.temperature).collect();
    assert_eq!(temps, vec![20.0, 28.0, 36.0, 44.0, 52.0]);
}

#[tokio::test]
async fn test_fetch_forecast_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"list": []})))
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    let data = provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap();
    assert!(data.days.is_empty());
}

#[tokio::test]
async fn test_fetch_forecast_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    let err = provider.fetch_forecast("Delhi", Some("bad")).await.unwrap_err();

    assert_eq!(err, WeatherError::Unauthorized);
    assert_eq!(err.user_message(), "Invalid API key (401).");
}

#[tokio::test]
async fn test_fetch_forecast_city_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(404).set_body_string("city not found"))
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    let err = provider.fetch_forecast("Atlantis", Some(KEY)).await.unwrap_err();

    assert_eq!(err, WeatherError::CityNotFound);
    assert!(err.user_message().contains("Delhi,IN"));
}

#[tokio::test]
async fn test_fetch_forecast_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    let err = provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap_err();
    assert_eq!(err, WeatherError::RateLimited);
}

#[tokio::test]
async fn test_fetch_forecast_other_status_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    let err = provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap_err();

    assert_eq!(
        err,
        WeatherError::HttpError {
            status: 500,
            body: "upstream exploded".to_string()
        }
    );
    assert_eq!(err.user_message(), "upstream exploded");
}

#[tokio::test]
async fn test_fetch_forecast_malformed_body_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    let err = provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap_err();
    assert!(matches!(err, WeatherError::TransportError { .. }));
}

#[tokio::test]
async fn test_fetch_forecast_server_unreachable() {
    // Use a non-pooled server so dropping it actually closes the port.
    let mock_server = MockServer::builder().start().await;
    let config = config_for(&mock_server);
    drop(mock_server);

    let mut provider = WeatherProvider::new(&config).unwrap();
    let err = provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap_err();
    assert!(matches!(err, WeatherError::TransportError { .. }));
}

#[tokio::test]
async fn test_fetch_forecast_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body(series_start(), 8))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = WeatherConfig {
        timeout_secs: 1,
        ..config_for(&mock_server)
    };
    let mut provider = WeatherProvider::new(&config).unwrap();
    let err = provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap_err();

    match err {
        WeatherError::TransportError { detail } => assert!(detail.contains("timed out")),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_second_fetch_served_from_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(series_start(), 40)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    let first = provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap();
    let second = provider.fetch_forecast("delhi ", Some(KEY)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.cache().len(), 1);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    assert!(provider.fetch_forecast("Delhi", Some(KEY)).await.is_err());
    assert!(provider.fetch_forecast("Delhi", Some(KEY)).await.is_err());
    assert!(provider.cache().is_empty());
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(series_start(), 16)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap();
    assert!(provider.cache_mut().invalidate("Delhi"));
    provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap();
}

#[tokio::test]
async fn test_missing_api_key_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();

    let err = provider.fetch_forecast("Delhi", None).await.unwrap_err();
    assert_eq!(err, WeatherError::MissingApiKey);

    let err = provider.fetch_forecast("Delhi", Some("   ")).await.unwrap_err();
    assert_eq!(err, WeatherError::MissingApiKey);

    // Key is checked before the city
    let err = provider.fetch_forecast("", None).await.unwrap_err();
    assert_eq!(err, WeatherError::MissingApiKey);
}

#[tokio::test]
async fn test_missing_city_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut provider = WeatherProvider::new(&config_for(&mock_server)).unwrap();
    let err = provider.fetch_forecast("   ", Some(KEY)).await.unwrap_err();

    assert_eq!(err, WeatherError::MissingCity);
    assert!(err.is_input_gap());
}

#[tokio::test]
async fn test_stale_entries_dropped_on_next_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(series_start(), 8)))
        .mount(&mock_server)
        .await;

    // A zero TTL makes every stored entry stale immediately
    let config = WeatherConfig {
        cache_ttl_minutes: 0,
        ..config_for(&mock_server)
    };
    let mut provider = WeatherProvider::new(&config).unwrap();

    provider.fetch_forecast("Delhi", Some(KEY)).await.unwrap();
    assert_eq!(provider.cache().len(), 1);

    provider.fetch_forecast("Pune", Some(KEY)).await.unwrap();
    assert_eq!(provider.cache().len(), 1);
}
