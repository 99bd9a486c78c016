use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::{HistoricalFetchError, LookupError},
    model::{Coordinates, HistoricalSample, HistoricalSeries, LocationQuery, WeatherSnapshot},
    units::UnitSystem,
};

use super::{HistoricalSamples, WeatherLookup};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_PATH: &str = "/data/2.5/weather";
const TIMEMACHINE_PATH: &str = "/data/2.5/onecall/timemachine";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> reqwest::Result<(StatusCode, String)> {
        let res = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        Ok((status, body))
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    #[serde(default)]
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
    dt: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwHourly {
    dt: i64,
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwTimemachineResponse {
    #[serde(default)]
    timezone_offset: i32,
    #[serde(default)]
    hourly: Vec<OwHourly>,
}

/// OpenWeather sometimes reports "not found" as a 200 with `"cod": "404"`.
fn is_not_found_body(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("cod").cloned())
        .is_some_and(|cod| match cod {
            serde_json::Value::String(s) => s == "404",
            serde_json::Value::Number(n) => n.as_u64() == Some(404),
            _ => false,
        })
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn current(
        &self,
        query: &LocationQuery,
        unit: UnitSystem,
    ) -> Result<WeatherSnapshot, LookupError> {
        let (status, body) = self
            .get(
                CURRENT_PATH,
                &[("q", query.as_str().to_string()), ("units", unit.as_str().to_string())],
            )
            .await
            .map_err(|e| LookupError::Unavailable(format!("request failed: {e}")))?;

        if status == StatusCode::NOT_FOUND || is_not_found_body(&body) {
            return Err(LookupError::NotFound(query.to_string()));
        }

        if !status.is_success() {
            return Err(LookupError::Unavailable(format!(
                "status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| LookupError::Unavailable(format!("unexpected payload: {e}")))?;

        let (condition_code, condition_label) = parsed
            .weather
            .first()
            .map(|w| (w.id, w.main.clone()))
            .unwrap_or_else(|| (0, "Unknown".to_string()));

        let observed_at =
            parsed.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)).unwrap_or_else(Utc::now);

        Ok(WeatherSnapshot {
            location_name: parsed.name,
            coordinates: Coordinates { latitude: parsed.coord.lat, longitude: parsed.coord.lon },
            condition_code,
            condition_label,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            observed_at_unit_system: unit,
            observed_at,
        })
    }
}

#[async_trait]
impl HistoricalSamples for OpenWeatherClient {
    async fn hourly(
        &self,
        at: Coordinates,
        reference: DateTime<Utc>,
    ) -> Result<HistoricalSeries, HistoricalFetchError> {
        let (status, body) = self
            .get(
                TIMEMACHINE_PATH,
                &[
                    ("lat", at.latitude.to_string()),
                    ("lon", at.longitude.to_string()),
                    ("dt", reference.timestamp().to_string()),
                ],
            )
            .await
            .map_err(|e| HistoricalFetchError(format!("request failed: {e}")))?;

        if !status.is_success() {
            return Err(HistoricalFetchError(format!(
                "status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        let parsed: OwTimemachineResponse = serde_json::from_str(&body)
            .map_err(|e| HistoricalFetchError(format!("unexpected payload: {e}")))?;

        Ok(HistoricalSeries {
            samples: parsed
                .hourly
                .into_iter()
                .map(|h| HistoricalSample { timestamp: h.dt, temperature_kelvin: h.temp })
                .collect(),
            utc_offset_seconds: parsed.timezone_offset,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cod_404_in_either_form() {
        assert!(is_not_found_body(r#"{"cod":"404","message":"city not found"}"#));
        assert!(is_not_found_body(r#"{"cod":404}"#));
        assert!(!is_not_found_body(r#"{"cod":200}"#));
        assert!(!is_not_found_body("not json"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OpenWeatherClient::new("http://localhost:1234/", "KEY").unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }
}
