/*
 *  weather.rs
 *
 *  inkwx - weather you can wait for
 *  (c) 2024-26 inkwx contributors
 *
 *  OpenWeatherMap client: one-call current/hourly/alerts feed plus the
 *  3-hour rain forecast feed, normalized into the render model.
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
use log::{debug, warn};
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

const ONECALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";
const RAIN_FEED_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Rain feed slots: 17 x 3h covers the 48 hourly entries with room over.
const RAIN_FEED_SLOTS: u32 = 17;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather API returned {0}")]
    Status(StatusCode),
    #[error("malformed weather payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Normalized snapshot handed to the render engine. Everything the five
/// layouts need, nothing of the wire format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    pub current: Current,
    pub hourly: Vec<Hourly>,
    pub alerts: Vec<Alert>,
    /// 3-hour rain volumes (mm); hour i reads bucket `bucket_for_hour(i)`.
    pub rain_buckets: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Current {
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hourly {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alert {
    pub start: i64,
    pub event: String,
    pub sender_name: String,
    pub description: String,
}

/// Hourly index to rain-feed slot.
pub fn bucket_for_hour(i: usize) -> usize {
    i / 3
}

// ---- wire payloads -------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ConditionTag {
    #[serde(default)]
    icon: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    #[serde(default)]
    dt: i64,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    pressure: f64,
    #[serde(default)]
    weather: Vec<ConditionTag>,
}

#[derive(Debug, Deserialize)]
struct HourlyPayload {
    #[serde(default)]
    dt: i64,
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    pressure: f64,
    #[serde(default)]
    weather: Vec<ConditionTag>,
}

#[derive(Debug, Deserialize)]
struct AlertPayload {
    #[serde(default)]
    start: i64,
    #[serde(default)]
    event: String,
    #[serde(default)]
    sender_name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OneCallPayload {
    current: CurrentPayload,
    #[serde(default)]
    hourly: Vec<HourlyPayload>,
    #[serde(default)]
    alerts: Vec<AlertPayload>,
}

#[derive(Debug, Deserialize)]
struct RainVolume {
    #[serde(rename = "3h", default)]
    three_hour: f64,
}

#[derive(Debug, Deserialize)]
struct RainSlot {
    rain: Option<RainVolume>,
}

#[derive(Debug, Deserialize)]
struct RainFeedPayload {
    #[serde(default)]
    list: Vec<RainSlot>,
}

fn first_tag(tags: &[ConditionTag]) -> (String, String) {
    tags.first()
        .map(|t| (t.icon.clone(), t.description.clone()))
        .unwrap_or_default()
}

fn normalize(payload: OneCallPayload, rain: RainFeedPayload) -> Forecast {
    let (code, description) = first_tag(&payload.current.weather);
    let current = Current {
        temp: payload.current.temp,
        feels_like: payload.current.feels_like,
        pressure: payload.current.pressure,
        dt: payload.current.dt,
        sunrise: payload.current.sunrise,
        sunset: payload.current.sunset,
        code,
        description,
    };
    let hourly = payload
        .hourly
        .into_iter()
        .map(|h| {
            let (code, description) = first_tag(&h.weather);
            Hourly {
                dt: h.dt,
                temp: h.temp,
                feels_like: h.feels_like,
                humidity: h.humidity,
                pressure: h.pressure,
                code,
                description,
            }
        })
        .collect();
    let alerts = payload
        .alerts
        .into_iter()
        .map(|a| Alert {
            start: a.start,
            event: a.event,
            sender_name: a.sender_name,
            description: a.description,
        })
        .collect();
    let rain_buckets = rain
        .list
        .into_iter()
        .map(|slot| slot.rain.map(|r| r.three_hour).unwrap_or(0.0))
        .collect();
    Forecast { current, hourly, alerts, rain_buckets }
}

/// HTTP client for both feeds. Cheap to clone; one instance lives for
/// the daemon's lifetime.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
}

impl WeatherClient {
    pub fn new() -> Result<Self, WeatherError> {
        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(USER_AGENT));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch and normalize both feeds. The one-call feed is load-bearing
    /// and fails the fetch; the rain feed degrades to empty buckets.
    pub async fn fetch(&self, cfg: &Config) -> Result<Forecast, WeatherError> {
        let primary = self
            .client
            .get(ONECALL_URL)
            .query(&[
                ("lat", cfg.lat.as_str()),
                ("lon", cfg.lon.as_str()),
                ("appid", cfg.api_key.as_str()),
                ("units", cfg.unit.api_str()),
                ("exclude", "daily"),
            ])
            .send()
            .await?;
        if !primary.status().is_success() {
            return Err(WeatherError::Status(primary.status()));
        }
        let body = primary.text().await?;
        let payload: OneCallPayload = serde_json::from_str(&body)?;
        debug!(
            "one-call feed: {} hourly entries, {} alerts",
            payload.hourly.len(),
            payload.alerts.len()
        );

        // the rain feed is only consulted when the overlay is enabled
        let rain = if cfg.rain_overlay {
            match self.fetch_rain_feed(cfg).await {
                Ok(rain) => rain,
                Err(e) => {
                    // graph mode renders without the rain overlay
                    warn!("rain feed unavailable: {e}");
                    RainFeedPayload { list: Vec::new() }
                }
            }
        } else {
            RainFeedPayload { list: Vec::new() }
        };

        Ok(normalize(payload, rain))
    }

    async fn fetch_rain_feed(&self, cfg: &Config) -> Result<RainFeedPayload, WeatherError> {
        let cnt = RAIN_FEED_SLOTS.to_string();
        let resp = self
            .client
            .get(RAIN_FEED_URL)
            .query(&[
                ("lat", cfg.lat.as_str()),
                ("lon", cfg.lon.as_str()),
                ("appid", cfg.api_key.as_str()),
                ("units", cfg.unit.api_str()),
                ("cnt", cnt.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(WeatherError::Status(resp.status()));
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
