//! Open-Meteo forecast client.

use async_trait::async_trait;
use serde::Deserialize;

use super::{Weather, WeatherProvider};
use crate::config::WeatherConfig;

/// Client for the Open-Meteo `current` forecast.
pub struct OpenMeteo {
    http_client: reqwest::Client,
    url: String,
    coordinates: Option<(f64, f64)>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    temperature_2m: Option<f64>,
    /// Metres
    #[serde(default)]
    snow_depth: Option<f64>,
}

impl OpenMeteo {
    pub fn new(config: &WeatherConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
            coordinates: config.coordinates,
        })
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Weather, reqwest::Error> {
        let response: ForecastResponse = self
            .http_client
            .get(&self.url)
            .query(&forecast_query(latitude, longitude))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(normalize(response))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteo {
    async fn current(&self) -> Weather {
        let Some((latitude, longitude)) = self.coordinates else {
            tracing::debug!("Weather coordinates not configured");
            return Weather::unknown();
        };

        match self.fetch(latitude, longitude).await {
            Ok(weather) => {
                if weather.is_unknown() {
                    tracing::debug!("Forecast carried no current conditions");
                }
                weather
            }
            Err(e) => {
                tracing::warn!("Weather fetch failed: {}", e);
                Weather::unknown()
            }
        }
    }
}

fn forecast_query(latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", latitude.to_string()),
        ("longitude", longitude.to_string()),
        ("current", "temperature_2m,snow_depth".to_string()),
        ("timezone", "auto".to_string()),
    ]
}

fn normalize(response: ForecastResponse) -> Weather {
    let Some(current) = response.current else {
        return Weather::unknown();
    };

    Weather {
        temperature_c: current.temperature_2m,
        snow_depth_cm: current.snow_depth.map(|m| (m * 100.0).round()),
        last_updated_iso: current.time,
    }
}
