//! Current conditions at the lift.
//!
//! Weather is decoration: a provider never fails, it answers with
//! [`Weather::unknown`] instead so the page always renders.

mod open_meteo;

pub use open_meteo::OpenMeteo;

use async_trait::async_trait;
use serde::Serialize;

/// Normalized weather read-out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    pub temperature_c: Option<f64>,
    pub snow_depth_cm: Option<f64>,
    pub last_updated_iso: Option<String>,
}

impl Weather {
    /// Neutral value set used whenever the provider cannot answer.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        self.temperature_c.is_none() && self.snow_depth_cm.is_none()
    }
}

/// Source of current weather.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self) -> Weather;
}
