use crate::config::toml_config::IrradianceConfig;
use crate::core::{Coordinates, IrradianceProvider, IrradianceSummary};
use crate::utils::error::{QuoteError, Result};
use async_trait::async_trait;
use chrono::Month;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const NASA_POWER_CLIMATOLOGY_URL: &str =
    "https://power.larc.nasa.gov/api/temporal/climatology/point";

const PARAMETERS: &str = "ALLSKY_SFC_SW_DWN,T2M,WS2M,RH2M";
const IRRADIANCE: &str = "ALLSKY_SFC_SW_DWN";
const ANNUAL: &str = "ANN";
const MONTH_KEYS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

type ParameterTable = HashMap<String, Option<f64>>;

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: HashMap<String, ParameterTable>,
}

/// Long-run climatology from the NASA POWER point API.
#[derive(Debug, Clone)]
pub struct NasaPowerProvider {
    client: Client,
    endpoint: String,
    community: String,
}

impl NasaPowerProvider {
    pub fn new(endpoint: impl Into<String>, community: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            community: community.into(),
        })
    }

    pub fn from_config(config: &IrradianceConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            config.community.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    async fn request(&self, point: Coordinates) -> Result<PowerResponse> {
        let query = [
            ("parameters", PARAMETERS.to_string()),
            ("community", self.community.clone()),
            ("latitude", point.latitude.to_string()),
            ("longitude", point.longitude.to_string()),
            ("format", "JSON".to_string()),
        ];

        tracing::debug!("Making irradiance request to: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).query(&query).send().await?;
        tracing::debug!("Irradiance response status: {}", response.status());

        if !response.status().is_success() {
            return Err(QuoteError::unavailable(format!(
                "irradiance service returned HTTP {}",
                response.status()
            )));
        }

        Ok(response.json::<PowerResponse>().await?)
    }
}

/// A usable value for `key`. POWER fills gaps with -999, and no parameter
/// read here can legitimately be negative, so any negative counts as missing.
fn reading(table: &ParameterTable, key: &str) -> Option<f64> {
    table
        .get(key)
        .copied()
        .flatten()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn month_key(month: Month) -> &'static str {
    MONTH_KEYS[month.number_from_month() as usize - 1]
}

/// Brightest month, earliest wins a tie.
fn optimal_month(table: &ParameterTable) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for (index, key) in MONTH_KEYS.iter().enumerate() {
        if let Some(value) = reading(table, key) {
            if best.map_or(true, |(_, top)| value > top) {
                best = Some((index as u32 + 1, value));
            }
        }
    }
    best.map(|(month, _)| month)
}

fn normalise(body: &PowerResponse, point: Coordinates, month: Option<Month>) -> Result<IrradianceSummary> {
    let parameters = &body.properties.parameter;
    let irradiance = parameters
        .get(IRRADIANCE)
        .ok_or_else(|| QuoteError::unavailable(format!("response has no {} parameter", IRRADIANCE)))?;

    let annual = reading(irradiance, ANNUAL)
        .ok_or_else(|| QuoteError::unavailable("no annual irradiance for this point"))?;

    let month_irradiance = match month {
        Some(m) => Some(reading(irradiance, month_key(m)).ok_or_else(|| {
            QuoteError::unavailable(format!("no irradiance for {}", m.name()))
        })?),
        None => None,
    };

    let annual_of = |name: &str| parameters.get(name).and_then(|t| reading(t, ANNUAL));

    Ok(IrradianceSummary {
        average_annual_irradiance: annual,
        // peak sun-hours at 1 kW/m² equal kWh/m²/day
        average_annual_sun_hours: annual,
        latitude: point.latitude,
        longitude: point.longitude,
        requested_month: month.map(|m| m.number_from_month()),
        month_irradiance,
        optimal_month: optimal_month(irradiance),
        temperature: annual_of("T2M"),
        wind_speed: annual_of("WS2M"),
        humidity: annual_of("RH2M"),
    })
}

#[async_trait]
impl IrradianceProvider for NasaPowerProvider {
    async fn fetch(&self, point: Coordinates, month: Option<Month>) -> Result<IrradianceSummary> {
        let result = self
            .request(point)
            .await
            .and_then(|body| normalise(&body, point, month));

        match result {
            Err(e) if !e.is_data_unavailable() => Err(QuoteError::unavailable(e.to_string())),
            result => result,
        }
    }
}
