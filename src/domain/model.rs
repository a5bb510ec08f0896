use crate::utils::error::{QuoteError, Result};
use crate::utils::validation::{
    validate_finite, validate_non_negative, validate_positive, validate_range, Validate,
};
use chrono::Month;
use serde::{Deserialize, Serialize};

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }
}

impl Validate for Coordinates {
    fn validate(&self) -> Result<()> {
        validate_range("latitude", self.latitude, -90.0, 90.0)?;
        validate_range("longitude", self.longitude, -180.0, 180.0)
    }
}

/// What the caller asks for. Nothing here is trusted until `validate` passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub address: String,
    #[serde(default)]
    pub usage_kwh: Option<f64>,
    #[serde(default)]
    pub bill_rands: Option<f64>,
    pub tariff_per_kwh: f64,
    pub panel_wattage: u32,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    /// Month of year (1-12) to size for; annual average when absent.
    #[serde(default)]
    pub month: Option<u8>,
}

impl QuoteRequest {
    /// Monthly consumption the quote is sized against.
    ///
    /// A positive `usage_kwh` wins; otherwise a positive bill is converted at
    /// the tariff. Anything else is a validation error.
    pub fn resolve_usage_kwh(&self) -> Result<f64> {
        if let Some(usage) = self.usage_kwh.filter(|u| *u > 0.0) {
            return Ok(usage);
        }
        if let Some(bill) = self.bill_rands.filter(|b| *b > 0.0) {
            let derived = bill / self.tariff_per_kwh;
            validate_finite("usage_kwh", derived)?;
            return Ok(derived);
        }
        Err(QuoteError::validation(
            "usage_kwh",
            format!("{:?} / bill_rands {:?}", self.usage_kwh, self.bill_rands),
            "either a positive monthly usage or a positive monthly bill is required",
        ))
    }

    pub fn month_of_year(&self) -> Result<Option<Month>> {
        self.month
            .map(|m| {
                Month::try_from(m).map_err(|_| QuoteError::validation("month", m, "must be between 1 and 12"))
            })
            .transpose()
    }
}

impl Validate for QuoteRequest {
    fn validate(&self) -> Result<()> {
        validate_positive("tariff_per_kwh", self.tariff_per_kwh)?;
        if self.panel_wattage == 0 {
            return Err(QuoteError::validation(
                "panel_wattage",
                self.panel_wattage,
                "must be greater than 0",
            ));
        }
        if let Some(usage) = self.usage_kwh {
            validate_non_negative("usage_kwh", usage)?;
        }
        if let Some(bill) = self.bill_rands {
            validate_non_negative("bill_rands", bill)?;
        }
        self.resolve_usage_kwh()?;
        if let Some(point) = &self.coordinates {
            point.validate()?;
        }
        self.month_of_year()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SunHoursSource {
    /// Taken from a successful irradiance lookup.
    Measured,
    /// The configured fallback, because no lookup was made or it failed.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunHours {
    pub value: f64,
    pub source: SunHoursSource,
}

impl SunHours {
    pub fn measured(value: f64) -> Self {
        Self {
            value,
            source: SunHoursSource::Measured,
        }
    }

    pub fn default_value(value: f64) -> Self {
        Self {
            value,
            source: SunHoursSource::Default,
        }
    }
}

/// Fully resolved, validated inputs to the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteInputs {
    address: String,
    usage_kwh: Option<f64>,
    bill_rands: Option<f64>,
    monthly_usage_kwh: f64,
    tariff_per_kwh: f64,
    panel_wattage: u32,
    coordinates: Option<Coordinates>,
    sun_hours_per_day: f64,
    sun_hours_source: SunHoursSource,
}

impl QuoteInputs {
    pub fn from_request(request: &QuoteRequest, sun_hours: SunHours) -> Result<Self> {
        request.validate()?;
        validate_non_negative("sun_hours_per_day", sun_hours.value)?;
        Ok(Self {
            address: request.address.clone(),
            usage_kwh: request.usage_kwh,
            bill_rands: request.bill_rands,
            monthly_usage_kwh: request.resolve_usage_kwh()?,
            tariff_per_kwh: request.tariff_per_kwh,
            panel_wattage: request.panel_wattage,
            coordinates: request.coordinates,
            sun_hours_per_day: sun_hours.value,
            sun_hours_source: sun_hours.source,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn usage_kwh(&self) -> Option<f64> {
        self.usage_kwh
    }

    pub fn bill_rands(&self) -> Option<f64> {
        self.bill_rands
    }

    pub fn monthly_usage_kwh(&self) -> f64 {
        self.monthly_usage_kwh
    }

    pub fn tariff_per_kwh(&self) -> f64 {
        self.tariff_per_kwh
    }

    pub fn panel_wattage(&self) -> u32 {
        self.panel_wattage
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn sun_hours_per_day(&self) -> f64 {
        self.sun_hours_per_day
    }

    pub fn sun_hours_source(&self) -> SunHoursSource {
        self.sun_hours_source
    }
}

/// Normalised long-run irradiance for one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrradianceSummary {
    /// kWh/m²/day
    pub average_annual_irradiance: f64,
    /// Peak sun-hours per day
    pub average_annual_sun_hours: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_month: Option<u32>,
    /// Irradiance for `requested_month`, kWh/m²/day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_irradiance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

impl IrradianceSummary {
    /// Sun-hours to size against: the requested month when there is one.
    pub fn sun_hours(&self) -> f64 {
        self.month_irradiance
            .unwrap_or(self.average_annual_sun_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteOutputs {
    pub panel_count: u64,
    pub system_size_kw: f64,
    pub inverter_size_kw: f64,
    pub monthly_savings: f64,
    pub estimated_monthly_generation_kwh: f64,
    /// 0 means "not computable", not "pays back immediately".
    pub payback_months: u64,
    pub estimated_system_cost: f64,
    pub usage_kwh: f64,
    pub tariff: f64,
    pub panel_wattage: u32,
    pub sun_hours_per_day: f64,
    pub used_default_irradiance: bool,
}

/// A finished quote, handed to whatever persists or renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub inputs: QuoteInputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irradiance: Option<IrradianceSummary>,
    pub outputs: QuoteOutputs,
}
