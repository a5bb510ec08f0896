use crate::config::toml_config::DefaultsConfig;
use crate::core::{Coordinates, QuoteRequest};
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_required_field, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "solar-quote")]
#[command(about = "Size a rooftop solar system and estimate its savings")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Site address, carried through to the quote
    #[arg(long, default_value = "")]
    pub address: String,

    /// Monthly consumption in kWh
    #[arg(long)]
    pub usage_kwh: Option<f64>,

    /// Monthly electricity bill, used when no usage is given
    #[arg(long)]
    pub bill: Option<f64>,

    /// Tariff per kWh (defaults from config)
    #[arg(long)]
    pub tariff: Option<f64>,

    /// Panel rating in watts (defaults from config)
    #[arg(long)]
    pub panel_wattage: Option<u32>,

    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Size for one month of the year (1-12) instead of the annual average
    #[arg(long)]
    pub month: Option<u8>,

    /// Skip the irradiance lookup and use the default sun-hours
    #[arg(long)]
    pub offline: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    /// `--lat` and `--lon` come as a pair or not at all.
    pub fn coordinates(&self) -> Result<Option<Coordinates>> {
        if self.lat.is_none() && self.lon.is_none() {
            return Ok(None);
        }
        let lat = *validate_required_field("lat", &self.lat)?;
        let lon = *validate_required_field("lon", &self.lon)?;
        Ok(Some(Coordinates::new(lat, lon)?))
    }

    pub fn to_request(&self, defaults: &DefaultsConfig) -> Result<QuoteRequest> {
        let coordinates = if self.offline {
            None
        } else {
            self.coordinates()?
        };

        Ok(QuoteRequest {
            address: self.address.clone(),
            usage_kwh: self.usage_kwh,
            bill_rands: self.bill,
            tariff_per_kwh: self.tariff.unwrap_or(defaults.tariff_per_kwh),
            panel_wattage: self.panel_wattage.unwrap_or(defaults.panel_wattage),
            coordinates,
            month: self.month,
        })
    }
}

impl Validate for CliArgs {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        Ok(())
    }
}
