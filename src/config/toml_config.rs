use crate::adapters::nasa_power::NASA_POWER_CLIMATOLOGY_URL;
use crate::core::engine::{CostModel, QuoteEngine, SizingAssumptions};
use crate::core::policy::{SunHoursPolicy, DEFAULT_SUN_HOURS_PER_DAY};
use crate::utils::error::{QuoteError, Result};
use crate::utils::validation::{
    validate_non_negative, validate_positive, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings the quote is computed with. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub defaults: DefaultsConfig,
    pub assumptions: SizingAssumptions,
    pub costs: CostModel,
    pub irradiance: IrradianceConfig,
}

/// Values used when the caller leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub tariff_per_kwh: f64,
    pub panel_wattage: u32,
    pub sun_hours_per_day: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tariff_per_kwh: 2.5,
            panel_wattage: 550,
            sun_hours_per_day: DEFAULT_SUN_HOURS_PER_DAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrradianceConfig {
    pub endpoint: String,
    pub community: String,
    pub timeout_seconds: u64,
}

impl Default for IrradianceConfig {
    fn default() -> Self {
        Self {
            endpoint: NASA_POWER_CLIMATOLOGY_URL.to_string(),
            community: "RE".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl QuoteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QuoteError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| QuoteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SOLAR_TARIFF})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| QuoteError::ConfigError {
            message: format!("bad substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn engine(&self) -> QuoteEngine {
        QuoteEngine::new(self.assumptions, self.costs)
    }

    pub fn sun_hours_policy(&self) -> SunHoursPolicy {
        SunHoursPolicy::new(self.defaults.sun_hours_per_day)
    }
}

impl Validate for QuoteConfig {
    fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        validate_positive("defaults.tariff_per_kwh", d.tariff_per_kwh)?;
        if d.panel_wattage == 0 {
            return Err(QuoteError::InvalidConfigValueError {
                field: "defaults.panel_wattage".to_string(),
                value: d.panel_wattage.to_string(),
                reason: "Value must be at least 1".to_string(),
            });
        }
        validate_non_negative("defaults.sun_hours_per_day", d.sun_hours_per_day)?;

        let a = &self.assumptions;
        validate_positive("assumptions.days_per_month", a.days_per_month)?;
        // a ratio above 1 would let savings exceed the bill
        validate_range("assumptions.self_consumption_ratio", a.self_consumption_ratio, 0.0, 1.0)?;
        validate_range("assumptions.inverter_ratio", a.inverter_ratio, 0.0, 1.0)?;
        validate_non_negative("assumptions.min_inverter_kw", a.min_inverter_kw)?;

        let c = &self.costs;
        validate_non_negative("costs.panel_cost", c.panel_cost)?;
        validate_non_negative("costs.inverter_cost_per_kw", c.inverter_cost_per_kw)?;
        validate_non_negative("costs.install_cost_per_kw", c.install_cost_per_kw)?;

        validate_url("irradiance.endpoint", &self.irradiance.endpoint)?;
        if self.irradiance.timeout_seconds == 0 {
            return Err(QuoteError::InvalidConfigValueError {
                field: "irradiance.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Value must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
