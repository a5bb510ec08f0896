use crate::domain::model::{IrradianceSummary, SunHours};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUN_HOURS_PER_DAY: f64 = 5.0;

/// What to size against when no irradiance figure is available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunHoursPolicy {
    pub default_sun_hours: f64,
}

impl Default for SunHoursPolicy {
    fn default() -> Self {
        Self {
            default_sun_hours: DEFAULT_SUN_HOURS_PER_DAY,
        }
    }
}

impl SunHoursPolicy {
    pub fn new(default_sun_hours: f64) -> Self {
        Self { default_sun_hours }
    }

    pub fn resolve(&self, summary: Option<&IrradianceSummary>) -> SunHours {
        match summary {
            Some(summary) => SunHours::measured(summary.sun_hours()),
            None => SunHours::default_value(self.default_sun_hours),
        }
    }
}
