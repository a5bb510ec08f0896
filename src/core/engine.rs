use crate::domain::model::{QuoteInputs, QuoteOutputs, SunHoursSource};
use serde::{Deserialize, Serialize};

/// Billing months are treated as 30 days, not calendar months.
pub const DAYS_PER_MONTH: f64 = 30.0;
/// Share of monthly consumption offset by self-generation.
pub const SELF_CONSUMPTION_RATIO: f64 = 0.8;
/// Inverter capacity relative to array capacity.
pub const INVERTER_RATIO: f64 = 0.8;
/// Smallest inverter quoted, in kW, however small the array.
pub const MIN_INVERTER_KW: f64 = 1.0;

/// Domain constants the sizing heuristics are built on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingAssumptions {
    pub days_per_month: f64,
    pub self_consumption_ratio: f64,
    pub inverter_ratio: f64,
    pub min_inverter_kw: f64,
}

impl Default for SizingAssumptions {
    fn default() -> Self {
        Self {
            days_per_month: DAYS_PER_MONTH,
            self_consumption_ratio: SELF_CONSUMPTION_RATIO,
            inverter_ratio: INVERTER_RATIO,
            min_inverter_kw: MIN_INVERTER_KW,
        }
    }
}

/// Installed-cost model, in the tariff's currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    pub panel_cost: f64,
    pub inverter_cost_per_kw: f64,
    pub install_cost_per_kw: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            panel_cost: 2200.0,
            inverter_cost_per_kw: 3500.0,
            install_cost_per_kw: 4500.0,
        }
    }
}

impl CostModel {
    /// Hardware plus installation for a system of the given shape.
    pub fn system_cost(&self, panel_count: u64, inverter_size_kw: f64, system_size_kw: f64) -> f64 {
        panel_count as f64 * self.panel_cost
            + inverter_size_kw * self.inverter_cost_per_kw
            + system_size_kw * self.install_cost_per_kw
    }
}

/// Rounds to two decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Panels needed to reach `system_size_kw`; 0 when there is nothing to size.
pub fn panel_count(system_size_kw: f64, panel_wattage: u32) -> u64 {
    if panel_wattage == 0 || system_size_kw <= 0.0 {
        return 0;
    }
    (system_size_kw / (panel_wattage as f64 / 1000.0)).ceil() as u64
}

/// Months of savings needed to cover `system_cost`. 0 is the sentinel for
/// "not computable".
pub fn payback_months(system_cost: f64, monthly_savings: f64) -> u64 {
    if monthly_savings <= 0.0 || system_cost <= 0.0 {
        return 0;
    }
    (system_cost / monthly_savings).ceil() as u64
}

/// Sizing and financial estimation. Pure: no I/O, no hidden state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuoteEngine {
    assumptions: SizingAssumptions,
    costs: CostModel,
}

impl QuoteEngine {
    pub fn new(assumptions: SizingAssumptions, costs: CostModel) -> Self {
        Self { assumptions, costs }
    }

    pub fn assumptions(&self) -> &SizingAssumptions {
        &self.assumptions
    }

    pub fn costs(&self) -> &CostModel {
        &self.costs
    }

    /// Array capacity (kWp) covering `monthly_usage_kwh`, unrounded.
    ///
    /// Zero sun-hours or zero usage both give a 0 kW system.
    pub fn system_size_kw(&self, monthly_usage_kwh: f64, sun_hours_per_day: f64) -> f64 {
        if sun_hours_per_day <= 0.0 || monthly_usage_kwh <= 0.0 {
            return 0.0;
        }
        let daily_kwh = monthly_usage_kwh / self.assumptions.days_per_month;
        daily_kwh / sun_hours_per_day
    }

    pub fn calculate(&self, inputs: &QuoteInputs) -> QuoteOutputs {
        let a = &self.assumptions;
        let usage_kwh = inputs.monthly_usage_kwh();
        let tariff = inputs.tariff_per_kwh();
        let sun_hours = inputs.sun_hours_per_day();

        let system_size_kw = self.system_size_kw(usage_kwh, sun_hours);
        let panels = panel_count(system_size_kw, inputs.panel_wattage());
        let inverter_size_kw = (system_size_kw * a.inverter_ratio).max(a.min_inverter_kw);
        let generation_kwh = system_size_kw * sun_hours * a.days_per_month;

        // no array, nothing offset and nothing to pay back
        let (monthly_savings, system_cost) = if system_size_kw > 0.0 {
            (
                usage_kwh * tariff * a.self_consumption_ratio,
                self.costs.system_cost(panels, inverter_size_kw, system_size_kw),
            )
        } else {
            (0.0, 0.0)
        };

        QuoteOutputs {
            panel_count: panels,
            system_size_kw: round2(system_size_kw),
            inverter_size_kw: round2(inverter_size_kw),
            monthly_savings: round2(monthly_savings),
            estimated_monthly_generation_kwh: generation_kwh,
            payback_months: payback_months(system_cost, monthly_savings),
            estimated_system_cost: round2(system_cost),
            usage_kwh,
            tariff,
            panel_wattage: inputs.panel_wattage(),
            sun_hours_per_day: sun_hours,
            used_default_irradiance: inputs.sun_hours_source() == SunHoursSource::Default,
        }
    }
}
