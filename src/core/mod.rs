pub mod engine;
pub mod policy;
pub mod service;

pub use crate::domain::model::{
    Coordinates, IrradianceSummary, Quote, QuoteInputs, QuoteOutputs, QuoteRequest, SunHours,
    SunHoursSource,
};
pub use crate::domain::ports::IrradianceProvider;
pub use crate::utils::error::Result;
