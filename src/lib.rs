pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::NasaPowerProvider;
pub use config::QuoteConfig;
pub use crate::core::{engine::QuoteEngine, policy::SunHoursPolicy, service::QuoteService};
pub use utils::error::{QuoteError, Result};
