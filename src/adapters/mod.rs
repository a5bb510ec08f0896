// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod nasa_power;

pub use nasa_power::NasaPowerProvider;
