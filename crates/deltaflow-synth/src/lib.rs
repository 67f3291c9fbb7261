//! Deterministic synthetic rainfall-runoff series generation.
//!
//! Produces a daily hydrological dataset (rainfall, temperature,
//! evapotranspiration, soil moisture, river discharge) from independent
//! seeded draws plus a running water-balance state, suitable for training
//! and evaluating discharge regression models.

mod config;
mod error;
mod generate;
mod record;

pub use config::GeneratorConfig;
pub use error::SynthError;
pub use generate::discharge_response;
pub use record::{Dataset, FEATURE_NAMES, ObservationRecord, TARGET_NAME};
