//! The procedural generation model.
//!
//! Independent exogenous draws (rainfall, temperature, evapotranspiration)
//! feed a cumulative water balance; the clamped balance is the soil
//! moisture state, which together with rainfall drives discharge.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma, Normal};
use tracing::{debug, info, instrument};

use crate::config::GeneratorConfig;
use crate::record::{Dataset, ObservationRecord};

/// Gamma shape parameter for daily rainfall depth.
const RAINFALL_SHAPE: f64 = 2.5;
/// Gamma scale parameter for daily rainfall depth (mm).
const RAINFALL_SCALE: f64 = 12.0;
/// Mean daily temperature (degrees C).
const TEMPERATURE_MEAN: f64 = 28.0;
/// Standard deviation of daily temperature.
const TEMPERATURE_SD: f64 = 2.5;
/// Mean daily evapotranspiration depth (mm). Not clamped to zero, so the
/// tail of the distribution can produce slightly negative values.
const EVAPOTRANSPIRATION_MEAN: f64 = 4.5;
/// Standard deviation of daily evapotranspiration.
const EVAPOTRANSPIRATION_SD: f64 = 0.7;
/// Mean of the soil-moisture observation noise.
const MOISTURE_NOISE_MEAN: f64 = 0.4;
/// Standard deviation of the soil-moisture observation noise.
const MOISTURE_NOISE_SD: f64 = 0.05;
/// Standard deviation of the discharge noise (m^3/s), zero mean.
const DISCHARGE_NOISE_SD: f64 = 5.0;

/// Scale from accumulated water balance (mm) to soil moisture index.
const BALANCE_TO_MOISTURE: f64 = 0.01;
/// Lower physical bound of the soil moisture index.
const MOISTURE_MIN: f64 = 0.1;
/// Upper physical bound of the soil moisture index.
const MOISTURE_MAX: f64 = 0.6;

/// Direct runoff fraction of rainfall.
const RUNOFF_RAINFALL_COEF: f64 = 0.45;
/// Runoff gain on already-wet soil (applied to moisture * rainfall).
const RUNOFF_WET_SOIL_COEF: f64 = 0.35;
/// Discharge reduction per unit evapotranspiration.
const RUNOFF_ET_COEF: f64 = 0.25;

/// Compute the discharge response for a single day.
///
/// `0.45*rain + 0.35*moisture*rain - 0.25*et + noise`, floored at zero.
/// The multiplicative `moisture * rain` term models increased runoff
/// efficiency on wet soil; `soil_moisture` must already be clamped to its
/// physical range. Non-decreasing in `rainfall` for any valid moisture.
#[must_use]
pub fn discharge_response(
    rainfall: f64,
    soil_moisture: f64,
    evapotranspiration: f64,
    noise: f64,
) -> f64 {
    let raw = RUNOFF_RAINFALL_COEF * rainfall + RUNOFF_WET_SOIL_COEF * soil_moisture * rainfall
        - RUNOFF_ET_COEF * evapotranspiration
        + noise;
    raw.max(0.0)
}

/// Run the generation model for a validated config.
#[instrument(skip_all, fields(days = config.days, seed = config.seed))]
pub(crate) fn run(config: &GeneratorConfig) -> Dataset {
    let days = config.days;

    // Parameters are compile-time constants — construction cannot fail.
    let rainfall_dist =
        Gamma::new(RAINFALL_SHAPE, RAINFALL_SCALE).expect("valid rainfall parameters");
    let temperature_dist =
        Normal::new(TEMPERATURE_MEAN, TEMPERATURE_SD).expect("valid temperature parameters");
    let evapotranspiration_dist = Normal::new(EVAPOTRANSPIRATION_MEAN, EVAPOTRANSPIRATION_SD)
        .expect("valid evapotranspiration parameters");
    let moisture_noise_dist =
        Normal::new(MOISTURE_NOISE_MEAN, MOISTURE_NOISE_SD).expect("valid moisture noise");
    let discharge_noise_dist =
        Normal::new(0.0, DISCHARGE_NOISE_SD).expect("valid discharge noise");

    // One RNG, seeded exactly once. Each exogenous vector is drawn to full
    // length before the next begins; this ordering is part of the
    // determinism contract.
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let rainfall: Vec<f64> = (0..days).map(|_| rainfall_dist.sample(&mut rng)).collect();
    let temperature: Vec<f64> = (0..days)
        .map(|_| temperature_dist.sample(&mut rng))
        .collect();
    let evapotranspiration: Vec<f64> = (0..days)
        .map(|_| evapotranspiration_dist.sample(&mut rng))
        .collect();

    debug!(days, "exogenous series drawn");

    // Cumulative water balance: each day's balance carries the full history
    // of rainfall surplus and deficit.
    let mut balance = Vec::with_capacity(days);
    let mut running = 0.0f64;
    for day in 0..days {
        running += rainfall[day] - evapotranspiration[day];
        balance.push(running);
    }

    let moisture_noise: Vec<f64> = (0..days)
        .map(|_| moisture_noise_dist.sample(&mut rng))
        .collect();

    // Clamp before the discharge formula so the wet-soil interaction only
    // ever sees a physically valid moisture value.
    let soil_moisture: Vec<f64> = balance
        .iter()
        .zip(&moisture_noise)
        .map(|(&b, &noise)| (b * BALANCE_TO_MOISTURE + noise).clamp(MOISTURE_MIN, MOISTURE_MAX))
        .collect();

    let discharge_noise: Vec<f64> = (0..days)
        .map(|_| discharge_noise_dist.sample(&mut rng))
        .collect();

    let records: Vec<ObservationRecord> = (0..days)
        .map(|day| ObservationRecord {
            rainfall_mm: rainfall[day],
            temperature_c: temperature[day],
            evapotranspiration_mm: evapotranspiration[day],
            soil_moisture_index: soil_moisture[day],
            river_discharge_m3s: discharge_response(
                rainfall[day],
                soil_moisture[day],
                evapotranspiration[day],
                discharge_noise[day],
            ),
        })
        .collect();

    info!(days = records.len(), "synthetic series generated");

    Dataset::new(records)
}
