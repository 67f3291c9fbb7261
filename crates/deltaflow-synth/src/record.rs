//! Domain types for the synthetic series.

/// Names of the feature columns, in the order produced by
/// [`Dataset::feature_matrix`].
pub const FEATURE_NAMES: [&str; 4] = [
    "rainfall_mm",
    "temperature_c",
    "evapotranspiration_mm",
    "soil_moisture_index",
];

/// Name of the regression target column.
pub const TARGET_NAME: &str = "river_discharge_m3s";

/// One simulated day of basin observations.
///
/// Field order matches the dataset CSV column order. Rainfall is Gamma
/// distributed, temperature and evapotranspiration are Normal (the latter
/// deliberately unclamped, so slightly negative values can occur), soil
/// moisture is the clamped water-balance state, and discharge is the
/// non-negative runoff response.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ObservationRecord {
    /// Daily rainfall depth in millimetres.
    pub rainfall_mm: f64,
    /// Mean daily air temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Daily evapotranspiration depth in millimetres.
    pub evapotranspiration_mm: f64,
    /// Soil moisture index, always within [0.1, 0.6].
    pub soil_moisture_index: f64,
    /// River discharge in cubic metres per second, always >= 0.
    pub river_discharge_m3s: f64,
}

/// An immutable daily series of [`ObservationRecord`]s.
///
/// Record order is day order and is semantically meaningful: soil moisture
/// carries the accumulated water balance of every prior day. Created once
/// by [`GeneratorConfig::generate`](crate::GeneratorConfig::generate) and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<ObservationRecord>,
}

impl Dataset {
    pub(crate) fn new(records: Vec<ObservationRecord>) -> Self {
        debug_assert!(!records.is_empty(), "dataset must not be empty");
        Self { records }
    }

    /// Return the records in day order.
    #[must_use]
    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    /// Return the number of simulated days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` if the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Return the feature columns as a row-major matrix.
    ///
    /// Column order matches [`FEATURE_NAMES`]: rainfall, temperature,
    /// evapotranspiration, soil moisture. Discharge is excluded — it is
    /// the regression target, not a feature.
    #[must_use]
    pub fn feature_matrix(&self) -> Vec<Vec<f64>> {
        self.records
            .iter()
            .map(|r| {
                vec![
                    r.rainfall_mm,
                    r.temperature_c,
                    r.evapotranspiration_mm,
                    r.soil_moisture_index,
                ]
            })
            .collect()
    }

    /// Return the discharge target column in day order.
    #[must_use]
    pub fn targets(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.river_discharge_m3s).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(day: usize) -> ObservationRecord {
        ObservationRecord {
            rainfall_mm: day as f64,
            temperature_c: 28.0,
            evapotranspiration_mm: 4.5,
            soil_moisture_index: 0.4,
            river_discharge_m3s: day as f64 * 0.45,
        }
    }

    #[test]
    fn feature_matrix_matches_feature_names_order() {
        let dataset = Dataset::new(vec![make_record(3)]);
        let features = dataset.feature_matrix();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].len(), FEATURE_NAMES.len());
        assert_eq!(features[0], vec![3.0, 28.0, 4.5, 0.4]);
    }

    #[test]
    fn targets_are_discharge_in_day_order() {
        let dataset = Dataset::new(vec![make_record(1), make_record(2)]);
        assert_eq!(dataset.targets(), vec![0.45, 0.9]);
    }

    #[test]
    fn len_counts_records() {
        let dataset = Dataset::new(vec![make_record(0), make_record(1), make_record(2)]);
        assert_eq!(dataset.len(), 3);
        assert!(!dataset.is_empty());
    }
}
