//! Dataset CSV and evaluation JSON writers.

use std::fs;
use std::path::{Path, PathBuf};

use deltaflow_synth::ObservationRecord;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes pipeline artifacts to an output directory.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_dataset.csv` and
/// `{experiment}_evaluate.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the path of the comparison plot for this experiment.
    #[must_use]
    pub fn comparison_plot_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_comparison.png", self.experiment.as_str()))
    }

    /// Return the path of the importance plot for this experiment.
    #[must_use]
    pub fn importance_plot_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_importance.png", self.experiment.as_str()))
    }

    /// Write the generated series to `{experiment}_dataset.csv`.
    ///
    /// One row per day, columns in [`ObservationRecord`] field order with a
    /// header row.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::CsvWrite`] on serialization failure and
    /// [`IoError::WriteFile`] if the file cannot be flushed.
    #[instrument(skip_all, fields(n_records = records.len()))]
    pub fn write_dataset(&self, records: &[ObservationRecord]) -> Result<(), IoError> {
        let path = self
            .output_dir
            .join(format!("{}_dataset.csv", self.experiment.as_str()));

        let mut writer = csv::Writer::from_path(&path).map_err(|e| IoError::CsvWrite {
            path: path.clone(),
            source: e,
        })?;
        for record in records {
            writer.serialize(record).map_err(|e| IoError::CsvWrite {
                path: path.clone(),
                source: e,
            })?;
        }
        writer.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "dataset written");
        Ok(())
    }

    /// Write evaluation results to `{experiment}_evaluate.json`.
    ///
    /// Takes primitives so the writer has no dependency on the regression
    /// or evaluation crates.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip_all)]
    pub fn write_evaluation(
        &self,
        n_days: usize,
        n_train: usize,
        n_test: usize,
        rmse: f64,
        r2: f64,
        oob_r2: Option<f64>,
        feature_names: &[String],
        feature_importances: &[f64],
    ) -> Result<(), IoError> {
        let path = self
            .output_dir
            .join(format!("{}_evaluate.json", self.experiment.as_str()));

        let features: Vec<FeatureEntry> = feature_names
            .iter()
            .zip(feature_importances.iter())
            .enumerate()
            .map(|(i, (name, &importance))| FeatureEntry {
                name: name.as_str(),
                importance,
                rank: i + 1,
            })
            .collect();

        let artifact = EvaluateArtifact {
            experiment: self.experiment.as_str(),
            n_days,
            n_train,
            n_test,
            rmse,
            r2,
            oob_r2,
            feature_importances: features,
        };

        let json = serde_json::to_string_pretty(&artifact).expect("serialization cannot fail");
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "evaluation written");
        Ok(())
    }
}

#[derive(Serialize)]
struct EvaluateArtifact<'a> {
    experiment: &'a str,
    n_days: usize,
    n_train: usize,
    n_test: usize,
    rmse: f64,
    r2: f64,
    oob_r2: Option<f64>,
    feature_importances: Vec<FeatureEntry<'a>>,
}

#[derive(Serialize)]
struct FeatureEntry<'a> {
    name: &'a str,
    importance: f64,
    rank: usize,
}
