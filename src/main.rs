use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use deltaflow_eval::{CollaboratorError, EvaluationConfig, FittedModel, Regressor};
use deltaflow_io::{ExperimentName, ResultWriter};
use deltaflow_rf::{OobMode, RandomForestConfig, RandomForestResult};
use deltaflow_synth::{FEATURE_NAMES, GeneratorConfig};
use deltaflow_viz::{render_comparison, render_importances};

#[derive(Parser)]
#[command(name = "deltaflow")]
#[command(about = "Synthetic rainfall-runoff dataset generation and discharge regression")]
#[command(version)]
struct Cli {
    /// Number of simulated days
    #[arg(long, default_value_t = 1500)]
    days: usize,

    /// RNG seed for generation, partitioning, and model training
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of rows held out for testing
    #[arg(long, default_value_t = 0.25)]
    test_fraction: f64,

    /// Number of trees in the Random Forest
    #[arg(long, default_value_t = 200)]
    trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value_t = 15)]
    max_depth: usize,

    /// Number of test samples shown in the comparison plot
    #[arg(long, default_value_t = 200)]
    plot_points: usize,

    /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long, default_value = "deltaflow")]
    experiment: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,
}

// --- Collaborator adapter ---

/// deltaflow-rf behind the evaluation pipeline's regressor seam.
struct ForestRegressor {
    config: RandomForestConfig,
}

struct FittedForest {
    result: RandomForestResult,
}

impl Regressor for ForestRegressor {
    type Fitted = FittedForest;

    fn fit(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        feature_names: &[String],
    ) -> Result<FittedForest, CollaboratorError> {
        let result = self.config.fit(features, targets, feature_names)?;
        Ok(FittedForest { result })
    }
}

impl FittedModel for FittedForest {
    fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, CollaboratorError> {
        Ok(self.result.forest().predict_batch(features)?)
    }

    fn feature_importances(&self) -> Vec<(String, f64)> {
        self.result
            .importances()
            .iter()
            .map(|f| (f.name.clone(), f.importance))
            .collect()
    }
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct RunSummary {
    experiment: String,
    n_days: usize,
    n_train: usize,
    n_test: usize,
    rmse: f64,
    r2: f64,
    oob_r2: Option<f64>,
    feature_importances: Vec<ImportanceEntry>,
}

#[derive(Serialize)]
struct ImportanceEntry {
    name: String,
    importance: f64,
    rank: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let experiment_name = ExperimentName::new(cli.experiment.clone())?;

    // 1. Generate the synthetic series
    let dataset = GeneratorConfig::new(cli.days)
        .context("invalid day count")?
        .with_seed(cli.seed)
        .generate();
    info!(n_days = dataset.len(), seed = cli.seed, "dataset generated");

    let features = dataset.feature_matrix();
    let targets = dataset.targets();
    let feature_names: Vec<String> = FEATURE_NAMES.iter().map(|n| n.to_string()).collect();

    // 2. Hold-out evaluation through the collaborator seam
    let rf_config = RandomForestConfig::new(cli.trees)
        .context("invalid ensemble configuration")?
        .with_max_depth(Some(cli.max_depth))
        .with_seed(cli.seed);
    let regressor = ForestRegressor {
        config: rf_config.clone(),
    };

    let report = EvaluationConfig::new(cli.test_fraction)
        .context("invalid test fraction")?
        .with_seed(cli.seed)
        .run(&features, &targets, &feature_names, &regressor)
        .context("evaluation failed")?;
    info!(rmse = report.rmse, r2 = report.r2, "hold-out evaluation complete");

    // 3. Final fit on all data with OOB for an all-rows generalization score
    let oob_result = rf_config
        .with_oob_mode(OobMode::Enabled)
        .fit(&features, &targets, &feature_names)
        .context("final model training failed")?;
    let oob_r2 = oob_result.oob_score().map(|s| s.r2);
    info!(oob_r2 = ?oob_r2, "final model trained");

    // 4. Write artifacts
    let writer = ResultWriter::new(&cli.output_dir, experiment_name)?;
    writer
        .write_dataset(dataset.records())
        .context("failed to write dataset CSV")?;

    let ranked_names: Vec<String> = report.importances.iter().map(|(n, _)| n.clone()).collect();
    let ranked_scores: Vec<f64> = report.importances.iter().map(|(_, imp)| *imp).collect();
    writer
        .write_evaluation(
            dataset.len(),
            report.n_train,
            report.n_test,
            report.rmse,
            report.r2,
            oob_r2,
            &ranked_names,
            &ranked_scores,
        )
        .context("failed to write evaluation JSON")?;

    // 5. Render plots
    render_comparison(
        &writer.comparison_plot_path(),
        &report.observed,
        &report.predictions,
        cli.plot_points,
    )
    .context("failed to render comparison plot")?;
    render_importances(&writer.importance_plot_path(), &report.importances)
        .context("failed to render importance plot")?;

    // 6. Print summary
    let output = RunSummary {
        experiment: cli.experiment,
        n_days: dataset.len(),
        n_train: report.n_train,
        n_test: report.n_test,
        rmse: report.rmse,
        r2: report.r2,
        oob_r2,
        feature_importances: report
            .importances
            .iter()
            .enumerate()
            .map(|(i, (name, importance))| ImportanceEntry {
                name: name.clone(),
                importance: *importance,
                rank: i + 1,
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
