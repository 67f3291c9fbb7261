//! Plot rendering for evaluation results.
//!
//! Two presentational charts, both written as PNG files: a line comparison
//! of observed vs predicted discharge over the test partition, and a
//! horizontal bar chart of feature importances. Nothing downstream consumes
//! the rendered output.

use std::path::Path;

use plotters::prelude::*;
use tracing::{info, instrument};

mod error;

pub use error::VizError;

const COMPARISON_SIZE: (u32, u32) = (1280, 720);
const IMPORTANCE_SIZE: (u32, u32) = (960, 480);

fn render_err(chart: &'static str, err: impl std::fmt::Display) -> VizError {
    VizError::Render {
        chart,
        reason: err.to_string(),
    }
}

/// Render the observed vs predicted discharge comparison.
///
/// Plots at most the first `max_points` test samples: solid line for
/// observed discharge, dashed line for predictions.
///
/// # Errors
///
/// Returns [`VizError::SeriesLengthMismatch`] or [`VizError::EmptySeries`]
/// on invalid input, [`VizError::Render`] if the backend fails.
#[instrument(skip(observed, predicted), fields(path = %path.display()))]
pub fn render_comparison(
    path: &Path,
    observed: &[f64],
    predicted: &[f64],
    max_points: usize,
) -> Result<(), VizError> {
    const CHART: &str = "comparison";

    if observed.len() != predicted.len() {
        return Err(VizError::SeriesLengthMismatch {
            observed: observed.len(),
            predicted: predicted.len(),
        });
    }
    if observed.is_empty() || max_points == 0 {
        return Err(VizError::EmptySeries { chart: CHART });
    }

    let n = observed.len().min(max_points);
    let observed = &observed[..n];
    let predicted = &predicted[..n];

    let y_max = observed
        .iter()
        .chain(predicted)
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0)
        * 1.05;

    let root = BitMapBackend::new(path, COMPARISON_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(CHART, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Observed vs predicted discharge", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..n, 0.0..y_max)
        .map_err(|e| render_err(CHART, e))?;

    chart
        .configure_mesh()
        .x_desc("Test sample")
        .y_desc("Discharge (m3/s)")
        .draw()
        .map_err(|e| render_err(CHART, e))?;

    chart
        .draw_series(LineSeries::new(
            observed.iter().enumerate().map(|(i, &q)| (i, q)),
            &BLUE,
        ))
        .map_err(|e| render_err(CHART, e))?
        .label("Observed")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(DashedLineSeries::new(
            predicted.iter().enumerate().map(|(i, &q)| (i, q)),
            5,
            3,
            RED.stroke_width(1),
        ))
        .map_err(|e| render_err(CHART, e))?
        .label("Predicted")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .draw()
        .map_err(|e| render_err(CHART, e))?;

    root.present().map_err(|e| render_err(CHART, e))?;

    info!(n_points = n, "comparison chart rendered");
    Ok(())
}

/// Render the feature-importance bar chart.
///
/// `importances` are (name, importance) pairs, most important first; bars
/// are drawn horizontally with the most important feature at the top.
///
/// # Errors
///
/// Returns [`VizError::EmptySeries`] when no importances are given,
/// [`VizError::Render`] if the backend fails.
#[instrument(skip(importances), fields(path = %path.display()))]
pub fn render_importances(path: &Path, importances: &[(String, f64)]) -> Result<(), VizError> {
    const CHART: &str = "importance";

    if importances.is_empty() {
        return Err(VizError::EmptySeries { chart: CHART });
    }

    // Bottom-up band order: reverse so rank 1 lands in the top band.
    let ordered: Vec<(String, f64)> = importances.iter().rev().cloned().collect();
    let n = ordered.len();

    let x_max = ordered
        .iter()
        .map(|(_, imp)| *imp)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1e-6)
        * 1.1;

    let root = BitMapBackend::new(path, IMPORTANCE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(CHART, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Feature importance", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(180)
        .build_cartesian_2d(0.0..x_max, (0..n).into_segmented())
        .map_err(|e| render_err(CHART, e))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|value| match value {
            SegmentValue::CenterOf(i) if *i < n => ordered[*i].0.clone(),
            _ => String::new(),
        })
        .x_desc("Importance")
        .draw()
        .map_err(|e| render_err(CHART, e))?;

    chart
        .draw_series(ordered.iter().enumerate().map(|(i, (_, imp))| {
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i)),
                    (*imp, SegmentValue::Exact(i + 1)),
                ],
                BLUE.filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))
        .map_err(|e| render_err(CHART, e))?;

    root.present().map_err(|e| render_err(CHART, e))?;

    info!(n_features = n, "importance chart rendered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_rejects_mismatched_series() {
        let path = Path::new("unused.png");
        let err = render_comparison(path, &[1.0, 2.0], &[1.0], 200).unwrap_err();
        assert!(matches!(
            err,
            VizError::SeriesLengthMismatch {
                observed: 2,
                predicted: 1
            }
        ));
    }

    #[test]
    fn comparison_rejects_empty_series() {
        let path = Path::new("unused.png");
        let err = render_comparison(path, &[], &[], 200).unwrap_err();
        assert!(matches!(err, VizError::EmptySeries { chart: "comparison" }));
    }

    #[test]
    fn comparison_rejects_zero_points() {
        let path = Path::new("unused.png");
        let err = render_comparison(path, &[1.0], &[1.0], 0).unwrap_err();
        assert!(matches!(err, VizError::EmptySeries { .. }));
    }

    #[test]
    fn importance_rejects_empty_input() {
        let path = Path::new("unused.png");
        let err = render_importances(path, &[]).unwrap_err();
        assert!(matches!(err, VizError::EmptySeries { chart: "importance" }));
    }
}
