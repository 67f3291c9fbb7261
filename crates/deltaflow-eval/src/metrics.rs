//! Regression metrics over paired (actual, predicted) slices.

use crate::error::EvalError;

fn validate_pair(actual: &[f64], predicted: &[f64]) -> Result<(), EvalError> {
    if actual.len() != predicted.len() {
        return Err(EvalError::MetricLengthMismatch {
            n_actual: actual.len(),
            n_predicted: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(EvalError::EmptyMetricInput);
    }
    Ok(())
}

/// Mean squared error. Range: [0, inf), 0 = perfect.
///
/// # Errors
///
/// Returns [`EvalError::MetricLengthMismatch`] or
/// [`EvalError::EmptyMetricInput`] on invalid input.
pub fn mse(actual: &[f64], predicted: &[f64]) -> Result<f64, EvalError> {
    validate_pair(actual, predicted)?;
    let n = actual.len() as f64;
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Ok(total / n)
}

/// Root mean squared error. Range: [0, inf), 0 = perfect.
///
/// # Errors
///
/// Same conditions as [`mse`].
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64, EvalError> {
    Ok(mse(actual, predicted)?.sqrt())
}

/// Coefficient of determination. Range: (-inf, 1], 1 = perfect.
///
/// # Errors
///
/// In addition to the [`mse`] conditions, returns
/// [`EvalError::ZeroVarianceTarget`] when the actual values are constant —
/// the denominator vanishes and the score is undefined.
pub fn r2(actual: &[f64], predicted: &[f64]) -> Result<f64, EvalError> {
    validate_pair(actual, predicted)?;
    let n = actual.len() as f64;
    let mean = actual.iter().sum::<f64>() / n;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Err(EvalError::ZeroVarianceTarget);
    }
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn mse_perfect_match_is_zero() {
        let values = [1.0, 2.0, 3.0];
        assert_relative_eq!(mse(&values, &values).unwrap(), 0.0);
    }

    #[test]
    fn mse_constant_offset() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [3.0, 4.0, 5.0];
        assert_relative_eq!(mse(&actual, &predicted).unwrap(), 4.0);
    }

    #[test]
    fn rmse_is_sqrt_of_mse() {
        let actual = [0.0, 0.0, 0.0, 0.0];
        let predicted = [3.0, 3.0, 3.0, 3.0];
        assert_relative_eq!(rmse(&actual, &predicted).unwrap(), 3.0);
    }

    #[test]
    fn r2_perfect_match_is_one() {
        let actual = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(r2(&actual, &actual).unwrap(), 1.0);
    }

    #[test]
    fn r2_mean_prediction_is_zero() {
        let actual = [1.0, 2.0, 3.0, 4.0, 5.0];
        let predicted = [3.0; 5];
        assert_relative_eq!(r2(&actual, &predicted).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn r2_can_be_negative_for_bad_predictions() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [30.0, -10.0, 50.0];
        assert!(r2(&actual, &predicted).unwrap() < 0.0);
    }

    #[test]
    fn r2_zero_variance_is_distinct_error() {
        let actual = [5.0, 5.0, 5.0];
        let predicted = [4.0, 5.0, 6.0];
        let err = r2(&actual, &predicted).unwrap_err();
        assert!(matches!(err, EvalError::ZeroVarianceTarget));
    }

    #[test]
    fn length_mismatch_rejected() {
        let err = mse(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            EvalError::MetricLengthMismatch {
                n_actual: 2,
                n_predicted: 1
            }
        ));
    }

    #[test]
    fn empty_input_rejected() {
        let err = rmse(&[], &[]).unwrap_err();
        assert!(matches!(err, EvalError::EmptyMetricInput));
    }
}
