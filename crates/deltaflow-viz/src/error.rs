//! Error types for plot rendering.

/// Errors from chart rendering.
#[derive(Debug, thiserror::Error)]
pub enum VizError {
    /// Returned when a chart is requested over empty series.
    #[error("cannot render {chart} chart from empty series")]
    EmptySeries {
        /// Which chart was being rendered.
        chart: &'static str,
    },

    /// Returned when the observed and predicted series differ in length.
    #[error("comparison series differ in length: {observed} observed vs {predicted} predicted")]
    SeriesLengthMismatch {
        /// Number of observed values.
        observed: usize,
        /// Number of predicted values.
        predicted: usize,
    },

    /// Returned when the plotting backend fails.
    ///
    /// The backend's error types are generic over the drawing surface, so
    /// the failure is captured as a rendered message.
    #[error("failed to render {chart} chart: {reason}")]
    Render {
        /// Which chart was being rendered.
        chart: &'static str,
        /// Backend failure description.
        reason: String,
    },
}
