/// Errors from synthetic series generation.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// Returned when the configured day count is zero.
    #[error("day count must be at least 1, got {days}")]
    InvalidDayCount {
        /// The invalid day count provided.
        days: usize,
    },
}
