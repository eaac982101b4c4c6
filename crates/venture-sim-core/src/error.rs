use thiserror::Error;

#[derive(Debug, Error)]
pub enum VentureSimError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: f64,
    },
}
