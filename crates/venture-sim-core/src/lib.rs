pub mod error;
pub mod fund;
pub mod rng;
pub mod time_value;
pub mod types;

pub use error::VentureSimError;
pub use types::*;

/// Standard result type for all venture-sim operations
pub type VentureSimResult<T> = Result<T, VentureSimError>;
