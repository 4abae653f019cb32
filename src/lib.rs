pub mod cli;
pub mod error;
pub mod logger;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use error::{RegressError, Result};
