pub mod formatter;

pub use formatter::{OutputStyle, format_seconds};
