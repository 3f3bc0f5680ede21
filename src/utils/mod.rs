// Utility functions

pub mod logger;
pub mod numeric;

pub use logger::*;
pub use numeric::*;
