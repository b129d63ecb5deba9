pub mod metrics;
pub mod scaling;
pub mod splitters;
pub mod validation;
