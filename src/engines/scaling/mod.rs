pub mod standard;

pub use crate::config::ZeroVariancePolicy;
pub use standard::{FittedScaler, StandardScaler};
