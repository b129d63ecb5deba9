pub mod traits;
pub mod schema;
pub mod dataset;
pub mod walk_forward;
pub mod model;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use schema::SchemaConfig;
pub use dataset::{DatasetConfig, ScalingConfig, ZeroVariancePolicy};
pub use walk_forward::WalkForwardConfig;
pub use model::{ModelConfig, ModelKind};
pub use traits::ConfigSection;
