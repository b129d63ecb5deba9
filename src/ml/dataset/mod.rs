pub mod tabular;
pub mod window;

pub use tabular::{PartitionRole, TabularDataset};
pub use window::WindowStructurer;
