pub mod config;
pub mod descriptor;
mod stats;

pub use config::{CacheConfig, MetadataPersistence};
pub use descriptor::DescriptorCache;
pub use stats::CacheStats;
