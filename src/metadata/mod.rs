pub mod aggregator;
pub mod model;

pub use aggregator::{METADATA_FILE_PREFIX, MetadataAggregator};
pub use model::{FieldMetadata, MappingMetadata, StructMetadata};
