//! Everything a host needs to wire the caches up.

pub use crate::cache::{CacheConfig, DescriptorCache, MetadataPersistence};
pub use crate::connection::ConnectionHandle;
pub use crate::core::{CacheError, DescriptorKind, DescriptorPayload, Result, TypeDescriptor};
pub use crate::metadata::{MappingMetadata, MetadataAggregator, StructMetadata};
pub use crate::source::SourceConnector;
