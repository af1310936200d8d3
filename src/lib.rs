// ============================================================================
// typecache Library
// ============================================================================

//! Layered cache for database type descriptors and mapping metadata.
//!
//! Every lookup goes memory -> disk -> source, writing misses back to the faster
//! tiers. [`DescriptorCache`] resolves single struct/array descriptors,
//! [`MetadataAggregator`] merges per-group metadata into a caller-owned
//! [`MappingMetadata`].
//!
//! # Examples
//!
//! ```
//! use typecache::{AttributeDescriptor, CacheConfig, ConnectionHandle, DescriptorCache, StaticCatalog};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::TempDir::new()?;
//! let catalog = StaticCatalog::new()
//!     .with_struct("EMP_REC", vec![AttributeDescriptor::new("ID", "NUMBER")]);
//! let cache = DescriptorCache::new(&CacheConfig::new(dir.path()), catalog)?;
//!
//! let conn = ConnectionHandle::new(1, "scott", "HR");
//! let descriptor = cache.struct_descriptor("EMP_REC", &conn)?;
//! assert_eq!(descriptor.attributes().len(), 1);
//! assert!(dir.path().join("EMP_REC.ser").exists());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod connection;
pub mod core;
pub mod metadata;
pub mod prelude;
pub mod source;
pub mod storage;

pub use crate::cache::{CacheConfig, CacheStats, DescriptorCache, MetadataPersistence};
pub use crate::connection::ConnectionHandle;
pub use crate::core::{
    AttributeDescriptor, CacheError, DescriptorKind, DescriptorPayload, ResolutionCause, Result,
    SourceError, StoreError, TypeDescriptor,
};
pub use crate::metadata::{FieldMetadata, MappingMetadata, MetadataAggregator, StructMetadata};
pub use crate::source::{SourceConnector, StaticCatalog};
pub use crate::storage::{Codec, JsonCodec, MessagePackCodec, PersistentStore};
