//! Authoritative lookups behind the cache tiers.

pub mod catalog;

pub use catalog::StaticCatalog;

use std::sync::Arc;

use crate::connection::ConnectionHandle;
use crate::core::{DescriptorKind, DescriptorPayload, SourceError};
use crate::metadata::MappingMetadata;

/// The expensive, authoritative side of the cache (database catalog
/// introspection). Calls may block for as long as the database takes.
pub trait SourceConnector: Send + Sync {
    /// Builds the descriptor payload for `type_name` using `connection`.
    fn create_descriptor(
        &self,
        type_name: &str,
        kind: DescriptorKind,
        connection: &ConnectionHandle,
    ) -> Result<DescriptorPayload, SourceError>;

    /// Adds the struct definitions of `group_name` to `metadata`.
    fn collect_metadata(
        &self,
        metadata: &mut MappingMetadata,
        group_name: &str,
    ) -> Result<(), SourceError>;
}

impl<S: SourceConnector + ?Sized> SourceConnector for Arc<S> {
    fn create_descriptor(
        &self,
        type_name: &str,
        kind: DescriptorKind,
        connection: &ConnectionHandle,
    ) -> Result<DescriptorPayload, SourceError> {
        (**self).create_descriptor(type_name, kind, connection)
    }

    fn collect_metadata(
        &self,
        metadata: &mut MappingMetadata,
        group_name: &str,
    ) -> Result<(), SourceError> {
        (**self).collect_metadata(metadata, group_name)
    }
}
