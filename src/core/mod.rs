pub mod error;
pub mod types;

pub use error::{CacheError, ResolutionCause, Result, SourceError, StoreError};
pub use types::{AttributeDescriptor, DescriptorKind, DescriptorPayload, TypeDescriptor};
