use std::path::PathBuf;

use thiserror::Error;

use super::types::DescriptorKind;

/// Failures raised by the on-disk record store and its codecs.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode record: {0}")]
    Encode(String),

    #[error("Failed to decode record: {0}")]
    Decode(String),

    #[error("Invalid record key '{0}'")]
    InvalidKey(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure reported by a [`SourceConnector`](crate::source::SourceConnector).
#[derive(Error, Debug)]
#[error("{message}")]
pub struct SourceError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The underlying reason a single key could not be resolved.
#[derive(Error, Debug)]
pub enum ResolutionCause {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("source lookup failed: {0}")]
    Source(#[from] SourceError),

    #[error("stored record is a {found} descriptor, expected {expected}")]
    KindMismatch {
        expected: DescriptorKind,
        found: DescriptorKind,
    },

    #[error("stored record describes '{found}'")]
    NameMismatch { found: String },
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Configuration error: {reason} '{}'", .path.display())]
    Configuration { path: PathBuf, reason: String },

    #[error("Error reading {kind} descriptor {type_name}: {cause}")]
    Resolution {
        type_name: String,
        kind: DescriptorKind,
        #[source]
        cause: ResolutionCause,
    },

    #[error("Error resolving metadata for group '{group_name}': {cause}")]
    Metadata {
        group_name: String,
        #[source]
        cause: ResolutionCause,
    },

    #[error("Lock error: {0}")]
    Lock(String),
}

impl CacheError {
    pub(crate) fn configuration(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn resolution(
        type_name: &str,
        kind: DescriptorKind,
        cause: impl Into<ResolutionCause>,
    ) -> Self {
        Self::Resolution {
            type_name: type_name.to_string(),
            kind,
            cause: cause.into(),
        }
    }

    pub(crate) fn metadata(group_name: &str, cause: impl Into<ResolutionCause>) -> Self {
        Self::Metadata {
            group_name: group_name.to_string(),
            cause: cause.into(),
        }
    }

    /// Returns the cause of a resolution or metadata failure.
    pub fn cause(&self) -> Option<&ResolutionCause> {
        match self {
            Self::Resolution { cause, .. } | Self::Metadata { cause, .. } => Some(cause),
            Self::Configuration { .. } | Self::Lock(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

impl<T> From<std::sync::PoisonError<T>> for CacheError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}
