//! Value <-> bytes encodings used for persisted records.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::StoreError;

/// Encoding used to turn cached values into record bytes and back.
pub trait Codec: Send + Sync {
    /// File extension for records written with this codec, including the dot.
    fn extension(&self) -> &str;

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StoreError>;
}

/// Compact binary records (MessagePack).
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePackCodec;

impl Codec for MessagePackCodec {
    fn extension(&self) -> &str {
        ".ser"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
        rmp_serde::to_vec_named(value).map_err(|e| StoreError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StoreError> {
        rmp_serde::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Human-readable JSON records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn extension(&self) -> &str {
        ".json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec_pretty(value).map_err(|e| StoreError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))
    }
}
