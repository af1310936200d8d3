use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use log::debug;

use super::SourceConnector;
use crate::connection::ConnectionHandle;
use crate::core::{AttributeDescriptor, DescriptorKind, DescriptorPayload, SourceError};
use crate::metadata::{MappingMetadata, StructMetadata};

/// In-memory catalog connector.
///
/// Serves registered type and group definitions and counts how often each key
/// was requested. Hosts use it for fixtures and offline runs.
#[derive(Default)]
pub struct StaticCatalog {
    types: HashMap<String, DescriptorPayload>,
    groups: HashMap<String, Vec<StructMetadata>>,
    failing: HashSet<String>,
    latency: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_struct(mut self, type_name: &str, attributes: Vec<AttributeDescriptor>) -> Self {
        self.types.insert(
            type_name.to_string(),
            DescriptorPayload::Struct { attributes },
        );
        self
    }

    pub fn with_array(
        mut self,
        type_name: &str,
        element_type: &str,
        max_length: Option<u32>,
    ) -> Self {
        self.types.insert(
            type_name.to_string(),
            DescriptorPayload::Array {
                element_type: element_type.to_string(),
                max_length,
            },
        );
        self
    }

    pub fn with_group(mut self, group_name: &str, structs: Vec<StructMetadata>) -> Self {
        self.groups.insert(group_name.to_string(), structs);
        self
    }

    /// Makes every lookup of `key` (type or group name) fail.
    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Sleeps for `latency` on every lookup, to mimic a slow catalog query.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of lookups served (or failed) for `key`.
    pub fn call_count(&self, key: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(key).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.values().sum())
            .unwrap_or(0)
    }

    fn record_call(&self, key: &str) -> Result<(), SourceError> {
        {
            let mut calls = self
                .calls
                .lock()
                .map_err(|e| SourceError::new(format!("catalog call log poisoned: {}", e)))?;
            *calls.entry(key.to_string()).or_insert(0) += 1;
        }
        if let Some(latency) = self.latency {
            thread::sleep(latency);
        }
        if self.failing.contains(key) {
            return Err(SourceError::new(format!("catalog lookup for '{}' failed", key)));
        }
        Ok(())
    }
}

impl SourceConnector for StaticCatalog {
    fn create_descriptor(
        &self,
        type_name: &str,
        kind: DescriptorKind,
        connection: &ConnectionHandle,
    ) -> Result<DescriptorPayload, SourceError> {
        debug!(
            "Catalog lookup of {} {} on session {}",
            kind,
            type_name,
            connection.id()
        );
        self.record_call(type_name)?;
        let payload = self
            .types
            .get(type_name)
            .ok_or_else(|| SourceError::new(format!("Unknown type '{}'", type_name)))?;
        if payload.kind() != kind {
            return Err(SourceError::new(format!(
                "'{}' is a {} type, not a {} type",
                type_name,
                payload.kind(),
                kind
            )));
        }
        Ok(payload.clone())
    }

    fn collect_metadata(
        &self,
        metadata: &mut MappingMetadata,
        group_name: &str,
    ) -> Result<(), SourceError> {
        self.record_call(group_name)?;
        metadata.package_names.insert(group_name.to_string());
        if let Some(structs) = self.groups.get(group_name) {
            metadata.structs.extend(structs.iter().cloned());
        }
        Ok(())
    }
}
