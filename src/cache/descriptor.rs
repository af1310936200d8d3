//! Memory -> disk -> source resolution of struct and array descriptors.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{debug, info};
use tracing::{Level, event, info_span};

use super::config::CacheConfig;
use super::stats::{CacheStats, TierCounters};
use crate::connection::ConnectionHandle;
use crate::core::{
    CacheError, DescriptorKind, ResolutionCause, Result, StoreError, TypeDescriptor,
};
use crate::source::SourceConnector;
use crate::storage::{Codec, MessagePackCodec, PersistentStore};

/// Resolved descriptors of one kind plus the per-key gates serializing their
/// first resolution.
#[derive(Default)]
struct KindTable {
    entries: RwLock<HashMap<String, Arc<TypeDescriptor>>>,
    gates: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KindTable {
    fn get(&self, type_name: &str) -> Result<Option<Arc<TypeDescriptor>>> {
        Ok(self.entries.read()?.get(type_name).cloned())
    }

    fn insert(&self, type_name: &str, descriptor: Arc<TypeDescriptor>) -> Result<()> {
        self.entries.write()?.insert(type_name.to_string(), descriptor);
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn gate(&self, type_name: &str) -> Result<Arc<Mutex<()>>> {
        let mut gates = self.gates.lock()?;
        Ok(Arc::clone(gates.entry(type_name.to_string()).or_default()))
    }

    /// Drops the gate once the entry is in memory; later callers never reach it.
    fn release_gate(&self, type_name: &str) -> Result<()> {
        self.gates.lock()?.remove(type_name);
        Ok(())
    }

    /// Drops the gate after a failed round trip unless other callers are
    /// already queued on it; they make their own attempt and clean up after.
    fn release_failed_gate(&self, type_name: &str, gate: &Arc<Mutex<()>>) {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = gates
            .get(type_name)
            .is_some_and(|current| Arc::ptr_eq(current, gate) && Arc::strong_count(gate) == 2);
        if idle {
            gates.remove(type_name);
        }
    }
}

/// Cache of struct and array type descriptors.
///
/// Lookups go through three tiers: the in-memory table owned by this instance,
/// one record file per type under the configured root folder, and finally the
/// [`SourceConnector`]. Misses are written back to the faster tiers.
///
/// A descriptor served from memory is returned as-is and keeps the connection
/// it was first bound to. A descriptor read from disk is rebound to the
/// caller's connection.
///
/// The first resolution of a key is single-flight: concurrent callers for the
/// same type wait for it and then share its result.
pub struct DescriptorCache<S, C = MessagePackCodec> {
    store: PersistentStore,
    source: S,
    codec: C,
    file_prefix: Option<String>,
    structs: KindTable,
    arrays: KindTable,
    counters: TierCounters,
}

impl<S: SourceConnector> DescriptorCache<S> {
    /// Create a cache with binary (MessagePack) records.
    ///
    /// Fails with [`CacheError::Configuration`] if the root folder cannot be
    /// created or read.
    pub fn new(config: &CacheConfig, source: S) -> Result<Self> {
        Self::with_codec(config, source, MessagePackCodec)
    }
}

impl<S: SourceConnector, C: Codec> DescriptorCache<S, C> {
    pub fn with_codec(config: &CacheConfig, source: S, codec: C) -> Result<Self> {
        let store = PersistentStore::open(&config.root_folder)?;
        debug!(
            "Descriptor cache opened at {} (prefix {:?})",
            store.root().display(),
            config.effective_prefix()
        );
        Ok(Self {
            store,
            source,
            codec,
            file_prefix: config.effective_prefix().map(str::to_string),
            structs: KindTable::default(),
            arrays: KindTable::default(),
            counters: TierCounters::default(),
        })
    }

    pub fn struct_descriptor(
        &self,
        type_name: &str,
        connection: &ConnectionHandle,
    ) -> Result<Arc<TypeDescriptor>> {
        self.resolve(type_name, connection, DescriptorKind::Struct)
    }

    pub fn array_descriptor(
        &self,
        type_name: &str,
        connection: &ConnectionHandle,
    ) -> Result<Arc<TypeDescriptor>> {
        self.resolve(type_name, connection, DescriptorKind::Array)
    }

    /// Resolve the `kind` descriptor named `type_name`.
    ///
    /// On failure nothing is cached and the error carries the type name and the
    /// failing tier's cause.
    pub fn resolve(
        &self,
        type_name: &str,
        connection: &ConnectionHandle,
        kind: DescriptorKind,
    ) -> Result<Arc<TypeDescriptor>> {
        if type_name.is_empty() {
            return Err(CacheError::resolution(
                type_name,
                kind,
                StoreError::InvalidKey(String::new()),
            ));
        }

        let table = self.table(kind);
        if let Some(hit) = table.get(type_name)? {
            self.counters.memory_hit();
            return Ok(hit);
        }

        let span = info_span!(
            "typecache.descriptor.resolve",
            type_name = %type_name,
            kind = %kind,
            session = connection.id()
        );
        let _enter = span.enter();

        let gate = table.gate(type_name)?;
        // the gate guards no data, a panic elsewhere leaves nothing to repair
        let _in_flight = gate.lock().unwrap_or_else(PoisonError::into_inner);

        // filled by another caller while we waited on the gate
        if let Some(hit) = table.get(type_name)? {
            self.counters.memory_hit();
            return Ok(hit);
        }

        let descriptor = match self.load_or_create(type_name, connection, kind) {
            Ok(descriptor) => Arc::new(descriptor),
            Err(cause) => {
                self.counters.failure();
                table.release_failed_gate(type_name, &gate);
                event!(Level::ERROR, error = %cause, "descriptor resolution failed");
                return Err(CacheError::resolution(type_name, kind, cause));
            }
        };

        table.insert(type_name, Arc::clone(&descriptor))?;
        table.release_gate(type_name)?;
        Ok(descriptor)
    }

    fn load_or_create(
        &self,
        type_name: &str,
        connection: &ConnectionHandle,
        kind: DescriptorKind,
    ) -> std::result::Result<TypeDescriptor, ResolutionCause> {
        let file_name = self.file_name(type_name);

        if self.store.exists(&file_name)? {
            info!("Reading {} {} descriptor from file", kind, type_name);
            let mut descriptor: TypeDescriptor = self.store.load(&self.codec, &file_name)?;
            if descriptor.kind() != kind {
                return Err(ResolutionCause::KindMismatch {
                    expected: kind,
                    found: descriptor.kind(),
                });
            }
            if descriptor.type_name() != type_name {
                return Err(ResolutionCause::NameMismatch {
                    found: descriptor.type_name().to_string(),
                });
            }
            descriptor.bind(connection);
            self.counters.disk_hit();
            return Ok(descriptor);
        }

        info!("Reading {} {} descriptor from database", kind, type_name);
        let payload = self.source.create_descriptor(type_name, kind, connection)?;
        if payload.kind() != kind {
            return Err(ResolutionCause::KindMismatch {
                expected: kind,
                found: payload.kind(),
            });
        }
        let mut descriptor = TypeDescriptor::new(type_name, payload);
        self.store.save(&self.codec, &file_name, &descriptor)?;
        descriptor.bind(connection);
        self.counters.source_load();
        Ok(descriptor)
    }

    /// Record file name used for `type_name`: `[<prefix>-]<type_name><ext>`.
    pub fn file_name(&self, type_name: &str) -> String {
        match &self.file_prefix {
            Some(prefix) => format!("{}-{}{}", prefix, type_name, self.codec.extension()),
            None => format!("{}{}", type_name, self.codec.extension()),
        }
    }

    /// Memory-tier peek; never touches disk or the source.
    pub fn cached(&self, kind: DescriptorKind, type_name: &str) -> Result<Option<Arc<TypeDescriptor>>> {
        self.table(kind).get(type_name)
    }

    /// Number of descriptors held in memory, both kinds.
    pub fn len(&self) -> usize {
        self.structs.len() + self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.len())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    fn table(&self, kind: DescriptorKind) -> &KindTable {
        match kind {
            DescriptorKind::Struct => &self.structs,
            DescriptorKind::Array => &self.arrays,
        }
    }
}
