//! Disk-backed accumulation of mapping metadata by group.

use log::{debug, info};
use tracing::{Level, event, info_span};

use super::model::MappingMetadata;
use crate::cache::{CacheConfig, MetadataPersistence};
use crate::core::{CacheError, ResolutionCause, Result, StoreError};
use crate::source::SourceConnector;
use crate::storage::{Codec, JsonCodec, PersistentStore};

/// File name prefix of metadata records.
pub const METADATA_FILE_PREFIX: &str = "metadata-";

/// Resolves group metadata from disk or the source and merges it into a
/// caller-owned aggregate.
///
/// There is no memory tier: the aggregate passed to [`accumulate`] plays that
/// role, and repeated calls for the same group are not short-circuited.
///
/// [`accumulate`]: MetadataAggregator::accumulate
pub struct MetadataAggregator<S, C = JsonCodec> {
    store: PersistentStore,
    source: S,
    codec: C,
    persistence: MetadataPersistence,
}

impl<S: SourceConnector> MetadataAggregator<S> {
    /// Create an aggregator with JSON records.
    pub fn new(config: &CacheConfig, source: S) -> Result<Self> {
        Self::with_codec(config, source, JsonCodec)
    }
}

impl<S: SourceConnector, C: Codec> MetadataAggregator<S, C> {
    pub fn with_codec(config: &CacheConfig, source: S, codec: C) -> Result<Self> {
        let store = PersistentStore::open(&config.root_folder)?;
        debug!(
            "Metadata aggregator opened at {} ({:?})",
            store.root().display(),
            config.metadata_persistence
        );
        Ok(Self {
            store,
            source,
            codec,
            persistence: config.metadata_persistence,
        })
    }

    /// Merge the structs of `group_name` into `aggregate`.
    ///
    /// A stored record is appended to `aggregate.structs` as-is, so accumulating
    /// the same group twice duplicates its structs (the group name itself is
    /// only recorded once). Merges are not transactional: a failure can leave
    /// `aggregate` partially updated.
    pub fn accumulate(&self, aggregate: &mut MappingMetadata, group_name: &str) -> Result<()> {
        if group_name.is_empty() {
            return Err(CacheError::metadata(
                group_name,
                StoreError::InvalidKey(String::new()),
            ));
        }

        let span = info_span!("typecache.metadata.accumulate", group = %group_name);
        let _enter = span.enter();

        self.merge_or_collect(aggregate, group_name).map_err(|cause| {
            event!(Level::ERROR, error = %cause, "metadata accumulation failed");
            CacheError::metadata(group_name, cause)
        })
    }

    fn merge_or_collect(
        &self,
        aggregate: &mut MappingMetadata,
        group_name: &str,
    ) -> std::result::Result<(), ResolutionCause> {
        let file_name = self.file_name(group_name);

        if self.store.exists(&file_name)? {
            info!("Reading metadata of {} from file", group_name);
            let stored: MappingMetadata = self.store.load(&self.codec, &file_name)?;
            aggregate.merge_group(group_name, stored);
            return Ok(());
        }

        info!("Reading metadata of {} from database", group_name);
        match self.persistence {
            MetadataPersistence::GroupDelta => {
                let mut delta = MappingMetadata::new();
                self.source.collect_metadata(&mut delta, group_name)?;
                delta.package_names.insert(group_name.to_string());
                self.store.save(&self.codec, &file_name, &delta)?;
                aggregate.merge_group(group_name, delta);
            }
            MetadataPersistence::AggregateSnapshot => {
                self.source.collect_metadata(aggregate, group_name)?;
                aggregate.package_names.insert(group_name.to_string());
                self.store.save(&self.codec, &file_name, &*aggregate)?;
            }
        }
        Ok(())
    }

    /// Build a fresh aggregate from `group_names`, in order.
    pub fn load_all<I, G>(&self, group_names: I) -> Result<MappingMetadata>
    where
        I: IntoIterator<Item = G>,
        G: AsRef<str>,
    {
        let mut aggregate = MappingMetadata::new();
        for group_name in group_names {
            self.accumulate(&mut aggregate, group_name.as_ref())?;
        }
        Ok(aggregate)
    }

    /// Record file name for `group_name`: `metadata-<group, '.' -> '-'><ext>`.
    pub fn file_name(&self, group_name: &str) -> String {
        format!(
            "{}{}{}",
            METADATA_FILE_PREFIX,
            group_name.replace('.', "-"),
            self.codec.extension()
        )
    }

    pub fn persistence(&self) -> MetadataPersistence {
        self.persistence
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }
}
