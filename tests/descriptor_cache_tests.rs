//! Integration tests for descriptor resolution across the memory, disk and
//! source tiers.

use std::sync::Arc;

use tempfile::TempDir;
use typecache::{
    AttributeDescriptor, CacheConfig, CacheError, ConnectionHandle, DescriptorCache,
    DescriptorKind, DescriptorPayload, ResolutionCause, SourceConnector, SourceError,
    StaticCatalog, MappingMetadata,
};

fn hr_catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_struct(
            "EMP_REC",
            vec![
                AttributeDescriptor::new("ID", "NUMBER").numeric(10, 0),
                AttributeDescriptor::new("NAME", "VARCHAR2").length(64),
                AttributeDescriptor::new("SALARY", "NUMBER").numeric(12, 2),
            ],
        )
        .with_array("EMP_LIST", "EMP_REC", Some(500))
}

#[test]
fn test_first_resolution_goes_to_source_once() {
    let temp_dir = TempDir::new().unwrap();
    let cache = DescriptorCache::new(&CacheConfig::new(temp_dir.path()), hr_catalog()).unwrap();
    let conn = ConnectionHandle::new(1, "scott", "HR");

    let descriptor = cache.struct_descriptor("EMP_REC", &conn).unwrap();

    assert_eq!(cache.source().call_count("EMP_REC"), 1);
    assert_eq!(descriptor.type_name(), "EMP_REC");
    assert_eq!(descriptor.kind(), DescriptorKind::Struct);
    assert_eq!(descriptor.attributes().len(), 3);
    assert_eq!(descriptor.connection(), Some(&conn));

    assert_eq!(cache.store().keys().unwrap(), vec!["EMP_REC.ser".to_string()]);
    assert_eq!(cache.len(), 1);
    assert!(cache.cached(DescriptorKind::Struct, "EMP_REC").unwrap().is_some());
}

#[test]
fn test_restart_reads_from_disk_and_rebinds() {
    let temp_dir = TempDir::new().unwrap();
    let config = CacheConfig::new(temp_dir.path());
    let conn = ConnectionHandle::new(1, "scott", "HR");
    let conn2 = ConnectionHandle::new(2, "scott", "HR");

    // Session 1: populate disk
    {
        let cache = DescriptorCache::new(&config, hr_catalog()).unwrap();
        cache.struct_descriptor("EMP_REC", &conn).unwrap();
        assert_eq!(cache.source().call_count("EMP_REC"), 1);
    }

    // Session 2: fresh instance, same folder
    let cache = DescriptorCache::new(&config, hr_catalog()).unwrap();
    let from_disk = cache.struct_descriptor("EMP_REC", &conn2).unwrap();

    assert_eq!(cache.source().call_count("EMP_REC"), 0);
    assert_eq!(from_disk.connection(), Some(&conn2));
    assert_eq!(from_disk.type_name(), "EMP_REC");
    assert_eq!(from_disk.attributes()[2].scale, Some(2));

    let stats = cache.stats();
    assert_eq!(stats.disk_hits, 1);
    assert_eq!(stats.source_loads, 0);
}

#[test]
fn test_memory_hit_keeps_first_binding() {
    let temp_dir = TempDir::new().unwrap();
    let cache = DescriptorCache::new(&CacheConfig::new(temp_dir.path()), hr_catalog()).unwrap();
    let conn = ConnectionHandle::new(1, "scott", "HR");
    let conn3 = ConnectionHandle::new(3, "scott", "HR");

    let first = cache.array_descriptor("EMP_LIST", &conn).unwrap();
    let again = cache.array_descriptor("EMP_LIST", &conn3).unwrap();

    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(again.connection(), Some(&conn));
    assert_eq!(again.element_type(), Some("EMP_REC"));
    assert_eq!(cache.source().call_count("EMP_LIST"), 1);
}

#[test]
fn test_disk_roundtrip_is_connection_independent() {
    let temp_dir = TempDir::new().unwrap();
    let config = CacheConfig::new(temp_dir.path()).file_prefix("hr");
    let writer_conn = ConnectionHandle::new(10, "writer", "HR");

    let written = DescriptorCache::new(&config, hr_catalog())
        .unwrap()
        .array_descriptor("EMP_LIST", &writer_conn)
        .unwrap();
    assert!(temp_dir.path().join("hr-EMP_LIST.ser").exists());

    for id in [11, 12] {
        let cache = DescriptorCache::new(&config, StaticCatalog::new()).unwrap();
        let reader_conn = ConnectionHandle::new(id, "reader", "HR");
        let read = cache.array_descriptor("EMP_LIST", &reader_conn).unwrap();
        assert_eq!(read.type_name(), written.type_name());
        assert_eq!(read.kind(), written.kind());
        assert_eq!(read.payload(), written.payload());
        assert_eq!(read.connection().map(|c| c.id()), Some(id));
    }
}

#[test]
fn test_source_failure_caches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = hr_catalog().failing_on("EMP_REC");
    let cache = DescriptorCache::new(&CacheConfig::new(temp_dir.path()), catalog).unwrap();
    let conn = ConnectionHandle::new(1, "scott", "HR");

    let err = cache.struct_descriptor("EMP_REC", &conn).unwrap_err();
    match &err {
        CacheError::Resolution { type_name, kind, cause } => {
            assert_eq!(type_name, "EMP_REC");
            assert_eq!(*kind, DescriptorKind::Struct);
            assert!(matches!(cause, ResolutionCause::Source(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("EMP_REC"));
    assert!(cache.is_empty());
    assert!(cache.store().keys().unwrap().is_empty());

    // no internal retry: every call reaches the source again
    cache.struct_descriptor("EMP_REC", &conn).unwrap_err();
    assert_eq!(cache.source().call_count("EMP_REC"), 2);
    assert_eq!(cache.stats().failures, 2);
}

#[test]
fn test_record_for_another_type_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = CacheConfig::new(temp_dir.path());
    let conn = ConnectionHandle::new(1, "scott", "HR");
    let catalog = StaticCatalog::new()
        .with_struct("A_REC", vec![AttributeDescriptor::new("ID", "NUMBER")])
        .with_struct("B_REC", vec![AttributeDescriptor::new("ID", "NUMBER")]);
    let cache = DescriptorCache::new(&config, catalog).unwrap();

    cache.struct_descriptor("A_REC", &conn).unwrap();
    std::fs::copy(
        temp_dir.path().join("A_REC.ser"),
        temp_dir.path().join("B_REC.ser"),
    )
    .unwrap();

    let err = cache.struct_descriptor("B_REC", &conn).unwrap_err();
    assert!(matches!(
        err.cause(),
        Some(ResolutionCause::NameMismatch { found }) if found == "A_REC"
    ));
    assert!(err.to_string().contains("stored record describes 'A_REC'"));
    assert!(cache.cached(DescriptorKind::Struct, "B_REC").unwrap().is_none());
    assert_eq!(cache.source().call_count("B_REC"), 0);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_uncreatable_root_fails_at_construction() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"not a folder").unwrap();

    let config = CacheConfig::new(blocker.join("cache"));
    let result = DescriptorCache::new(&config, hr_catalog());
    assert!(matches!(result, Err(CacheError::Configuration { .. })));
}

/// Connector that answers every lookup with a struct, whatever was asked.
struct StructOnlyConnector;

impl SourceConnector for StructOnlyConnector {
    fn create_descriptor(
        &self,
        _type_name: &str,
        _kind: DescriptorKind,
        _connection: &ConnectionHandle,
    ) -> Result<DescriptorPayload, SourceError> {
        Ok(DescriptorPayload::Struct { attributes: Vec::new() })
    }

    fn collect_metadata(
        &self,
        _metadata: &mut MappingMetadata,
        _group_name: &str,
    ) -> Result<(), SourceError> {
        Ok(())
    }
}

#[test]
fn test_source_returning_wrong_kind_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let cache =
        DescriptorCache::new(&CacheConfig::new(temp_dir.path()), StructOnlyConnector).unwrap();
    let conn = ConnectionHandle::new(1, "scott", "HR");

    let err = cache.array_descriptor("EMP_LIST", &conn).unwrap_err();
    assert!(matches!(
        err.cause(),
        Some(ResolutionCause::KindMismatch {
            expected: DescriptorKind::Array,
            found: DescriptorKind::Struct,
        })
    ));
    assert!(!temp_dir.path().join("EMP_LIST.ser").exists());
}

#[test]
fn test_shared_source_through_arc() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = Arc::new(hr_catalog());
    let config = CacheConfig::new(temp_dir.path());
    let conn = ConnectionHandle::new(1, "scott", "HR");

    let cache = DescriptorCache::new(&config, Arc::clone(&catalog)).unwrap();
    cache.struct_descriptor("EMP_REC", &conn).unwrap();
    cache.array_descriptor("EMP_LIST", &conn).unwrap();

    assert_eq!(catalog.total_calls(), 2);
    assert_eq!(cache.len(), 2);
}
