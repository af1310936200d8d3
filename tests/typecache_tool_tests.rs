//! Tests for the typecache-tool inspection binary.

use std::process::Command;

use tempfile::TempDir;
use typecache::{
    AttributeDescriptor, CacheConfig, ConnectionHandle, DescriptorCache, StaticCatalog,
};

fn tool() -> Command {
    Command::new(env!("CARGO_BIN_EXE_typecache-tool"))
}

#[test]
fn test_list_missing_folder_fails_without_creating_it() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("no-such-cache");

    let output = tool().arg("list").arg(&missing).output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
    assert!(!missing.exists());
}

#[test]
fn test_show_missing_folder_fails_without_creating_it() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("no-such-cache");

    let output = tool()
        .arg("show")
        .arg(&missing)
        .arg("EMP_REC.ser")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!missing.exists());
}

#[test]
fn test_list_and_show_populated_folder() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = StaticCatalog::new()
        .with_struct("EMP_REC", vec![AttributeDescriptor::new("ID", "NUMBER")]);
    let cache = DescriptorCache::new(&CacheConfig::new(temp_dir.path()), catalog).unwrap();
    cache
        .struct_descriptor("EMP_REC", &ConnectionHandle::new(1, "scott", "HR"))
        .unwrap();

    let output = tool().arg("list").arg(temp_dir.path()).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("EMP_REC.ser"));
    assert!(stdout.contains("1 record(s)"));

    let output = tool()
        .arg("show")
        .arg(temp_dir.path())
        .arg("EMP_REC.ser")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("\"type_name\": \"EMP_REC\""));
}
