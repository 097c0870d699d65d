// Storage container tests

use super::*;
use crate::infrastructure::stream_name::encode_name;
use tempfile::TempDir;

fn table_stream(name: &str) -> crate::infrastructure::stream_name::StreamName {
    encode_name(true, name).unwrap()
}

#[test]
fn test_dir_storage_put_and_read() {
    let temp_dir = TempDir::new().unwrap();
    let storage = DirStorage::new(temp_dir.path(), dir_storage::DEFAULT_CHUNK_SIZE).unwrap();

    let name = table_stream("Property");
    storage.put_stream(&name, b"\x01\x00\x02\x00").unwrap();

    let mut handle = storage.open_stream(&name).unwrap();
    assert_eq!(handle.stat().unwrap(), 4);
    assert_eq!(handle.read(4).unwrap(), vec![1, 0, 2, 0]);

    assert!(storage.stream_path(&name).exists());
}

#[test]
fn test_dir_storage_small_chunks() {
    let temp_dir = TempDir::new().unwrap();
    let storage = DirStorage::new(temp_dir.path(), 3).unwrap();

    let name = table_stream("File");
    let data: Vec<u8> = (0..=255u8).collect();
    storage.put_stream(&name, &data).unwrap();

    assert_eq!(storage.read_stream(&name).unwrap(), data);
}

#[test]
fn test_dir_storage_missing_stream() {
    let temp_dir = TempDir::new().unwrap();
    let storage = DirStorage::new(temp_dir.path(), 16).unwrap();

    let result = storage.open_stream(&table_stream("NeverWritten"));
    match result {
        Err(err) => assert!(err.is_not_found()),
        Ok(_) => panic!("missing stream opened"),
    }
}

#[test]
fn test_dir_storage_short_read() {
    let temp_dir = TempDir::new().unwrap();
    let storage = DirStorage::new(temp_dir.path(), 16).unwrap();

    let name = table_stream("Short");
    storage.put_stream(&name, b"abc").unwrap();

    let mut handle = storage.open_stream(&name).unwrap();
    assert!(matches!(
        handle.read(8),
        Err(StorageError::ShortRead { expected: 8, actual: 3, .. })
    ));
}

#[test]
fn test_dir_storage_replace_and_remove() {
    let temp_dir = TempDir::new().unwrap();
    let storage = DirStorage::new(temp_dir.path(), 16).unwrap();

    let name = table_stream("Feature");
    storage.put_stream(&name, b"first contents").unwrap();
    storage.put_stream(&name, b"two").unwrap();
    assert_eq!(storage.read_stream(&name).unwrap(), b"two".to_vec());

    storage.remove_stream(&name).unwrap();
    assert!(matches!(
        storage.remove_stream(&name),
        Err(StorageError::NotFound(_))
    ));
}

#[test]
fn test_dir_storage_reopen_existing_dir() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("container");

    let name = table_stream("Component");
    {
        let storage = DirStorage::new(&root, 16).unwrap();
        storage.put_stream(&name, b"\xff\xff").unwrap();
    }

    let storage = DirStorage::new(&root, 16).unwrap();
    assert_eq!(storage.root(), root.as_path());
    assert_eq!(storage.read_stream(&name).unwrap(), vec![0xff, 0xff]);
}

#[test]
fn test_dir_storage_rejects_zero_chunk() {
    let temp_dir = TempDir::new().unwrap();
    assert!(matches!(
        DirStorage::new(temp_dir.path(), 0),
        Err(StorageError::InvalidArgument(_))
    ));
}

#[test]
fn test_mem_storage_basic() {
    let storage = MemStorage::new();
    assert!(storage.is_empty());

    let name = table_stream("Registry");
    storage.put_stream(name.clone(), vec![9, 8, 7, 6]);
    assert_eq!(storage.len(), 1);

    let mut handle = storage.open_stream(&name).unwrap();
    assert_eq!(handle.stat().unwrap(), 4);
    assert_eq!(handle.read(2).unwrap(), vec![9, 8]);
    assert_eq!(handle.read(2).unwrap(), vec![7, 6]);
    assert!(matches!(handle.read(1), Err(StorageError::ShortRead { .. })));

    assert_eq!(storage.open_count(), 1);
}

#[test]
fn test_mem_storage_missing_counts_open() {
    let storage = MemStorage::new();
    let result = storage.open_stream(&table_stream("Nothing"));
    assert!(matches!(result, Err(StorageError::NotFound(_))));
    assert_eq!(storage.open_count(), 1);
}

#[test]
fn test_mem_storage_snapshot_survives_replace() {
    let storage = MemStorage::new();
    let name = table_stream("Media");
    storage.put_stream(name.clone(), vec![1, 2]);

    let mut handle = storage.open_stream(&name).unwrap();
    storage.put_stream(name.clone(), vec![3, 4, 5]);

    assert_eq!(handle.read(2).unwrap(), vec![1, 2]);
    assert_eq!(storage.read_stream(&name).unwrap(), vec![3, 4, 5]);

    assert!(storage.remove_stream(&name));
    assert!(!storage.remove_stream(&name));
}

#[test]
fn test_stream_file_name_escapes_path_syntax() {
    let name = encode_name(false, "%/").unwrap();
    assert_eq!(dir_storage::stream_file_name(&name), "%25%2F");

    let plain = table_stream("Property");
    assert_eq!(dir_storage::stream_file_name(&plain), plain.to_file_name());
}

#[test]
fn test_dir_storage_name_with_separator() {
    let temp_dir = TempDir::new().unwrap();
    let storage = DirStorage::new(temp_dir.path(), 16).unwrap();

    let parent = table_stream("a");
    let nested = table_stream("a/x");
    storage.put_stream(&parent, b"parent").unwrap();
    storage.put_stream(&nested, b"nested").unwrap();

    assert_eq!(storage.read_stream(&parent).unwrap(), b"parent".to_vec());
    assert_eq!(storage.read_stream(&nested).unwrap(), b"nested".to_vec());
    assert_eq!(storage.stream_path(&nested).parent(), Some(temp_dir.path()));

    let other = table_stream("b/y");
    storage.put_stream(&other, b"").unwrap();
    assert_eq!(storage.read_stream(&other).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_dir_storage_missing_name_with_separator() {
    use crate::table::TableCache;
    use std::sync::Arc;

    let temp_dir = TempDir::new().unwrap();
    let storage = DirStorage::new(temp_dir.path(), 16).unwrap();
    storage.put_stream(&table_stream("a"), &[1, 0]).unwrap();

    let cache = TableCache::new(Arc::new(storage));
    let table = cache.get_table("a/x").unwrap();
    assert_eq!(table.size(), 0);
    assert!(!table.has_stream());
    cache.release_table(&table).unwrap();
}
