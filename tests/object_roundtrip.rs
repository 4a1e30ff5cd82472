//! End-to-end tests of the library: bootstrap, store, read back.

use mygit::store::frame;
use mygit::{Config, Error, ObjectId, ObjectKind, Repository};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

#[test]
fn test_store_and_read_hello_world() {
    let dir = tempdir().unwrap();
    let root = dir.path().join(".git");
    let repo = Repository::init_or_open(&root, &Config::default()).unwrap();

    let id = repo
        .hash_object(ObjectKind::Blob, b"hello world\n", true)
        .unwrap();

    assert_eq!(id, ObjectId::digest(b"blob 12\0hello world\n"));
    assert_eq!(id.to_hex(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
    assert_eq!(repo.cat_file(&id.to_hex()).unwrap(), b"hello world\n");
}

#[test]
fn test_ids_stable_across_repositories() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let repo_a = Repository::init_or_open(a.path(), &Config::default()).unwrap();
    let repo_b = Repository::init_or_open(b.path(), &Config::default()).unwrap();

    let payloads: [&[u8]; 4] = [b"", b"x", b"with\0nul", b"hello world\n"];
    for payload in payloads {
        let id_a = repo_a.hash_object(ObjectKind::Blob, payload, true).unwrap();
        let id_b = repo_b.hash_object(ObjectKind::Blob, payload, true).unwrap();
        assert_eq!(id_a, id_b);
        assert_eq!(id_a, frame::hash(&frame::frame(ObjectKind::Blob, payload)));
    }
}

#[test]
fn test_large_payload_roundtrip() {
    let dir = tempdir().unwrap();
    let repo = Repository::init_or_open(dir.path(), &Config::default()).unwrap();

    let payload: Vec<u8> = (0..1_000_000u32).map(|i| (i % 251) as u8).collect();
    let id = repo.hash_object(ObjectKind::Blob, &payload, true).unwrap();

    assert_eq!(repo.cat_file(&id.to_hex()).unwrap(), payload);
    assert_eq!(repo.read_object(&id.to_hex()).unwrap().size(), payload.len());
}

#[test]
fn test_never_stored_id_is_not_found() {
    let dir = tempdir().unwrap();
    let repo = Repository::init_or_open(dir.path(), &Config::default()).unwrap();

    let err = repo
        .cat_file("0000000000000000000000000000000000000000")
        .unwrap_err();
    assert!(matches!(err, Error::ObjectNotFound(_)));
}

#[test]
fn test_concurrent_writers_same_object() {
    let dir = tempdir().unwrap();
    let repo = Arc::new(Repository::init_or_open(dir.path(), &Config::default()).unwrap());
    let payload = b"written by many threads".to_vec();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let repo = Arc::clone(&repo);
            let payload = payload.clone();
            thread::spawn(move || repo.hash_object(ObjectKind::Blob, &payload, true).unwrap())
        })
        .collect();

    let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(repo.cat_file(&ids[0].to_hex()).unwrap(), payload);

    // No temporary files left behind in the shard
    let shard = repo.store().object_path(&ids[0]);
    let entries = std::fs::read_dir(shard.parent().unwrap()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_concurrent_writers_distinct_objects() {
    let dir = tempdir().unwrap();
    let repo = Arc::new(Repository::init_or_open(dir.path(), &Config::default()).unwrap());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                let payload = format!("object number {}", i);
                let id = repo
                    .hash_object(ObjectKind::Blob, payload.as_bytes(), true)
                    .unwrap();
                (id, payload)
            })
        })
        .collect();

    for handle in handles {
        let (id, payload) = handle.join().unwrap();
        assert_eq!(repo.cat_file(&id.to_hex()).unwrap(), payload.as_bytes());
    }
}
