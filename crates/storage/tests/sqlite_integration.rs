use storage::repository::{CacheEntryRecord, CacheStore, KeyValueRepository, StorageError};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn entry(status: u16, body: &[u8]) -> CacheEntryRecord {
    CacheEntryRecord {
        status,
        content_type: Some("application/json".to_string()),
        body: body.to_vec(),
    }
}

#[tokio::test]
async fn sqlite_kv_store_replaces_whole_value() {
    let repo = connect("memdb_kv").await;

    assert_eq!(repo.get_value("ol_progress").await.unwrap(), None);
    repo.put_value("ol_progress", r#"{"visited":{},"answers":{}}"#)
        .await
        .unwrap();
    repo.put_value("ol_progress", r#"{"visited":{"m1":{"l1":true}},"answers":{}}"#)
        .await
        .unwrap();

    let stored = repo.get_value("ol_progress").await.unwrap().unwrap();
    assert_eq!(stored, r#"{"visited":{"m1":{"l1":true}},"answers":{}}"#);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.put_value("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get_value("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn sqlite_cache_entries_round_trip_binary_bodies() {
    let repo = connect("memdb_cache_roundtrip").await;
    let body = [0_u8, 159, 146, 150, 255];

    repo.put_entry("offline-lessons-v1", "GET /audio/a.ogg", &entry(200, &body))
        .await
        .unwrap();

    let hit = repo
        .match_entry("offline-lessons-v1", "GET /audio/a.ogg")
        .await
        .unwrap()
        .expect("entry");
    assert_eq!(hit.body, body);
    assert_eq!(hit.status, 200);

    let miss = repo
        .match_entry("offline-lessons-v1", "GET /other")
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn sqlite_put_entry_is_last_write_wins() {
    let repo = connect("memdb_cache_lww").await;
    repo.put_entry("v1", "GET /shell", &entry(200, b"first"))
        .await
        .unwrap();
    repo.put_entry("v1", "GET /shell", &entry(200, b"second"))
        .await
        .unwrap();

    let hit = repo.match_entry("v1", "GET /shell").await.unwrap().unwrap();
    assert_eq!(hit.body, b"second");
    assert_eq!(repo.keys("v1").await.unwrap(), vec!["GET /shell"]);
}

#[tokio::test]
async fn sqlite_delete_cache_cascades_entries() {
    let repo = connect("memdb_cache_delete").await;
    repo.put_entry("v1", "GET /a", &entry(200, b"a")).await.unwrap();
    repo.open_cache("v2").await.unwrap();

    assert_eq!(repo.cache_names().await.unwrap(), vec!["v1", "v2"]);
    assert!(repo.delete_cache("v1").await.unwrap());
    assert!(!repo.delete_cache("v1").await.unwrap());

    assert_eq!(repo.cache_names().await.unwrap(), vec!["v2"]);
    assert!(repo.match_entry("v1", "GET /a").await.unwrap().is_none());
    assert!(matches!(repo.keys("v1").await, Err(StorageError::NotFound)));
}
