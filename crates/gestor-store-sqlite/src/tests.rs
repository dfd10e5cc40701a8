//! Integration tests for `SqliteStore` against in-memory and on-disk databases.

use gestor_core::{Contact, ContactStatus, Origin, store::ContactStore};

use crate::{DEFAULT_KEY, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory(DEFAULT_KEY)
    .await
    .expect("in-memory store")
}

fn sample() -> Vec<Contact> {
  let mut ana = Contact::new("Ana", Origin::Tabular);
  ana.status = ContactStatus::Playing;
  ana.recovered = true;
  let mut luis = Contact::new("Luis Perez", Origin::Card);
  luis.phone = "549351000111".into();
  vec![ana, luis, Contact::new("Bruno", Origin::Tabular)]
}

// ─── Load / save ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_before_any_save_is_empty() {
  let s = store().await;
  assert!(s.load().await.unwrap().is_empty());
  assert!(s.saved_at().await.unwrap().is_none());
}

#[tokio::test]
async fn save_then_load_preserves_order_and_fields() {
  let s = store().await;
  let contacts = sample();
  s.save(&contacts).await.unwrap();

  let loaded = s.load().await.unwrap();
  assert_eq!(loaded.len(), 3);
  let names: Vec<_> = loaded.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, ["Ana", "Luis Perez", "Bruno"]);
  for (a, b) in contacts.iter().zip(&loaded) {
    assert_eq!(a.id, b.id);
    assert_eq!(a.phone, b.phone);
    assert_eq!(a.origin, b.origin);
    assert_eq!(a.status, b.status);
    assert_eq!(a.recovered, b.recovered);
  }
  assert!(s.saved_at().await.unwrap().is_some());
}

#[tokio::test]
async fn save_replaces_previous_snapshot() {
  let s = store().await;
  s.save(&sample()).await.unwrap();
  s.save(&[Contact::new("Solo", Origin::Card)]).await.unwrap();

  let loaded = s.load().await.unwrap();
  assert_eq!(loaded.len(), 1);
  assert_eq!(loaded[0].name, "Solo");
}

#[tokio::test]
async fn saving_empty_collection_clears_it() {
  let s = store().await;
  s.save(&sample()).await.unwrap();
  s.save(&[]).await.unwrap();
  assert!(s.load().await.unwrap().is_empty());
}

// ─── Keys ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn keys_are_independent_within_one_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("contacts.db");

  let a = SqliteStore::open(&path, "a").await.unwrap();
  let b = SqliteStore::open(&path, "b").await.unwrap();
  a.save(&sample()).await.unwrap();

  assert_eq!(a.load().await.unwrap().len(), 3);
  assert!(b.load().await.unwrap().is_empty());
  assert_eq!(b.key(), "b");
}

#[tokio::test]
async fn reopening_file_sees_saved_collection() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("contacts.db");

  {
    let s = SqliteStore::open(&path, DEFAULT_KEY).await.unwrap();
    s.save(&sample()).await.unwrap();
  }

  let s = SqliteStore::open(&path, DEFAULT_KEY).await.unwrap();
  assert_eq!(s.load().await.unwrap().len(), 3);
}

// ─── Corruption ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn corrupt_snapshot_is_reported() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO snapshots (key, value_json, saved_at) VALUES (?1, '{not json', ?2)",
        rusqlite::params![DEFAULT_KEY, "2024-01-01T00:00:00+00:00"],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  assert!(matches!(
    s.load().await,
    Err(crate::Error::Core(gestor_core::Error::Serialization(_)))
  ));
}
