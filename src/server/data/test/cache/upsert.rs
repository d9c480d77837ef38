use super::*;

/// Tests creating a new cache entry.
///
/// Expected: Ok with the row readable afterwards
#[tokio::test]
async fn creates_new_entry() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::CacheEntry)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let fetched_at = Utc::now();
    let repo = CacheRepository::new(db);
    let entry = repo
        .upsert(UpsertCacheEntryParam {
            domain: "submissions".to_string(),
            key: "handle:tourist".to_string(),
            payload: "[]".to_string(),
            fetched_at,
        })
        .await?;

    assert_eq!(entry.payload, "[]");

    let stored = repo.get("submissions", "handle:tourist").await?.unwrap();
    assert_eq!(stored.payload, "[]");
    assert_eq!(stored.fetched_at, fetched_at);

    Ok(())
}

/// Tests that writing the same key twice replaces the row instead of appending.
///
/// Expected: Ok with exactly one row holding the second payload
#[tokio::test]
async fn second_write_replaces_entry() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::CacheEntry)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first_at = Utc::now() - TimeDelta::hours(1);
    let second_at = Utc::now();
    let repo = CacheRepository::new(db);

    repo.upsert(UpsertCacheEntryParam {
        domain: "problems".to_string(),
        key: "problemset".to_string(),
        payload: "old".to_string(),
        fetched_at: first_at,
    })
    .await?;
    repo.upsert(UpsertCacheEntryParam {
        domain: "problems".to_string(),
        key: "problemset".to_string(),
        payload: "new".to_string(),
        fetched_at: second_at,
    })
    .await?;

    let count = entity::prelude::CacheEntry::find()
        .filter(entity::cache_entry::Column::Domain.eq("problems"))
        .filter(entity::cache_entry::Column::Key.eq("problemset"))
        .count(db)
        .await?;
    assert_eq!(count, 1);

    let stored = repo.get("problems", "problemset").await?.unwrap();
    assert_eq!(stored.payload, "new");
    assert_eq!(stored.fetched_at, second_at);

    Ok(())
}

/// Tests that upserting one key does not touch other keys in the domain.
///
/// Expected: Ok with the unrelated row unchanged
#[tokio::test]
async fn leaves_other_keys_untouched() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::CacheEntry)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    CacheEntryFactory::new(db)
        .domain("submissions")
        .key("handle:petr")
        .payload("petr")
        .build()
        .await?;

    let repo = CacheRepository::new(db);
    repo.upsert(UpsertCacheEntryParam {
        domain: "submissions".to_string(),
        key: "handle:tourist".to_string(),
        payload: "tourist".to_string(),
        fetched_at: Utc::now(),
    })
    .await?;

    assert_eq!(
        repo.get("submissions", "handle:petr").await?.unwrap().payload,
        "petr"
    );
    let count = entity::prelude::CacheEntry::find().count(db).await?;
    assert_eq!(count, 2);

    Ok(())
}
