use super::*;

/// Tests retrieving a stored cache entry.
///
/// Verifies that the repository returns the payload and fetch time of an existing row.
///
/// Expected: Ok(Some(entry))
#[tokio::test]
async fn returns_cache_entry() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::CacheEntry)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let fetched_at = Utc::now() - TimeDelta::minutes(3);
    CacheEntryFactory::new(db)
        .domain("problems")
        .key("problemset")
        .payload(r#"{"problems":[]}"#)
        .fetched_at(fetched_at)
        .build()
        .await?;

    let repo = CacheRepository::new(db);
    let entry = repo.get("problems", "problemset").await?;

    let entry = entry.unwrap();
    assert_eq!(entry.payload, r#"{"problems":[]}"#);
    assert_eq!(entry.fetched_at, fetched_at);

    Ok(())
}

/// Tests retrieving a missing cache entry.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_key() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::CacheEntry)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = CacheRepository::new(db);
    let entry = repo.get("problems", "problemset").await?;

    assert!(entry.is_none());

    Ok(())
}

/// Tests that entries are isolated per domain.
///
/// Verifies that the same key in two domains resolves to two independent rows.
///
/// Expected: Ok with each domain returning its own payload
#[tokio::test]
async fn same_key_in_different_domains_is_independent() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::CacheEntry)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    CacheEntryFactory::new(db)
        .domain("submissions")
        .key("shared")
        .payload("1")
        .build()
        .await?;
    CacheEntryFactory::new(db)
        .domain("rating_changes")
        .key("shared")
        .payload("2")
        .build()
        .await?;

    let repo = CacheRepository::new(db);

    assert_eq!(repo.get("submissions", "shared").await?.unwrap().payload, "1");
    assert_eq!(repo.get("rating_changes", "shared").await?.unwrap().payload, "2");
    assert!(repo.get("problems", "shared").await?.is_none());

    Ok(())
}
