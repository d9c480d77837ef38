use super::*;

/// Tests deleting an existing cache entry.
///
/// Expected: Ok(true) and the entry is gone
#[tokio::test]
async fn deletes_existing_entry() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::CacheEntry)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    CacheEntryFactory::new(db)
        .domain("contests")
        .key("contest_list")
        .build()
        .await?;

    let repo = CacheRepository::new(db);

    assert!(repo.delete("contests", "contest_list").await?);
    assert!(repo.get("contests", "contest_list").await?.is_none());

    Ok(())
}

/// Tests deleting a missing cache entry.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_missing_entry() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::CacheEntry)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = CacheRepository::new(db);

    assert!(!repo.delete("contests", "contest_list").await?);

    Ok(())
}
