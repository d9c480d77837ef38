use super::*;

/// Tests releasing an owned lease.
///
/// Expected: Ok(true) with owner and expiry cleared and the row kept
#[tokio::test]
async fn clears_own_lease() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::InstanceLock)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    InstanceLockFactory::new(db)
        .duty("reminders")
        .owner_id(Some("a".to_string()))
        .process_id("7")
        .build()
        .await?;

    let repo = InstanceLockRepository::new(db);

    assert!(repo.clear_owner("reminders", "a").await?);
    let lock = repo.get("reminders").await?.unwrap();
    assert!(lock.owner_id.is_none());
    assert!(lock.expires_at.is_none());
    assert_eq!(lock.process_id, "7");

    Ok(())
}

/// Tests that releasing someone else's lease is a no-op.
///
/// Expected: Ok(false) with the holder unchanged
#[tokio::test]
async fn ignores_other_owner() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::InstanceLock)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    InstanceLockFactory::new(db)
        .duty("reminders")
        .owner_id(Some("a".to_string()))
        .build()
        .await?;

    let repo = InstanceLockRepository::new(db);

    assert!(!repo.clear_owner("reminders", "b").await?);
    let lock = repo.get("reminders").await?.unwrap();
    assert_eq!(lock.owner_id.as_deref(), Some("a"));

    Ok(())
}

/// Tests releasing a duty that was never acquired.
///
/// Expected: Ok(false)
#[tokio::test]
async fn missing_row_is_noop() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::InstanceLock)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = InstanceLockRepository::new(db);

    assert!(!repo.clear_owner("reminders", "a").await?);

    Ok(())
}
