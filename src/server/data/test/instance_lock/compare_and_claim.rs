use super::*;

/// Tests taking over an expired lease with an accurate observation.
///
/// Expected: Ok(true) with the new owner written
#[tokio::test]
async fn claims_row_matching_observation() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::InstanceLock)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let expired_at = now - TimeDelta::seconds(5);
    InstanceLockFactory::new(db)
        .duty("reminders")
        .owner_id(Some("a".to_string()))
        .expires_at(Some(expired_at))
        .build()
        .await?;

    let repo = InstanceLockRepository::new(db);
    let claimed = repo
        .compare_and_claim(claim("reminders", "b", now, 60), Some("a"), Some(expired_at))
        .await?;

    assert!(claimed);
    let lock = repo.get("reminders").await?.unwrap();
    assert_eq!(lock.owner_id.as_deref(), Some("b"));
    assert_eq!(lock.acquired_at, now);

    Ok(())
}

/// Tests that a stale observation loses the compare-and-swap.
///
/// Simulates a second writer that already replaced the holder after the caller read the row.
///
/// Expected: Ok(false) with the other writer's owner kept
#[tokio::test]
async fn rejects_stale_observation() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::InstanceLock)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let expired_at = now - TimeDelta::seconds(5);
    InstanceLockFactory::new(db)
        .duty("reminders")
        .owner_id(Some("a".to_string()))
        .expires_at(Some(expired_at))
        .build()
        .await?;

    let repo = InstanceLockRepository::new(db);
    assert!(
        repo.compare_and_claim(claim("reminders", "c", now, 60), Some("a"), Some(expired_at))
            .await?
    );
    let claimed = repo
        .compare_and_claim(claim("reminders", "b", now, 60), Some("a"), Some(expired_at))
        .await?;

    assert!(!claimed);
    let lock = repo.get("reminders").await?.unwrap();
    assert_eq!(lock.owner_id.as_deref(), Some("c"));

    Ok(())
}

/// Tests claiming a released lease, whose owner and expiry are both null.
///
/// Expected: Ok(true)
#[tokio::test]
async fn claims_released_row() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::InstanceLock)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    InstanceLockFactory::new(db)
        .duty("reminders")
        .owner_id(None)
        .expires_at(None)
        .build()
        .await?;

    let repo = InstanceLockRepository::new(db);
    let claimed = repo
        .compare_and_claim(claim("reminders", "b", Utc::now(), 60), None, None)
        .await?;

    assert!(claimed);
    let lock = repo.get("reminders").await?.unwrap();
    assert_eq!(lock.owner_id.as_deref(), Some("b"));

    Ok(())
}

/// Tests that a missing row is never created by the compare-and-swap path.
///
/// Expected: Ok(false) and no row afterwards
#[tokio::test]
async fn does_not_create_missing_row() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::InstanceLock)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = InstanceLockRepository::new(db);
    let claimed = repo
        .compare_and_claim(claim("reminders", "b", Utc::now(), 60), None, None)
        .await?;

    assert!(!claimed);
    assert!(repo.get("reminders").await?.is_none());

    Ok(())
}
