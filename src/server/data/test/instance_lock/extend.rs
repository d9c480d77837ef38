use super::*;

/// Tests extending a lease held by the caller.
///
/// Expected: Ok(true) with the new expiry stored
#[tokio::test]
async fn extends_own_lease() -> Result<(), AppError> {
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

    let new_expiry = Utc::now() + TimeDelta::seconds(120);
    let repo = InstanceLockRepository::new(db);

    assert!(repo.extend("reminders", "a", new_expiry).await?);
    let lock = repo.get("reminders").await?.unwrap();
    assert_eq!(lock.expires_at, Some(new_expiry));

    Ok(())
}

/// Tests that another owner cannot extend the lease.
///
/// Expected: Ok(false) with the expiry unchanged
#[tokio::test]
async fn rejects_other_owner() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::InstanceLock)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let expires_at = Utc::now() + TimeDelta::seconds(30);
    InstanceLockFactory::new(db)
        .duty("reminders")
        .owner_id(Some("a".to_string()))
        .expires_at(Some(expires_at))
        .build()
        .await?;

    let repo = InstanceLockRepository::new(db);

    assert!(
        !repo
            .extend("reminders", "b", Utc::now() + TimeDelta::seconds(120))
            .await?
    );
    let lock = repo.get("reminders").await?.unwrap();
    assert_eq!(lock.expires_at, Some(expires_at));

    Ok(())
}

/// Tests extending a released lease.
///
/// Expected: Ok(false)
#[tokio::test]
async fn rejects_released_lease() -> Result<(), AppError> {
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

    assert!(
        !repo
            .extend("reminders", "a", Utc::now() + TimeDelta::seconds(60))
            .await?
    );

    Ok(())
}
