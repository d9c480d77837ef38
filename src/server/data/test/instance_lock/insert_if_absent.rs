use super::*;

/// Tests inserting the first lease row for a duty.
///
/// Expected: Ok(true) with the row holding the new owner
#[tokio::test]
async fn inserts_first_lease() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::InstanceLock)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = InstanceLockRepository::new(db);
    let inserted = repo.insert_if_absent(claim("reminders", "a", now, 60)).await?;

    assert!(inserted);
    let lock = repo.get("reminders").await?.unwrap();
    assert_eq!(lock.owner_id.as_deref(), Some("a"));
    assert_eq!(lock.process_id, "100");
    assert_eq!(lock.expires_at, Some(now + TimeDelta::seconds(60)));

    Ok(())
}

/// Tests that an existing row is never overwritten by the insert path.
///
/// Expected: Ok(false) with the original holder kept
#[tokio::test]
async fn leaves_existing_row_untouched() -> Result<(), AppError> {
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
    let inserted = repo
        .insert_if_absent(claim("reminders", "b", Utc::now(), 60))
        .await?;

    assert!(!inserted);
    let lock = repo.get("reminders").await?.unwrap();
    assert_eq!(lock.owner_id.as_deref(), Some("a"));

    Ok(())
}

/// Tests that different duties get independent rows.
///
/// Expected: Ok(true) for both inserts
#[tokio::test]
async fn duties_are_independent() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::InstanceLock)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = InstanceLockRepository::new(db);

    assert!(repo.insert_if_absent(claim("reminders", "a", now, 60)).await?);
    assert!(repo.insert_if_absent(claim("digest", "b", now, 60)).await?);

    Ok(())
}
