use super::*;

/// Tests storing a resource that has no record yet.
///
/// Expected: Ok with the resource created and `updated_at` stamped
#[tokio::test]
async fn creates_missing_resource() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let store: Arc<dyn RecordStore> = Arc::new(RecordRepository::new(db.clone()));
    let repo = ResourceRepository::<ServerBan>::new(store);
    let ban = ban(42);

    let stored = repo.store(&ban).await?;

    assert_eq!(stored.meta.id, ban.meta.id);
    assert_eq!(stored.target_id, 42);
    assert!(stored.meta.updated_at.is_some());

    Ok(())
}

/// Tests storing a resource that already has a record.
///
/// Verifies that storing again updates the existing record instead of failing.
///
/// Expected: Ok with the record updated in place
#[tokio::test]
async fn updates_existing_resource() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let store: Arc<dyn RecordStore> = Arc::new(RecordRepository::new(db.clone()));
    let repo = ResourceRepository::<ServerBan>::new(store);
    let mut ban = ban(42);
    repo.store(&ban).await?;

    ban.auto_lift_task = Some(RecordId::generate("Task"));
    repo.store(&ban).await?;

    let current = repo.get(&ban.meta.id).await?.unwrap();
    assert_eq!(current.auto_lift_task, ban.auto_lift_task);
    assert_eq!(repo.find_where("target_id", 42).await?.len(), 1);

    Ok(())
}
