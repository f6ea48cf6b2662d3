use super::*;

/// Tests fetching a stored resource by id.
///
/// Expected: Ok(Some) equal to what was stored
#[tokio::test]
async fn returns_stored_resource() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let store: Arc<dyn RecordStore> = Arc::new(RecordRepository::new(db.clone()));
    let repo = ResourceRepository::<ServerBan>::new(store);
    let stored = repo.store(&ban(7)).await?;

    let fetched = repo.get(&stored.meta.id).await?;

    assert_eq!(fetched, Some(stored));

    Ok(())
}

/// Tests fetching with an id of another entity type.
///
/// Expected: Err(StoreError::WrongTable) without touching the store
#[tokio::test]
async fn rejects_id_of_other_table() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let store: Arc<dyn RecordStore> = Arc::new(RecordRepository::new(db.clone()));
    let repo = ResourceRepository::<ServerBan>::new(store);

    let result = repo.get(&RecordId::generate("ChannelMute")).await;

    assert!(matches!(
        result,
        Err(StoreError::WrongTable { ref expected, .. }) if expected == "ServerBan"
    ));

    Ok(())
}

/// Tests fetching a deleted resource.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_after_delete() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let store: Arc<dyn RecordStore> = Arc::new(RecordRepository::new(db.clone()));
    let repo = ResourceRepository::<ServerBan>::new(store);
    let stored = repo.store(&ban(7)).await?;

    repo.delete(&stored.meta.id).await?;

    assert!(repo.get(&stored.meta.id).await?.is_none());

    Ok(())
}
