use super::*;

/// Tests listing resources by a field value.
///
/// Expected: Ok with only the matching resources, oldest first
#[tokio::test]
async fn returns_matching_resources_oldest_first() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let store: Arc<dyn RecordStore> = Arc::new(RecordRepository::new(db.clone()));
    let repo = ResourceRepository::<ServerBan>::new(store);

    let first = repo.store(&ban(42)).await?;
    repo.store(&ban(99)).await?;
    let second = repo.store(&ban(42)).await?;

    let found = repo.find_where("target_id", 42).await?;

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].meta.id, first.meta.id);
    assert_eq!(found[1].meta.id, second.meta.id);

    Ok(())
}
