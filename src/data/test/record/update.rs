use super::*;

/// Tests replacing the document of an existing record.
///
/// Verifies that the new document replaces the old one, the creation time is kept and
/// `updated_at` advances.
///
/// Expected: Ok with the record updated
#[tokio::test]
async fn updates_existing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RecordRepository::new(db.clone());
    let id = RecordId::generate("ChannelMute");
    let created = repo
        .create(&id, document(json!({"reason": "spam", "channel_id": 7})))
        .await?;

    let updated = repo
        .update(&id, document(json!({"reason": "flooding"})))
        .await?;

    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.document["reason"], json!("flooding"));
    assert!(!updated.document.contains_key("channel_id"));

    let current = repo.select(&id).await?.unwrap();
    assert_eq!(current["reason"], json!("flooding"));
    assert_eq!(current["id"], json!(id.to_string()));

    Ok(())
}

/// Tests updating a record that does not exist.
///
/// Expected: Err(StoreError::NotFound) and nothing inserted
#[tokio::test]
async fn fails_for_missing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RecordRepository::new(db.clone());
    let id = RecordId::generate("Task");

    let result = repo.update(&id, document(json!({}))).await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
    assert!(repo.select(&id).await?.is_none());

    Ok(())
}
