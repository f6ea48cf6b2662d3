use super::*;

/// Tests creating a new record.
///
/// Verifies that the repository inserts a row whose type column is the id's table
/// prefix and whose document is stamped with its id and `updated_at`.
///
/// Expected: Ok with the record stored
#[tokio::test]
async fn creates_new_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RecordRepository::new(db.clone());
    let id = RecordId::generate("ServerBan");

    let stored = repo
        .create(&id, document(json!({"target_id": 42})))
        .await?;

    assert_eq!(stored.id, id);
    assert_eq!(stored.document["target_id"], json!(42));
    assert_eq!(stored.document["id"], json!(id.to_string()));
    assert!(stored.document["updated_at"].is_string());

    let row = entity::prelude::Record::find_by_id(id.to_string())
        .one(db)
        .await?
        .unwrap();
    assert_eq!(row.record_type, "ServerBan");
    assert_eq!(row.data["target_id"], json!(42));

    Ok(())
}

/// Tests creating a record under an id that is already taken.
///
/// Verifies that the existing record is left untouched.
///
/// Expected: Err(StoreError::AlreadyExists)
#[tokio::test]
async fn fails_for_existing_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RecordRepository::new(db.clone());
    let id = RecordId::generate("Task");
    repo.create(&id, document(json!({"n": 1}))).await?;

    let result = repo.create(&id, document(json!({"n": 2}))).await;

    assert!(matches!(result, Err(StoreError::AlreadyExists(ref existing)) if existing == &id));
    let current = repo.select(&id).await?.unwrap();
    assert_eq!(current["n"], json!(1));

    Ok(())
}
