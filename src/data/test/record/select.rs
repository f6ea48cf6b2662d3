use super::*;

/// Tests selecting a record by id.
///
/// Expected: Ok(Some) with the stored document
#[tokio::test]
async fn returns_stored_document() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::record::create_task(db).await?;
    let id: RecordId = row.id.parse().unwrap();

    let repo = RecordRepository::new(db.clone());
    let document = repo.select(&id).await?;

    assert!(document.is_some());
    assert_eq!(document.unwrap()["id"], json!(row.id));

    Ok(())
}

/// Tests selecting an id with no record.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RecordRepository::new(db.clone());
    let document = repo.select(&RecordId::generate("Task")).await?;

    assert!(document.is_none());

    Ok(())
}

/// Tests selecting a row whose data is not a JSON object.
///
/// Expected: Err(StoreError::NotADocument)
#[tokio::test]
async fn rejects_non_object_data() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::record::RecordFactory::new(db, "Task:scalar")
        .data(json!("not a document"))
        .build()
        .await?;

    let repo = RecordRepository::new(db.clone());
    let result = repo.select(&"Task:scalar".parse().unwrap()).await;

    assert!(matches!(result, Err(StoreError::NotADocument(_))));

    Ok(())
}
