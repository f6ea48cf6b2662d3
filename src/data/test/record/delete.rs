use super::*;

/// Tests deleting an existing record.
///
/// Expected: Ok and the row is gone
#[tokio::test]
async fn deletes_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::record::create_task(db).await?;
    let id: RecordId = row.id.parse().unwrap();

    let repo = RecordRepository::new(db.clone());
    repo.delete(&id).await?;

    let remaining = entity::prelude::Record::find_by_id(row.id).one(db).await?;
    assert!(remaining.is_none());

    Ok(())
}

/// Tests that deleting is idempotent.
///
/// Verifies that deleting the same record twice, or a record that never existed,
/// succeeds.
///
/// Expected: Ok for every call
#[tokio::test]
async fn deleting_missing_record_succeeds() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::record::create_task(db).await?;
    let id: RecordId = row.id.parse().unwrap();

    let repo = RecordRepository::new(db.clone());
    repo.delete(&id).await?;
    repo.delete(&id).await?;
    repo.delete(&RecordId::generate("Task")).await?;

    Ok(())
}
