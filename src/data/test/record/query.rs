use super::*;
use test_utils::fixture;

/// Tests that a table query only returns documents of that entity type.
///
/// Expected: Ok with only the `Task` documents
#[tokio::test]
async fn selects_documents_of_table() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::record::create_task(db).await?;
    let second = factory::record::create_task(db).await?;
    factory::record::RecordFactory::new(db, "ServerBan:abc")
        .build()
        .await?;

    let repo = RecordRepository::new(db.clone());
    let documents = repo.query(&Query::table("Task")).await?;

    let ids: Vec<_> = documents
        .iter()
        .map(|d| d["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));

    Ok(())
}

/// Tests filtering by a document field and ordering by another.
///
/// Verifies that only matching documents are returned and that they come back in
/// chronological order of `scheduled_for`, regardless of insertion order.
///
/// Expected: Ok with the two matching tasks, earliest first
#[tokio::test]
async fn filters_and_orders() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let later = fixture::task::document_builder()
        .task_type("ServerBan")
        .scheduled_in(chrono::Duration::hours(3))
        .build();
    let sooner = fixture::task::document_builder()
        .task_type("ServerBan")
        .scheduled_in(chrono::Duration::minutes(5))
        .build();
    let other = fixture::task::document_builder()
        .task_type("bump_reminder")
        .scheduled_in(chrono::Duration::minutes(1))
        .build();

    let later_id = later["id"].clone();
    let sooner_id = sooner["id"].clone();

    factory::record::create_task_from(db, later).await?;
    factory::record::create_task_from(db, other).await?;
    factory::record::create_task_from(db, sooner).await?;

    let repo = RecordRepository::new(db.clone());
    let documents = repo
        .query(
            &Query::table("Task")
                .filter_eq("task_type", "ServerBan")
                .order_by("scheduled_for"),
        )
        .await?;

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0]["id"], sooner_id);
    assert_eq!(documents[1]["id"], later_id);

    Ok(())
}

/// Tests querying a table with no records.
///
/// Expected: Ok with an empty list
#[tokio::test]
async fn returns_empty_for_unknown_table() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::record::create_task(db).await?;

    let repo = RecordRepository::new(db.clone());
    let documents = repo.query(&Query::table("ChannelMute")).await?;

    assert!(documents.is_empty());

    Ok(())
}

/// Tests a table query over a row whose data is not an object.
///
/// Verifies that the row does not fail the query: it comes back as a document holding
/// only its id, next to the valid documents, and stays in the table.
///
/// Expected: Ok with both rows, the malformed one reduced to its id
#[tokio::test]
async fn reports_non_object_row_by_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::record::RecordFactory::new(db, "Task:scalar")
        .data(json!("x"))
        .build()
        .await?;
    let valid = factory::record::create_task(db).await?;

    let repo = RecordRepository::new(db.clone());
    let documents = repo.query(&Query::table("Task")).await?;

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0], document(json!({"id": "Task:scalar"})));
    assert_eq!(documents[1]["id"], json!(valid.id));

    let row = entity::prelude::Record::find_by_id("Task:scalar".to_string())
        .one(db)
        .await?;
    assert!(row.is_some());

    Ok(())
}
