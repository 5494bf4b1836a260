use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::Database;

use engine::{Engine, EngineError, Page};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, i32, i32) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    let user_id = engine
        .register_user("ada@example.com", "Ada", "Str0ngpass")
        .await
        .unwrap()
        .user_id;
    let account_id = engine
        .new_account(user_id, "Conto", false, None, 0)
        .await
        .unwrap()
        .account_id;

    (engine, user_id, account_id)
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn create_normalizes_the_date() {
    let (engine, user_id, account_id) = engine_with_db().await;

    let expense = engine
        .new_expense(user_id, 5000, "Personal", "2018-01-01", Some("Gasoline"), account_id)
        .await
        .unwrap();

    assert_eq!(expense.date, NaiveDate::from_ymd_opt(2018, 1, 1).unwrap());
    assert_eq!(expense.note.as_deref(), Some("Gasoline"));

    let fetched = engine.expense(expense.expense_id, user_id).await.unwrap();
    assert_eq!(fetched, expense);
}

#[tokio::test]
async fn invalid_fields_collect_per_field_errors() {
    let (engine, user_id, account_id) = engine_with_db().await;

    let result = engine
        .new_expense(user_id, 5000, "", "01/01/2018", None, account_id)
        .await;

    let Err(EngineError::Validation(errors)) = result else {
        panic!("expected validation error");
    };
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"category"));
    assert!(fields.contains(&"date"));
}

#[tokio::test]
async fn creating_against_a_foreign_account_is_forbidden() {
    let (engine, _user_id, account_id) = engine_with_db().await;
    let bob = engine
        .register_user("bob@example.com", "Bob", "Str0ngpass")
        .await
        .unwrap()
        .user_id;

    let result = engine
        .new_expense(bob, 1000, "Personal", "2018-01-01", None, account_id)
        .await;
    assert!(matches!(result, Err(EngineError::Forbidden(_))));
}

#[tokio::test]
async fn creating_against_a_missing_account_is_not_found() {
    let (engine, user_id, _account_id) = engine_with_db().await;

    let result = engine
        .new_expense(user_id, 1000, "Personal", "2018-01-01", None, 99)
        .await;
    assert!(matches!(result, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn comma_values_or_and_distinct_fields_and() {
    let (engine, user_id, account_id) = engine_with_db().await;
    let second = engine
        .new_account(user_id, "Carta", false, None, 0)
        .await
        .unwrap()
        .account_id;

    engine
        .new_expense(user_id, 100, "Personal", "2018-01-01", None, account_id)
        .await
        .unwrap();
    engine
        .new_expense(user_id, 200, "Bank", "2018-01-02", None, account_id)
        .await
        .unwrap();
    engine
        .new_expense(user_id, 300, "Food", "2018-01-03", None, second)
        .await
        .unwrap();

    let (or_rows, _) = engine
        .expenses(user_id, &params(&[("category", "Personal,Bank")]), Page::default())
        .await
        .unwrap();
    assert_eq!(or_rows.len(), 2);

    let (and_rows, _) = engine
        .expenses(
            user_id,
            &params(&[
                ("category", "Personal,Food"),
                ("account_id", &second.to_string()),
            ]),
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(and_rows.len(), 1);
    assert_eq!(and_rows[0].category, "Food");
}

#[tokio::test]
async fn date_between_and_from_to_filter_listings() {
    let (engine, user_id, account_id) = engine_with_db().await;
    for (amount, date) in [(100, "2018-01-01"), (200, "2018-02-01"), (300, "2018-03-01")] {
        engine
            .new_expense(user_id, amount, "Personal", date, None, account_id)
            .await
            .unwrap();
    }

    let (rows, _) = engine
        .expenses(
            user_id,
            &params(&[("dateBetween", "2018-02-15,2018-01-15")]),
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, 200);

    let (rows, _) = engine
        .expenses(user_id, &params(&[("from", "2018-02-01")]), Page::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let (rows, _) = engine
        .expenses(
            user_id,
            &params(&[("from", "2018-01-15"), ("to", "2018-02-15")]),
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn malformed_filters_error_instead_of_panicking() {
    let (engine, user_id, _account_id) = engine_with_db().await;

    let result = engine
        .expenses(user_id, &params(&[("from", "not-a-date")]), Page::default())
        .await;
    assert!(matches!(result, Err(EngineError::MalformedFilter(_))));

    let result = engine
        .expenses(user_id, &params(&[("account_id", "abc")]), Page::default())
        .await;
    assert!(matches!(result, Err(EngineError::MalformedFilter(_))));
}

#[tokio::test]
async fn update_replaces_every_field() {
    let (engine, user_id, account_id) = engine_with_db().await;
    let expense = engine
        .new_expense(user_id, 100, "Personal", "2018-01-01", Some("old"), account_id)
        .await
        .unwrap();

    let updated = engine
        .update_expense(
            expense.expense_id,
            user_id,
            250,
            "Bank",
            "2018-06-30",
            None,
            account_id,
        )
        .await
        .unwrap();

    assert_eq!(updated.amount, 250);
    assert_eq!(updated.category, "Bank");
    assert_eq!(updated.date, NaiveDate::from_ymd_opt(2018, 6, 30).unwrap());
    assert_eq!(updated.note, None);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (engine, user_id, account_id) = engine_with_db().await;
    let expense = engine
        .new_expense(user_id, 100, "Personal", "2018-01-01", None, account_id)
        .await
        .unwrap();

    engine.delete_expense(expense.expense_id, user_id).await.unwrap();
    assert!(matches!(
        engine.expense(expense.expense_id, user_id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    engine.delete_expense(expense.expense_id, user_id).await.unwrap();
}

#[tokio::test]
async fn pagination_reports_totals() {
    let (engine, user_id, account_id) = engine_with_db().await;
    for day in 1..=5 {
        engine
            .new_expense(
                user_id,
                100,
                "Personal",
                &format!("2018-01-{day:02}"),
                None,
                account_id,
            )
            .await
            .unwrap();
    }

    let (rows, info) = engine
        .expenses(
            user_id,
            &params(&[]),
            Page {
                page: 2,
                per_page: 2,
            },
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(info.total, 5);
    assert_eq!(info.pages, 3);
    assert_eq!(info.page, 2);
}
