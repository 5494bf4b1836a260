use std::collections::HashMap;

use sea_orm::Database;

use engine::{Engine, EngineError, Page};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn seed_user(engine: &Engine, email: &str) -> i32 {
    engine
        .register_user(email, "Ada", "Str0ngpass")
        .await
        .unwrap()
        .user_id
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn create_and_fetch_account() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "ada@example.com").await;

    let created = engine
        .new_account(user_id, "Conto", false, None, 100)
        .await
        .unwrap();
    let fetched = engine.account(created.account_id, user_id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Conto");
    assert_eq!(fetched.initial_balance, 100);
}

#[tokio::test]
async fn empty_name_is_a_validation_error() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "ada@example.com").await;

    let result = engine.new_account(user_id, "   ", false, None, 0).await;

    let Err(EngineError::Validation(errors)) = result else {
        panic!("expected validation error");
    };
    assert_eq!(errors[0].field, "name");
}

#[tokio::test]
async fn fetching_a_missing_account_is_not_found() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "ada@example.com").await;

    let result = engine.account(99, user_id).await;
    assert!(matches!(result, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn fetching_another_users_account_is_forbidden() {
    let engine = engine_with_db().await;
    let ada = seed_user(&engine, "ada@example.com").await;
    let bob = seed_user(&engine, "bob@example.com").await;
    let account = engine.new_account(ada, "Conto", false, None, 0).await.unwrap();

    let result = engine.account(account.account_id, bob).await;
    assert!(matches!(result, Err(EngineError::Forbidden(_))));
}

#[tokio::test]
async fn update_replaces_every_field() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "ada@example.com").await;
    let account = engine
        .new_account(user_id, "Conto", false, None, 0)
        .await
        .unwrap();

    let updated = engine
        .update_account(account.account_id, user_id, "Carta", true, Some(150_000), 0)
        .await
        .unwrap();

    assert_eq!(updated.name, "Carta");
    assert!(updated.has_plafond);
    assert_eq!(updated.plafond, Some(150_000));
    assert_eq!(updated.baseline(), 150_000);
}

#[tokio::test]
async fn list_supports_filters_and_pagination() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "ada@example.com").await;
    for name in ["Conto", "Carta", "Risparmi"] {
        engine
            .new_account(user_id, name, false, None, 0)
            .await
            .unwrap();
    }

    let (all, info) = engine
        .accounts(user_id, &params(&[]), Page::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(info.total, 3);
    assert_eq!(info.pages, 1);

    let (filtered, _) = engine
        .accounts(user_id, &params(&[("name", "Conto,Carta")]), Page::default())
        .await
        .unwrap();
    assert_eq!(filtered.len(), 2);

    let (page, info) = engine
        .accounts(
            user_id,
            &params(&[]),
            Page {
                page: 2,
                per_page: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(info.pages, 2);
    assert_eq!(info.total, 3);
}

#[tokio::test]
async fn list_is_scoped_to_the_acting_user() {
    let engine = engine_with_db().await;
    let ada = seed_user(&engine, "ada@example.com").await;
    let bob = seed_user(&engine, "bob@example.com").await;
    engine.new_account(ada, "Conto", false, None, 0).await.unwrap();
    engine.new_account(bob, "Conto", false, None, 0).await.unwrap();

    let (accounts, _) = engine
        .accounts(ada, &params(&[]), Page::default())
        .await
        .unwrap();

    assert_eq!(accounts.len(), 1);
    assert!(accounts.iter().all(|a| a.user_id == ada));
}

#[tokio::test]
async fn delete_is_idempotent_and_keeps_expenses() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "ada@example.com").await;
    let account = engine
        .new_account(user_id, "Conto", false, None, 0)
        .await
        .unwrap();
    let expense = engine
        .new_expense(user_id, 1000, "Personal", "2018-01-01", None, account.account_id)
        .await
        .unwrap();

    engine.delete_account(account.account_id, user_id).await.unwrap();
    assert!(matches!(
        engine.account(account.account_id, user_id).await,
        Err(EngineError::KeyNotFound(_))
    ));

    // Expenses survive with their stale account_id (documented policy).
    let survivor = engine.expense(expense.expense_id, user_id).await.unwrap();
    assert_eq!(survivor.account_id, account.account_id);

    // Deleting again is not an error.
    engine.delete_account(account.account_id, user_id).await.unwrap();
}

#[tokio::test]
async fn deleting_another_users_account_is_forbidden() {
    let engine = engine_with_db().await;
    let ada = seed_user(&engine, "ada@example.com").await;
    let bob = seed_user(&engine, "bob@example.com").await;
    let account = engine.new_account(ada, "Conto", false, None, 0).await.unwrap();

    let result = engine.delete_account(account.account_id, bob).await;
    assert!(matches!(result, Err(EngineError::Forbidden(_))));
}
