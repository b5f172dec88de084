//! Integration tests for account storage and authentication.

use assert_matches::assert_matches;
use snippetbox_db::models::user::CreateUser;
use snippetbox_db::repositories::UserRepo;
use snippetbox_db::StoreError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        name: "Alice".to_string(),
        email: email.to_string(),
        password: "correct-horse-battery".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_stores_hash_not_plaintext(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("alice@example.com"))
        .await
        .unwrap();

    let (stored,): (String,) = sqlx::query_as("SELECT hashed_password FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();

    assert!(stored.starts_with("$argon2id$"));
    assert!(!stored.contains("correct-horse-battery"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_signup_with_same_email_is_duplicate(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@example.com"))
        .await
        .unwrap();

    let result = UserRepo::create(&pool, &new_user("dup@example.com")).await;
    assert_matches!(result, Err(StoreError::DuplicateEmail));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_duplicate_signups_have_one_winner(pool: PgPool) {
    let a = new_user("race@example.com");
    let b = new_user("race@example.com");

    let (first, second) = tokio::join!(UserRepo::create(&pool, &a), UserRepo::create(&pool, &b));

    let outcomes = [first, second];
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|r| matches!(r, Err(StoreError::DuplicateEmail)))
        .count();

    assert_eq!(successes, 1, "exactly one signup must succeed");
    assert_eq!(duplicates, 1, "the loser must see DuplicateEmail");
}

// ---------------------------------------------------------------------------
// Authenticate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticate_with_correct_password_returns_id(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("auth@example.com"))
        .await
        .unwrap();

    let authed = UserRepo::authenticate(&pool, "auth@example.com", "correct-horse-battery")
        .await
        .unwrap();
    assert_eq!(authed, id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_and_unknown_email_fail_identically(pool: PgPool) {
    UserRepo::create(&pool, &new_user("known@example.com"))
        .await
        .unwrap();

    let wrong_password =
        UserRepo::authenticate(&pool, "known@example.com", "not-the-password").await;
    let unknown_email =
        UserRepo::authenticate(&pool, "nobody@example.com", "correct-horse-battery").await;

    assert_matches!(wrong_password, Err(StoreError::InvalidCredentials));
    assert_matches!(unknown_email, Err(StoreError::InvalidCredentials));
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_id_returns_public_fields(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("lookup@example.com"))
        .await
        .unwrap();

    let user = UserRepo::find_by_id(&pool, id).await.unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "lookup@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_missing_user_is_not_found(pool: PgPool) {
    let result = UserRepo::find_by_id(&pool, 4242).await;
    assert_matches!(result, Err(StoreError::NotFound { entity: "User", id: 4242 }));
}
