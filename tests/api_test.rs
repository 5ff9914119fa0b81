// Integration tests for the typed resource endpoints

use chrono::NaiveDate;
use mockito::{Matcher, ServerGuard};
use rust_decimal::Decimal;
use serde_json::json;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use budget_tracker_client::{
    auth::{LoginRedirect, MemorySessionStore, RefreshMode, SessionTokens},
    http_client::parse_base_url,
    models::{BudgetInput, CategoryType, RegisterRequest, TransactionFilter, TransactionInput},
    ApiError, AuthGateway,
};

// ==================================================================================================
// Test Helpers
// ==================================================================================================

async fn setup(
    tokens: SessionTokens,
) -> (ServerGuard, AuthGateway, Arc<MemorySessionStore>, Arc<LoginRedirect>) {
    let server = mockito::Server::new_async().await;
    let base = parse_base_url(&format!("{}/api", server.url())).unwrap();
    let store = Arc::new(MemorySessionStore::with_tokens(tokens));
    let redirect = Arc::new(LoginRedirect::new("/login"));
    let gateway = AuthGateway::with_client(
        reqwest::Client::new(),
        base,
        store.clone(),
        redirect.clone(),
        RefreshMode::Independent,
    );
    (server, gateway, store, redirect)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==================================================================================================
// Login / Logout / Register
// ==================================================================================================

#[tokio::test]
async fn test_login_stores_token_pair() {
    let (mut server, gateway, store, _) = setup(SessionTokens::default()).await;
    let token = server
        .mock("POST", "/api/auth/token/")
        .match_body(Matcher::Json(json!({"username": "alice", "password": "pw"})))
        .with_status(200)
        .with_body(r#"{"access": "access-1", "refresh": "refresh-1"}"#)
        .expect(1)
        .create_async()
        .await;

    gateway.auth_api().login("alice", "pw").await.unwrap();

    token.assert_async().await;
    assert_eq!(store.snapshot(), SessionTokens::new("access-1", "refresh-1"));
    assert!(gateway.auth().is_logged_in().unwrap());
}

#[tokio::test]
async fn test_login_rejected_leaves_session_alone() {
    let (mut server, gateway, store, redirect) = setup(SessionTokens::default()).await;
    let _token = server
        .mock("POST", "/api/auth/token/")
        .with_status(401)
        .with_body(r#"{"detail": "No active account found with the given credentials"}"#)
        .create_async()
        .await;

    let err = gateway.auth_api().login("alice", "wrong").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert!(store.snapshot().is_empty());
    assert_eq!(redirect.redirect_count(), 0);
}

#[tokio::test]
async fn test_login_body_read_failure_is_transport_error() {
    let (mut server, gateway, store, _) = setup(SessionTokens::default()).await;
    let _token = server
        .mock("POST", "/api/auth/token/")
        .with_status(200)
        .with_chunked_body(|w: &mut dyn Write| {
            w.write_all(br#"{"access": "acc"#)?;
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection dropped"))
        })
        .create_async()
        .await;

    let err = gateway.auth_api().login("alice", "pw").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_logout_clears_without_redirect() {
    let (_server, gateway, store, redirect) =
        setup(SessionTokens::new("access-1", "refresh-1")).await;

    gateway.auth_api().logout().unwrap();

    assert!(store.snapshot().is_empty());
    assert_eq!(redirect.redirect_count(), 0);
}

#[tokio::test]
async fn test_register_sends_camel_case_names() {
    let (mut server, gateway, _, _) = setup(SessionTokens::default()).await;
    let register = server
        .mock("POST", "/api/register/")
        .match_body(Matcher::Json(json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "secret",
            "firstName": "Bob",
            "lastName": "Smith"
        })))
        .with_status(201)
        .with_body(
            r#"{"message": "User created successfully",
                "user": {"id": 7, "username": "bob", "email": "bob@example.com"}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let request = RegisterRequest {
        username: "bob".to_string(),
        email: "bob@example.com".to_string(),
        password: "secret".to_string(),
        first_name: "Bob".to_string(),
        last_name: "Smith".to_string(),
    };
    let response = gateway.auth_api().register(&request).await.unwrap();

    register.assert_async().await;
    assert_eq!(response.user.id, 7);
    assert_eq!(response.message, "User created successfully");
}

// ==================================================================================================
// Categories
// ==================================================================================================

#[tokio::test]
async fn test_list_categories_bare_array() {
    let (mut server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let _list = server
        .mock("GET", "/api/categories/")
        .match_header("authorization", "Bearer a")
        .with_status(200)
        .with_body(
            r#"[{"id": 1, "name": "Salary", "type": "income"},
                {"id": 2, "name": "Rent", "type": "expense"}]"#,
        )
        .create_async()
        .await;

    let page = gateway.categories().list().await.unwrap();

    assert_eq!(page.count, 2);
    assert_eq!(page.items[1].kind, CategoryType::Expense);
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_create_category_validates_before_sending() {
    let (mut server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let create = server
        .mock("POST", "/api/categories/")
        .expect(0)
        .create_async()
        .await;

    let input = budget_tracker_client::models::CategoryInput::new("  ", CategoryType::Income);
    let err = gateway.categories().create(&input).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    create.assert_async().await;
}

#[tokio::test]
async fn test_delete_category_no_content() {
    let (mut server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let delete = server
        .mock("DELETE", "/api/categories/5/")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    gateway.categories().delete(5).await.unwrap();
    delete.assert_async().await;
}

// ==================================================================================================
// Transactions
// ==================================================================================================

#[tokio::test]
async fn test_list_transactions_sends_filters() {
    let (mut server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let list = server
        .mock("GET", "/api/transactions/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("start_date".into(), "2024-03-01".into()),
            Matcher::UrlEncoded("type".into(), "expense".into()),
            Matcher::UrlEncoded("min_amount".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"count": 11, "next": null, "previous": "http://x/api/transactions/?page=1",
                "results": [{"id": 9, "category": 2, "category_name": "Rent",
                             "category_type": "expense", "amount": "950.00",
                             "date": "2024-03-01", "note": "March"}]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let filter = TransactionFilter {
        page: Some(2),
        start_date: Some(date(2024, 3, 1)),
        kind: Some(CategoryType::Expense),
        min_amount: Some(dec("10")),
        ..Default::default()
    };
    let page = gateway.transactions().list(&filter).await.unwrap();

    list.assert_async().await;
    assert_eq!(page.count, 11);
    assert_eq!(page.total_pages(10), 2);
    assert_eq!(page.items[0].signed_amount(), dec("-950.00"));
}

#[tokio::test]
async fn test_list_transactions_rejects_inverted_range() {
    let (_server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let filter = TransactionFilter {
        start_date: Some(date(2024, 3, 31)),
        end_date: Some(date(2024, 3, 1)),
        ..Default::default()
    };

    let err = gateway.transactions().list(&filter).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn test_create_transaction_posts_decimal_string() {
    let (mut server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let create = server
        .mock("POST", "/api/transactions/")
        .match_body(Matcher::Json(json!({
            "category": 1,
            "amount": "2500.00",
            "date": "2024-03-25",
            "note": "Salary"
        })))
        .with_status(201)
        .with_body(
            r#"{"id": 12, "category": 1, "amount": "2500.00", "date": "2024-03-25", "note": "Salary"}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let input = TransactionInput {
        category: 1,
        amount: dec("2500.00"),
        date: date(2024, 3, 25),
        note: Some("Salary".to_string()),
    };
    let tx = gateway.transactions().create(&input).await.unwrap();

    create.assert_async().await;
    assert_eq!(tx.id, 12);
    assert_eq!(tx.amount, dec("2500.00"));
}

#[tokio::test]
async fn test_create_transaction_rejects_zero_amount() {
    let (mut server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let create = server
        .mock("POST", "/api/transactions/")
        .expect(0)
        .create_async()
        .await;

    let input = TransactionInput {
        category: 1,
        amount: Decimal::ZERO,
        date: date(2024, 3, 25),
        note: None,
    };
    let err = gateway.transactions().create(&input).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    create.assert_async().await;
}

#[tokio::test]
async fn test_transaction_stats() {
    let (mut server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let _stats = server
        .mock("GET", "/api/transactions/stats/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), "2024-03-01".into()),
            Matcher::UrlEncoded("end".into(), "2024-03-31".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[{"day": "2024-03-01", "total_income": "100.00", "total_expenses": null},
                {"day": "2024-03-02", "total_income": null, "total_expenses": "40.50"}]"#,
        )
        .create_async()
        .await;

    let stats = gateway
        .transactions()
        .stats(Some(date(2024, 3, 1)), Some(date(2024, 3, 31)))
        .await
        .unwrap();

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].net(), dec("100.00"));
    assert_eq!(stats[1].net(), dec("-40.50"));
}

#[tokio::test]
async fn test_malformed_response_is_decode_error() {
    let (mut server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let _get = server
        .mock("GET", "/api/transactions/3/")
        .with_status(200)
        .with_body(r#"{"unexpected": true}"#)
        .create_async()
        .await;

    let err = gateway.transactions().get(3).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// ==================================================================================================
// Budgets and Summary
// ==================================================================================================

#[tokio::test]
async fn test_list_budgets_for_month() {
    let (mut server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let _list = server
        .mock("GET", "/api/budgets/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("year".into(), "2024".into()),
            Matcher::UrlEncoded("month".into(), "3".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id": 1, "year": 2024, "month": 3, "amount": "1500.00"}]"#)
        .create_async()
        .await;

    let page = gateway.budgets().list(Some(2024), Some(3)).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].amount, dec("1500.00"));
}

#[tokio::test]
async fn test_create_budget_rejects_bad_month() {
    let (_server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let input = BudgetInput {
        year: 2024,
        month: 13,
        amount: dec("100"),
    };

    let err = gateway.budgets().create(&input).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn test_get_summary() {
    let (mut server, gateway, _, _) = setup(SessionTokens::new("a", "r")).await;
    let _summary = server
        .mock("GET", "/api/summary/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("year".into(), "2024".into()),
            Matcher::UrlEncoded("month".into(), "3".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"total_income": "2500.00", "total_expenses": "1200.00", "balance": "1300.00",
                "by_category": [
                    {"category": "Rent", "type": "expense", "amount": "950.00"},
                    {"category": "Food", "type": "expense", "amount": "150.00"},
                    {"category": "Food", "type": "expense", "amount": "100.00"},
                    {"category": "Salary", "type": "income", "amount": "2500.00"}
                ],
                "monthly_budget": "1000.00", "budget_variance": "-200.00"}"#,
        )
        .create_async()
        .await;

    let summary = gateway.summary().get(Some(2024), Some(3)).await.unwrap();

    assert_eq!(summary.balance, dec("1300.00"));
    assert!(summary.is_over_budget());
    let expenses = summary.totals_by_category(CategoryType::Expense);
    assert_eq!(expenses[0], ("Rent".to_string(), dec("950.00")));
    assert_eq!(expenses[1], ("Food".to_string(), dec("250.00")));
}
