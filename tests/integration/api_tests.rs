//! API integration tests
//!
//! These run against a live server with a migrated database. The admin
//! account is read from PAPERHUB_TEST_ADMIN_EMAIL / PAPERHUB_TEST_ADMIN_PASSWORD.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

fn admin_credentials() -> (String, String) {
    (
        std::env::var("PAPERHUB_TEST_ADMIN_EMAIL").unwrap_or_else(|_| "admin@paperhub.org".into()),
        std::env::var("PAPERHUB_TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".into()),
    )
}

/// Helper to get an admin token
async fn get_auth_token(client: &Client) -> String {
    let (email, password) = admin_credentials();
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();
    let (email, password) = admin_credentials();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["tokenType"], "Bearer");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
#[ignore]
async fn test_login_wrong_password() {
    let client = Client::new();
    let (email, _) = admin_credentials();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "definitely-wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_unknown_article() {
    let client = Client::new();

    let response = client
        .get(format!("{}/articles/does-not-exist", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Article not found" }));
}

#[tokio::test]
#[ignore]
async fn test_event_short_name_is_case_insensitive() {
    let client = Client::new();

    let lower = client
        .get(format!("{}/events/shortname/neurips", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let upper = client
        .get(format!("{}/events/shortname/NEURIPS", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(lower.status(), upper.status());
    if lower.status().is_success() {
        let lower: Value = lower.json().await.unwrap();
        let upper: Value = upper.json().await.unwrap();
        assert_eq!(lower["id"], upper["id"]);
        assert!(lower["_count"]["editions"].is_number());
    }
}

#[tokio::test]
#[ignore]
async fn test_unknown_event() {
    let client = Client::new();

    let response = client
        .get(format!("{}/events/shortname/no-such-venue", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Event not found");
}

#[tokio::test]
#[ignore]
async fn test_seed_requires_admin() {
    let client = Client::new();

    let response = client
        .post(format!("{}/admin/seed", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{}/admin/seed", BASE_URL))
        .bearer_auth("forged")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_seed_is_idempotent() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let mut snapshots = Vec::new();
    for _ in 0..2 {
        let response = client
            .post(format!("{}/admin/seed", BASE_URL))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());

        let categories: Value = client
            .get(format!("{}/categories", BASE_URL))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        snapshots.push(categories);
    }

    assert_eq!(snapshots[0], snapshots[1]);
    let ids: Vec<_> = snapshots[0]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect();
    assert!(ids.contains(&"cs".to_string()));
}

#[tokio::test]
#[ignore]
async fn test_search() {
    let client = Client::new();

    let response = client
        .get(format!("{}/search?q=learning&sort=date&order=desc&limit=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert!(body["articles"].as_array().unwrap().len() <= 5);
    assert_eq!(body["limit"], 5);
    assert_eq!(body["page"], 1);

    let response = client
        .get(format!("{}/search?dateFrom=2024-02-01&dateTo=2024-01-01", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// First search hit carrying a DOI, as (doi, author ids)
async fn article_with_doi(client: &Client) -> Option<(String, Vec<String>)> {
    let body: Value = client
        .get(format!("{}/search?limit=100", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    body["articles"].as_array()?.iter().find_map(|a| {
        let doi = a["doi"].as_str()?.to_string();
        let authors = a["authors"]
            .as_array()?
            .iter()
            .filter_map(|au| au["id"].as_str().map(str::to_string))
            .collect::<Vec<_>>();
        (!authors.is_empty()).then_some((doi, authors))
    })
}

#[tokio::test]
#[ignore]
async fn test_create_article_with_taken_doi_conflicts() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let Some((doi, author_ids)) = article_with_doi(&client).await else {
        return;
    };

    let response = client
        .post(format!("{}/articles", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Resubmission",
            "abstract": "Same DOI as an existing article",
            "authorIds": author_ids,
            "doi": doi,
            "pdfUrl": "https://example.org/paper.pdf"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "An article with this DOI already exists");
}

#[tokio::test]
#[ignore]
async fn test_create_article_with_unknown_edition_is_bad_request() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let Some((_, author_ids)) = article_with_doi(&client).await else {
        return;
    };

    let response = client
        .post(format!("{}/articles", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Orphan edition",
            "abstract": "Points at an edition that does not exist",
            "authorIds": author_ids,
            "editionId": "no-such-edition",
            "pdfUrl": "https://example.org/paper.pdf"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unknown edition id");
}

#[tokio::test]
#[ignore]
async fn test_out_of_range_page_is_bad_request() {
    let client = Client::new();

    for path in ["search", "authors"] {
        let response = client
            .get(format!("{}/{}?page=9223372036854775807&limit=100", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
