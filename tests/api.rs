use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use bookshelf::{AppState, config::Config, router::create_router, store::Store};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let config = Config {
        password_hash_cost: 4,
        ..Config::default()
    };
    create_router(AppState {
        store: Store::memory(),
        config,
    })
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_dune(app: &Router) -> Value {
    let (status, book) = call(
        app,
        Method::POST,
        "/api/books",
        Some(json!({ "bookName": "Dune", "author": "Herbert" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    book
}

#[tokio::test]
async fn ping_reports_ok() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/ping", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn empty_book_list() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_book_applies_defaults() {
    let app = app();
    let book = create_dune(&app).await;

    assert!(book["_id"].is_string());
    assert_eq!(book["bookName"], "Dune");
    assert_eq!(book["author"], "Herbert");
    assert_eq!(book["rating"], 0.0);
    assert_eq!(book["readed"], "0");
    assert_eq!(book["isBookMark"], false);
    assert_eq!(book["isMyBook"], false);
    assert_eq!(book["backgroundColor"], "rgba(255,255,255,0.9)");
    assert_eq!(book["navTintColor"], "#000");
    assert_eq!(book["createdAt"], book["updatedAt"]);
}

#[tokio::test]
async fn create_then_get_returns_stored_record() {
    let app = app();
    let (_, created) = call(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({
            "_id": "client-chosen",
            "bookName": "Neuromancer",
            "rating": 4.0,
            "language": "en",
            "pageNo": 271,
            "genre": ["cyberpunk", "sf"],
            "categories": [1, 2],
            "isMyBook": true,
        })),
    )
    .await;
    assert_ne!(created["_id"], "client-chosen");

    let id = created["_id"].as_str().unwrap();
    let (status, fetched) = call(&app, Method::GET, &format!("/api/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["genre"], json!(["cyberpunk", "sf"]));
    assert_eq!(fetched["pageNo"], 271);
}

#[tokio::test]
async fn create_book_without_name_fails_generically() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "author": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to create book" }));
}

#[tokio::test]
async fn malformed_json_body_is_500() {
    let app = app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn missing_and_malformed_ids_are_404() {
    let app = app();
    let missing = format!("/api/books/{}", uuid::Uuid::new_v4());

    let (status, body) = call(&app, Method::GET, &missing, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Book not found" }));

    let (status, _) = call(&app, Method::GET, "/api/books/not-an-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::PUT, &missing, Some(json!({ "rating": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, &missing, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let app = app();
    let created = create_dune(&app).await;
    let uri = format!("/api/books/{}", created["_id"].as_str().unwrap());

    let (status, updated) = call(&app, Method::PUT, &uri, Some(json!({ "rating": 4.5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["rating"], 4.5);

    let mut expected = created.clone();
    expected["rating"] = json!(4.5);
    expected["updatedAt"] = updated["updatedAt"].clone();
    assert_eq!(updated, expected);
    let timestamp = |v: &Value| v.as_str().unwrap().parse::<chrono::DateTime<chrono::Utc>>().unwrap();
    assert!(timestamp(&updated["updatedAt"]) >= timestamp(&created["createdAt"]));

    let (_, fetched) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = app();
    let created = create_dune(&app).await;
    let uri = format!("/api/books/{}", created["_id"].as_str().unwrap());

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Book deleted successfully" }));

    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = call(&app, Method::GET, "/api/books", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn create_user_hides_password_and_defaults_roles() {
    let app = app();
    let (status, user) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "username": "al", "email": "a@x.com", "password": "p" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password").is_none());
    assert_eq!(user["roles"], json!(["user"]));
    assert_eq!(user["username"], "al");
}

#[tokio::test]
async fn user_listing_never_contains_password() {
    let app = app();
    for (name, roles) in [("al", None), ("bo", Some(json!(["admin"])))] {
        let mut body = json!({ "username": name, "email": format!("{}@x.com", name), "password": "secret" });
        if let Some(roles) = roles {
            body["roles"] = roles;
        }
        let (status, _) = call(&app, Method::POST, "/api/users", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, users) = call(&app, Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));
    assert_eq!(users[1]["roles"], json!(["admin"]));
}

#[tokio::test]
async fn user_per_id_routes() {
    let app = app();
    let (_, user) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "username": "al", "email": "a@x.com", "password": "p" })),
    )
    .await;
    let uri = format!("/api/users/{}", user["_id"].as_str().unwrap());

    let (status, fetched) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, user);

    let (status, updated) = call(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "roles": ["admin"], "password": "changed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["roles"], json!(["admin"]));
    assert_eq!(updated["email"], "a@x.com");
    assert!(updated.get("password").is_none());

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "User deleted successfully" }));

    let (status, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn create_user_without_password_fails() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "username": "al", "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to create user" }));
}

#[tokio::test]
async fn dashboard_counts_and_feed() {
    let app = app();
    for i in 0..4 {
        call(
            &app,
            Method::POST,
            "/api/users",
            Some(json!({ "username": format!("u{}", i), "email": "u@x.com", "password": "p" })),
        )
        .await;
        call(
            &app,
            Method::POST,
            "/api/books",
            Some(json!({ "bookName": format!("b{}", i) })),
        )
        .await;
    }

    let (status, dashboard) = call(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["userCount"], 4);
    assert_eq!(dashboard["bookCount"], 4);

    let feed = dashboard["recentActivities"].as_array().unwrap();
    assert_eq!(feed.len(), 5);
    let dates: Vec<chrono::DateTime<chrono::Utc>> = feed
        .iter()
        .map(|a| a["date"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    assert!(feed.iter().all(|a| a["type"] == "user" || a["type"] == "book"));
}

#[tokio::test]
async fn custom_base_path() {
    let config = Config {
        api_base_uri: "/admin/api/".to_string(),
        password_hash_cost: 4,
        ..Config::default()
    };
    let app = create_router(AppState {
        store: Store::memory(),
        config,
    });

    let (status, _) = call(&app, Method::GET, "/admin/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, "/api/books", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
