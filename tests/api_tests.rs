//! HTTP-level tests driving the router over the in-memory store

use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params, Version};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use efilm_server::{
    api,
    clock::ManualClock,
    config::AppConfig,
    repository::MemoryStore,
    services::{storage::MemoryObjectStore, tokens::TokenIssuer, Services},
    AppState,
};

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
    objects: MemoryObjectStore,
}

fn test_app() -> TestApp {
    let config = AppConfig::default();
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let objects = MemoryObjectStore::new();
    let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::new(8, 1, 1, None).unwrap());

    let services = Services::new(
        Arc::new(MemoryStore::new()),
        Arc::new(objects.clone()),
        TokenIssuer::from_config(&config.auth, clock.clone()),
        hasher,
        &config.auth,
    );
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    TestApp {
        router: api::router(state),
        clock,
        objects,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.call(request).await
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    async fn login(&self) -> String {
        let credentials = json!({ "username": "cinephile", "password": "secret-pass" });
        let (status, _) = self
            .send(Method::POST, "/api/auth/register", None, Some(credentials.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .send(Method::POST, "/api/auth/login", None, Some(credentials))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn create(&self, uri: &str, token: &str, body: Value) -> i64 {
        let (status, body) = self.send(Method::POST, uri, Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }
}

fn movie_body(title: &str, nationality_id: i64, genre_ids: &[i64]) -> Value {
    json!({
        "title": title,
        "release_date": "2019-05-30",
        "duration": 132,
        "plot": "Greed and class discrimination threaten a symbiotic relationship.",
        "language": "Korean",
        "nationality_id": nationality_id,
        "genre_ids": genre_ids,
    })
}

fn sorted_ids(value: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let app = test_app();
    let token = app.login().await;

    let (status, body) = app.send(Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "cinephile");
    assert_eq!(body["data"]["role"], "Member");

    let duplicate = json!({ "username": "cinephile", "password": "another-pass" });
    let (status, body) = app
        .send(Method::POST, "/api/auth/register", None, Some(duplicate))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let wrong = json!({ "username": "cinephile", "password": "wrong-pass" });
    let (status, _) = app.send(Method::POST, "/api/auth/login", None, Some(wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let short = json!({ "username": "ab", "password": "secret-pass" });
    let (status, _) = app.send(Method::POST, "/api/auth/register", None, Some(short)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_writes_require_a_valid_token() {
    let app = test_app();
    let token = app.login().await;

    let national = json!({ "name": "Korea" });
    let (status, body) = app
        .send(Method::POST, "/api/nationals", None, Some(national.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
    assert!(body.get("data").is_none());

    let (status, _) = app
        .send(Method::POST, "/api/nationals", Some("not-a-token"), Some(national.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.create("/api/nationals", &token, national).await;

    // Reads stay public
    let (status, body) = app.get("/api/nationals").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    app.clock.advance(Duration::hours(2));
    let (status, _) = app
        .send(Method::POST, "/api/nationals", Some(&token), Some(json!({ "name": "Japan" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_movie_genre_reconciliation_end_to_end() {
    let app = test_app();
    let token = app.login().await;

    let korea = app.create("/api/nationals", &token, json!({ "name": "Korea" })).await;
    let drama = app.create("/api/genres", &token, json!({ "name": "Drama" })).await;
    let thriller = app.create("/api/genres", &token, json!({ "name": "Thriller" })).await;
    let comedy = app.create("/api/genres", &token, json!({ "name": "Comedy" })).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/movies",
            Some(&token),
            Some(movie_body("Parasite", korea, &[drama, thriller])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let movie_id = body["data"]["movie_id"].as_i64().unwrap();

    let (status, body) = app.get(&format!("/api/movies/{}", movie_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Parasite");
    assert_eq!(body["data"]["release_date"], "2019-05-30");
    assert_eq!(sorted_ids(&body["data"]["genre_ids"]), vec![drama, thriller]);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/movies/{}", movie_id),
            Some(&token),
            Some(movie_body("Parasite", korea, &[thriller, comedy])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sorted_ids(&body["data"]["genre_ids"]), vec![thriller, comedy]);

    let (status, body) = app.get(&format!("/api/movies/{}/genres", movie_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["movie"]["title"], "Parasite");
    let names: Vec<&str> = body["data"]["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Thriller", "Comedy"]);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/movies/{}/genres", movie_id),
            Some(&token),
            Some(json!({ "genre_ids": [thriller, comedy] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["added"].as_array().unwrap().is_empty());
    assert!(body["data"]["removed"].as_array().unwrap().is_empty());

    let (status, body) = app.get("/api/movies/search?title=Parasite").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bad_release_date_inserts_nothing() {
    let app = test_app();
    let token = app.login().await;
    let korea = app.create("/api/nationals", &token, json!({ "name": "Korea" })).await;

    let mut body = movie_body("Parasite", korea, &[]);
    body["release_date"] = json!("13-01-2024");
    let (status, body) = app.send(Method::POST, "/api/movies", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (_, body) = app.get("/api/movies").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_not_found_uses_envelope() {
    let app = test_app();
    let (status, body) = app.get("/api/movies/99").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert_eq!(body["status"], "Not Found");
    assert!(body["message"].as_str().unwrap().contains("99"));
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_malformed_requests_use_envelope() {
    let app = test_app();
    let token = app.login().await;

    let (status, body) = app.get("/api/movies/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert_eq!(body["status"], "Bad Request");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/movies",
            Some(&token),
            Some(json!({ "release_date": "2019-05-30" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/genres")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))
        .unwrap();
    let (status, body) = app.call(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, body) = app
        .send(Method::DELETE, "/api/movies/1/actors/x", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_blank_title_and_loose_date_are_rejected() {
    let app = test_app();
    let token = app.login().await;
    let korea = app.create("/api/nationals", &token, json!({ "name": "Korea" })).await;

    let body = movie_body("   ", korea, &[]);
    let (status, body) = app.send(Method::POST, "/api/movies", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let mut body = movie_body("Parasite", korea, &[]);
    body["release_date"] = json!("2019-5-30");
    let (status, _) = app.send(Method::POST, "/api/movies", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/movies").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_director_and_actor_links() {
    let app = test_app();
    let token = app.login().await;
    let korea = app.create("/api/nationals", &token, json!({ "name": "Korea" })).await;
    let (_, body) = app
        .send(Method::POST, "/api/movies", Some(&token), Some(movie_body("Parasite", korea, &[])))
        .await;
    let movie_id = body["data"]["movie_id"].as_i64().unwrap();
    let person = |name: &str| json!({ "name": name, "date_of_birth": "1969-09-14", "nationality_id": korea });
    let bong = app.create("/api/directors", &token, person("Bong Joon-ho")).await;
    let song = app.create("/api/actors", &token, person("Song Kang-ho")).await;

    let directors = format!("/api/movies/{}/directors", movie_id);
    let link = json!({ "director_id": bong });
    let (status, _) = app.send(Method::POST, &directors, Some(&token), Some(link.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.send(Method::POST, &directors, Some(&token), Some(link)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get(&directors).await;
    assert_eq!(body["data"]["directors"].as_array().unwrap().len(), 1);

    let actors = format!("/api/movies/{}/actors", movie_id);
    let (status, _) = app
        .send(Method::POST, &actors, Some(&token), Some(json!({ "actor_id": song, "role": "" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .send(Method::POST, &actors, Some(&token), Some(json!({ "actor_id": song, "role": "Ki-taek" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("{}/{}", actors, song),
            Some(&token),
            Some(json!({ "role": "Kim Ki-taek" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["actors"][0]["role"], "Kim Ki-taek");

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/movies/{}", movie_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&directors).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // People survive the movie
    let (status, _) = app.get(&format!("/api/actors/{}", song)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_poster_upload() {
    let app = test_app();
    let token = app.login().await;
    let korea = app.create("/api/nationals", &token, json!({ "name": "Korea" })).await;
    let (_, body) = app
        .send(Method::POST, "/api/movies", Some(&token), Some(movie_body("Parasite", korea, &[])))
        .await;
    let movie_id = body["data"]["movie_id"].as_i64().unwrap();

    let boundary = "efilm-boundary";
    let multipart = |content_type: &str| {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"poster_file\"; filename=\"poster.png\"\r\n",
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(&[0x89, b'P', b'N', b'G']);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
        Request::builder()
            .method(Method::POST)
            .uri(format!("/api/movies/{}/upload_poster", movie_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    };

    let (status, _) = app.call(multipart("application/pdf")).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (status, body) = app.call(multipart("image/png")).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["poster_url"], "memory://images/movies/Parasite.png");

    let (bytes, content_type) = app.objects.get("images/movies/Parasite.png").unwrap();
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    assert_eq!(content_type, "image/png");

    let (_, body) = app.get(&format!("/api/movies/{}", movie_id)).await;
    assert_eq!(body["data"]["poster_url"], "memory://images/movies/Parasite.png");
}

#[tokio::test]
async fn test_recommendations() {
    let app = test_app();
    let token = app.login().await;
    let korea = app.create("/api/nationals", &token, json!({ "name": "Korea" })).await;
    let (_, body) = app
        .send(Method::POST, "/api/movies", Some(&token), Some(movie_body("Parasite", korea, &[])))
        .await;
    let movie_id = body["data"]["movie_id"].as_i64().unwrap();

    let request = json!({ "movie_id": movie_id });
    let (status, _) = app
        .send(Method::POST, "/api/recommendations", Some(&token), Some(request.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .send(Method::POST, "/api/recommendations", Some(&token), Some(request))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/recommendations").await;
    assert_eq!(body["data"][0]["title"], "Parasite");

    let uri = format!("/api/recommendations/{}", movie_id);
    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
