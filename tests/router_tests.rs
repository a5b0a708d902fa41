// tests/router_tests.rs

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use exam_simulator::{
    config::Config,
    models::question::{PoolQuestion, QuestionOption},
    routes,
    services::session::SessionStore,
    state::AppState,
    storage::{history_repository::JsonFileHistoryStore, question_pool::QuestionPool},
};
use std::{collections::HashSet, sync::Arc};
use tower::ServiceExt;

fn app(history_path: std::path::PathBuf, pool: QuestionPool) -> axum::Router {
    let config = Config {
        port: 0,
        questions_path: "unused.json".to_string(),
        explanations_path: "unused.txt".to_string(),
        history_path: history_path.display().to_string(),
        exam_question_limit: 65,
        exam_time_limit_secs: 600,
        session_max_age_secs: 60,
        log_dir: "logs".to_string(),
        rust_log: "error".to_string(),
    };

    routes::create_router(AppState {
        pool: Arc::new(pool),
        history: Arc::new(JsonFileHistoryStore::new(history_path)),
        sessions: SessionStore::new(config.session_max_age_secs),
        config,
    })
}

fn one_question_pool() -> QuestionPool {
    QuestionPool::from_questions(vec![PoolQuestion {
        id: 1,
        text: "Only question".to_string(),
        image: None,
        options: vec![
            QuestionOption {
                text: "right".to_string(),
                image: None,
                is_correct: true,
            },
            QuestionOption {
                text: "wrong".to_string(),
                image: None,
                is_correct: false,
            },
        ],
        is_multiple_choice: false,
    }])
    .unwrap()
}

fn with_cookie(request: axum::http::request::Builder, token: &str) -> Request<Body> {
    request
        .header(header::COOKIE, format!("exam_sid={}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn start_with_missing_pool_file_redirects_home() {
    let dir = tempfile::tempdir().unwrap();
    let pool = QuestionPool::load(dir.path().join("questions.json"));
    let app = app(dir.path().join("db.json"), pool);

    let response = app
        .oneshot(Request::post("/start").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/?error=no_questions");
    assert!(response.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn existing_cookie_is_not_reissued() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path().join("db.json"), QuestionPool::default());

    let response = app
        .oneshot(
            Request::get("/results")
                .header(header::COOKIE, "exam_sid=known-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert!(!response.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn corrupt_history_surfaces_as_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    std::fs::write(&db, "not json").unwrap();
    let app = app(db, QuestionPool::default());

    let response = app
        .oneshot(Request::get("/history").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn concurrent_finishes_get_distinct_history_ids() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let app = app(db.clone(), one_question_pool());
    let tokens = ["first", "second", "third"];

    for token in tokens {
        let response = app
            .clone()
            .oneshot(with_cookie(Request::post("/start"), token))
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/exam/1");
    }

    let (a, b, c) = tokio::join!(
        app.clone().oneshot(with_cookie(Request::get("/results"), tokens[0])),
        app.clone().oneshot(with_cookie(Request::get("/results"), tokens[1])),
        app.clone().oneshot(with_cookie(Request::get("/results"), tokens[2])),
    );
    for response in [a, b, c] {
        assert_eq!(response.unwrap().status(), StatusCode::OK);
    }

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&db).unwrap()).unwrap();
    let ids: HashSet<&str> = doc["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 3);
}
