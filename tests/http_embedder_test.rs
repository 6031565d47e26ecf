mod helpers;

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use helpers::{letter_vector, memory_store};
use recollect::config::EmbeddingConfig;
use recollect::embedding::create_provider;
use recollect::error::KnowledgeError;
use recollect::knowledge::scope::ProjectSelector;
use recollect::knowledge::store::NewRecord;
use recollect::knowledge::types::{EntityType, Scope};
use recollect::knowledge::{EngineOptions, KnowledgeBase};

async fn embed(Json(body): Json<Value>) -> Json<Value> {
    let embeddings: Vec<Vec<f32>> = body["texts"]
        .as_array()
        .map(|texts| {
            texts
                .iter()
                .map(|t| letter_vector(t.as_str().unwrap_or_default()))
                .collect()
        })
        .unwrap_or_default();
    Json(json!({ "embeddings": embeddings }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded")
}

async fn spawn_service() -> SocketAddr {
    let router = Router::new()
        .route("/embed", post(embed))
        .route("/broken", post(broken));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn engine(url: String) -> KnowledgeBase {
    let config = EmbeddingConfig {
        provider: "http".into(),
        url,
        timeout_ms: 5_000,
    };
    let embedder = create_provider(&config).unwrap();
    KnowledgeBase::new(memory_store(), embedder, EngineOptions::default())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn store_and_search_through_http_service() {
    let addr = spawn_service().await;
    let kb = engine(format!("http://{addr}/embed"));

    kb.store(NewRecord::new("X uses library L", "A", Scope::Local, EntityType::Fact))
        .await
        .unwrap();
    kb.store(NewRecord::new("Team prefers dark mode", "A", Scope::Global, EntityType::Preference))
        .await
        .unwrap();

    let hits = kb
        .search("X uses library L", &ProjectSelector::Project("A".into()), 2)
        .await
        .unwrap();
    assert_eq!(hits[0].record.content, "X uses library L");
    assert!(hits[0].distance.abs() < 1e-5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn service_error_is_embedding_unavailable() {
    let addr = spawn_service().await;
    let kb = engine(format!("http://{addr}/broken"));

    let err = kb
        .search("anything", &ProjectSelector::Unspecified, 3)
        .await
        .unwrap_err();
    match err {
        KnowledgeError::EmbeddingUnavailable(msg) => assert!(msg.contains("500"), "{msg}"),
        other => panic!("expected embedding unavailable, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_service_is_embedding_unavailable() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let kb = engine(format!("http://127.0.0.1:{port}/embed"));

    let err = kb
        .store(NewRecord::new("content", "p", Scope::Local, EntityType::Fact))
        .await
        .unwrap_err();
    assert!(matches!(err, KnowledgeError::EmbeddingUnavailable(_)), "{err}");
}
