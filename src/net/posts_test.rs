use super::*;
use crate::test_support::{closed_url, post, serve};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use std::sync::{Arc, Mutex};

type Store = Arc<Mutex<Vec<Post>>>;

async fn list(State(store): State<Store>) -> Json<Vec<Post>> {
    Json(store.lock().unwrap().clone())
}

async fn create(State(store): State<Store>, Json(post): Json<Post>) -> StatusCode {
    store.lock().unwrap().push(post);
    StatusCode::CREATED
}

async fn mock_backend(seed: Vec<Post>) -> (HttpPostsBackend, Store) {
    let store: Store = Arc::new(Mutex::new(seed));
    let router = axum::Router::new()
        .route("/posts", get(list).post(create))
        .with_state(Arc::clone(&store));
    let base = serve(router).await;
    (HttpPostsBackend::new(&base).unwrap(), store)
}

#[test]
fn posts_endpoint_appends_path() {
    assert_eq!(posts_endpoint("http://127.0.0.1:5000"), "http://127.0.0.1:5000/posts");
}

#[test]
fn new_trims_trailing_slash() {
    let backend = HttpPostsBackend::new("http://127.0.0.1:5000/").unwrap();
    assert_eq!(backend.base_url, "http://127.0.0.1:5000");
}

#[tokio::test]
async fn list_posts_returns_backend_order() {
    let (backend, _store) = mock_backend(vec![post("b", "2"), post("a", "1")]).await;
    let posts = backend.list_posts().await.unwrap();
    assert_eq!(posts, vec![post("b", "2"), post("a", "1")]);
}

#[tokio::test]
async fn list_posts_empty_array() {
    let (backend, _store) = mock_backend(Vec::new()).await;
    assert!(backend.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_post_sends_name_and_content() {
    let (backend, store) = mock_backend(Vec::new()).await;
    backend.create_post(&post("title", "body")).await.unwrap();
    assert_eq!(*store.lock().unwrap(), vec![post("title", "body")]);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let router = axum::Router::new().route("/posts", get(|| async { StatusCode::UNAUTHORIZED }));
    let backend = HttpPostsBackend::new(&serve(router).await).unwrap();
    let err = backend.list_posts().await.unwrap_err();
    assert!(matches!(err, PostsError::Status(401)));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let router = axum::Router::new().route("/posts", get(|| async { "not json" }));
    let backend = HttpPostsBackend::new(&serve(router).await).unwrap();
    let err = backend.list_posts().await.unwrap_err();
    assert!(matches!(err, PostsError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let backend = HttpPostsBackend::new(&closed_url().await).unwrap();
    let err = backend.create_post(&post("t", "c")).await.unwrap_err();
    assert!(matches!(err, PostsError::Network(_)));
}
