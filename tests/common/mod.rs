#![allow(dead_code)]

use axum::Router;
use axum::routing::get;
use shortlink::api::handlers::{
    create_handler, index_handler, not_found_handler, redirect_handler, reload_handler,
};
use shortlink::application::services::LinkService;
use shortlink::domain::entities::NewLink;
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::InMemoryLinkRepository;
use shortlink::runtime::{Runtime, RuntimeHandle};
use shortlink::state::AppState;
use shortlink::utils::base62;
use std::path::PathBuf;
use std::sync::Arc;

pub const VALID_KEY: &str = "validKey";
pub const NOT_FOUND_PAGE: &str = "<h1>nothing here</h1>";

pub fn test_runtime(repository: Arc<dyn LinkRepository>, index_url: Option<&str>) -> Runtime {
    Runtime {
        links: LinkService::new(repository, vec![VALID_KEY.to_string()], 6),
        index_url: index_url.map(str::to_string),
        not_found_page: Arc::from(NOT_FOUND_PAGE),
        listen_addr: "127.0.0.1:3000".to_string(),
        database_url: "memory://".to_string(),
    }
}

pub fn create_test_state_with(
    repository: Arc<dyn LinkRepository>,
    index_url: Option<&str>,
    config_path: PathBuf,
) -> AppState {
    let runtime = test_runtime(repository, index_url);
    AppState::new(Arc::new(RuntimeHandle::new(runtime, config_path)))
}

pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let state = create_test_state_with(repo.clone(), None, PathBuf::from("config.json"));
    (state, repo)
}

/// All routes without path normalization.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(index_handler).post(create_handler).patch(reload_handler),
        )
        .route("/{token}", get(redirect_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

/// Stores `target` under `id` and returns the token that reaches it.
pub async fn create_test_link(
    repo: &InMemoryLinkRepository,
    id: i64,
    target: &str,
    expiry: Option<i64>,
) -> String {
    repo.create(NewLink {
        id,
        target: target.to_string(),
        expiry,
    })
    .await
    .unwrap();

    base62::encode(id as u128)
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn temp_config_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("shortlink-test-{}-{}.json", std::process::id(), name))
}
