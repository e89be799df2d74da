//! End-to-end tests against a local HTTP catalog.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use littlelemon::feed::{HttpMenuFeed, MenuFeed};
use littlelemon::menu::{Category, FilterSelection};
use littlelemon::viewmodel::{BootstrapOutcome, PersistStatus, RefreshOutcome};
use littlelemon::{AppContext, Config, MenuStore, MenuViewModel};

fn catalog() -> Value {
    json!({
        "menu": [
            {
                "name": "Greek Salad",
                "price": 12.99,
                "description": "The famous greek salad of crispy lettuce, peppers, olives.",
                "image": "greekSalad.jpg",
                "category": "starters"
            },
            {
                "name": "Bruschetta",
                "price": 7.99,
                "description": "Grilled bread smeared with garlic.",
                "image": "bruschetta.jpg",
                "category": "starters"
            },
            {
                "name": "Grilled Fish",
                "price": 20.0,
                "description": "Fish marinated in fresh orange and lemon juice.",
                "image": "grilledFish.jpg",
                "category": "mains"
            },
            {
                "name": "Lemon Dessert",
                "price": 6.99,
                "description": "Straight from grandma's recipe book.",
                "image": "lemonDessert.jpg",
                "category": "desserts"
            }
        ]
    })
}

async fn serve_menu(State(hits): State<Arc<AtomicUsize>>) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    Json(catalog())
}

async fn serve_error() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn serve_garbage() -> &'static str {
    "<html>not json</html>"
}

/// Start a catalog server on an ephemeral port.
async fn spawn_server() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/capstone.json", get(serve_menu))
        .route("/broken.json", get(serve_error))
        .route("/garbage.json", get(serve_garbage))
        .with_state(Arc::clone(&hits));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, hits)
}

#[tokio::test]
async fn test_http_feed_fetches_catalog() {
    let (addr, hits) = spawn_server().await;
    let feed = HttpMenuFeed::new(format!("http://{addr}/capstone.json"), None).unwrap();

    let items = feed.fetch_menu().await.unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0].name, "Greek Salad");
    assert_eq!(items[0].formatted_price(), "12.99");
    assert_eq!(items[2].category, Category::Mains);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_http_feed_error_status() {
    let (addr, _) = spawn_server().await;
    let feed = HttpMenuFeed::new(format!("http://{addr}/broken.json"), None).unwrap();

    let err = feed.fetch_menu().await.unwrap_err();
    assert!(err.is_network());
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_http_feed_malformed_body() {
    let (addr, _) = spawn_server().await;
    let feed = HttpMenuFeed::new(format!("http://{addr}/garbage.json"), None).unwrap();

    let err = feed.fetch_menu().await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn test_bootstrap_backfills_once_across_restarts() {
    let (addr, hits) = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.feed.url = format!("http://{addr}/capstone.json");
    config.storage.database_path = Some(dir.path().join("little_lemon.db"));
    config.storage.session_path = Some(dir.path().join("session.db"));

    let ctx = AppContext::open(config.clone()).unwrap();
    let view = ctx.menu_view().unwrap();
    assert_eq!(
        view.bootstrap().await,
        BootstrapOutcome::Remote {
            count: 4,
            persist: PersistStatus::Persisted
        }
    );
    assert_eq!(view.items().len(), 4);
    drop(view);
    ctx.close().unwrap();

    let store = MenuStore::open(dir.path().join("little_lemon.db")).unwrap();
    assert_eq!(store.count().unwrap(), 4);
    store.close().unwrap();

    let ctx = AppContext::open(config).unwrap();
    let view = ctx.menu_view().unwrap();
    assert_eq!(view.bootstrap().await, BootstrapOutcome::Local { count: 4 });
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    drop(view);
    ctx.close().unwrap();
}

#[tokio::test]
async fn test_search_and_filter_after_bootstrap() {
    let (addr, _) = spawn_server().await;
    let store = MenuStore::open_in_memory().unwrap().into_shared();
    let feed = HttpMenuFeed::new(format!("http://{addr}/capstone.json"), None).unwrap();
    let view = MenuViewModel::new(store, Arc::new(feed));

    view.bootstrap().await;

    let outcome = view
        .set_filters(FilterSelection::from_categories(&[Category::Starters]))
        .await;
    assert_eq!(outcome, RefreshOutcome::Applied(2));

    let outcome = view.set_search_query("Greek").await;
    assert_eq!(outcome, RefreshOutcome::Applied(1));
    assert_eq!(view.items()[0].name, "Greek Salad");

    // Name search is case-sensitive.
    assert_eq!(view.set_search_query("greek").await, RefreshOutcome::Applied(0));
    assert!(view.empty_state_message().is_some());
}

#[tokio::test]
async fn test_unreachable_feed_shows_empty_state() {
    let (addr, _) = spawn_server().await;
    let store = MenuStore::open_in_memory().unwrap().into_shared();
    let feed = HttpMenuFeed::new(format!("http://{addr}/broken.json"), None).unwrap();
    let view = MenuViewModel::new(store.clone(), Arc::new(feed));

    assert_eq!(view.bootstrap().await, BootstrapOutcome::Unavailable);
    assert!(view.empty_state_message().is_some());
    assert_eq!(store.lock().await.count().unwrap(), 0);
}
