//! The store driven end to end: `TodoStore` → `TodoGateway` →
//! `ReqwestTransport` → mock server on an ephemeral port.

#![cfg(feature = "reqwest")]

use std::time::Duration;

use todo_sync::store::{DELETE_FAILED, LOAD_FAILED};
use todo_sync::{
    ApiEndpoint, Dispatch, ErrorKind, ReqwestTransport, TodoApi, TodoCreate, TodoGateway, TodoStore,
};

async fn spawn_server() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(mock_server::run(listener));
    port
}

fn gateway(port: u16) -> TodoGateway<ReqwestTransport> {
    let endpoint = ApiEndpoint {
        host: "127.0.0.1".to_string(),
        ..ApiEndpoint::default()
    }
    .with_port(port);
    TodoGateway::new(&endpoint, ReqwestTransport::new())
}

#[tokio::test]
async fn store_round_trip_against_server() {
    let port = spawn_server().await;
    let store = TodoStore::new(gateway(port));

    assert_eq!(store.refresh().await, Dispatch::Applied);
    assert_eq!(store.snapshot().total(), 0);

    store.begin_create();
    assert_eq!(store.save(TodoCreate::new("Buy milk", None)).await, Dispatch::Applied);
    assert_eq!(store.save(TodoCreate::new("Walk dog", Some("park"))).await, Dispatch::Applied);

    let state = store.snapshot();
    assert_eq!(state.total(), 2);
    assert!(!state.form_visible());
    let milk = state.todos()[0].clone();
    assert_eq!(milk.id, 1);

    assert_eq!(store.toggle(&milk).await, Dispatch::Applied);
    let state = store.snapshot();
    assert_eq!(state.completed().len(), 1);
    assert_eq!(state.pending().len(), 1);

    store.begin_edit(state.todos()[1].clone());
    assert_eq!(store.save(TodoCreate::new("Walk cat", None)).await, Dispatch::Applied);
    let walk = store.snapshot().todos()[1].clone();
    assert_eq!(walk.title, "Walk cat");
    assert_eq!(walk.description.as_deref(), Some("park"));

    assert_eq!(store.remove(&walk, |_| true).await, Dispatch::Applied);

    // The server agrees with the local copy.
    let remote = store.api().list().await.unwrap();
    assert_eq!(remote, store.snapshot().todos());
}

#[tokio::test]
async fn removing_a_todo_deleted_elsewhere_reports_error() {
    let port = spawn_server().await;
    let store = TodoStore::new(gateway(port));
    store.save(TodoCreate::new("Short lived", None)).await;
    let todo = store.snapshot().todos()[0].clone();

    store.api().delete(todo.id).await.unwrap();

    assert_eq!(store.remove(&todo, |_| true).await, Dispatch::Failed);
    let state = store.snapshot();
    assert_eq!(state.last_error(), Some(DELETE_FAILED));
    assert_eq!(state.todos(), &[todo]);
}

#[tokio::test]
async fn gateway_toggle_round_trips() {
    let port = spawn_server().await;
    let api = gateway(port);
    let created = api.create(&TodoCreate::new("Flip", None)).await.unwrap();

    let toggled = api.toggle(created.id).await.unwrap();
    assert!(toggled.completed);
    let toggled = api.toggle(created.id).await.unwrap();
    assert!(!toggled.completed);

    let err = api.toggle(999).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let endpoint = ApiEndpoint::for_host("localhost").with_port(port);
    let transport = ReqwestTransport::with_timeout(Duration::from_secs(2)).unwrap();
    let store = TodoStore::new(TodoGateway::new(&endpoint, transport));

    let err = store.api().list().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);

    assert_eq!(store.refresh().await, Dispatch::Failed);
    let state = store.snapshot();
    assert_eq!(state.last_error(), Some(LOAD_FAILED));
    assert!(!state.is_loading());
}
