#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, routing::build_router};

/// Create a test server backed by a fresh in-memory database, along with the
/// state so tests can inspect the database directly.
pub(crate) fn new_test_server() -> (TestServer, AppState) {
    let connection =
        Connection::open_in_memory().expect("could not open in-memory SQLite database");
    let state = AppState::new(connection).expect("could not create app state");
    let server = TestServer::new(build_router(state.clone()));

    (server, state)
}
