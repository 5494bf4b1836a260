use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{accounts, balance, expenses, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Read `page`/`per_page` from the query params; non-numeric values fall
/// back to the defaults instead of erroring.
pub(crate) fn page_from_params(params: &std::collections::HashMap<String, String>) -> engine::Page {
    let default = engine::Page::default();
    let parse = |key: &str, fallback: u64| {
        params
            .get(key)
            .and_then(|value| value.parse().ok())
            .unwrap_or(fallback)
    };
    engine::Page {
        page: parse("page", default.page),
        per_page: parse("per_page", default.per_page),
    }
}

/// Basic-auth middleware.
///
/// Resolves the acting user (confirmed accounts only) and inserts the row
/// as a request extension; everything downstream trusts it for ownership
/// checks.
async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = state
        .engine
        .verify_credentials(auth_header.username(), auth_header.password())
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Build the application router. Exposed for in-process tests.
pub fn router(engine: Arc<Engine>) -> Router {
    let state = ServerState { engine };

    Router::new()
        .route(
            "/api/v1/accounts",
            get(accounts::list).post(accounts::create),
        )
        .route(
            "/api/v1/accounts/{account_id}",
            get(accounts::get_one)
                .put(accounts::update)
                .delete(accounts::remove),
        )
        .route(
            "/api/v1/accounts/{account_id}/balance",
            get(balance::account_balance),
        )
        .route("/api/v1/balance", get(balance::global_balance))
        .route(
            "/api/v1/expenses",
            get(expenses::list).post(expenses::create),
        )
        .route(
            "/api/v1/expenses/{expense_id}",
            get(expenses::get_one)
                .put(expenses::update)
                .delete(expenses::remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/register", post(user::register))
        .route("/confirm/{email}", post(user::confirm))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
