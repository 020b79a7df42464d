//! HTTP surface: JSON read endpoints for the dashboard plus the
//! administrative `/debug`, `/query` and `/seed` routes.

mod admin;
mod error;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};

use crate::config::Config;
use crate::gateway::Gateway;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(gateway: Gateway, config: Config) -> Self {
        Self {
            gateway,
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/revenue", get(routes::revenue))
        .route("/api/cards", get(routes::cards))
        .route("/api/invoices", get(routes::filtered_invoices))
        .route("/api/invoices/latest", get(routes::latest_invoices))
        .route("/api/invoices/pages", get(routes::invoice_pages))
        .route("/api/invoices/{id}", get(routes::invoice_by_id))
        .route("/api/customers", get(routes::customers))
        .route("/api/customers/filtered", get(routes::filtered_customers))
        .route("/debug/invoices", get(admin::debug_invoices))
        .route("/query", get(admin::query))
        .route("/seed", get(admin::seed))
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped
pub async fn serve(state: AppState) -> Result<()> {
    let address = state.config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(%address, environment = %state.config.app_env, "Dashboard API listening");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    pub async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
