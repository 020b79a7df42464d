use axum::{extract::State, Json};

use super::error::StatusBody;
use super::{ApiError, AppState};
use crate::models::{Invoice, InvoiceAmountRow};
use crate::seed;

/// Amount looked up by the `/query` diagnostic, in cents
const QUERY_AMOUNT: i32 = 666;

/// GET /debug/invoices
///
/// Dumps the whole invoice table, unfiltered and unpaginated.
pub async fn debug_invoices(State(state): State<AppState>) -> Result<Json<Vec<Invoice>>, ApiError> {
    Ok(Json(state.gateway.fetch_all_invoices().await?))
}

/// GET /query
pub async fn query(State(state): State<AppState>) -> Result<Json<Vec<InvoiceAmountRow>>, ApiError> {
    seed::guard(&state.config)?;

    Ok(Json(state.gateway.fetch_invoices_with_amount(QUERY_AMOUNT).await?))
}

/// GET /seed
///
/// Deletes every revenue row and loads the fixed twelve-month dataset.
/// Must not run alongside read traffic.
pub async fn seed(State(state): State<AppState>) -> Result<Json<StatusBody>, ApiError> {
    if let Err(err) = seed::guard(&state.config) {
        tracing::warn!(environment = %err.environment, "Refusing to seed outside development");
        return Err(err.into());
    }

    let rows = seed::seed_revenue(state.gateway.store())
        .await
        .map_err(|err| {
            tracing::error!("Seed error: {:#}", err);
            ApiError::Seed(err)
        })?;

    Ok(Json(StatusBody {
        status: "ok",
        message: format!("Revenue table seeded with {} rows.", rows),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::config::Config;
    use crate::db::{InvoiceStore, MemoryStore};
    use crate::gateway::tests::BrokenStore;
    use crate::gateway::Gateway;
    use crate::models::Revenue;
    use crate::server::test_support::get;
    use crate::server::{router, AppState};

    fn development() -> Config {
        Config {
            app_env: "development".to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn seed_is_forbidden_outside_development() {
        let store = Arc::new(MemoryStore::new(vec![], vec![], vec![Revenue::new("Old", 7)]));
        let app = router(AppState::new(Gateway::new(store.clone()), Config::default()));

        let (status, json) = get(app, "/seed").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Forbidden: Not allowed in production.");
        assert_eq!(store.revenue().await.unwrap(), vec![Revenue::new("Old", 7)]);
    }

    #[tokio::test]
    async fn seed_replaces_revenue_in_development() {
        let store = Arc::new(MemoryStore::new(vec![], vec![], vec![Revenue::new("Old", 7)]));
        let app = router(AppState::new(Gateway::new(store.clone()), development()));

        let (status, json) = get(app, "/seed").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        let revenue = store.revenue().await.unwrap();
        assert_eq!(revenue.len(), 12);
        assert!(!revenue.contains(&Revenue::new("Old", 7)));
    }

    #[tokio::test]
    async fn seed_failure_reports_underlying_message() {
        let gateway = Gateway::new(Arc::new(BrokenStore::failing("replace_revenue")));
        let app = router(AppState::new(gateway, development()));

        let (status, json) = get(app, "/seed").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn query_is_gated_like_seed() {
        let gateway = Gateway::new(Arc::new(MemoryStore::placeholder()));
        let app = router(AppState::new(gateway, Config::default()));

        let (status, json) = get(app, "/query").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn query_returns_matching_rows() {
        let gateway = Gateway::new(Arc::new(MemoryStore::placeholder()));
        let app = router(AppState::new(gateway, development()));

        let (status, json) = get(app, "/query").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([{ "amount": 666, "name": "Evil Rabbit" }]));
    }

    #[tokio::test]
    async fn query_failure_is_generic() {
        let gateway = Gateway::new(Arc::new(BrokenStore::failing("invoices_with_amount")));
        let app = router(AppState::new(gateway, development()));

        let (status, json) = get(app, "/query").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({ "error": "Query failed" }));
    }

    #[tokio::test]
    async fn debug_dumps_every_invoice() {
        let gateway = Gateway::new(Arc::new(MemoryStore::placeholder()));
        let app = router(AppState::new(gateway, Config::default()));

        let (status, json) = get(app, "/debug/invoices").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 13);
        assert_eq!(json[0]["date"], "2022-12-06");
    }
}
