use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::models::{CardSummary, CustomerField, CustomerSummary, InvoiceForm, InvoiceRow, LatestInvoice, Revenue};

/// Query parameters shared by the searchable tables
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub page: Option<i64>,
}

impl SearchParams {
    /// 1-indexed page, clamped so a missing or bogus value means the first page
    pub fn current_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// GET /api/revenue
pub async fn revenue(State(state): State<AppState>) -> Result<Json<Vec<Revenue>>, ApiError> {
    Ok(Json(state.gateway.fetch_revenue().await?))
}

/// GET /api/cards
pub async fn cards(State(state): State<AppState>) -> Result<Json<CardSummary>, ApiError> {
    Ok(Json(state.gateway.fetch_card_data().await?))
}

/// GET /api/invoices/latest
pub async fn latest_invoices(
    State(state): State<AppState>,
) -> Result<Json<Vec<LatestInvoice>>, ApiError> {
    Ok(Json(state.gateway.fetch_latest_invoices().await?))
}

/// GET /api/invoices?query=&page=
pub async fn filtered_invoices(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<InvoiceRow>>, ApiError> {
    let invoices = state
        .gateway
        .fetch_filtered_invoices(&params.query, params.current_page())
        .await?;

    Ok(Json(invoices))
}

/// GET /api/invoices/pages?query=
pub async fn invoice_pages(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<i64>, ApiError> {
    Ok(Json(state.gateway.fetch_invoice_pages(&params.query).await?))
}

/// GET /api/invoices/{id}
pub async fn invoice_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<InvoiceForm>, ApiError> {
    state
        .gateway
        .fetch_invoice_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::InvoiceNotFound)
}

/// GET /api/customers
pub async fn customers(State(state): State<AppState>) -> Result<Json<Vec<CustomerField>>, ApiError> {
    Ok(Json(state.gateway.fetch_customers().await?))
}

/// GET /api/customers/filtered?query=
pub async fn filtered_customers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<CustomerSummary>>, ApiError> {
    Ok(Json(state.gateway.fetch_filtered_customers(&params.query).await?))
}
