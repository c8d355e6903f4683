//! HTTP handlers for the dashboard API
//!
//! Mutation handlers take form submissions as raw string maps, run them
//! through validation, and hand validated drafts to [`InvoiceActions`];
//! read handlers go straight to the store seam. All handlers answer with
//! JSON except the successful create/update, which answer with a redirect
//! back to the invoice listing.

use crate::actions::InvoiceActions;
use crate::core::auth::{self, Credentials};
use crate::core::customer::{CustomerField, CustomerRow};
use crate::core::error::DashboardError;
use crate::core::invoice::{CardData, InvoiceEdit, InvoiceRow, LatestInvoice, Revenue};
use crate::core::revalidate::{Navigation, RevalidateBus};
use crate::core::service::{CustomerStore, InvoiceStore, OverviewStore, UserStore};
use crate::core::validation::validate_invoice;
use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub actions: Arc<InvoiceActions>,
    pub invoices: Arc<dyn InvoiceStore>,
    pub customers: Arc<dyn CustomerStore>,
    pub users: Arc<dyn UserStore>,
    pub overview: Arc<dyn OverviewStore>,
}

impl AppState {
    /// Wire the state from one concrete store implementing every service
    /// trait, sharing it behind the individual seams.
    pub fn from_store<S>(store: Arc<S>, views: RevalidateBus) -> Self
    where
        S: InvoiceStore + CustomerStore + UserStore + OverviewStore + 'static,
    {
        let invoices: Arc<dyn InvoiceStore> = store.clone();
        let customers: Arc<dyn CustomerStore> = store.clone();
        let users: Arc<dyn UserStore> = store.clone();
        let overview: Arc<dyn OverviewStore> = store;

        Self {
            actions: Arc::new(InvoiceActions::new(invoices.clone(), views)),
            invoices,
            customers,
            users,
            overview,
        }
    }
}

/// Query parameters of the listing endpoints
#[derive(Debug, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub query: String,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Invoice mutations
// ---------------------------------------------------------------------------

pub async fn create_invoice(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Navigation, DashboardError> {
    let draft = validate_invoice(&fields).map_err(|errors| DashboardError::Validation {
        message: "Missing Fields. Failed to Create Invoice.".to_string(),
        errors,
    })?;

    state.actions.create(draft).await
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Navigation, DashboardError> {
    let draft = validate_invoice(&fields).map_err(|errors| DashboardError::Validation {
        message: "Missing Fields. Failed to Update Invoice.".to_string(),
        errors,
    })?;

    state.actions.update(&id, draft).await
}

/// Delete answers inline rather than redirecting, and converts persistence
/// failures into a structured body instead of an error page.
pub async fn delete_invoice(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.actions.delete(&id).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(failure) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": failure.message,
                "cause": failure.cause.to_string(),
            })),
        )
            .into_response(),
    }
}

// ---------------------------------------------------------------------------
// Invoice reads
// ---------------------------------------------------------------------------

pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Vec<InvoiceRow>>, DashboardError> {
    let rows = state
        .invoices
        .filtered_invoices(&params.query, params.page)
        .await?;
    Ok(Json(rows))
}

pub async fn invoice_pages(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, DashboardError> {
    let pages = state.invoices.invoice_pages(&params.query).await?;
    Ok(Json(json!({ "pages": pages })))
}

pub async fn latest_invoices(
    State(state): State<AppState>,
) -> Result<Json<Vec<LatestInvoice>>, DashboardError> {
    Ok(Json(state.invoices.latest_invoices().await?))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceEdit>, DashboardError> {
    let invoice = state
        .invoices
        .invoice_by_id(&id)
        .await?
        .ok_or_else(|| DashboardError::NotFound {
            resource: "invoice",
            id: id.to_string(),
        })?;
    Ok(Json(invoice))
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

pub async fn revenue(State(state): State<AppState>) -> Result<Json<Vec<Revenue>>, DashboardError> {
    Ok(Json(state.overview.revenue().await?))
}

pub async fn cards(State(state): State<AppState>) -> Result<Json<CardData>, DashboardError> {
    Ok(Json(state.overview.card_data().await?))
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerField>>, DashboardError> {
    Ok(Json(state.customers.customers().await?))
}

pub async fn customer_table(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Vec<CustomerRow>>, DashboardError> {
    Ok(Json(state.customers.filtered_customers(&params.query).await?))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

pub async fn login(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Json<Value>, DashboardError> {
    let user = auth::authorize(state.users.as_ref(), &credentials)
        .await?
        .ok_or(DashboardError::InvalidCredentials)?;

    Ok(Json(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
    })))
}
