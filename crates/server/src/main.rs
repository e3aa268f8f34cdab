// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use site_ledger_api::{
    ApiError, CreateLotRequest, CreateSiteRequest, OpenInvoiceRequest, OpenSnapshotRequest,
    RecordPaymentRequest, RecordProgressRequest, SetBilledQuantityRequest, UpdateLotRequest,
    UpdateSiteRequest, billing, catalog, payments, progress, situation,
};
use site_ledger_domain::{FinancialSituation, Invoice, Payment, ProgressSnapshot, WorkLot};
use site_ledger_persistence::{Persistence, SiteRecord};

/// Site Ledger Server - HTTP server for the Site Ledger system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex to allow safe
/// concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for all three ledgers.
    persistence: Arc<Mutex<Persistence>>,
}

/// Request body for activating or deactivating a work lot.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SetLotActiveApiRequest {
    /// Whether the lot should be active.
    active: bool,
}

/// Request body for approving a progress snapshot.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ApproveSnapshotApiRequest {
    /// The user approving the snapshot.
    approved_by: i64,
}

/// Request body for changing a draft invoice's VAT rate.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SetVatRateApiRequest {
    /// VAT rate as a percentage.
    vat_rate: Decimal,
}

/// Query parameters for listing work lots.
#[derive(Debug, Deserialize)]
struct ListLotsQuery {
    /// When true, only active lots are returned.
    #[serde(default)]
    active_only: bool,
}

/// Query parameters for listing payments.
#[derive(Debug, Deserialize)]
struct ListPaymentsQuery {
    /// Restricts the listing to payments linked to one invoice.
    invoice_id: Option<i64>,
}

/// API response for delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DeleteResponse {
    /// Success indicator.
    success: bool,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status = match err {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidState { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/sites` endpoint.
async fn handle_create_site(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateSiteRequest>,
) -> Result<Json<SiteRecord>, HttpError> {
    info!(name = %req.name, "Handling create_site request");

    let mut persistence = app_state.persistence.lock().await;
    let site: SiteRecord = catalog::create_site(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(site))
}

/// Handler for GET `/sites` endpoint.
async fn handle_list_sites(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<SiteRecord>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let sites: Vec<SiteRecord> = catalog::list_sites(&mut persistence)?;
    drop(persistence);

    Ok(Json(sites))
}

/// Handler for GET `/sites/{site_id}` endpoint.
async fn handle_get_site(
    AxumState(app_state): AxumState<AppState>,
    Path(site_id): Path<i64>,
) -> Result<Json<SiteRecord>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let site: SiteRecord = catalog::get_site(&mut persistence, site_id)?;
    drop(persistence);

    Ok(Json(site))
}

/// Handler for PUT `/sites/{site_id}` endpoint.
async fn handle_update_site(
    AxumState(app_state): AxumState<AppState>,
    Path(site_id): Path<i64>,
    Json(req): Json<UpdateSiteRequest>,
) -> Result<Json<SiteRecord>, HttpError> {
    info!(site_id, "Handling update_site request");

    let mut persistence = app_state.persistence.lock().await;
    let site: SiteRecord = catalog::update_site(&mut persistence, site_id, &req)?;
    drop(persistence);

    Ok(Json(site))
}

/// Handler for GET `/sites/{site_id}/lots` endpoint.
async fn handle_list_lots(
    AxumState(app_state): AxumState<AppState>,
    Path(site_id): Path<i64>,
    Query(query): Query<ListLotsQuery>,
) -> Result<Json<Vec<WorkLot>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let lots: Vec<WorkLot> = catalog::list_lots(&mut persistence, site_id, query.active_only)?;
    drop(persistence);

    Ok(Json(lots))
}

/// Handler for POST `/lots` endpoint.
async fn handle_create_lot(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateLotRequest>,
) -> Result<Json<WorkLot>, HttpError> {
    info!(site_id = req.site_id, name = %req.name, "Handling create_lot request");

    let mut persistence = app_state.persistence.lock().await;
    let lot: WorkLot = catalog::create_lot(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(lot))
}

/// Handler for GET `/lots/{lot_id}` endpoint.
async fn handle_get_lot(
    AxumState(app_state): AxumState<AppState>,
    Path(lot_id): Path<i64>,
) -> Result<Json<WorkLot>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let lot: WorkLot = catalog::get_lot(&mut persistence, lot_id)?;
    drop(persistence);

    Ok(Json(lot))
}

/// Handler for PUT `/lots/{lot_id}` endpoint.
async fn handle_update_lot(
    AxumState(app_state): AxumState<AppState>,
    Path(lot_id): Path<i64>,
    Json(req): Json<UpdateLotRequest>,
) -> Result<Json<WorkLot>, HttpError> {
    info!(lot_id, "Handling update_lot request");

    let mut persistence = app_state.persistence.lock().await;
    let lot: WorkLot = catalog::update_lot(&mut persistence, lot_id, &req)?;
    drop(persistence);

    Ok(Json(lot))
}

/// Handler for PUT `/lots/{lot_id}/active` endpoint.
async fn handle_set_lot_active(
    AxumState(app_state): AxumState<AppState>,
    Path(lot_id): Path<i64>,
    Json(req): Json<SetLotActiveApiRequest>,
) -> Result<Json<WorkLot>, HttpError> {
    info!(lot_id, active = req.active, "Handling set_lot_active request");

    let mut persistence = app_state.persistence.lock().await;
    let lot: WorkLot = catalog::set_lot_active(&mut persistence, lot_id, req.active)?;
    drop(persistence);

    Ok(Json(lot))
}

/// Handler for DELETE `/lots/{lot_id}` endpoint.
async fn handle_delete_lot(
    AxumState(app_state): AxumState<AppState>,
    Path(lot_id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    info!(lot_id, "Handling delete_lot request");

    let mut persistence = app_state.persistence.lock().await;
    catalog::delete_lot(&mut persistence, lot_id)?;
    drop(persistence);

    Ok(Json(DeleteResponse { success: true }))
}

/// Handler for POST `/snapshots` endpoint.
async fn handle_open_snapshot(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<OpenSnapshotRequest>,
) -> Result<Json<ProgressSnapshot>, HttpError> {
    info!(site_id = req.site_id, "Handling open_snapshot request");

    let mut persistence = app_state.persistence.lock().await;
    let snapshot: ProgressSnapshot = progress::open_draft_snapshot(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(snapshot))
}

/// Handler for GET `/snapshots/{snapshot_id}` endpoint.
async fn handle_get_snapshot(
    AxumState(app_state): AxumState<AppState>,
    Path(snapshot_id): Path<i64>,
) -> Result<Json<ProgressSnapshot>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let snapshot: ProgressSnapshot = progress::get_snapshot(&mut persistence, snapshot_id)?;
    drop(persistence);

    Ok(Json(snapshot))
}

/// Handler for GET `/sites/{site_id}/snapshots` endpoint.
async fn handle_list_snapshots(
    AxumState(app_state): AxumState<AppState>,
    Path(site_id): Path<i64>,
) -> Result<Json<Vec<ProgressSnapshot>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let snapshots: Vec<ProgressSnapshot> = progress::list_snapshots(&mut persistence, site_id)?;
    drop(persistence);

    Ok(Json(snapshots))
}

/// Handler for POST `/snapshots/{snapshot_id}/progress` endpoint.
async fn handle_record_progress(
    AxumState(app_state): AxumState<AppState>,
    Path(snapshot_id): Path<i64>,
    Json(req): Json<RecordProgressRequest>,
) -> Result<Json<ProgressSnapshot>, HttpError> {
    info!(
        snapshot_id,
        lot_id = req.lot_id,
        "Handling record_progress request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let snapshot: ProgressSnapshot = progress::record_progress(&mut persistence, snapshot_id, &req)?;
    drop(persistence);

    Ok(Json(snapshot))
}

/// Handler for POST `/snapshots/{snapshot_id}/submit` endpoint.
async fn handle_submit_snapshot(
    AxumState(app_state): AxumState<AppState>,
    Path(snapshot_id): Path<i64>,
) -> Result<Json<ProgressSnapshot>, HttpError> {
    info!(snapshot_id, "Handling submit_snapshot request");

    let mut persistence = app_state.persistence.lock().await;
    let snapshot: ProgressSnapshot = progress::submit_snapshot(&mut persistence, snapshot_id)?;
    drop(persistence);

    Ok(Json(snapshot))
}

/// Handler for POST `/snapshots/{snapshot_id}/approve` endpoint.
async fn handle_approve_snapshot(
    AxumState(app_state): AxumState<AppState>,
    Path(snapshot_id): Path<i64>,
    Json(req): Json<ApproveSnapshotApiRequest>,
) -> Result<Json<ProgressSnapshot>, HttpError> {
    info!(
        snapshot_id,
        approved_by = req.approved_by,
        "Handling approve_snapshot request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let snapshot: ProgressSnapshot =
        progress::approve_snapshot(&mut persistence, snapshot_id, req.approved_by)?;
    drop(persistence);

    Ok(Json(snapshot))
}

/// Handler for POST `/snapshots/{snapshot_id}/reject` endpoint.
async fn handle_reject_snapshot(
    AxumState(app_state): AxumState<AppState>,
    Path(snapshot_id): Path<i64>,
) -> Result<Json<ProgressSnapshot>, HttpError> {
    info!(snapshot_id, "Handling reject_snapshot request");

    let mut persistence = app_state.persistence.lock().await;
    let snapshot: ProgressSnapshot = progress::reject_snapshot(&mut persistence, snapshot_id)?;
    drop(persistence);

    Ok(Json(snapshot))
}

/// Handler for DELETE `/snapshots/{snapshot_id}` endpoint.
async fn handle_delete_snapshot(
    AxumState(app_state): AxumState<AppState>,
    Path(snapshot_id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    info!(snapshot_id, "Handling delete_snapshot request");

    let mut persistence = app_state.persistence.lock().await;
    progress::delete_snapshot(&mut persistence, snapshot_id)?;
    drop(persistence);

    Ok(Json(DeleteResponse { success: true }))
}

/// Handler for POST `/invoices` endpoint.
async fn handle_open_invoice(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<OpenInvoiceRequest>,
) -> Result<Json<Invoice>, HttpError> {
    info!(site_id = req.site_id, "Handling open_invoice request");

    let mut persistence = app_state.persistence.lock().await;
    let invoice: Invoice = billing::open_draft_invoice(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(invoice))
}

/// Handler for GET `/invoices/{invoice_id}` endpoint.
async fn handle_get_invoice(
    AxumState(app_state): AxumState<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<Json<Invoice>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let invoice: Invoice = billing::get_invoice(&mut persistence, invoice_id)?;
    drop(persistence);

    Ok(Json(invoice))
}

/// Handler for GET `/sites/{site_id}/invoices` endpoint.
async fn handle_list_invoices(
    AxumState(app_state): AxumState<AppState>,
    Path(site_id): Path<i64>,
) -> Result<Json<Vec<Invoice>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let invoices: Vec<Invoice> = billing::list_invoices(&mut persistence, site_id)?;
    drop(persistence);

    Ok(Json(invoices))
}

/// Handler for POST `/invoices/{invoice_id}/lines` endpoint.
async fn handle_set_billed_quantity(
    AxumState(app_state): AxumState<AppState>,
    Path(invoice_id): Path<i64>,
    Json(req): Json<SetBilledQuantityRequest>,
) -> Result<Json<Invoice>, HttpError> {
    info!(
        invoice_id,
        lot_id = req.lot_id,
        "Handling set_billed_quantity request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let invoice: Invoice = billing::set_billed_quantity(&mut persistence, invoice_id, &req)?;
    drop(persistence);

    Ok(Json(invoice))
}

/// Handler for PUT `/invoices/{invoice_id}/vat_rate` endpoint.
async fn handle_set_vat_rate(
    AxumState(app_state): AxumState<AppState>,
    Path(invoice_id): Path<i64>,
    Json(req): Json<SetVatRateApiRequest>,
) -> Result<Json<Invoice>, HttpError> {
    info!(invoice_id, "Handling set_vat_rate request");

    let mut persistence = app_state.persistence.lock().await;
    let invoice: Invoice = billing::set_vat_rate(&mut persistence, invoice_id, req.vat_rate)?;
    drop(persistence);

    Ok(Json(invoice))
}

/// Handler for POST `/invoices/{invoice_id}/submit` endpoint.
async fn handle_submit_invoice(
    AxumState(app_state): AxumState<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<Json<Invoice>, HttpError> {
    info!(invoice_id, "Handling submit_invoice request");

    let mut persistence = app_state.persistence.lock().await;
    let invoice: Invoice = billing::submit_invoice(&mut persistence, invoice_id)?;
    drop(persistence);

    Ok(Json(invoice))
}

/// Handler for POST `/invoices/{invoice_id}/approve` endpoint.
async fn handle_approve_invoice(
    AxumState(app_state): AxumState<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<Json<Invoice>, HttpError> {
    info!(invoice_id, "Handling approve_invoice request");

    let mut persistence = app_state.persistence.lock().await;
    let invoice: Invoice = billing::approve_invoice(&mut persistence, invoice_id)?;
    drop(persistence);

    Ok(Json(invoice))
}

/// Handler for POST `/invoices/{invoice_id}/reject` endpoint.
async fn handle_reject_invoice(
    AxumState(app_state): AxumState<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<Json<Invoice>, HttpError> {
    info!(invoice_id, "Handling reject_invoice request");

    let mut persistence = app_state.persistence.lock().await;
    let invoice: Invoice = billing::reject_invoice(&mut persistence, invoice_id)?;
    drop(persistence);

    Ok(Json(invoice))
}

/// Handler for POST `/invoices/{invoice_id}/paid` endpoint.
async fn handle_mark_invoice_paid(
    AxumState(app_state): AxumState<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<Json<Invoice>, HttpError> {
    info!(invoice_id, "Handling mark_invoice_paid request");

    let mut persistence = app_state.persistence.lock().await;
    let invoice: Invoice = billing::mark_invoice_paid(&mut persistence, invoice_id)?;
    drop(persistence);

    Ok(Json(invoice))
}

/// Handler for DELETE `/invoices/{invoice_id}` endpoint.
async fn handle_delete_invoice(
    AxumState(app_state): AxumState<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    info!(invoice_id, "Handling delete_invoice request");

    let mut persistence = app_state.persistence.lock().await;
    billing::delete_invoice(&mut persistence, invoice_id)?;
    drop(persistence);

    Ok(Json(DeleteResponse { success: true }))
}

/// Handler for POST `/payments` endpoint.
async fn handle_record_payment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<Json<Payment>, HttpError> {
    info!(site_id = req.site_id, "Handling record_payment request");

    let mut persistence = app_state.persistence.lock().await;
    let payment: Payment = payments::record_payment(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(payment))
}

/// Handler for GET `/payments/{payment_id}` endpoint.
async fn handle_get_payment(
    AxumState(app_state): AxumState<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<Json<Payment>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let payment: Payment = payments::get_payment(&mut persistence, payment_id)?;
    drop(persistence);

    Ok(Json(payment))
}

/// Handler for GET `/sites/{site_id}/payments` endpoint.
async fn handle_list_payments(
    AxumState(app_state): AxumState<AppState>,
    Path(site_id): Path<i64>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<Json<Vec<Payment>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let listed: Vec<Payment> =
        payments::list_payments(&mut persistence, site_id, query.invoice_id)?;
    drop(persistence);

    Ok(Json(listed))
}

/// Handler for DELETE `/payments/{payment_id}` endpoint.
async fn handle_remove_payment(
    AxumState(app_state): AxumState<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    info!(payment_id, "Handling remove_payment request");

    let mut persistence = app_state.persistence.lock().await;
    payments::remove_payment(&mut persistence, payment_id)?;
    drop(persistence);

    Ok(Json(DeleteResponse { success: true }))
}

/// Handler for GET `/sites/{site_id}/situation` endpoint.
async fn handle_financial_situation(
    AxumState(app_state): AxumState<AppState>,
    Path(site_id): Path<i64>,
) -> Result<Json<FinancialSituation>, HttpError> {
    info!(site_id, "Handling financial_situation request");

    let mut persistence = app_state.persistence.lock().await;
    let result: FinancialSituation = situation::financial_situation(&mut persistence, site_id)?;
    drop(persistence);

    Ok(Json(result))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/sites", post(handle_create_site))
        .route("/sites", get(handle_list_sites))
        .route("/sites/{site_id}", get(handle_get_site))
        .route("/sites/{site_id}", put(handle_update_site))
        .route("/sites/{site_id}/lots", get(handle_list_lots))
        .route("/sites/{site_id}/snapshots", get(handle_list_snapshots))
        .route("/sites/{site_id}/invoices", get(handle_list_invoices))
        .route("/sites/{site_id}/payments", get(handle_list_payments))
        .route("/sites/{site_id}/situation", get(handle_financial_situation))
        .route("/lots", post(handle_create_lot))
        .route("/lots/{lot_id}", get(handle_get_lot))
        .route("/lots/{lot_id}", put(handle_update_lot))
        .route("/lots/{lot_id}", delete(handle_delete_lot))
        .route("/lots/{lot_id}/active", put(handle_set_lot_active))
        .route("/snapshots", post(handle_open_snapshot))
        .route("/snapshots/{snapshot_id}", get(handle_get_snapshot))
        .route("/snapshots/{snapshot_id}", delete(handle_delete_snapshot))
        .route(
            "/snapshots/{snapshot_id}/progress",
            post(handle_record_progress),
        )
        .route(
            "/snapshots/{snapshot_id}/submit",
            post(handle_submit_snapshot),
        )
        .route(
            "/snapshots/{snapshot_id}/approve",
            post(handle_approve_snapshot),
        )
        .route(
            "/snapshots/{snapshot_id}/reject",
            post(handle_reject_snapshot),
        )
        .route("/invoices", post(handle_open_invoice))
        .route("/invoices/{invoice_id}", get(handle_get_invoice))
        .route("/invoices/{invoice_id}", delete(handle_delete_invoice))
        .route(
            "/invoices/{invoice_id}/lines",
            post(handle_set_billed_quantity),
        )
        .route("/invoices/{invoice_id}/vat_rate", put(handle_set_vat_rate))
        .route("/invoices/{invoice_id}/submit", post(handle_submit_invoice))
        .route(
            "/invoices/{invoice_id}/approve",
            post(handle_approve_invoice),
        )
        .route("/invoices/{invoice_id}/reject", post(handle_reject_invoice))
        .route("/invoices/{invoice_id}/paid", post(handle_mark_invoice_paid))
        .route("/payments", post(handle_record_payment))
        .route("/payments/{payment_id}", get(handle_get_payment))
        .route("/payments/{payment_id}", delete(handle_remove_payment))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Site Ledger Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    async fn post_json<T: Serialize>(app: &Router, uri: &str, body: &T) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get_uri(app: &Router, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json<T: for<'de> Deserialize<'de>>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_site() {
        let app: Router = build_router(create_test_app_state());

        let req = CreateSiteRequest {
            name: String::from("Riverside depot"),
            planned_budget: dec!(5000),
        };
        let response = post_json(&app, "/sites", &req).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let site: SiteRecord = body_json(response).await;
        assert_eq!(site.name, "Riverside depot");

        let response = get_uri(&app, &format!("/sites/{}", site.site_id)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let loaded: SiteRecord = body_json(response).await;
        assert_eq!(loaded.planned_budget, dec!(5000));
    }

    #[tokio::test]
    async fn test_missing_site_returns_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = get_uri(&app, "/sites/999").await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);

        let error: ErrorResponse = body_json(response).await;
        assert!(error.error);
    }

    #[tokio::test]
    async fn test_empty_site_name_is_unprocessable() {
        let app: Router = build_router(create_test_app_state());

        let req = CreateSiteRequest {
            name: String::new(),
            planned_budget: dec!(5000),
        };
        let response = post_json(&app, "/sites", &req).await;
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_snapshot_lifecycle_over_http() {
        let app: Router = build_router(create_test_app_state());

        let site: SiteRecord = body_json(
            post_json(
                &app,
                "/sites",
                &CreateSiteRequest {
                    name: String::from("Riverside depot"),
                    planned_budget: dec!(5000),
                },
            )
            .await,
        )
        .await;
        let lot: WorkLot = body_json(
            post_json(
                &app,
                "/lots",
                &CreateLotRequest {
                    site_id: site.site_id,
                    name: String::from("Earthworks"),
                    unit: String::from("m3"),
                    planned_quantity: dec!(100),
                    unit_price: dec!(50),
                    position: 0,
                },
            )
            .await,
        )
        .await;

        let snapshot: ProgressSnapshot = body_json(
            post_json(
                &app,
                "/snapshots",
                &OpenSnapshotRequest {
                    site_id: site.site_id,
                    date: String::from("2026-03-31"),
                    period_start: String::from("2026-03-01"),
                    period_end: String::from("2026-03-31"),
                    created_by: 1,
                },
            )
            .await,
        )
        .await;
        assert_eq!(snapshot.number, 1);

        let response = post_json(
            &app,
            &format!("/snapshots/{}/progress", snapshot.snapshot_id),
            &RecordProgressRequest {
                lot_id: lot.lot_id,
                realized_quantity: dec!(40),
            },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/snapshots/{}/submit", snapshot.snapshot_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = post_json(
            &app,
            &format!("/snapshots/{}/approve", snapshot.snapshot_id),
            &ApproveSnapshotApiRequest { approved_by: 7 },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let approved: ProgressSnapshot = body_json(response).await;
        assert_eq!(approved.approved_by, Some(7));
    }

    #[tokio::test]
    async fn test_approving_a_draft_snapshot_is_a_conflict() {
        let app: Router = build_router(create_test_app_state());

        let site: SiteRecord = body_json(
            post_json(
                &app,
                "/sites",
                &CreateSiteRequest {
                    name: String::from("Riverside depot"),
                    planned_budget: dec!(5000),
                },
            )
            .await,
        )
        .await;
        let snapshot: ProgressSnapshot = body_json(
            post_json(
                &app,
                "/snapshots",
                &OpenSnapshotRequest {
                    site_id: site.site_id,
                    date: String::from("2026-03-31"),
                    period_start: String::from("2026-03-01"),
                    period_end: String::from("2026-03-31"),
                    created_by: 1,
                },
            )
            .await,
        )
        .await;

        let response = post_json(
            &app,
            &format!("/snapshots/{}/approve", snapshot.snapshot_id),
            &ApproveSnapshotApiRequest { approved_by: 7 },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_situation_endpoint_reports_totals() {
        let app: Router = build_router(create_test_app_state());

        let site: SiteRecord = body_json(
            post_json(
                &app,
                "/sites",
                &CreateSiteRequest {
                    name: String::from("Riverside depot"),
                    planned_budget: dec!(5000),
                },
            )
            .await,
        )
        .await;
        let lot: WorkLot = body_json(
            post_json(
                &app,
                "/lots",
                &CreateLotRequest {
                    site_id: site.site_id,
                    name: String::from("Earthworks"),
                    unit: String::from("m3"),
                    planned_quantity: dec!(100),
                    unit_price: dec!(50),
                    position: 0,
                },
            )
            .await,
        )
        .await;

        let invoice: Invoice = body_json(
            post_json(
                &app,
                "/invoices",
                &OpenInvoiceRequest {
                    site_id: site.site_id,
                    date: String::from("2026-04-30"),
                    period_start: String::from("2026-04-01"),
                    period_end: String::from("2026-04-30"),
                    vat_rate: dec!(19),
                    created_by: 1,
                },
            )
            .await,
        )
        .await;
        post_json(
            &app,
            &format!("/invoices/{}/lines", invoice.invoice_id),
            &SetBilledQuantityRequest {
                lot_id: lot.lot_id,
                billed_quantity: dec!(70),
            },
        )
        .await;
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/invoices/{}/submit", invoice.invoice_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/invoices/{}/approve", invoice.invoice_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = get_uri(&app, &format!("/sites/{}/situation", site.site_id)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let result: FinancialSituation = body_json(response).await;
        assert_eq!(result.total_invoiced, dec!(4165.00));
        assert_eq!(result.remaining_due, dec!(4165.00));
    }
}
