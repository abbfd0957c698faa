// Expense Tracker - REST API with Axum
// Thin HTTP layer: extract, call the service, map the outcome to a status code

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::entities::expense::{amount_format, parse_id};
use crate::entities::{Expense, ExpenseService, Store, StoreService};
use crate::error::ServiceError;
use crate::schema::FieldIssue;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub expenses: Arc<ExpenseService>,
    pub stores: Arc<StoreService>,
}

impl AppState {
    pub fn new(expenses: ExpenseService, stores: StoreService) -> Self {
        Self {
            expenses: Arc::new(expenses),
            stores: Arc::new(stores),
        }
    }

    pub fn seeded() -> Self {
        Self::new(ExpenseService::seeded(), StoreService::seeded())
    }

    pub fn empty() -> Self {
        Self::new(ExpenseService::new(), StoreService::new())
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        if config.seed {
            Self::seeded()
        } else {
            Self::empty()
        }
    }
}

// ============================================================================
// Response bodies
// ============================================================================

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<FieldIssue>,
}

#[derive(Serialize)]
struct HelloResponse {
    ok: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct ExpensesResponse {
    expenses: Vec<Expense>,
}

#[derive(Serialize)]
struct ExpenseResponse {
    expense: Expense,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalSpentResponse {
    #[serde(with = "amount_format")]
    total_spent: Decimal,
}

#[derive(Serialize)]
struct StoresResponse {
    stores: Vec<Store>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Body could not be read as JSON at all; the services never see it
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, issues) = match &self {
            ApiError::Service(ServiceError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.issues.clone())
            }
            ApiError::Service(ServiceError::NotFound { .. }) => (StatusCode::NOT_FOUND, Vec::new()),
            ApiError::MalformedBody(_) => (StatusCode::BAD_REQUEST, Vec::new()),
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            issues,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// `:id` guard - a segment that isn't a plain number is an expense that doesn't exist
fn expense_id(raw: &str) -> ApiResult<u64> {
    parse_id(raw).ok_or_else(|| ServiceError::not_found("expense", raw).into())
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/hello
async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        ok: true,
        message: "Hello from expense-tracker!",
    })
}

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/expenses
async fn list_expenses(State(state): State<AppState>) -> Json<ExpensesResponse> {
    Json(ExpensesResponse {
        expenses: state.expenses.list(),
    })
}

/// GET /api/expenses/total-spent
async fn total_spent(State(state): State<AppState>) -> Json<TotalSpentResponse> {
    Json(TotalSpentResponse {
        total_spent: state.expenses.total(),
    })
}

/// POST /api/expenses
async fn create_expense(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let Json(payload) = body?;
    let expense = state.expenses.create(&payload)?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/expenses/:id
async fn get_expense(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ExpenseResponse>> {
    let expense = state.expenses.get(expense_id(&raw_id)?)?;
    Ok(Json(ExpenseResponse { expense }))
}

/// DELETE /api/expenses/:id
async fn delete_expense(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ExpenseResponse>> {
    let expense = state.expenses.delete(expense_id(&raw_id)?)?;
    Ok(Json(ExpenseResponse { expense }))
}

/// GET /api/stores
async fn list_stores(State(state): State<AppState>) -> Json<StoresResponse> {
    Json(StoresResponse {
        stores: state.stores.list(),
    })
}

/// POST /api/stores/newStore
async fn create_store(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Store>)> {
    let Json(payload) = body?;
    let store = state.stores.create(&payload)?;
    Ok((StatusCode::CREATED, Json(store)))
}

// ============================================================================
// Routers
// ============================================================================

/// Expense routes, relative to their mount point
pub fn expenses_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/total-spent", get(total_spent))
        .route("/:id", get(get_expense).delete(delete_expense))
}

/// Store routes, relative to their mount point
pub fn stores_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores))
        .route("/newStore", post(create_store))
}

/// Full API under `/api`, with request logging
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/hello", get(hello))
        .route("/health", get(health_check))
        .nest("/expenses", expenses_routes())
        .nest("/stores", stores_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router as the server binary runs it
pub fn app(config: &ServerConfig) -> Router {
    let router = build_router(AppState::from_config(config));
    if config.permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

// ============================================================================
// Tests
// ============================================================================
