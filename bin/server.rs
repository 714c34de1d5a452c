// Savings Circle - Web Server
// REST API over the group ledger plus the browser dashboard page

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use savings_circle::{
    format_naira, preview_tier, GroupLedger, LedgerError, Member, TierPreview, MAX_MEMBERS, TIERS,
};

/// Shared application state
///
/// One ledger per server process; every handler takes the lock for the
/// whole operation, so simulate always sees a consistent roster.
#[derive(Clone)]
struct AppState {
    ledger: Arc<Mutex<GroupLedger>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Member response with the display fields the dashboard renders
#[derive(Serialize)]
struct MemberResponse {
    id: String,
    name: String,
    tier: String,
    tier_label: String,
    contribution: f64,
    weekly_interest: f64,
    projected_next_week: f64,
    joined_at: String,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            name: member.name.clone(),
            tier: member.tier.as_str().to_string(),
            tier_label: member.tier_label().to_string(),
            contribution: member.contribution,
            weekly_interest: member.weekly_interest(),
            projected_next_week: member.projected_next_week(),
            joined_at: member.joined_at.to_rfc3339(),
        }
    }
}

/// Stats response
#[derive(Serialize)]
struct StatsResponse {
    total_saved: f64,
    total_saved_display: String,
    member_count: usize,
    capacity: usize,
    is_full: bool,
}

#[derive(Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    name: String,
    /// Tier key as submitted by the form; empty = unselected
    #[serde(default)]
    tier: String,
}

/// Map ledger errors onto HTTP status codes
fn error_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::EmptyName | LedgerError::UnknownTier(_) | LedgerError::GroupFull => {
            StatusCode::BAD_REQUEST
        }
        LedgerError::MemberNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::EmptyGroup => StatusCode::CONFLICT,
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/tiers - The three tier definitions
async fn get_tiers() -> impl IntoResponse {
    let previews: Vec<TierPreview> = TIERS.iter().map(|t| t.preview()).collect();
    Json(ApiResponse::ok(previews))
}

/// GET /api/tiers/:key/preview - Preview one tier before registering
async fn get_tier_preview(Path(key): Path<String>) -> impl IntoResponse {
    match preview_tier(&key) {
        Ok(preview) => (StatusCode::OK, Json(ApiResponse::ok(preview))).into_response(),
        Err(err) => (
            error_status(&err),
            Json(ApiResponse::<TierPreview>::err(err.to_string())),
        )
            .into_response(),
    }
}

/// GET /api/members - Current roster
async fn get_members(State(state): State<AppState>) -> impl IntoResponse {
    let ledger = state.ledger.lock().unwrap();

    let response: Vec<MemberResponse> = ledger.members().iter().map(|m| m.into()).collect();
    Json(ApiResponse::ok(response))
}

/// POST /api/members - Register a member
async fn register_member(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.lock().unwrap();

    match ledger.register_member_by_key(&request.name, &request.tier) {
        Ok(member) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok(MemberResponse::from(&member))),
        )
            .into_response(),
        Err(err) => (
            error_status(&err),
            Json(ApiResponse::<MemberResponse>::err(err.to_string())),
        )
            .into_response(),
    }
}

/// DELETE /api/members/:id - Withdraw a member
///
/// The browser page asks confirm() before calling this; the operation
/// itself is unconditional.
async fn withdraw_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.lock().unwrap();

    match ledger.withdraw_member(&id) {
        Ok(member) => {
            let message = format!(
                "{} withdrew ₦{} and has been removed.",
                member.name,
                format_naira(member.contribution)
            );
            println!("👋 {}", message);
            (StatusCode::OK, Json(ApiResponse::ok(MemberResponse::from(&member))))
                .into_response()
        }
        Err(err) => (
            error_status(&err),
            Json(ApiResponse::<MemberResponse>::err(err.to_string())),
        )
            .into_response(),
    }
}

/// POST /api/simulate - Apply one week of interest to every member
async fn simulate_week(State(state): State<AppState>) -> impl IntoResponse {
    let mut ledger = state.ledger.lock().unwrap();

    match ledger.simulate_week() {
        Ok(updated) => {
            let response: Vec<MemberResponse> = updated.iter().map(|m| m.into()).collect();
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(err) => (
            error_status(&err),
            Json(ApiResponse::<Vec<MemberResponse>>::err(err.to_string())),
        )
            .into_response(),
    }
}

/// POST /api/reset - Clear the roster
///
/// Confirmation is the browser page's job (confirm() dialog).
async fn reset_group(State(state): State<AppState>) -> impl IntoResponse {
    let mut ledger = state.ledger.lock().unwrap();

    ledger.reset_group();
    Json(ApiResponse::ok("Group reset"))
}

/// GET /api/stats - Running totals for the dashboard header
async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let ledger = state.ledger.lock().unwrap();

    let total = ledger.total_saved();
    let stats = StatsResponse {
        total_saved: total,
        total_saved_display: format_naira(total),
        member_count: ledger.member_count(),
        capacity: MAX_MEMBERS,
        is_full: ledger.is_full(),
    };

    Json(ApiResponse::ok(stats))
}

/// GET / - Serve the dashboard page
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Savings Circle - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // One empty ledger per server session; nothing is persisted
    let state = AppState {
        ledger: Arc::new(Mutex::new(GroupLedger::new())),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/tiers", get(get_tiers))
        .route("/tiers/:key/preview", get(get_tier_preview))
        .route("/members", get(get_members).post(register_member))
        .route("/members/:id", delete(withdraw_member))
        .route("/simulate", post(simulate_week))
        .route("/reset", post(reset_group))
        .route("/stats", get(get_stats))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/members");
    println!("   UI:  http://localhost:3000");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
