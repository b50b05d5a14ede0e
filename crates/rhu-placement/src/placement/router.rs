use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{LicenseeStatus, NewLicensee, NewRhu, PrisonId, RhuId};
use super::error::PlacementError;
use super::registry::PlacementRegistry;

/// Request to place a licensee. Conflicting placements need `acknowledge_conflict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub prison_id: PrisonId,
    pub rhu_id: RhuId,
    #[serde(default)]
    pub acknowledge_conflict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRequest {
    pub prison_id: PrisonId,
    pub rhu_id: RhuId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesUpdate {
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostRequest {
    pub rhu_id: RhuId,
    pub days: i64,
}

/// Router builder exposing the placement registry over HTTP.
pub fn placement_router(registry: Arc<PlacementRegistry>) -> Router {
    Router::new()
        .route(
            "/api/v1/licensees",
            post(register_licensee_handler).get(list_licensees_handler),
        )
        .route("/api/v1/licensees/:prison_id", get(licensee_handler))
        .route("/api/v1/licensees/:prison_id/notes", put(notes_handler))
        .route("/api/v1/licensees/:prison_id/exit", post(exit_handler))
        .route(
            "/api/v1/licensees/:prison_id/rankings",
            get(rankings_handler),
        )
        .route(
            "/api/v1/rhus",
            post(register_rhu_handler).get(list_rhus_handler),
        )
        .route(
            "/api/v1/rhus/:rhu_id/conflicts/:prison_id",
            get(conflict_handler),
        )
        .route("/api/v1/allocations", post(allocate_handler))
        .route("/api/v1/allocations/release", post(release_handler))
        .route(
            "/api/v1/costs",
            get(running_total_handler).post(total_cost_handler),
        )
        .route("/api/v1/costs/reset", post(reset_costs_handler))
        .route("/api/v1/costs/rhus/:rhu_id/daily", get(daily_cost_handler))
        .with_state(registry)
}

/// HTTP status for a placement failure.
pub(crate) fn status_for(error: &PlacementError) -> StatusCode {
    match error {
        PlacementError::UnknownLicensee { .. } | PlacementError::UnknownRhu { .. } => {
            StatusCode::NOT_FOUND
        }
        PlacementError::DuplicateIdentity { .. }
        | PlacementError::AlreadyAllocated { .. }
        | PlacementError::CapacityExceeded { .. }
        | PlacementError::StillOccupying { .. } => StatusCode::CONFLICT,
        PlacementError::InvalidCostInput { .. }
        | PlacementError::InvalidUnit { .. }
        | PlacementError::IllegalStatusTransition { .. }
        | PlacementError::TerminalStatus { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn error_response(error: PlacementError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status_for(&error), axum::Json(payload)).into_response()
}

pub(crate) async fn register_licensee_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    axum::Json(intake): axum::Json<NewLicensee>,
) -> Response {
    match registry.register_licensee(intake) {
        Ok(licensee) => (StatusCode::CREATED, axum::Json(licensee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_licensees_handler(
    State(registry): State<Arc<PlacementRegistry>>,
) -> Response {
    (StatusCode::OK, axum::Json(registry.list_licensees())).into_response()
}

pub(crate) async fn licensee_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    Path(prison_id): Path<String>,
) -> Response {
    match registry.licensee(&PrisonId(prison_id)) {
        Ok(licensee) => (StatusCode::OK, axum::Json(licensee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn notes_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    Path(prison_id): Path<String>,
    axum::Json(update): axum::Json<NotesUpdate>,
) -> Response {
    match registry.update_notes(&PrisonId(prison_id), update.notes) {
        Ok(licensee) => (StatusCode::OK, axum::Json(licensee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn exit_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    Path(prison_id): Path<String>,
) -> Response {
    let prison_id = PrisonId(prison_id);
    match registry
        .set_status(&prison_id, LicenseeStatus::Exited)
        .and_then(|()| registry.licensee(&prison_id))
    {
        Ok(licensee) => (StatusCode::OK, axum::Json(licensee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rankings_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    Path(prison_id): Path<String>,
) -> Response {
    match registry.rank_rhus_for(&PrisonId(prison_id)) {
        Ok(ranked) => (StatusCode::OK, axum::Json(ranked)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_rhu_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    axum::Json(intake): axum::Json<NewRhu>,
) -> Response {
    match registry.register_rhu(intake) {
        Ok(rhu) => (StatusCode::CREATED, axum::Json(rhu)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_rhus_handler(State(registry): State<Arc<PlacementRegistry>>) -> Response {
    (StatusCode::OK, axum::Json(registry.list_rhus())).into_response()
}

pub(crate) async fn conflict_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    Path((rhu_id, prison_id)): Path<(usize, String)>,
) -> Response {
    match registry.conflicting_flags(&PrisonId(prison_id), RhuId(rhu_id)) {
        Ok(flags) => {
            let payload = json!({
                "conflict": !flags.is_empty(),
                "conflicting_flags": flags,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn allocate_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    axum::Json(request): axum::Json<AllocationRequest>,
) -> Response {
    let AllocationRequest {
        prison_id,
        rhu_id,
        acknowledge_conflict,
    } = request;

    let flags = match registry.conflicting_flags(&prison_id, rhu_id) {
        Ok(flags) => flags,
        Err(error) => return error_response(error),
    };
    if !flags.is_empty() && !acknowledge_conflict {
        let payload = json!({
            "allocated": false,
            "error": "licence conditions conflict with unit location flags",
            "conflicting_flags": flags,
        });
        return (StatusCode::CONFLICT, axum::Json(payload)).into_response();
    }

    match registry.allocate(&prison_id, rhu_id) {
        Ok(true) => {
            let payload = json!({
                "allocated": true,
                "prison_id": prison_id,
                "rhu_id": rhu_id,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(false) => {
            let payload = json!({
                "allocated": false,
                "error": "no space available in this unit",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn release_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    axum::Json(request): axum::Json<ReleaseRequest>,
) -> Response {
    match registry.deallocate(&request.prison_id, request.rhu_id) {
        Ok(released) => {
            (StatusCode::OK, axum::Json(json!({ "released": released }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn running_total_handler(
    State(registry): State<Arc<PlacementRegistry>>,
) -> Response {
    let payload = json!({ "running_total": registry.ledger().running_total() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn total_cost_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    axum::Json(request): axum::Json<CostRequest>,
) -> Response {
    match registry.total_cost(request.days, request.rhu_id) {
        Ok(increment) => {
            let payload = json!({
                "rhu_id": request.rhu_id,
                "days": request.days,
                "cost": increment,
                "running_total": registry.ledger().running_total(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reset_costs_handler(
    State(registry): State<Arc<PlacementRegistry>>,
) -> Response {
    registry.reset_costs();
    let payload = json!({ "running_total": registry.ledger().running_total() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn daily_cost_handler(
    State(registry): State<Arc<PlacementRegistry>>,
    Path(rhu_id): Path<usize>,
) -> Response {
    match registry.daily_cost(RhuId(rhu_id)) {
        Ok(cost) => {
            let payload = json!({ "rhu_id": rhu_id, "cost_per_day": cost });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
