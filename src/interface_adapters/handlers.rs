use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::domain::entities::{StatusTransition, TicketChecklist, TicketComment};
use crate::interface_adapters::error_filter::ApiError;
use crate::interface_adapters::protocol::{
    ChecklistItemUpdateRequest, CommentCreateRequest, TicketCreateRequest, TicketResponse,
    TransitionRequest,
};
use crate::interface_adapters::state::{AppState, InMemoryTicketStore, SystemClock};
use crate::use_cases::add_comment::AddCommentUseCase;
use crate::use_cases::create_ticket::CreateTicketUseCase;
use crate::use_cases::get_ticket::GetTicketUseCase;
use crate::use_cases::transition_ticket::TransitionTicketUseCase;
use crate::use_cases::update_checklist::UpdateChecklistUseCase;

// Handler for opening a new ticket.
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(payload): Json<TicketCreateRequest>,
) -> Result<(StatusCode, Json<TicketResponse>), ApiError> {
    let use_case = CreateTicketUseCase {
        clock: SystemClock,
        store: InMemoryTicketStore::from_state(&state),
    };

    let ticket = use_case.execute(payload).await?;

    Ok((StatusCode::CREATED, Json(TicketResponse::from(ticket))))
}

// Handler for reading a single ticket.
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<TicketResponse>, ApiError> {
    let use_case = GetTicketUseCase {
        store: InMemoryTicketStore::from_state(&state),
    };

    let ticket = use_case.execute(id).await?;

    Ok(Json(TicketResponse::from(ticket)))
}

// Handler for completing or reopening a checklist item.
pub async fn update_checklist_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(u64, String)>,
    Json(payload): Json<ChecklistItemUpdateRequest>,
) -> Result<Json<TicketChecklist>, ApiError> {
    let use_case = UpdateChecklistUseCase {
        clock: SystemClock,
        store: InMemoryTicketStore::from_state(&state),
    };

    let checklist = use_case.execute(id, &item_id, payload).await?;

    Ok(Json(checklist))
}

// Handler for moving a ticket to a new status.
pub async fn transition_ticket(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<TransitionRequest>,
) -> Result<(StatusCode, Json<StatusTransition>), ApiError> {
    let use_case = TransitionTicketUseCase {
        clock: SystemClock,
        store: InMemoryTicketStore::from_state(&state),
    };

    let entry = use_case.execute(id, payload).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

// Handler for commenting on a ticket.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<CommentCreateRequest>,
) -> Result<(StatusCode, Json<TicketComment>), ApiError> {
    let use_case = AddCommentUseCase {
        clock: SystemClock,
        store: InMemoryTicketStore::from_state(&state),
    };

    let comment = use_case.execute(id, payload).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
