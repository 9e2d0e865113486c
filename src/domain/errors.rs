use thiserror::Error;

use crate::domain::entities::TicketStatus;

// Domain-level errors for ticket workflows. Display strings double as the
// client-facing messages once the boundary translates them.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Ticket not found")]
    TicketNotFound,
    #[error("Checklist item not found")]
    ChecklistItemNotFound,
    #[error("subject is required")]
    EmptySubject,
    #[error("requester is required")]
    EmptyRequester,
    #[error("actor is required")]
    EmptyActor,
    #[error("comment body is required")]
    EmptyCommentBody,
    #[error("ticket is already {0}")]
    AlreadyInStatus(TicketStatus),
    #[error("status transition does not continue the audit chain")]
    BrokenTransitionChain,
    #[error("storage failure")]
    StorageFailure,
}
