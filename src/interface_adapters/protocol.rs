use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    StatusTransition, Ticket, TicketAttachment, TicketChecklist, TicketComment, TicketStatus,
};

// Request payload for opening a ticket. Checklist entries arrive as plain
// labels; ids and rollup counters are assigned server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreateRequest {
    pub subject: String,
    pub description: Option<String>,
    pub requester: String,
    #[serde(default)]
    pub checklist: Vec<String>,
}

// Request payload for completing or reopening a checklist item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItemUpdateRequest {
    pub completed: bool,
    pub actor: String,
}

// Request payload for moving a ticket to a new status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub to: TicketStatus,
    pub actor: String,
    pub note: Option<String>,
}

// Request payload for commenting on a ticket.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreateRequest {
    pub author: String,
    pub body: String,
}

// Full ticket view returned by the read and create endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: u64,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub requester: String,
    pub status: TicketStatus,
    pub checklist: TicketChecklist,
    pub attachments: Vec<TicketAttachment>,
    pub comments: Vec<TicketComment>,
    pub transitions: Vec<StatusTransition>,
    pub created_at: DateTime<Utc>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        let status = ticket.status();
        Self {
            id: ticket.id,
            subject: ticket.subject,
            description: ticket.description,
            requester: ticket.requester,
            status,
            checklist: ticket.checklist,
            attachments: ticket.attachments,
            comments: ticket.comments,
            transitions: ticket.transitions.entries().to_vec(),
            created_at: ticket.created_at,
        }
    }
}
