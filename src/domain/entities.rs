use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::TicketError;

// Lifecycle states a ticket moves through. Wire names are snake_case and are
// what the transition audit trail records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Single checklist entry. Completion metadata is private so completed_at and
// completed_by can only exist while completed is true.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_by: Option<String>,
}

impl ChecklistItem {
    pub fn pending(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            completed: false,
            completed_at: None,
            completed_by: None,
        }
    }

    // Marks the item done. A second completion keeps the original metadata so
    // the audit fields record who actually finished the work.
    pub fn complete(&mut self, by: impl Into<String>, at: DateTime<Utc>) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.completed_at = Some(at);
        self.completed_by = Some(by.into());
    }

    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
        self.completed_by = None;
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn completed_by(&self) -> Option<&str> {
        self.completed_by.as_deref()
    }
}

// Ordered checklist with derived rollup counters. The counters are never
// accepted from callers; every constructor and mutator recomputes them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketChecklist {
    items: Vec<ChecklistItem>,
    completed_count: usize,
    total_count: usize,
    progress: u8,
}

impl TicketChecklist {
    pub fn from_items(items: Vec<ChecklistItem>) -> Self {
        let mut checklist = Self {
            items,
            completed_count: 0,
            total_count: 0,
            progress: 0,
        };
        checklist.recompute();
        checklist
    }

    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn complete_item(
        &mut self,
        item_id: &str,
        by: &str,
        at: DateTime<Utc>,
    ) -> Result<(), TicketError> {
        let item = self.item_mut(item_id)?;
        item.complete(by, at);
        self.recompute();
        Ok(())
    }

    pub fn reopen_item(&mut self, item_id: &str) -> Result<(), TicketError> {
        let item = self.item_mut(item_id)?;
        item.reopen();
        self.recompute();
        Ok(())
    }

    fn item_mut(&mut self, item_id: &str) -> Result<&mut ChecklistItem, TicketError> {
        self.items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(TicketError::ChecklistItemNotFound)
    }

    fn recompute(&mut self) {
        self.total_count = self.items.len();
        self.completed_count = self.items.iter().filter(|item| item.completed).count();
        self.progress = if self.total_count == 0 {
            0
        } else {
            let ratio = self.completed_count as f64 * 100.0 / self.total_count as f64;
            ratio.round() as u8
        };
    }
}

// Metadata for an uploaded file. Created once at upload time and never
// mutated; deletion happens with the owning ticket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAttachment {
    pub id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
}

// A user reference embedded at a character offset within a comment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMention {
    pub user_id: String,
    pub user_name: String,
    pub position: usize,
}

// Scans a comment body for @handle tokens. The offset points at the '@'
// sign, counted in characters. A handle glued to other handle characters
// (user@example.com) is not a mention.
pub fn extract_mentions(text: &str) -> Vec<TicketMention> {
    fn is_handle_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    }

    let chars: Vec<char> = text.chars().collect();
    let mut mentions = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let at_start = chars[i] == '@' && (i == 0 || !is_handle_char(chars[i - 1]));
        if !at_start {
            i += 1;
            continue;
        }
        let start = i + 1;
        let mut end = start;
        while end < chars.len() && is_handle_char(chars[end]) {
            end += 1;
        }
        if end > start {
            let handle: String = chars[start..end].iter().collect();
            // The handle doubles as id and display name until a user
            // directory resolves it.
            mentions.push(TicketMention {
                user_id: handle.clone(),
                user_name: handle,
                position: i,
            });
        }
        i = end.max(i + 1);
    }
    mentions
}

// One audit entry of a ticket's status field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransition {
    pub from: Option<TicketStatus>,
    pub to: TicketStatus,
    pub transitioned_at: DateTime<Utc>,
    pub transitioned_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// Append-only status audit trail. Each entry must chain off the previous
// entry's target status; entries are never mutated or reordered.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct TransitionLog {
    entries: Vec<StatusTransition>,
}

impl TransitionLog {
    // Every ticket starts its trail with a from-nothing entry into Open.
    pub fn opened(by: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            entries: vec![StatusTransition {
                from: None,
                to: TicketStatus::Open,
                transitioned_at: at,
                transitioned_by: by.into(),
                note: None,
            }],
        }
    }

    pub fn append(&mut self, entry: StatusTransition) -> Result<(), TicketError> {
        let expected_from = self.entries.last().map(|last| last.to);
        if entry.from != expected_from {
            return Err(TicketError::BrokenTransitionChain);
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[StatusTransition] {
        &self.entries
    }

    pub fn current(&self) -> Option<TicketStatus> {
        self.entries.last().map(|entry| entry.to)
    }
}

// Comment on a ticket with the mentions parsed out of its body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketComment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub posted_at: DateTime<Utc>,
    pub mentions: Vec<TicketMention>,
}

// Ticket aggregate stored by the ticket store.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: u64,
    pub subject: String,
    pub description: Option<String>,
    pub requester: String,
    pub checklist: TicketChecklist,
    pub attachments: Vec<TicketAttachment>,
    pub comments: Vec<TicketComment>,
    pub transitions: TransitionLog,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(
        id: u64,
        subject: impl Into<String>,
        description: Option<String>,
        requester: impl Into<String>,
        checklist: TicketChecklist,
        created_at: DateTime<Utc>,
    ) -> Self {
        let requester = requester.into();
        Self {
            id,
            subject: subject.into(),
            description,
            requester: requester.clone(),
            checklist,
            attachments: Vec::new(),
            comments: Vec::new(),
            transitions: TransitionLog::opened(requester, created_at),
            created_at,
        }
    }

    // Current status is always the head of the audit trail.
    pub fn status(&self) -> TicketStatus {
        self.transitions.current().unwrap_or(TicketStatus::Open)
    }
}

// Structural shape of the authenticated session exchanged with the auth
// collaborator. Carries no behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_expires_at: Option<DateTime<Utc>>,
}
