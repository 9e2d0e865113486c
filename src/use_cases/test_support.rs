use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::{ChecklistItem, Ticket, TicketChecklist};
use crate::domain::ports::{Clock, TicketStore};

pub(crate) type TicketRows = Arc<Mutex<HashMap<u64, Ticket>>>;

pub(crate) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
}

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub update: bool,
    // Simulates the ticket disappearing between get and update.
    pub missing_on_update: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingStore {
    rows: TicketRows,
    next_id: Arc<AtomicU64>,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_ticket(&self, ticket: Ticket) {
        let mut guard = self.rows.lock().expect("ticket rows mutex poisoned");
        guard.insert(ticket.id, ticket);
    }

    pub(crate) fn get_test_ticket(&self, id: u64) -> Option<Ticket> {
        let guard = self.rows.lock().expect("ticket rows mutex poisoned");
        guard.get(&id).cloned()
    }
}

// Seeded ticket with one pending checklist item, used across use-case tests.
pub(crate) fn seeded_ticket(id: u64) -> Ticket {
    let checklist = TicketChecklist::from_items(vec![
        ChecklistItem::pending("item-1", "triage"),
        ChecklistItem::pending("item-2", "fix"),
    ]);
    Ticket::new(
        id,
        "Printer on fire",
        Some("third floor".to_string()),
        "alice",
        checklist,
        fixed_time(),
    )
}

#[async_trait]
impl TicketStore for RecordingStore {
    async fn insert(&self, mut ticket: Ticket) -> Result<u64, String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        ticket.id = id;
        let mut guard = self.rows.lock().expect("ticket rows mutex poisoned");
        guard.insert(id, ticket);
        Ok(id)
    }

    async fn get(&self, id: u64) -> Result<Option<Ticket>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.rows.lock().expect("ticket rows mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn update(&self, ticket: Ticket) -> Result<bool, String> {
        if self.failures.update {
            return Err("update failed".to_string());
        }
        if self.failures.missing_on_update {
            return Ok(false);
        }

        let mut guard = self.rows.lock().expect("ticket rows mutex poisoned");
        match guard.get_mut(&ticket.id) {
            Some(slot) => {
                *slot = ticket;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
