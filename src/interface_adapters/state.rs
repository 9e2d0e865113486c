use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::entities::Ticket;
use crate::domain::ports::{Clock, TicketStore};

pub type TicketTable = Arc<Mutex<HashMap<u64, Ticket>>>;

// Application state holding ticket storage.
#[derive(Clone)]
pub struct AppState {
    pub tickets: TicketTable,
    pub next_id: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tickets: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

// In-memory ticket store adapter for the helpdesk service.
#[derive(Clone)]
pub struct InMemoryTicketStore {
    pub tickets: TicketTable,
    pub next_id: Arc<AtomicU64>,
}

impl InMemoryTicketStore {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            tickets: state.tickets.clone(),
            next_id: state.next_id.clone(),
        }
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn insert(&self, mut ticket: Ticket) -> Result<u64, String> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        ticket.id = id;
        let mut tickets = self.tickets.lock().await;
        tickets.insert(id, ticket);
        Ok(id)
    }

    async fn get(&self, id: u64) -> Result<Option<Ticket>, String> {
        let tickets = self.tickets.lock().await;
        Ok(tickets.get(&id).cloned())
    }

    async fn update(&self, ticket: Ticket) -> Result<bool, String> {
        let mut tickets = self.tickets.lock().await;
        match tickets.get_mut(&ticket.id) {
            Some(slot) => {
                *slot = ticket;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// System clock adapter used by ticket use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
