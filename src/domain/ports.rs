use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::Ticket;

// Port for ticket storage used by the ticket use cases. Insert assigns and
// returns the ticket id.
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn insert(&self, ticket: Ticket) -> Result<u64, String>;
    async fn get(&self, id: u64) -> Result<Option<Ticket>, String>;
    async fn update(&self, ticket: Ticket) -> Result<bool, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
