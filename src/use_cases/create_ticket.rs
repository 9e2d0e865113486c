use uuid::Uuid;

use crate::domain::entities::{ChecklistItem, Ticket, TicketChecklist};
use crate::domain::errors::TicketError;
use crate::domain::ports::{Clock, TicketStore};
use crate::interface_adapters::protocol::TicketCreateRequest;

// Keep subjects short enough for list views and log lines.
const MAX_SUBJECT_LEN: usize = 200;

// Ticket creation use case with injected dependencies.
pub struct CreateTicketUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> CreateTicketUseCase<C, S>
where
    C: Clock,
    S: TicketStore,
{
    pub async fn execute(&self, payload: TicketCreateRequest) -> Result<Ticket, TicketError> {
        let subject = payload.subject.trim();
        if subject.is_empty() || subject.chars().count() > MAX_SUBJECT_LEN {
            return Err(TicketError::EmptySubject);
        }
        let requester = payload.requester.trim();
        if requester.is_empty() {
            return Err(TicketError::EmptyRequester);
        }

        let items = payload
            .checklist
            .iter()
            .map(|label| ChecklistItem::pending(Uuid::new_v4().to_string(), label.trim()))
            .collect();
        let checklist = TicketChecklist::from_items(items);

        let mut ticket = Ticket::new(
            0,
            subject,
            payload.description,
            requester,
            checklist,
            self.clock.now(),
        );

        let id = self
            .store
            .insert(ticket.clone())
            .await
            .map_err(|_| TicketError::StorageFailure)?;
        ticket.id = id;

        Ok(ticket)
    }
}
