use crate::domain::entities::TicketChecklist;
use crate::domain::errors::TicketError;
use crate::domain::ports::{Clock, TicketStore};
use crate::interface_adapters::protocol::ChecklistItemUpdateRequest;

// Checklist item completion/reopen use case with injected dependencies.
pub struct UpdateChecklistUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> UpdateChecklistUseCase<C, S>
where
    C: Clock,
    S: TicketStore,
{
    pub async fn execute(
        &self,
        ticket_id: u64,
        item_id: &str,
        payload: ChecklistItemUpdateRequest,
    ) -> Result<TicketChecklist, TicketError> {
        let actor = payload.actor.trim();
        if actor.is_empty() {
            return Err(TicketError::EmptyActor);
        }

        let mut ticket = self
            .store
            .get(ticket_id)
            .await
            .map_err(|_| TicketError::StorageFailure)?
            .ok_or(TicketError::TicketNotFound)?;

        if payload.completed {
            ticket
                .checklist
                .complete_item(item_id, actor, self.clock.now())?;
        } else {
            ticket.checklist.reopen_item(item_id)?;
        }

        let checklist = ticket.checklist.clone();
        let updated = self
            .store
            .update(ticket)
            .await
            .map_err(|_| TicketError::StorageFailure)?;
        if !updated {
            // Ticket vanished between get and update.
            return Err(TicketError::TicketNotFound);
        }

        Ok(checklist)
    }
}
