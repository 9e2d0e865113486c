use crate::domain::entities::StatusTransition;
use crate::domain::errors::TicketError;
use crate::domain::ports::{Clock, TicketStore};
use crate::interface_adapters::protocol::TransitionRequest;

// Status transition use case with injected dependencies. Appends to the
// ticket's audit trail; the trail itself rejects chain violations.
pub struct TransitionTicketUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> TransitionTicketUseCase<C, S>
where
    C: Clock,
    S: TicketStore,
{
    pub async fn execute(
        &self,
        ticket_id: u64,
        payload: TransitionRequest,
    ) -> Result<StatusTransition, TicketError> {
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

        let current = ticket.status();
        if current == payload.to {
            return Err(TicketError::AlreadyInStatus(current));
        }

        let entry = StatusTransition {
            from: Some(current),
            to: payload.to,
            transitioned_at: self.clock.now(),
            transitioned_by: actor.to_string(),
            note: payload.note,
        };
        ticket.transitions.append(entry.clone())?;

        let updated = self
            .store
            .update(ticket)
            .await
            .map_err(|_| TicketError::StorageFailure)?;
        if !updated {
            // Ticket vanished between get and update.
            return Err(TicketError::TicketNotFound);
        }

        Ok(entry)
    }
}
