use crate::domain::entities::Ticket;
use crate::domain::errors::TicketError;
use crate::domain::ports::TicketStore;

// Ticket lookup use case with an injected store.
pub struct GetTicketUseCase<S> {
    pub store: S,
}

impl<S> GetTicketUseCase<S>
where
    S: TicketStore,
{
    pub async fn execute(&self, id: u64) -> Result<Ticket, TicketError> {
        self.store
            .get(id)
            .await
            .map_err(|_| TicketError::StorageFailure)?
            .ok_or(TicketError::TicketNotFound)
    }
}
